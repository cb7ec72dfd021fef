pub mod helpers;
pub mod catalog;
pub mod reservation;
