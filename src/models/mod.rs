pub mod app_state;
pub mod car;
pub mod filters;
pub mod reservation;

pub use app_state::AppState;
pub use car::Car;
pub use filters::{FilterState, FilterVocabulary};
pub use reservation::{
    CarRef, CustomerDetails, Field, Order, OrderRental, RentalDetails, ReservationDraft,
    ReservationReceipt, ReservationRequest,
};
