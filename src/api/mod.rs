// Backend API modules
pub mod client;
pub mod cars;
pub mod filters;
pub mod suggestions;
pub mod reservations;

// Re-export commonly used functions
pub use client::ApiClient;
pub use cars::{get_car, load_cars};
pub use filters::{load_brands, load_car_types, load_filters};
pub use suggestions::load_suggestions;
pub use reservations::reserve;
