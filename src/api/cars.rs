use urlencoding::encode;

use crate::error::Result;
use crate::models::{Car, FilterState};
use super::client::ApiClient;

/// Load the car list, filtered by whatever is set in `filters`.
pub async fn load_cars(api: &ApiClient, filters: &FilterState) -> Result<Vec<Car>> {
    api.get("/api/cars", filters.to_query()).await
}

/// Load a single car by VIN. An unknown VIN comes back as `ClientError::Backend`.
pub async fn get_car(api: &ApiClient, vin: &str) -> Result<Car> {
    let endpoint = format!("/api/car/{}", encode(vin));
    api.get(&endpoint, Vec::new()).await
}
