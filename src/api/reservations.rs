use crate::error::Result;
use crate::models::{ReservationReceipt, ReservationRequest};
use super::client::ApiClient;

/// Post a reservation. A conflict such as an already rented car is
/// reported by the backend as `{"error": ...}` and surfaces as `ClientError::Backend`.
pub async fn reserve(api: &ApiClient, request: &ReservationRequest) -> Result<ReservationReceipt> {
    let body = serde_json::to_value(request)?;
    api.post("/api/reserve", body).await
}
