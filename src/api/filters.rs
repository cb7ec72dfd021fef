use crate::error::Result;
use crate::models::FilterVocabulary;
use super::client::ApiClient;

pub async fn load_car_types(api: &ApiClient) -> Result<Vec<String>> {
    api.get("/api/car-types", Vec::new()).await
}

pub async fn load_brands(api: &ApiClient) -> Result<Vec<String>> {
    api.get("/api/brands", Vec::new()).await
}

/// Fetch both vocabularies concurrently; either failure fails the whole load.
pub async fn load_filters(api: &ApiClient) -> Result<FilterVocabulary> {
    let (car_types, brands) = tokio::try_join!(load_car_types(api), load_brands(api))?;
    Ok(FilterVocabulary { car_types, brands })
}
