use crate::error::Result;
use super::client::ApiClient;

/// Search-as-you-type lookup. Callers skip the request for blank input.
pub async fn load_suggestions(api: &ApiClient, query: &str) -> Result<Vec<String>> {
    let params = vec![("q".to_string(), query.to_string())];
    api.get("/api/search-suggestions", params).await
}
