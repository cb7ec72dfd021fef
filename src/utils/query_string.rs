use urlencoding::encode;

/// Build a query string from key-value pairs
pub fn build_query_string(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// `path` with the query appended, or `path` alone when there are no pairs.
pub fn with_query(path: &str, pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, build_query_string(pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encodes_values() {
        let pairs = vec![("search".to_string(), "land rover".to_string()), ("type".to_string(), "SUV".to_string())];
        assert_eq!(build_query_string(&pairs), "search=land%20rover&type=SUV");
    }

    #[test]
    fn test_with_query_without_pairs() {
        assert_eq!(with_query("/", &[]), "/");
        assert_eq!(with_query("/", &[("brand".to_string(), "BMW".to_string())]), "/?brand=BMW");
    }
}
