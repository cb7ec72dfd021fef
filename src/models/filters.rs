use serde::{Deserialize, Serialize};

/// Values offered by the type and brand selection controls.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct FilterVocabulary {
    pub car_types: Vec<String>,
    pub brands: Vec<String>,
}

impl FilterVocabulary {
    pub fn is_empty(&self) -> bool {
        self.car_types.is_empty() && self.brands.is_empty()
    }

    /// Case-insensitive exact match against the known car types.
    pub fn match_type(&self, text: &str) -> Option<&str> {
        match_ignore_case(&self.car_types, text)
    }

    /// Case-insensitive exact match against the known brands.
    pub fn match_brand(&self, text: &str) -> Option<&str> {
        match_ignore_case(&self.brands, text)
    }
}

fn match_ignore_case<'a>(values: &'a [String], text: &str) -> Option<&'a str> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    values
        .iter()
        .find(|v| v.to_lowercase() == needle)
        .map(|v| v.as_str())
}

/// Search text plus the selected type and brand. Empty strings mean "unset".
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    #[serde(default)]
    pub search: String,
    #[serde(default, rename = "type")]
    pub car_type: String,
    #[serde(default)]
    pub brand: String,
}

impl FilterState {
    pub fn new(search: impl Into<String>, car_type: impl Into<String>, brand: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            car_type: car_type.into(),
            brand: brand.into(),
        }
    }

    /// Query parameters for `/api/cars`; empty values are left out.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        for (key, value) in [("search", &self.search), ("type", &self.car_type), ("brand", &self.brand)] {
            let value = value.trim();
            if !value.is_empty() {
                params.push((key.to_string(), value.to_string()));
            }
        }
        params
    }

    pub fn has_search(&self) -> bool {
        !self.search.trim().is_empty()
    }
}
