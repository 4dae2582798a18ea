//! Transport response types.

use std::collections::HashMap;

/// A successful (2xx) transport response.
#[derive(Clone, Debug, PartialEq)]
pub struct TransportResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, lower-cased (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed JSON body; `None` for empty bodies such as HEAD responses.
    pub body: Option<serde_json::Value>,
}

impl TransportResponse {
    /// Creates a new response.
    #[must_use]
    pub const fn new(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        body: Option<serde_json::Value>,
    ) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Parses reqwest headers into a `HashMap`.
    pub(crate) fn parse_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}
