//! Transport request types.
//!
//! This module provides the [`TransportRequest`] type describing a single
//! document or probe request.

use std::fmt;

/// HTTP methods used when fetching IIIF resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransportMethod {
    /// Fetch the full document.
    Get,
    /// Probe a resource without downloading its body.
    Head,
}

impl fmt::Display for TransportMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Head => write!(f, "HEAD"),
        }
    }
}

/// A request to be issued through a [`Transport`](super::Transport).
///
/// The bearer token is masked in `Debug` output.
///
/// # Example
///
/// ```rust
/// use iiif_manifold::clients::{TransportMethod, TransportRequest};
///
/// let request = TransportRequest::head("https://example.org/video.mp4")
///     .bearer_token(Some("secret".to_string()));
///
/// assert_eq!(request.method, TransportMethod::Head);
/// assert!(!format!("{request:?}").contains("secret"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// The absolute URL to request.
    pub url: String,
    /// The HTTP method.
    pub method: TransportMethod,
    /// Token sent as `Authorization: Bearer <token>` when present.
    pub bearer_token: Option<String>,
}

impl TransportRequest {
    /// Creates a GET request for `url`.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(TransportMethod::Get, url)
    }

    /// Creates a HEAD request for `url`.
    #[must_use]
    pub fn head(url: impl Into<String>) -> Self {
        Self::new(TransportMethod::Head, url)
    }

    /// Creates a request with an explicit method.
    #[must_use]
    pub fn new(method: TransportMethod, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            bearer_token: None,
        }
    }

    /// Sets (or clears) the bearer token.
    #[must_use]
    pub fn bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token;
        self
    }

    /// Returns the `Authorization` header value, if a token is set.
    #[must_use]
    pub fn authorization(&self) -> Option<String> {
        self.bearer_token
            .as_deref()
            .map(|token| format!("Bearer {token}"))
    }
}

impl fmt::Debug for TransportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportRequest")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "*****"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_display() {
        assert_eq!(TransportMethod::Get.to_string(), "GET");
        assert_eq!(TransportMethod::Head.to_string(), "HEAD");
    }

    #[test]
    fn test_constructors_set_method() {
        assert_eq!(TransportRequest::get("u").method, TransportMethod::Get);
        assert_eq!(TransportRequest::head("u").method, TransportMethod::Head);
        assert!(TransportRequest::get("u").bearer_token.is_none());
    }

    #[test]
    fn test_authorization_header_value() {
        let request = TransportRequest::get("u").bearer_token(Some("abc".to_string()));
        assert_eq!(request.authorization(), Some("Bearer abc".to_string()));
        assert!(TransportRequest::get("u").authorization().is_none());
    }

    #[test]
    fn test_debug_masks_token() {
        let request = TransportRequest::get("https://example.org/info.json")
            .bearer_token(Some("top-secret".to_string()));
        let debug = format!("{request:?}");
        assert!(debug.contains("*****"));
        assert!(!debug.contains("top-secret"));
        assert!(debug.contains("https://example.org/info.json"));
    }
}
