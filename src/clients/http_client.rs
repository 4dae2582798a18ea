//! Credentialed HTTP transport.
//!
//! This module provides the [`CredentialedTransport`] type, which issues
//! credentialed GET/HEAD requests expecting a JSON body.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::clients::errors::{TransportError, TransportResponseError};
use crate::clients::http_request::{TransportMethod, TransportRequest};
use crate::clients::http_response::TransportResponse;
use crate::clients::Transport;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Builds the default headers shared by both transports.
pub(crate) fn default_headers(user_agent_prefix: Option<&str>) -> HashMap<String, String> {
    let user_agent_prefix = user_agent_prefix.map_or(String::new(), |prefix| format!("{prefix} | "));
    let rust_version = env!("CARGO_PKG_RUST_VERSION");
    let user_agent = format!("{user_agent_prefix}IIIF Manifold v{SDK_VERSION} | Rust {rust_version}");

    let mut headers = HashMap::new();
    headers.insert("User-Agent".to_string(), user_agent);
    headers.insert("Accept".to_string(), "application/json".to_string());
    headers
}

/// Decodes a response body as JSON; empty bodies decode to `None`.
pub(crate) fn decode_json(
    code: u16,
    url: &str,
    text: &str,
) -> Result<Option<serde_json::Value>, TransportError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text)
        .map(Some)
        .map_err(|e| TransportError::InvalidBody {
            code,
            url: url.to_string(),
            reason: e.to_string(),
        })
}

/// Builds the error for a non-2xx response, keeping any JSON payload.
pub(crate) fn response_error(code: u16, text: &str) -> TransportError {
    let body = serde_json::from_str(text).ok();
    let message = reqwest::StatusCode::from_u16(code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .map_or_else(|| format!("HTTP {code}"), |reason| format!("HTTP {code} {reason}"));

    TransportError::Response(TransportResponseError {
        code,
        message,
        body,
    })
}

/// Transport issuing credentialed requests that expect a JSON response.
///
/// Cookies set by the server are kept in a cookie store and sent back on
/// later requests, so login sessions established through an auth service
/// carry over to subsequent probes.
///
/// # Thread Safety
///
/// `CredentialedTransport` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use iiif_manifold::clients::{CredentialedTransport, Transport, TransportRequest};
///
/// let transport = CredentialedTransport::new(None);
/// let response = transport
///     .fetch(TransportRequest::get("https://example.org/iiif/manifest.json"))
///     .await?;
/// ```
#[derive(Debug)]
pub struct CredentialedTransport {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify CredentialedTransport is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CredentialedTransport>();
};

impl CredentialedTransport {
    /// Creates a new credentialed transport.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(user_agent_prefix: Option<&str>) -> Self {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            default_headers: default_headers(user_agent_prefix),
        }
    }

    /// Returns the default headers for this transport.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }
}

#[async_trait]
impl Transport for CredentialedTransport {
    async fn fetch(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        tracing::debug!(method = %request.method, url = %request.url, "credentialed request");

        let mut req_builder = match request.method {
            TransportMethod::Get => self.client.get(&request.url),
            TransportMethod::Head => self.client.head(&request.url),
        };

        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }
        if let Some(authorization) = request.authorization() {
            req_builder = req_builder.header("Authorization", authorization);
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let success = res.status().is_success();
        let headers = TransportResponse::parse_headers(res.headers());
        let text = res.text().await?;

        if !success {
            return Err(response_error(code, &text));
        }

        let body = decode_json(code, &request.url, &text)?;
        Ok(TransportResponse::new(code, headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_agent_header_format() {
        let transport = CredentialedTransport::new(None);

        let user_agent = transport.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("IIIF Manifold v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let transport = CredentialedTransport::new(Some("MyViewer/2.0"));

        let user_agent = transport.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyViewer/2.0 | "));
    }

    #[test]
    fn test_accept_header_is_json() {
        let transport = CredentialedTransport::new(None);
        assert_eq!(
            transport.default_headers().get("Accept"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_decode_json_handles_empty_and_invalid_bodies() {
        assert_eq!(decode_json(200, "u", "").unwrap(), None);
        assert_eq!(decode_json(200, "u", "  \n").unwrap(), None);
        assert_eq!(
            decode_json(200, "u", r#"{"a":1}"#).unwrap(),
            Some(json!({"a": 1}))
        );
        assert!(matches!(
            decode_json(200, "u", "<html>"),
            Err(TransportError::InvalidBody { code: 200, .. })
        ));
    }

    #[test]
    fn test_response_error_keeps_json_payload() {
        let error = response_error(401, r#"{"service":{"profile":"login"}}"#);
        assert_eq!(error.status(), 401);
        assert!(error.body().is_some());
        assert_eq!(error.to_string(), "HTTP 401 Unauthorized");

        let error = response_error(500, "oops");
        assert!(error.body().is_none());
    }
}
