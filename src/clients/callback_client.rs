//! Callback-wrapped (script injection style) transport.
//!
//! Hosts that cannot issue cross-origin requests load documents as scripts:
//! the server is asked for `?callback=<name>` and answers with the JSON
//! document wrapped in a call to that function. This transport issues the
//! same request and unwraps the padding.
//!
//! Script loading can neither probe with HEAD nor attach headers, so every
//! request is sent as a plain GET and bearer tokens are dropped.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::clients::errors::TransportError;
use crate::clients::http_client::{decode_json, default_headers, response_error};
use crate::clients::http_request::{TransportMethod, TransportRequest};
use crate::clients::http_response::TransportResponse;
use crate::clients::Transport;

/// Callback name used when resolving collections and manifests.
pub const MANIFEST_CALLBACK: &str = "manifestCallback";

/// Callback name used when loading image service descriptors.
pub const IMAGE_INFO_CALLBACK: &str = "imageInfoCallback";

/// Query parameter carrying the callback name.
pub const CALLBACK_PARAM: &str = "callback";

/// Transport fetching documents wrapped in a named callback.
///
/// # Example
///
/// ```rust,ignore
/// use iiif_manifold::clients::{CallbackTransport, Transport, TransportRequest, MANIFEST_CALLBACK};
///
/// let transport = CallbackTransport::new(MANIFEST_CALLBACK, None);
/// let response = transport
///     .fetch(TransportRequest::get("https://example.org/iiif/manifest.json"))
///     .await?;
/// ```
#[derive(Debug)]
pub struct CallbackTransport {
    client: reqwest::Client,
    callback: String,
    default_headers: HashMap<String, String>,
}

// Verify CallbackTransport is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CallbackTransport>();
};

impl CallbackTransport {
    /// Creates a transport expecting responses wrapped in `callback(...)`.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(callback: impl Into<String>, user_agent_prefix: Option<&str>) -> Self {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        let mut default_headers = default_headers(user_agent_prefix);
        default_headers.insert(
            "Accept".to_string(),
            "application/javascript, */*;q=0.8".to_string(),
        );

        Self {
            client,
            callback: callback.into(),
            default_headers,
        }
    }

    /// Returns the callback name expected in responses.
    #[must_use]
    pub fn callback(&self) -> &str {
        &self.callback
    }

    /// Strips the `callback(` ... `)` padding from a script body.
    ///
    /// Returns `None` when the body is not a call to this transport's callback.
    #[must_use]
    pub fn unwrap_padding<'a>(&self, script: &'a str) -> Option<&'a str> {
        let script = script.trim();
        let script = script.strip_suffix(';').unwrap_or(script).trim_end();
        let inner = script
            .strip_prefix(self.callback.as_str())?
            .trim_start()
            .strip_prefix('(')?
            .strip_suffix(')')?;
        Some(inner.trim())
    }
}

#[async_trait]
impl Transport for CallbackTransport {
    async fn fetch(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        if request.method == TransportMethod::Head {
            tracing::debug!(url = %request.url, "callback transport cannot probe, issuing GET");
        }
        tracing::debug!(url = %request.url, callback = %self.callback, "callback request");

        let mut req_builder = self
            .client
            .get(&request.url)
            .query(&[(CALLBACK_PARAM, self.callback.as_str())]);
        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let success = res.status().is_success();
        let headers = TransportResponse::parse_headers(res.headers());
        let text = res.text().await?;

        if !success {
            return Err(response_error(code, &text));
        }

        let payload = self
            .unwrap_padding(&text)
            .ok_or_else(|| TransportError::InvalidBody {
                code,
                url: request.url.clone(),
                reason: format!("response is not wrapped in {}(...)", self.callback),
            })?;

        let body = decode_json(code, &request.url, payload)?;
        Ok(TransportResponse::new(code, headers, body))
    }
}
