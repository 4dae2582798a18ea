//! Transport layer for fetching IIIF documents.
//!
//! Both the resolver and the external resource loader talk to the network
//! through the [`Transport`] trait. Two implementations exist and one is
//! picked when the consumer is constructed:
//!
//! - [`CredentialedTransport`]: credentialed GET/HEAD expecting a JSON body
//! - [`CallbackTransport`]: script-injection style GET whose body is wrapped
//!   in a named callback, for hosts without cross-origin support
//!
//! # Example
//!
//! ```rust,ignore
//! use iiif_manifold::clients::{transport_for, TransportRequest, TransportStrategy, MANIFEST_CALLBACK};
//!
//! let transport = transport_for(TransportStrategy::Credentialed, MANIFEST_CALLBACK, None);
//! let response = transport
//!     .fetch(TransportRequest::get("https://example.org/iiif/manifest.json"))
//!     .await?;
//! ```

mod callback_client;
mod errors;
mod http_client;
mod http_request;
mod http_response;

use std::sync::Arc;

use async_trait::async_trait;

pub use callback_client::{CallbackTransport, CALLBACK_PARAM, IMAGE_INFO_CALLBACK, MANIFEST_CALLBACK};
pub use errors::{TransportError, TransportResponseError};
pub use http_client::{CredentialedTransport, SDK_VERSION};
pub use http_request::{TransportMethod, TransportRequest};
pub use http_response::TransportResponse;

/// Capability to perform a single request and settle once.
///
/// Implementations resolve with the decoded body of a 2xx response and
/// reject with a [`TransportError`] otherwise.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Issues `request` and waits for it to settle.
    async fn fetch(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// Which [`Transport`] implementation to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransportStrategy {
    /// Credentialed requests expecting JSON.
    Credentialed,
    /// Callback-wrapped requests.
    Callback,
}

impl TransportStrategy {
    /// Picks the strategy for a CORS-enabled flag.
    #[must_use]
    pub const fn for_cors(is_cors_enabled: bool) -> Self {
        if is_cors_enabled {
            Self::Credentialed
        } else {
            Self::Callback
        }
    }
}

/// Builds the transport for `strategy`.
///
/// `callback` is the callback name used by the [`CallbackTransport`]; it is
/// ignored for credentialed transports.
#[must_use]
pub fn transport_for(
    strategy: TransportStrategy,
    callback: &str,
    user_agent_prefix: Option<&str>,
) -> Arc<dyn Transport> {
    match strategy {
        TransportStrategy::Credentialed => Arc::new(CredentialedTransport::new(user_agent_prefix)),
        TransportStrategy::Callback => Arc::new(CallbackTransport::new(callback, user_agent_prefix)),
    }
}
