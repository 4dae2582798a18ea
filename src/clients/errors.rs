//! Transport error types.
//!
//! - [`TransportResponseError`]: Non-2xx HTTP responses
//! - [`TransportError`]: Unified error type encompassing all transport failures
//!
//! # Example
//!
//! ```rust,ignore
//! use iiif_manifold::clients::{Transport, TransportError, TransportRequest};
//!
//! match transport.fetch(TransportRequest::get(url)).await {
//!     Ok(response) => println!("Body: {:?}", response.body),
//!     Err(TransportError::Response(e)) => {
//!         println!("Server answered {}: {}", e.code, e.message);
//!     }
//!     Err(TransportError::InvalidBody { url, reason, .. }) => {
//!         println!("Could not decode {url}: {reason}");
//!     }
//!     Err(TransportError::Network(e)) => {
//!         println!("Network error: {}", e);
//!     }
//! }
//! ```

use thiserror::Error;

/// Error returned when a request receives a non-successful response.
///
/// Servers guarding IIIF resources commonly answer `401` with a JSON body
/// describing the auth services to use, so the parsed payload is kept in
/// `body` when one could be decoded.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{message}")]
pub struct TransportResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Human readable description of the failure.
    pub message: String,
    /// The response body, if it was valid JSON.
    pub body: Option<serde_json::Value>,
}

/// Unified error type for all transport failures.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A non-2xx response was received.
    #[error(transparent)]
    Response(#[from] TransportResponseError),

    /// A successful response carried a body that could not be decoded.
    #[error("Invalid response body from {url}: {reason}")]
    InvalidBody {
        /// The HTTP status code of the response.
        code: u16,
        /// The URL that was requested.
        url: String,
        /// Why the body was rejected.
        reason: String,
    },

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl TransportError {
    /// Returns the HTTP status code of the failure.
    ///
    /// Network failures never received a status and report `0`.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Response(e) => e.code,
            Self::InvalidBody { code, .. } => *code,
            Self::Network(e) => e.status().map_or(0, |s| s.as_u16()),
        }
    }

    /// Returns the parsed JSON payload of the failure, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Response(e) => e.body.as_ref(),
            Self::InvalidBody { .. } | Self::Network(_) => None,
        }
    }
}
