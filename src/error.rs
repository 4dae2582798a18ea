//! Error types for the IIIF Manifold crate.
//!
//! This module contains error types used for configuration and validation
//! errors. Transport, document and resolution failures have their own enums in
//! [`crate::clients`], [`crate::iiif`] and [`crate::resolver`].
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use iiif_manifold::{ConfigError, ResourceUri};
//!
//! let result = ResourceUri::new("not a uri");
//! assert!(matches!(result, Err(ConfigError::InvalidResourceUri { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur during configuration.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Resource URI is invalid.
    #[error("Invalid resource URI '{uri}'. Please provide an absolute URI with scheme (e.g., 'https://example.org/iiif/manifest.json').")]
    InvalidResourceUri {
        /// The invalid URI that was provided.
        uri: String,
    },

    /// Locale is invalid.
    #[error("Invalid locale '{locale}'. Expected a language tag such as 'en' or 'en-GB'.")]
    InvalidLocale {
        /// The invalid locale that was provided.
        locale: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
