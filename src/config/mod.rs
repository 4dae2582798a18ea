//! Configuration types for IIIF Manifold.
//!
//! This module provides the configuration used to resolve a IIIF resource
//! tree and to choose how documents are fetched.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ManifoldConfig`]: The main configuration struct holding all settings
//! - [`ManifoldConfigBuilder`]: A builder for constructing [`ManifoldConfig`] instances
//! - [`ResourceUri`]: A validated absolute resource URI
//! - [`Locale`]: A validated locale tag
//!
//! # Example
//!
//! ```rust
//! use iiif_manifold::{ManifoldConfig, ResourceUri};
//!
//! let config = ManifoldConfig::builder()
//!     .iiif_resource_uri(ResourceUri::new("https://example.org/iiif/collection.json").unwrap())
//!     .collection_index(2)
//!     .build()
//!     .unwrap();
//!
//! assert!(!config.uses_callback_transport());
//! ```

mod newtypes;

pub use newtypes::{Locale, ResourceUri};

use crate::clients::TransportStrategy;
use crate::error::ConfigError;
use crate::resolver::ResolutionRequest;

/// The legacy browser version that can only fetch cross-origin documents
/// through a callback script.
pub const CALLBACK_ONLY_BROWSER_VERSION: u32 = 9;

/// Configuration for resolving a IIIF resource.
///
/// # Thread Safety
///
/// `ManifoldConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
///
/// # Example
///
/// ```rust
/// use iiif_manifold::{Locale, ManifoldConfig, ResourceUri};
///
/// let config = ManifoldConfig::builder()
///     .iiif_resource_uri(ResourceUri::new("https://example.org/manifest.json").unwrap())
///     .locale(Locale::new("en-GB").unwrap())
///     .is_cors_enabled(false)
///     .build()
///     .unwrap();
///
/// assert!(config.uses_callback_transport());
/// ```
#[derive(Clone, Debug)]
pub struct ManifoldConfig {
    iiif_resource_uri: ResourceUri,
    collection_index: usize,
    manifest_index: usize,
    locale: Option<Locale>,
    is_cors_enabled: bool,
    legacy_browser_version: Option<u32>,
    user_agent_prefix: Option<String>,
}

impl ManifoldConfig {
    /// Creates a new builder for constructing a `ManifoldConfig`.
    #[must_use]
    pub fn builder() -> ManifoldConfigBuilder {
        ManifoldConfigBuilder::new()
    }

    /// Returns the root resource URI.
    #[must_use]
    pub const fn iiif_resource_uri(&self) -> &ResourceUri {
        &self.iiif_resource_uri
    }

    /// Returns the index of the child collection to select.
    #[must_use]
    pub const fn collection_index(&self) -> usize {
        self.collection_index
    }

    /// Returns the index of the manifest to select.
    #[must_use]
    pub const fn manifest_index(&self) -> usize {
        self.manifest_index
    }

    /// Returns the locale used when parsing documents, if configured.
    #[must_use]
    pub const fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    /// Returns whether cross-origin requests are enabled.
    #[must_use]
    pub const fn is_cors_enabled(&self) -> bool {
        self.is_cors_enabled
    }

    /// Returns the legacy browser version reported by the host, if any.
    #[must_use]
    pub const fn legacy_browser_version(&self) -> Option<u32> {
        self.legacy_browser_version
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns whether documents must be fetched through a callback script.
    ///
    /// This is the case for the callback-only legacy browser and whenever
    /// cross-origin requests are disabled.
    #[must_use]
    pub fn uses_callback_transport(&self) -> bool {
        self.legacy_browser_version == Some(CALLBACK_ONLY_BROWSER_VERSION) || !self.is_cors_enabled
    }

    /// Returns the transport strategy implied by this configuration.
    #[must_use]
    pub fn transport_strategy(&self) -> TransportStrategy {
        if self.uses_callback_transport() {
            TransportStrategy::Callback
        } else {
            TransportStrategy::Credentialed
        }
    }

    /// Builds the initial resolution request described by this configuration.
    #[must_use]
    pub fn resolution_request(&self) -> ResolutionRequest {
        ResolutionRequest::new(self.iiif_resource_uri.clone())
            .with_collection_index(self.collection_index)
            .with_manifest_index(self.manifest_index)
            .with_locale(self.locale.clone())
            .with_cors_enabled(self.is_cors_enabled)
    }
}

// Verify ManifoldConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ManifoldConfig>();
};

/// Builder for constructing [`ManifoldConfig`] instances.
///
/// The only required field is `iiif_resource_uri`.
///
/// # Defaults
///
/// - `collection_index`: `0`
/// - `manifest_index`: `0`
/// - `locale`: `None`
/// - `is_cors_enabled`: `true`
/// - `legacy_browser_version`: `None`
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct ManifoldConfigBuilder {
    iiif_resource_uri: Option<ResourceUri>,
    collection_index: Option<usize>,
    manifest_index: Option<usize>,
    locale: Option<Locale>,
    is_cors_enabled: Option<bool>,
    legacy_browser_version: Option<u32>,
    user_agent_prefix: Option<String>,
}

impl ManifoldConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root resource URI (required).
    #[must_use]
    pub fn iiif_resource_uri(mut self, uri: ResourceUri) -> Self {
        self.iiif_resource_uri = Some(uri);
        self
    }

    /// Sets the index of the child collection to select.
    #[must_use]
    pub const fn collection_index(mut self, index: usize) -> Self {
        self.collection_index = Some(index);
        self
    }

    /// Sets the index of the manifest to select.
    #[must_use]
    pub const fn manifest_index(mut self, index: usize) -> Self {
        self.manifest_index = Some(index);
        self
    }

    /// Sets the locale used for labels.
    #[must_use]
    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    /// Sets whether cross-origin requests are enabled.
    #[must_use]
    pub const fn is_cors_enabled(mut self, enabled: bool) -> Self {
        self.is_cors_enabled = Some(enabled);
        self
    }

    /// Sets the legacy browser version reported by the host.
    #[must_use]
    pub const fn legacy_browser_version(mut self, version: u32) -> Self {
        self.legacy_browser_version = Some(version);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ManifoldConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `iiif_resource_uri`
    /// is not set.
    pub fn build(self) -> Result<ManifoldConfig, ConfigError> {
        let iiif_resource_uri =
            self.iiif_resource_uri
                .ok_or(ConfigError::MissingRequiredField {
                    field: "iiif_resource_uri",
                })?;

        Ok(ManifoldConfig {
            iiif_resource_uri,
            collection_index: self.collection_index.unwrap_or(0),
            manifest_index: self.manifest_index.unwrap_or(0),
            locale: self.locale,
            is_cors_enabled: self.is_cors_enabled.unwrap_or(true),
            legacy_browser_version: self.legacy_browser_version,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri() -> ResourceUri {
        ResourceUri::new("https://example.org/iiif/collection.json").unwrap()
    }

    #[test]
    fn test_builder_requires_resource_uri() {
        let result = ManifoldConfigBuilder::new().manifest_index(1).build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField {
                field: "iiif_resource_uri"
            })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = ManifoldConfig::builder()
            .iiif_resource_uri(uri())
            .build()
            .unwrap();

        assert_eq!(config.collection_index(), 0);
        assert_eq!(config.manifest_index(), 0);
        assert!(config.locale().is_none());
        assert!(config.is_cors_enabled());
        assert!(config.legacy_browser_version().is_none());
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_callback_transport_when_cors_disabled() {
        let config = ManifoldConfig::builder()
            .iiif_resource_uri(uri())
            .is_cors_enabled(false)
            .build()
            .unwrap();

        assert!(config.uses_callback_transport());
        assert_eq!(config.transport_strategy(), TransportStrategy::Callback);
    }

    #[test]
    fn test_callback_transport_for_legacy_browser_nine_only() {
        let legacy = ManifoldConfig::builder()
            .iiif_resource_uri(uri())
            .legacy_browser_version(9)
            .build()
            .unwrap();
        assert!(legacy.uses_callback_transport());

        let newer = ManifoldConfig::builder()
            .iiif_resource_uri(uri())
            .legacy_browser_version(11)
            .build()
            .unwrap();
        assert!(!newer.uses_callback_transport());
        assert_eq!(newer.transport_strategy(), TransportStrategy::Credentialed);
    }

    #[test]
    fn test_resolution_request_mirrors_config() {
        let config = ManifoldConfig::builder()
            .iiif_resource_uri(uri())
            .collection_index(3)
            .manifest_index(1)
            .locale(Locale::new("fr").unwrap())
            .build()
            .unwrap();

        let request = config.resolution_request();
        assert_eq!(request.root_uri(), config.iiif_resource_uri());
        assert_eq!(request.collection_index(), 3);
        assert_eq!(request.manifest_index(), 1);
        assert_eq!(request.locale().map(AsRef::as_ref), Some("fr"));
        assert!(request.cors_enabled());
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ManifoldConfig>();
    }
}
