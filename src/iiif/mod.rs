//! IIIF document model.
//!
//! The resolver and the external resource loader never inspect IIIF JSON
//! directly; they go through the [`DocumentModel`] trait, which turns a
//! document into a typed [`IiifResource`], navigates collections by index and
//! looks up services by profile. [`JsonDocumentModel`] is the default
//! implementation.
//!
//! # Example
//!
//! ```rust
//! use iiif_manifold::iiif::{DocumentModel, IiifResource, JsonDocumentModel, ParseOptions};
//! use serde_json::json;
//!
//! let model = JsonDocumentModel::new();
//! let resource = model
//!     .parse(
//!         json!({"@id": "https://example.org/c", "@type": "sc:Collection", "manifests": []}),
//!         &ParseOptions::default(),
//!     )
//!     .unwrap();
//!
//! assert!(matches!(resource, IiifResource::Collection(c) if c.total_manifests() == 0));
//! ```

mod errors;
mod json_model;
mod resource;
mod service;

use async_trait::async_trait;
use serde_json::Value;

use crate::clients::Transport;
use crate::config::Locale;

pub use errors::DocumentError;
pub use json_model::JsonDocumentModel;
pub use resource::{
    document_id, resolve_label, Collection, IiifResource, IiifResourceType, Manifest,
};
pub use service::{find_service, Service, ServiceProfile};

/// Options applied while parsing a document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Locale used to pick labels.
    pub locale: Option<Locale>,
}

impl ParseOptions {
    /// Creates parse options for `locale`.
    #[must_use]
    pub const fn new(locale: Option<Locale>) -> Self {
        Self { locale }
    }
}

/// Capability to parse and navigate IIIF documents.
///
/// Index lookups are asynchronous because a child may only be referenced by
/// its identifier; implementations load such children through `loader`.
#[async_trait]
pub trait DocumentModel: Send + Sync + std::fmt::Debug {
    /// Parses a JSON document into a typed resource.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] if the document cannot be interpreted.
    fn parse(&self, document: Value, options: &ParseOptions) -> Result<IiifResource, DocumentError>;

    /// Returns the child collection at `index`, or `None` when out of range.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] if a referenced child cannot be loaded.
    async fn collection_by_index(
        &self,
        collection: &Collection,
        index: usize,
        loader: &dyn Transport,
    ) -> Result<Option<Collection>, DocumentError>;

    /// Returns the manifest at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::ManifestIndexNotFound`] when out of range, or
    /// another [`DocumentError`] if a referenced manifest cannot be loaded.
    async fn manifest_by_index(
        &self,
        collection: &Collection,
        index: usize,
        loader: &dyn Transport,
    ) -> Result<Manifest, DocumentError>;

    /// Looks up a service on `resource` by profile.
    fn service_by_profile(&self, resource: &Value, profile: ServiceProfile) -> Option<Service> {
        find_service(resource, profile)
    }
}
