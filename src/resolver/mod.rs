//! Resolution of a IIIF resource tree down to one manifest.
//!
//! Starting from a root URI, the [`Resolver`] fetches the document, and:
//!
//! - binds it directly when it is a manifest (or any non-collection)
//! - picks the manifest at `manifest_index` when it is a collection without
//!   child collections
//! - otherwise selects the child collection at `collection_index` and picks
//!   the manifest at `manifest_index` from it
//!
//! A selected collection that only groups further collections (no
//! manifests of its own, at least one child collection) while manifest `0`
//! is requested is descended into: its document is fetched and its first
//! child collection is selected, repeating until a collection with
//! manifests or a non-collection is reached.
//!
//! Documents are fetched one at a time; a new fetch only starts after the
//! previous one settled.
//!
//! Each collection is descended into at most once per run. Reaching the
//! root or an already descended collection again ends resolution with
//! [`ResolutionError::CollectionCycle`].
//!
//! # Example
//!
//! ```rust,ignore
//! use iiif_manifold::{ManifoldConfig, Resolver, ResourceUri};
//!
//! let config = ManifoldConfig::builder()
//!     .iiif_resource_uri(ResourceUri::new("https://example.org/iiif/collection.json")?)
//!     .collection_index(1)
//!     .build()?;
//!
//! let resolver = Resolver::new(&config);
//! let resolved = resolver.resolve(config.resolution_request()).await?;
//! println!("{}", resolved.manifest().id());
//! ```

mod errors;
mod request;

use std::collections::HashSet;
use std::sync::Arc;

pub use errors::ResolutionError;
pub use request::{ResolutionRequest, ResolvedManifest};

use crate::clients::{transport_for, Transport, TransportRequest, MANIFEST_CALLBACK};
use crate::config::{ManifoldConfig, ResourceUri};
use crate::iiif::{
    Collection, DocumentError, DocumentModel, IiifResource, JsonDocumentModel, Manifest,
    ParseOptions,
};

/// What a single resolution step produced.
enum Step {
    Resolved(Manifest),
    Dive(ResolutionRequest),
}

/// Resolves resource trees to a single manifest.
///
/// The transport is chosen once, at construction, from the configuration.
#[derive(Clone, Debug)]
pub struct Resolver {
    transport: Arc<dyn Transport>,
    model: Arc<dyn DocumentModel>,
}

impl Resolver {
    /// Creates a resolver using the transport strategy implied by `config`
    /// and the default [`JsonDocumentModel`].
    #[must_use]
    pub fn new(config: &ManifoldConfig) -> Self {
        let transport = transport_for(
            config.transport_strategy(),
            MANIFEST_CALLBACK,
            config.user_agent_prefix(),
        );
        Self::with_parts(transport, Arc::new(JsonDocumentModel::new()))
    }

    /// Creates a resolver from explicit collaborators.
    #[must_use]
    pub fn with_parts(transport: Arc<dyn Transport>, model: Arc<dyn DocumentModel>) -> Self {
        Self { transport, model }
    }

    /// Resolves `request` to exactly one manifest.
    ///
    /// # Errors
    ///
    /// - [`ResolutionError::Transport`] if a document cannot be fetched
    /// - [`ResolutionError::CollectionIndexNotFound`] if the selected child
    ///   collection does not exist
    /// - [`ResolutionError::CollectionCycle`] if descending into grouping
    ///   collections revisits one
    /// - [`ResolutionError::Document`] if a document cannot be parsed or the
    ///   manifest index is out of range
    pub async fn resolve(
        &self,
        request: ResolutionRequest,
    ) -> Result<ResolvedManifest, ResolutionError> {
        let original = request.clone();
        let mut request = request;

        let mut resource = self.load(&request).await?;
        let root = resource.clone();
        let mut visited = HashSet::from([request.root_uri().to_string()]);

        loop {
            match self.step(&request, resource).await? {
                Step::Resolved(manifest) => {
                    tracing::debug!(manifest = %manifest.id(), "resolved manifest");
                    return Ok(ResolvedManifest::new(original, root, manifest));
                }
                Step::Dive(next) => {
                    let uri = next.root_uri().to_string();
                    if !visited.insert(uri.clone()) {
                        tracing::warn!(%uri, "collection already descended into");
                        return Err(ResolutionError::CollectionCycle { uri });
                    }
                    request = next;
                    resource = self.load(&request).await?;
                }
            }
        }
    }

    async fn load(&self, request: &ResolutionRequest) -> Result<IiifResource, ResolutionError> {
        let uri = request.root_uri().as_ref();
        tracing::debug!(%uri, "fetching IIIF resource");

        let response = self.transport.fetch(TransportRequest::get(uri)).await?;
        let document = response
            .body
            .ok_or_else(|| DocumentError::EmptyDocument {
                uri: uri.to_string(),
            })?;

        let options = ParseOptions::new(request.locale().cloned());
        Ok(self.model.parse(document, &options)?)
    }

    async fn step(
        &self,
        request: &ResolutionRequest,
        resource: IiifResource,
    ) -> Result<Step, ResolutionError> {
        let collection = match resource {
            IiifResource::Manifest(manifest) | IiifResource::Other(manifest) => {
                return Ok(Step::Resolved(manifest));
            }
            IiifResource::Collection(collection) => collection,
        };

        if collection.total_collections() == 0 {
            return self.manifest_at(&collection, request).await;
        }

        let index = request.collection_index();
        let selected = self
            .model
            .collection_by_index(&collection, index, self.transport.as_ref())
            .await?
            .ok_or(ResolutionError::CollectionIndexNotFound { index })?;

        if is_grouping_only(&selected, request) {
            let uri = ResourceUri::new(selected.id()).map_err(|_| {
                ResolutionError::InvalidCollectionId {
                    id: selected.id().to_string(),
                }
            })?;
            tracing::debug!(%uri, "collection has no manifests, descending into first child");
            return Ok(Step::Dive(request.dive_into(uri)));
        }

        self.manifest_at(&selected, request).await
    }

    async fn manifest_at(
        &self,
        collection: &Collection,
        request: &ResolutionRequest,
    ) -> Result<Step, ResolutionError> {
        let manifest = self
            .model
            .manifest_by_index(collection, request.manifest_index(), self.transport.as_ref())
            .await?;
        Ok(Step::Resolved(manifest))
    }
}

/// A collection that only groups further collections, while the first
/// manifest is requested.
fn is_grouping_only(collection: &Collection, request: &ResolutionRequest) -> bool {
    collection.total_manifests() == 0
        && request.manifest_index() == 0
        && collection.total_collections() > 0
}

/// Resolves the request described by `config` with a fresh [`Resolver`].
///
/// # Errors
///
/// See [`Resolver::resolve`].
pub async fn resolve_manifest(config: &ManifoldConfig) -> Result<ResolvedManifest, ResolutionError> {
    Resolver::new(config)
        .resolve(config.resolution_request())
        .await
}
