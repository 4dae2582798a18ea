//! Resolution request and result types.

use crate::config::{Locale, ResourceUri};
use crate::iiif::{IiifResource, Manifest};

/// Where to start resolving and which children to select.
///
/// Requests are immutable: descending into a sub-collection produces a new
/// request through [`ResolutionRequest::dive_into`].
///
/// The CORS flag is informational. The transport is fixed when the
/// [`Resolver`](crate::Resolver) is constructed from its configuration, so a
/// request's flag does not change how documents are fetched.
///
/// # Example
///
/// ```rust
/// use iiif_manifold::{ResolutionRequest, ResourceUri};
///
/// let request = ResolutionRequest::new(ResourceUri::new("https://example.org/c.json").unwrap())
///     .with_collection_index(1)
///     .with_manifest_index(0);
///
/// assert_eq!(request.collection_index(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolutionRequest {
    root_uri: ResourceUri,
    collection_index: usize,
    manifest_index: usize,
    locale: Option<Locale>,
    cors_enabled: bool,
}

impl ResolutionRequest {
    /// Creates a request for `root_uri` selecting the first collection and
    /// manifest, with CORS enabled.
    #[must_use]
    pub const fn new(root_uri: ResourceUri) -> Self {
        Self {
            root_uri,
            collection_index: 0,
            manifest_index: 0,
            locale: None,
            cors_enabled: true,
        }
    }

    /// Sets the child collection index.
    #[must_use]
    pub const fn with_collection_index(mut self, index: usize) -> Self {
        self.collection_index = index;
        self
    }

    /// Sets the manifest index.
    #[must_use]
    pub const fn with_manifest_index(mut self, index: usize) -> Self {
        self.manifest_index = index;
        self
    }

    /// Sets the locale used when parsing.
    #[must_use]
    pub fn with_locale(mut self, locale: Option<Locale>) -> Self {
        self.locale = locale;
        self
    }

    /// Records whether cross-origin requests are enabled. Informational only.
    #[must_use]
    pub const fn with_cors_enabled(mut self, enabled: bool) -> Self {
        self.cors_enabled = enabled;
        self
    }

    /// Returns the request for descending into the collection at `uri`:
    /// the first child collection of that collection is selected and the
    /// manifest index is kept.
    #[must_use]
    pub fn dive_into(&self, uri: ResourceUri) -> Self {
        Self {
            root_uri: uri,
            collection_index: 0,
            ..self.clone()
        }
    }

    /// Returns the URI of the document to fetch.
    #[must_use]
    pub const fn root_uri(&self) -> &ResourceUri {
        &self.root_uri
    }

    /// Returns the child collection index.
    #[must_use]
    pub const fn collection_index(&self) -> usize {
        self.collection_index
    }

    /// Returns the manifest index.
    #[must_use]
    pub const fn manifest_index(&self) -> usize {
        self.manifest_index
    }

    /// Returns the parse locale, if any.
    #[must_use]
    pub const fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    /// Returns the recorded CORS flag. It does not select the transport.
    #[must_use]
    pub const fn cors_enabled(&self) -> bool {
        self.cors_enabled
    }
}

/// The outcome of a successful resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedManifest {
    request: ResolutionRequest,
    root: IiifResource,
    manifest: Manifest,
}

impl ResolvedManifest {
    pub(crate) const fn new(
        request: ResolutionRequest,
        root: IiifResource,
        manifest: Manifest,
    ) -> Self {
        Self {
            request,
            root,
            manifest,
        }
    }

    /// Returns the request resolution started from.
    #[must_use]
    pub const fn request(&self) -> &ResolutionRequest {
        &self.request
    }

    /// Returns the first resource fetched, i.e. the top of the tree.
    #[must_use]
    pub const fn root(&self) -> &IiifResource {
        &self.root
    }

    /// Returns the resolved manifest.
    #[must_use]
    pub const fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Consumes the result, returning the manifest.
    #[must_use]
    pub fn into_manifest(self) -> Manifest {
        self.manifest
    }
}
