//! # IIIF Manifold
//!
//! Resolves a IIIF resource tree (a collection of collections of manifests,
//! or a lone manifest) to a single manifest, and loads the external resources
//! a manifest references while honouring IIIF auth services.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ManifoldConfig`] and [`ManifoldConfigBuilder`]
//! - Validated newtypes for resource URIs and locales
//! - A [`Resolver`] that walks collections by index down to one manifest
//! - [`ExternalResource`], which probes images and binaries and detects
//!   click-through, login and restricted auth services
//! - Two transports: credentialed requests, and callback-wrapped requests
//!   for hosts without cross-origin support
//!
//! ## Quick Start
//!
//! ```rust
//! use iiif_manifold::{ManifoldConfig, ResourceUri};
//!
//! let config = ManifoldConfig::builder()
//!     .iiif_resource_uri(ResourceUri::new("https://example.org/iiif/collection.json").unwrap())
//!     .collection_index(1)
//!     .manifest_index(0)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.resolution_request().collection_index(), 1);
//! ```
//!
//! ## Resolving a Manifest
//!
//! ```rust,ignore
//! use iiif_manifold::resolve_manifest;
//!
//! let resolved = resolve_manifest(&config).await?;
//! println!("{:?}", resolved.manifest().label());
//! ```
//!
//! ## Loading Access-Controlled Resources
//!
//! ```rust,ignore
//! use iiif_manifold::{external_resource::image_info_uri, ExternalResource};
//!
//! let mut resource = ExternalResource::new(canvas_image, image_info_uri, true);
//! resource.get_data(None).await;
//!
//! match resource.status {
//!     Some(200) => { /* render */ }
//!     Some(302) => { /* degraded image, offer login */ }
//!     Some(401) => { /* run the auth flow, then retry with a token */ }
//!     _ => {}
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: Transports and document models are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio async runtime
//! - **Sequential fetching**: A request only starts after the previous one settled

pub mod clients;
pub mod config;
pub mod error;
pub mod external_resource;
pub mod iiif;
pub mod resolver;

// Re-export public types at crate root for convenience
pub use config::{Locale, ManifoldConfig, ManifoldConfigBuilder, ResourceUri};
pub use error::ConfigError;

// Re-export transport types
pub use clients::{
    CallbackTransport, CredentialedTransport, Transport, TransportError, TransportMethod,
    TransportRequest, TransportResponse, TransportResponseError, TransportStrategy,
};

// Re-export document model types
pub use iiif::{
    Collection, DocumentError, DocumentModel, IiifResource, IiifResourceType, JsonDocumentModel,
    Manifest, ParseOptions, Service, ServiceProfile,
};

// Re-export resolution and loading entry points
pub use external_resource::{
    AccessServices, AccessToken, ExternalResource, ExternalResourceBuilder, FetchFailure,
};
pub use resolver::{resolve_manifest, ResolutionError, ResolutionRequest, ResolvedManifest, Resolver};
