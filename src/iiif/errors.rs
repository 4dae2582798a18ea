//! Document model error types.

use thiserror::Error;

use crate::clients::TransportError;
use crate::iiif::IiifResourceType;

/// Errors produced while parsing or navigating IIIF documents.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The requested manifest index is out of range.
    #[error("Manifest index {index} not found")]
    ManifestIndexNotFound {
        /// The requested index.
        index: usize,
    },

    /// The document is not a JSON object.
    #[error("Document at {uri} is not a JSON object")]
    NotAnObject {
        /// Where the document came from.
        uri: String,
    },

    /// The server answered without a body.
    #[error("Document at {uri} is empty")]
    EmptyDocument {
        /// Where the document came from.
        uri: String,
    },

    /// A child reference carries no identifier, so it cannot be loaded.
    #[error("Referenced {kind} at index {index} has no identifier")]
    MissingId {
        /// What kind of child was referenced.
        kind: IiifResourceType,
        /// The index of the child.
        index: usize,
    },

    /// A loaded document has a different type than its reference declared.
    #[error("Expected a {expected} at {uri}, found {found}")]
    UnexpectedType {
        /// Where the document came from.
        uri: String,
        /// The type the reference declared.
        expected: IiifResourceType,
        /// The type that was parsed.
        found: IiifResourceType,
    },

    /// Loading a referenced child failed.
    #[error("Failed to load {uri}: {source}")]
    Load {
        /// The child's identifier.
        uri: String,
        /// The underlying transport failure.
        #[source]
        source: TransportError,
    },
}
