//! Resolution error types.

use thiserror::Error;

use crate::clients::TransportError;
use crate::iiif::DocumentError;

/// Errors that end a resolution run.
///
/// These are never retried internally.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The selected child collection does not exist.
    #[error("Collection index not found")]
    CollectionIndexNotFound {
        /// The requested index.
        index: usize,
    },

    /// A collection to descend into has an identifier that is not a URI.
    #[error("Cannot descend into collection '{id}': its identifier is not a valid URI")]
    InvalidCollectionId {
        /// The offending identifier.
        id: String,
    },

    /// Descending into grouping collections came back to a collection that
    /// was already descended into.
    #[error("Collection cycle detected at '{uri}'")]
    CollectionCycle {
        /// The collection reached twice.
        uri: String,
    },

    /// The document model rejected or could not navigate a document.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Fetching a document failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_index_not_found_message() {
        let error = ResolutionError::CollectionIndexNotFound { index: 9 };
        assert_eq!(error.to_string(), "Collection index not found");
    }

    #[test]
    fn test_collection_cycle_message_names_uri() {
        let error = ResolutionError::CollectionCycle {
            uri: "https://example.org/g".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Collection cycle detected at 'https://example.org/g'"
        );
    }

    #[test]
    fn test_document_errors_are_transparent() {
        let error = ResolutionError::from(DocumentError::ManifestIndexNotFound { index: 2 });
        assert_eq!(error.to_string(), "Manifest index 2 not found");
    }
}
