//! Default [`DocumentModel`] over `serde_json` documents.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::clients::{Transport, TransportRequest};
use crate::iiif::errors::DocumentError;
use crate::iiif::resource::{document_id, Collection, IiifResource, IiifResourceType, Manifest};
use crate::iiif::{DocumentModel, ParseOptions};

/// Properties whose presence marks a manifest entry as embedded.
const MANIFEST_CONTENT_KEYS: [&str; 3] = ["sequences", "items", "structures"];

/// Properties whose presence marks a collection entry as embedded.
const COLLECTION_CONTENT_KEYS: [&str; 4] = ["collections", "manifests", "members", "items"];

/// Document model reading Presentation 2 and 3 JSON.
///
/// Child entries that only reference a document (an identifier, a type and
/// perhaps a label) are loaded through the transport handed to the index
/// lookups; embedded entries are parsed in place.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonDocumentModel;

impl JsonDocumentModel {
    /// Creates a new document model.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn parse_at(
        document: Value,
        uri: &str,
        options: &ParseOptions,
    ) -> Result<IiifResource, DocumentError> {
        if !document.is_object() {
            return Err(DocumentError::NotAnObject {
                uri: uri.to_string(),
            });
        }

        let locale = options.locale.clone();
        Ok(match IiifResourceType::of(&document) {
            IiifResourceType::Collection => {
                let (collections, manifests) = Self::children(&document);
                IiifResource::Collection(Collection {
                    json: document,
                    collections,
                    manifests,
                    locale,
                })
            }
            IiifResourceType::Manifest => IiifResource::Manifest(Manifest {
                json: document,
                locale,
            }),
            IiifResourceType::Other => IiifResource::Other(Manifest {
                json: document,
                locale,
            }),
        })
    }

    /// Splits a collection's children into collection and manifest entries.
    fn children(document: &Value) -> (Vec<Value>, Vec<Value>) {
        let entries = |key: &str, kind: Option<&str>| -> Vec<Value> {
            document
                .get(key)
                .and_then(Value::as_array)
                .map(|items| items.iter().map(|item| normalize_entry(item, kind)).collect())
                .unwrap_or_default()
        };

        let mut collections = entries("collections", Some("sc:Collection"));
        let mut manifests = entries("manifests", Some("sc:Manifest"));

        for entry in entries("members", None)
            .into_iter()
            .chain(entries("items", None))
        {
            match IiifResourceType::of(&entry) {
                IiifResourceType::Collection => collections.push(entry),
                IiifResourceType::Manifest => manifests.push(entry),
                IiifResourceType::Other => {}
            }
        }

        (collections, manifests)
    }

    async fn load(
        entry: &Value,
        kind: IiifResourceType,
        index: usize,
        options: &ParseOptions,
        loader: &dyn Transport,
    ) -> Result<IiifResource, DocumentError> {
        let uri = document_id(entry);
        if uri.is_empty() {
            return Err(DocumentError::MissingId { kind, index });
        }

        tracing::debug!(%uri, %kind, index, "loading referenced child");
        let response = loader
            .fetch(TransportRequest::get(uri))
            .await
            .map_err(|source| DocumentError::Load {
                uri: uri.to_string(),
                source,
            })?;
        let body = response.body.ok_or_else(|| DocumentError::EmptyDocument {
            uri: uri.to_string(),
        })?;

        Self::parse_at(body, uri, options)
    }
}

/// Turns bare identifiers into reference objects and types untyped entries
/// of the type-specific child lists.
fn normalize_entry(entry: &Value, kind: Option<&str>) -> Value {
    let mut entry = match entry {
        Value::String(id) => json!({ "@id": id }),
        other => other.clone(),
    };
    if let (Some(kind), Value::Object(map)) = (kind, &mut entry) {
        if !map.contains_key("@type") && !map.contains_key("type") {
            map.insert("@type".to_string(), Value::String(kind.to_string()));
        }
    }
    entry
}

fn is_embedded(entry: &Value, keys: &[&str]) -> bool {
    keys.iter().any(|key| entry.get(key).is_some())
}

#[async_trait]
impl DocumentModel for JsonDocumentModel {
    fn parse(&self, document: Value, options: &ParseOptions) -> Result<IiifResource, DocumentError> {
        let uri = document_id(&document).to_string();
        Self::parse_at(document, &uri, options)
    }

    async fn collection_by_index(
        &self,
        collection: &Collection,
        index: usize,
        loader: &dyn Transport,
    ) -> Result<Option<Collection>, DocumentError> {
        let Some(entry) = collection.collections().get(index) else {
            return Ok(None);
        };

        let options = ParseOptions::new(collection.locale.clone());
        let resource = if is_embedded(entry, &COLLECTION_CONTENT_KEYS) {
            Self::parse_at(entry.clone(), document_id(entry), &options)?
        } else {
            Self::load(entry, IiifResourceType::Collection, index, &options, loader).await?
        };

        match resource {
            IiifResource::Collection(child) => Ok(Some(child)),
            other => Err(DocumentError::UnexpectedType {
                uri: other.id().to_string(),
                expected: IiifResourceType::Collection,
                found: other.resource_type(),
            }),
        }
    }

    async fn manifest_by_index(
        &self,
        collection: &Collection,
        index: usize,
        loader: &dyn Transport,
    ) -> Result<Manifest, DocumentError> {
        let entry = collection
            .manifests()
            .get(index)
            .ok_or(DocumentError::ManifestIndexNotFound { index })?;

        let options = ParseOptions::new(collection.locale.clone());
        if is_embedded(entry, &MANIFEST_CONTENT_KEYS) {
            return Ok(Manifest {
                json: entry.clone(),
                locale: options.locale,
            });
        }

        match Self::load(entry, IiifResourceType::Manifest, index, &options, loader).await? {
            IiifResource::Manifest(manifest) | IiifResource::Other(manifest) => Ok(manifest),
            IiifResource::Collection(child) => Err(DocumentError::UnexpectedType {
                uri: child.id().to_string(),
                expected: IiifResourceType::Manifest,
                found: IiifResourceType::Collection,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{TransportError, TransportResponse};
    use crate::config::Locale;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Transport answering from a fixed map and recording requested URLs.
    #[derive(Debug, Default)]
    struct MapTransport {
        documents: HashMap<String, Value>,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Transport for MapTransport {
        async fn fetch(
            &self,
            request: TransportRequest,
        ) -> Result<TransportResponse, TransportError> {
            self.requested.lock().unwrap().push(request.url.clone());
            match self.documents.get(&request.url) {
                Some(doc) => Ok(TransportResponse::new(200, HashMap::new(), Some(doc.clone()))),
                None => Err(TransportError::InvalidBody {
                    code: 404,
                    url: request.url,
                    reason: "missing".to_string(),
                }),
            }
        }
    }

    fn parse_collection(doc: Value) -> Collection {
        match JsonDocumentModel::new()
            .parse(doc, &ParseOptions::default())
            .unwrap()
        {
            IiifResource::Collection(c) => c,
            other => panic!("expected collection, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_classifies_documents() {
        let model = JsonDocumentModel::new();
        let options = ParseOptions::default();

        let manifest = model
            .parse(json!({"@id": "m", "@type": "sc:Manifest"}), &options)
            .unwrap();
        assert_eq!(manifest.resource_type(), IiifResourceType::Manifest);

        let other = model
            .parse(json!({"@id": "i", "@type": "iiif:Image"}), &options)
            .unwrap();
        assert_eq!(other.resource_type(), IiifResourceType::Other);

        assert!(matches!(
            model.parse(json!(["not", "an", "object"]), &options),
            Err(DocumentError::NotAnObject { .. })
        ));
    }

    #[test]
    fn test_v2_children_from_all_list_keys() {
        let collection = parse_collection(json!({
            "@id": "root",
            "@type": "sc:Collection",
            "collections": [{"@id": "c1", "@type": "sc:Collection"}],
            "manifests": ["m1"],
            "members": [
                {"@id": "c2", "@type": "sc:Collection"},
                {"@id": "m2", "@type": "sc:Manifest"},
                {"@id": "x", "@type": "sc:Range"}
            ]
        }));

        assert_eq!(collection.total_collections(), 2);
        assert_eq!(collection.total_manifests(), 2);
        assert_eq!(document_id(&collection.manifests()[0]), "m1");
        assert_eq!(document_id(&collection.collections()[1]), "c2");
    }

    #[test]
    fn test_v3_items_children() {
        let collection = parse_collection(json!({
            "id": "root",
            "type": "Collection",
            "items": [
                {"id": "m1", "type": "Manifest"},
                {"id": "c1", "type": "Collection"}
            ]
        }));
        assert_eq!(collection.total_collections(), 1);
        assert_eq!(collection.total_manifests(), 1);
    }

    #[tokio::test]
    async fn test_collection_by_index_out_of_range_issues_no_request() {
        let collection = parse_collection(json!({
            "@id": "root",
            "@type": "sc:Collection",
            "collections": [{"@id": "c1", "@type": "sc:Collection"}]
        }));
        let transport = MapTransport::default();

        let result = JsonDocumentModel::new()
            .collection_by_index(&collection, 5, &transport)
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(transport.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_embedded_children_are_not_loaded() {
        let collection = parse_collection(json!({
            "@id": "root",
            "@type": "sc:Collection",
            "collections": [{
                "@id": "c1",
                "@type": "sc:Collection",
                "manifests": [{"@id": "m1", "@type": "sc:Manifest"}]
            }],
            "manifests": [{"@id": "m0", "@type": "sc:Manifest", "sequences": []}]
        }));
        let transport = MapTransport::default();
        let model = JsonDocumentModel::new();

        let child = model
            .collection_by_index(&collection, 0, &transport)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(child.total_manifests(), 1);

        let manifest = model
            .manifest_by_index(&collection, 0, &transport)
            .await
            .unwrap();
        assert_eq!(manifest.id(), "m0");
        assert!(transport.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_referenced_manifest_is_loaded_with_parent_locale() {
        let mut documents = HashMap::new();
        documents.insert(
            "https://example.org/m1".to_string(),
            json!({
                "@id": "https://example.org/m1",
                "@type": "sc:Manifest",
                "label": [{"@value": "Un", "@language": "fr"}, {"@value": "One", "@language": "en"}],
                "sequences": []
            }),
        );
        let transport = MapTransport {
            documents,
            ..MapTransport::default()
        };
        let model = JsonDocumentModel::new();
        let options = ParseOptions::new(Some(Locale::new("en").unwrap()));
        let collection = match model
            .parse(
                json!({
                    "@id": "root",
                    "@type": "sc:Collection",
                    "manifests": [{"@id": "https://example.org/m1", "@type": "sc:Manifest"}]
                }),
                &options,
            )
            .unwrap()
        {
            IiifResource::Collection(c) => c,
            other => panic!("expected collection, got {other:?}"),
        };

        let manifest = model
            .manifest_by_index(&collection, 0, &transport)
            .await
            .unwrap();

        assert_eq!(manifest.label(), Some("One".to_string()));
        assert_eq!(
            *transport.requested.lock().unwrap(),
            vec!["https://example.org/m1".to_string()]
        );
    }

    #[tokio::test]
    async fn test_manifest_index_out_of_range() {
        let collection = parse_collection(json!({
            "@id": "root",
            "@type": "sc:Collection",
            "manifests": []
        }));

        let result = JsonDocumentModel::new()
            .manifest_by_index(&collection, 0, &MapTransport::default())
            .await;

        assert!(matches!(
            result,
            Err(DocumentError::ManifestIndexNotFound { index: 0 })
        ));
    }

    #[tokio::test]
    async fn test_reference_without_id_cannot_be_loaded() {
        let collection = parse_collection(json!({
            "@id": "root",
            "@type": "sc:Collection",
            "manifests": [{"@type": "sc:Manifest"}]
        }));

        let result = JsonDocumentModel::new()
            .manifest_by_index(&collection, 0, &MapTransport::default())
            .await;

        assert!(matches!(
            result,
            Err(DocumentError::MissingId {
                kind: IiifResourceType::Manifest,
                index: 0
            })
        ));
    }

    #[tokio::test]
    async fn test_load_failure_is_wrapped() {
        let collection = parse_collection(json!({
            "@id": "root",
            "@type": "sc:Collection",
            "collections": [{"@id": "https://example.org/gone", "@type": "sc:Collection"}]
        }));

        let result = JsonDocumentModel::new()
            .collection_by_index(&collection, 0, &MapTransport::default())
            .await;

        assert!(matches!(result, Err(DocumentError::Load { uri, .. }) if uri == "https://example.org/gone"));
    }
}
