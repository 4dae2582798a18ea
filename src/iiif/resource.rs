//! Typed IIIF resources.
//!
//! A parsed document is one of three closed variants, see [`IiifResource`].
//! Collections keep their child entries as raw JSON so the document model
//! can decide per child whether it is embedded or must be loaded.

use std::fmt;

use serde_json::Value;

use crate::config::Locale;

/// The kind of a IIIF resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IiifResourceType {
    /// A node grouping collections and/or manifests.
    Collection,
    /// A leaf describing a single displayable object.
    Manifest,
    /// Anything else.
    Other,
}

impl IiifResourceType {
    /// Classifies a JSON document by its `@type` (Presentation 2) or `type`
    /// (Presentation 3) property.
    #[must_use]
    pub fn of(json: &Value) -> Self {
        let tag = json
            .get("@type")
            .or_else(|| json.get("type"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        let tag = tag.strip_prefix("sc:").unwrap_or(tag);

        if tag.eq_ignore_ascii_case("collection") {
            Self::Collection
        } else if tag.eq_ignore_ascii_case("manifest") {
            Self::Manifest
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for IiifResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collection => write!(f, "collection"),
            Self::Manifest => write!(f, "manifest"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Returns the identifier of a document (`@id` or `id`), or `""`.
#[must_use]
pub fn document_id(json: &Value) -> &str {
    json.get("@id")
        .or_else(|| json.get("id"))
        .and_then(Value::as_str)
        .unwrap_or_default()
}

/// A parsed IIIF document.
#[derive(Clone, Debug, PartialEq)]
pub enum IiifResource {
    /// A collection.
    Collection(Collection),
    /// A manifest.
    Manifest(Manifest),
    /// A document that is neither; treated as displayable on its own.
    Other(Manifest),
}

impl IiifResource {
    /// Returns the variant tag.
    #[must_use]
    pub const fn resource_type(&self) -> IiifResourceType {
        match self {
            Self::Collection(_) => IiifResourceType::Collection,
            Self::Manifest(_) => IiifResourceType::Manifest,
            Self::Other(_) => IiifResourceType::Other,
        }
    }

    /// Returns the identifier of the resource.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Collection(c) => c.id(),
            Self::Manifest(m) | Self::Other(m) => m.id(),
        }
    }

    /// Returns the raw JSON document.
    #[must_use]
    pub const fn json(&self) -> &Value {
        match self {
            Self::Collection(c) => &c.json,
            Self::Manifest(m) | Self::Other(m) => &m.json,
        }
    }
}

/// A IIIF collection.
#[derive(Clone, Debug, PartialEq)]
pub struct Collection {
    pub(crate) json: Value,
    pub(crate) collections: Vec<Value>,
    pub(crate) manifests: Vec<Value>,
    pub(crate) locale: Option<Locale>,
}

impl Collection {
    /// Returns the collection's identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        document_id(&self.json)
    }

    /// Returns the raw JSON document.
    #[must_use]
    pub const fn json(&self) -> &Value {
        &self.json
    }

    /// Returns the child collection entries, in document order.
    #[must_use]
    pub fn collections(&self) -> &[Value] {
        &self.collections
    }

    /// Returns the child manifest entries, in document order.
    #[must_use]
    pub fn manifests(&self) -> &[Value] {
        &self.manifests
    }

    /// Returns the number of child collections.
    #[must_use]
    pub fn total_collections(&self) -> usize {
        self.collections.len()
    }

    /// Returns the number of child manifests.
    #[must_use]
    pub fn total_manifests(&self) -> usize {
        self.manifests.len()
    }

    /// Returns the label in the parse locale, if any.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        self.json
            .get("label")
            .and_then(|label| resolve_label(label, self.locale.as_ref()))
    }
}

/// A IIIF manifest, the terminal result of resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct Manifest {
    pub(crate) json: Value,
    pub(crate) locale: Option<Locale>,
}

impl Manifest {
    /// Returns the manifest's identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        document_id(&self.json)
    }

    /// Returns the raw JSON document.
    #[must_use]
    pub const fn json(&self) -> &Value {
        &self.json
    }

    /// Returns the label in the parse locale, if any.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        self.json
            .get("label")
            .and_then(|label| resolve_label(label, self.locale.as_ref()))
    }
}

/// Picks a label string for `locale` from any of the label shapes:
///
/// - a plain string
/// - a `{"@value", "@language"}` object or an array of them (Presentation 2)
/// - a language map such as `{"en": ["..."], "none": ["..."]}` (Presentation 3)
#[must_use]
pub fn resolve_label(label: &Value, locale: Option<&Locale>) -> Option<String> {
    match label {
        Value::String(s) => Some(s.clone()),
        Value::Array(values) => {
            let matching = locale.and_then(|locale| {
                values
                    .iter()
                    .find(|v| language_of(v) == Some(locale.as_ref()))
                    .or_else(|| {
                        values
                            .iter()
                            .find(|v| language_of(v) == Some(locale.language()))
                    })
            });
            matching
                .or_else(|| values.first())
                .and_then(|v| resolve_label(v, locale))
        }
        Value::Object(map) => {
            if let Some(value) = map.get("@value") {
                return value.as_str().map(String::from);
            }
            let entry = locale
                .and_then(|locale| {
                    map.get(locale.as_ref())
                        .or_else(|| map.get(locale.language()))
                })
                .or_else(|| map.get("none"))
                .or_else(|| map.values().next())?;
            match entry {
                Value::Array(values) => values.first().and_then(Value::as_str).map(String::from),
                other => other.as_str().map(String::from),
            }
        }
        _ => None,
    }
}

fn language_of(value: &Value) -> Option<&str> {
    value.get("@language").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_classification() {
        assert_eq!(
            IiifResourceType::of(&json!({"@type": "sc:Collection"})),
            IiifResourceType::Collection
        );
        assert_eq!(
            IiifResourceType::of(&json!({"type": "Manifest"})),
            IiifResourceType::Manifest
        );
        assert_eq!(
            IiifResourceType::of(&json!({"@type": "sc:Canvas"})),
            IiifResourceType::Other
        );
        assert_eq!(IiifResourceType::of(&json!({})), IiifResourceType::Other);
    }

    #[test]
    fn test_document_id_prefers_v2_key() {
        assert_eq!(document_id(&json!({"@id": "a", "id": "b"})), "a");
        assert_eq!(document_id(&json!({"id": "b"})), "b");
        assert_eq!(document_id(&json!({})), "");
    }

    #[test]
    fn test_label_plain_string() {
        assert_eq!(resolve_label(&json!("Book"), None), Some("Book".to_string()));
    }

    #[test]
    fn test_label_v2_language_values() {
        let label = json!([
            {"@value": "Livre", "@language": "fr"},
            {"@value": "Book", "@language": "en"}
        ]);
        let en = Locale::new("en-GB").unwrap();
        assert_eq!(resolve_label(&label, Some(&en)), Some("Book".to_string()));
        assert_eq!(resolve_label(&label, None), Some("Livre".to_string()));
    }

    #[test]
    fn test_label_v3_language_map() {
        let label = json!({"de": ["Buch"], "none": ["Codex"]});
        let de = Locale::new("de").unwrap();
        let cy = Locale::new("cy").unwrap();
        assert_eq!(resolve_label(&label, Some(&de)), Some("Buch".to_string()));
        assert_eq!(resolve_label(&label, Some(&cy)), Some("Codex".to_string()));
    }

    #[test]
    fn test_resource_accessors() {
        let manifest = Manifest {
            json: json!({"@id": "https://example.org/m", "label": "M"}),
            locale: None,
        };
        let resource = IiifResource::Manifest(manifest);
        assert_eq!(resource.resource_type(), IiifResourceType::Manifest);
        assert_eq!(resource.id(), "https://example.org/m");
        assert_eq!(resource.json()["label"], "M");
    }
}
