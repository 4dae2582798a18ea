//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A validated absolute URI pointing at a IIIF resource.
///
/// The URI must have an alphabetic scheme followed by `://` and a non-empty
/// host. Anything after the host (port, path, query) is kept verbatim.
///
/// # Example
///
/// ```rust
/// use iiif_manifold::ResourceUri;
///
/// let uri = ResourceUri::new("https://example.org/iiif/collection.json").unwrap();
/// assert_eq!(uri.scheme(), "https");
/// assert_eq!(uri.host_name(), "example.org");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceUri {
    uri: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl ResourceUri {
    /// Creates a new validated resource URI.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidResourceUri`] if the URI is invalid.
    pub fn new(uri: impl Into<String>) -> Result<Self, ConfigError> {
        let uri = uri.into();
        let uri = uri.trim().to_string();
        let invalid = || ConfigError::InvalidResourceUri { uri: uri.clone() };

        let scheme_end = uri.find("://").ok_or_else(invalid)?;

        let scheme = &uri[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        let host_start = scheme_end + 3;
        if host_start >= uri.len() {
            return Err(invalid());
        }

        // Host ends at port, path, query, or end of string
        let remainder = &uri[host_start..];
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(uri.len(), |i| host_start + i);

        if host_end == host_start || uri[host_start..host_end].contains(char::is_whitespace) {
            return Err(invalid());
        }

        Ok(Self {
            uri,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URI scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.uri[..self.scheme_end]
    }

    /// Returns the host name portion of the URI.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.uri[self.host_start..self.host_end]
    }
}

impl AsRef<str> for ResourceUri {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

impl std::fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.uri)
    }
}

impl Serialize for ResourceUri {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.uri)
    }
}

impl<'de> Deserialize<'de> for ResourceUri {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// A validated locale used to pick labels from language maps.
///
/// # Example
///
/// ```rust
/// use iiif_manifold::Locale;
///
/// let locale = Locale::new("en-GB").unwrap();
/// assert_eq!(locale.language(), "en");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Locale(String);

impl Locale {
    /// Creates a new validated locale.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLocale`] if the tag is empty or contains
    /// characters other than ASCII letters, digits, `-` and `_`.
    pub fn new(locale: impl Into<String>) -> Result<Self, ConfigError> {
        let locale = locale.into();
        let locale = locale.trim().to_string();

        let valid = !locale.is_empty()
            && !locale.starts_with(['-', '_'])
            && locale
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ConfigError::InvalidLocale { locale });
        }

        Ok(Self(locale))
    }

    /// Returns the primary language subtag (`en` for `en-GB`).
    #[must_use]
    pub fn language(&self) -> &str {
        self.0.split(['-', '_']).next().unwrap_or(&self.0)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
