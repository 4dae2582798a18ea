//! Services attached to IIIF resources.
//!
//! Services are found under a resource's `service` (Presentation 2 and image
//! descriptors) or `services` property, either as a single object or an
//! array. Each is tagged by one or more `profile` URIs. Auth services nest
//! their logout and token services one level down.

use std::fmt;

use serde_json::Value;

use crate::iiif::resource::document_id;

const AUTH_0: &str = "iiif.io/api/auth/0/";
const AUTH_1: &str = "iiif.io/api/auth/1/";

/// Profiles of the auth services the loader cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ServiceProfile {
    /// The user must acknowledge terms before access.
    ClickThrough,
    /// The user must log in.
    Login,
    /// Access is denied without any way for the user to gain it.
    Restricted,
    /// Ends an authenticated session.
    Logout,
    /// Issues access tokens for an authenticated session.
    Token,
}

impl ServiceProfile {
    /// Profile suffixes (relative to the auth API roots) for this profile.
    const fn suffixes(self) -> (&'static str, Option<&'static str>) {
        match self {
            Self::ClickThrough => ("login/clickthrough", Some("clickthrough")),
            Self::Login => ("login", Some("login")),
            Self::Restricted => ("login/restricted", None),
            Self::Logout => ("logout", Some("logout")),
            Self::Token => ("token", Some("token")),
        }
    }

    /// Returns `true` if `profile` names this service profile in either the
    /// 0.9 or 1.0 auth API, with `http` or `https` scheme.
    #[must_use]
    pub fn matches(self, profile: &str) -> bool {
        let profile = profile
            .strip_prefix("https://")
            .or_else(|| profile.strip_prefix("http://"))
            .unwrap_or(profile);
        let (v0, v1) = self.suffixes();

        profile.strip_prefix(AUTH_0) == Some(v0)
            || v1.is_some_and(|v1| profile.strip_prefix(AUTH_1) == Some(v1))
    }
}

impl fmt::Display for ServiceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http://{AUTH_0}{}", self.suffixes().0)
    }
}

/// A service descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct Service {
    json: Value,
}

impl Service {
    /// Wraps a raw service object.
    #[must_use]
    pub const fn new(json: Value) -> Self {
        Self { json }
    }

    /// Returns the service's identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        document_id(&self.json)
    }

    /// Returns the profile URIs the service declares.
    #[must_use]
    pub fn profiles(&self) -> Vec<&str> {
        match self.json.get("profile") {
            Some(Value::String(p)) => vec![p.as_str()],
            Some(Value::Array(ps)) => ps.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Returns the service's label when it is a plain string.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.json.get("label").and_then(Value::as_str)
    }

    /// Returns the raw service object.
    #[must_use]
    pub const fn json(&self) -> &Value {
        &self.json
    }

    /// Returns `true` if the service declares `profile`.
    #[must_use]
    pub fn has_profile(&self, profile: ServiceProfile) -> bool {
        self.profiles().into_iter().any(|p| profile.matches(p))
    }

    /// Looks up a nested service by profile.
    #[must_use]
    pub fn service(&self, profile: ServiceProfile) -> Option<Self> {
        find_service(&self.json, profile)
    }
}

/// Finds the first service on `resource` declaring `profile`.
#[must_use]
pub fn find_service(resource: &Value, profile: ServiceProfile) -> Option<Service> {
    ["service", "services"]
        .iter()
        .filter_map(|key| resource.get(key))
        .flat_map(|services| match services {
            Value::Array(items) => items.iter().collect::<Vec<_>>(),
            Value::Object(_) => vec![services],
            _ => Vec::new(),
        })
        .map(|json| Service::new(json.clone()))
        .find(|service| service.has_profile(profile))
}
