//! Auth services and tokens for access-controlled resources.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::clients::TransportError;
use crate::iiif::{DocumentModel, Service, ServiceProfile};

/// The auth services detected on a resource.
///
/// `logout` and `token` come from the nested services of whichever of
/// `click_through`, `login` or `restricted` is present, in that order, and
/// are only set when one of them is.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AccessServices {
    /// Click-through service.
    pub click_through: Option<Service>,
    /// Login service.
    pub login: Option<Service>,
    /// Restricted service.
    pub restricted: Option<Service>,
    /// Logout service nested in the preferred service.
    pub logout: Option<Service>,
    /// Token service nested in the preferred service.
    pub token: Option<Service>,
}

impl AccessServices {
    /// Detects the auth services declared on `resource`.
    #[must_use]
    pub fn parse(resource: &Value, model: &dyn DocumentModel) -> Self {
        let mut services = Self {
            click_through: model.service_by_profile(resource, ServiceProfile::ClickThrough),
            login: model.service_by_profile(resource, ServiceProfile::Login),
            restricted: model.service_by_profile(resource, ServiceProfile::Restricted),
            logout: None,
            token: None,
        };

        if let Some(preferred) = services.preferred() {
            let logout = preferred.service(ServiceProfile::Logout);
            let token = preferred.service(ServiceProfile::Token);
            services.logout = logout;
            services.token = token;
        }

        services
    }

    /// Returns the service the user should interact with first.
    #[must_use]
    pub fn preferred(&self) -> Option<&Service> {
        self.click_through
            .as_ref()
            .or(self.login.as_ref())
            .or(self.restricted.as_ref())
    }

    /// Returns `true` if any click-through, login or restricted service is present.
    #[must_use]
    pub const fn is_access_controlled(&self) -> bool {
        self.click_through.is_some() || self.login.is_some() || self.restricted.is_some()
    }
}

/// An access token obtained from a token service.
///
/// Deserializes from the token service's JSON response. The `Debug` output
/// masks the token value.
///
/// # Example
///
/// ```rust
/// use iiif_manifold::AccessToken;
///
/// let token: AccessToken =
///     serde_json::from_str(r#"{"accessToken": "abc", "expiresIn": 3600}"#).unwrap();
/// assert_eq!(token.access_token, "abc");
/// assert_eq!(format!("{token:?}"), "AccessToken { access_token: *****, expires_in: Some(3600) }");
/// ```
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    /// The bearer token value.
    pub access_token: String,
    /// Lifetime in seconds, if the service declared one.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl AccessToken {
    /// Creates a token without an expiry.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_in: None,
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AccessToken {{ access_token: *****, expires_in: {:?} }}",
            self.expires_in
        )
    }
}

/// A failed fetch, recorded on the resource instead of being returned.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchFailure {
    /// HTTP status code; `0` when no response was received.
    pub status: u16,
    /// Description of the failure.
    pub message: String,
    /// The JSON payload of the failure, if any.
    pub body: Option<Value>,
}

impl From<&TransportError> for FetchFailure {
    fn from(error: &TransportError) -> Self {
        Self {
            status: error.status(),
            message: error.to_string(),
            body: error.body().cloned(),
        }
    }
}
