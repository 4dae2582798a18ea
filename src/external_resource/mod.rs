//! Access-controlled loading of external resources.
//!
//! An [`ExternalResource`] wraps one resource referenced from a manifest (an
//! image service descriptor or a binary such as audio, video or PDF) and
//! works out whether, and how, it can be retrieved.
//!
//! Auth services declared on the manifest-level descriptor are detected at
//! construction, before any request is made, so callers can check
//! [`ExternalResource::is_access_controlled`] up front.
//!
//! [`ExternalResource::get_data`] then performs one probe:
//!
//! - binaries without auth services settle as `200` with no request at all
//! - access-controlled binaries are probed with `HEAD`
//! - image service descriptors (`info.json`) are always fetched with `GET`,
//!   since the descriptor itself declares the auth services and identity
//!
//! Failures never surface as errors: the status code and payload are
//! recorded on the resource, and auth services found in a failure body
//! (for example a `401` carrying a login service) are picked up.
//!
//! Whether a binary is access controlled is only known from the
//! manifest-level descriptor. A binary that requires auth independently of
//! the manifest is reported as `200` without being probed.
//!
//! # Example
//!
//! ```rust,ignore
//! use iiif_manifold::{AccessToken, ExternalResource};
//!
//! let mut resource = ExternalResource::new(descriptor, |d| image_info_uri(d), true);
//! resource.get_data(None).await;
//!
//! if resource.status == Some(401) {
//!     if let Some(login) = &resource.services.login {
//!         // prompt the user, obtain a token, then retry
//!         let token = AccessToken::new(obtained);
//!         resource.get_data(Some(&token)).await;
//!     }
//! }
//! ```

mod access;

use std::sync::Arc;

use serde_json::Value;

pub use access::{AccessServices, AccessToken, FetchFailure};

use crate::clients::{
    transport_for, Transport, TransportError, TransportMethod, TransportRequest,
    TransportStrategy, IMAGE_INFO_CALLBACK,
};
use crate::iiif::{document_id, DocumentModel, JsonDocumentModel};

/// HTTP status codes recorded on resources.
pub mod status {
    /// The resource is available.
    pub const OK: u16 = 200;
    /// A degraded variant was served and a login service offers the full one.
    pub const MOVED_TEMPORARILY: u16 = 302;
}

/// Suffix naming an image service descriptor.
pub const SERVICE_DESCRIPTOR_SUFFIX: &str = "info.json";

/// Derives the data URI of an image resource: `{service id}/info.json` when
/// the descriptor has a IIIF image service, otherwise its own identifier.
#[must_use]
pub fn image_info_uri(descriptor: &Value) -> String {
    let image_service = ["service", "services"]
        .iter()
        .filter_map(|key| descriptor.get(key))
        .flat_map(|services| match services {
            Value::Array(items) => items.iter().collect::<Vec<_>>(),
            other => vec![other],
        })
        .find(|service| is_image_service(service));

    match image_service {
        Some(service) => format!(
            "{}/{SERVICE_DESCRIPTOR_SUFFIX}",
            document_id(service).trim_end_matches('/')
        ),
        None => document_id(descriptor).to_string(),
    }
}

fn is_image_service(service: &Value) -> bool {
    let declares = |value: &Value| {
        value
            .as_str()
            .is_some_and(|p| p.contains("iiif.io/api/image"))
    };
    let profile = match service.get("profile") {
        Some(Value::Array(profiles)) => profiles.iter().any(declares),
        Some(profile) => declares(profile),
        None => false,
    };
    let image_type = ["@type", "type"]
        .iter()
        .filter_map(|key| service.get(key).and_then(Value::as_str))
        .any(|kind| kind.starts_with("ImageService"));

    profile || image_type || service.get("@context").is_some_and(declares)
}

/// Strips a trailing `/info.json` segment.
fn strip_descriptor_suffix(uri: &str) -> &str {
    uri.strip_suffix("/info.json").unwrap_or(uri)
}

/// An external resource and what is known about retrieving it.
#[derive(Debug)]
pub struct ExternalResource {
    /// The URI that is probed.
    pub data_uri: String,
    /// The parsed descriptor, once fetched.
    pub data: Option<Value>,
    /// Status of the last fetch attempt.
    pub status: Option<u16>,
    /// Failure of the last fetch attempt.
    pub error: Option<FetchFailure>,
    /// Auth services detected so far.
    pub services: AccessServices,
    /// Width in pixels, taken from the source descriptor.
    pub width: Option<u64>,
    /// Height in pixels, taken from the source descriptor.
    pub height: Option<u64>,
    /// Horizontal offset used by the host when laying out resources.
    pub x: i64,
    /// Vertical offset used by the host when laying out resources.
    pub y: i64,
    /// Position of the resource in the host's list.
    pub index: usize,
    /// Host bookkeeping: set once the host has acted on the outcome.
    pub is_response_handled: bool,
    descriptor: Value,
    is_cors_enabled: bool,
    transport: Arc<dyn Transport>,
    model: Arc<dyn DocumentModel>,
}

impl ExternalResource {
    /// Creates a resource for `descriptor`, deriving its data URI with
    /// `data_uri` and picking the transport from `is_cors_enabled`.
    #[must_use]
    pub fn new(
        descriptor: Value,
        data_uri: impl FnOnce(&Value) -> String,
        is_cors_enabled: bool,
    ) -> Self {
        Self::builder(descriptor, data_uri)
            .cors_enabled(is_cors_enabled)
            .build()
    }

    /// Creates a builder for a resource.
    #[must_use]
    pub fn builder(
        descriptor: Value,
        data_uri: impl FnOnce(&Value) -> String,
    ) -> ExternalResourceBuilder {
        let data_uri = data_uri(&descriptor);
        ExternalResourceBuilder::new(descriptor, data_uri)
    }

    /// Returns the source descriptor.
    #[must_use]
    pub const fn descriptor(&self) -> &Value {
        &self.descriptor
    }

    /// Returns whether cross-origin requests are used.
    #[must_use]
    pub const fn is_cors_enabled(&self) -> bool {
        self.is_cors_enabled
    }

    /// Returns `true` if a click-through, login or restricted service is known.
    #[must_use]
    pub const fn is_access_controlled(&self) -> bool {
        self.services.is_access_controlled()
    }

    /// Returns `true` if the data URI names an image service descriptor.
    #[must_use]
    pub fn has_service_descriptor(&self) -> bool {
        self.data_uri.ends_with(SERVICE_DESCRIPTOR_SUFFIX)
    }

    /// Probes the resource and records the outcome.
    ///
    /// Never fails: transport errors are recorded in [`status`](Self::status)
    /// and [`error`](Self::error).
    pub async fn get_data(&mut self, access_token: Option<&AccessToken>) -> &Self {
        let method = if self.has_service_descriptor() {
            TransportMethod::Get
        } else if self.is_access_controlled() {
            TransportMethod::Head
        } else {
            tracing::debug!(uri = %self.data_uri, "resource is not access controlled");
            self.settle(status::OK, None);
            return self;
        };

        let request = TransportRequest::new(method, &self.data_uri)
            .bearer_token(access_token.map(|token| token.access_token.clone()));

        match self.transport.fetch(request).await {
            Ok(response) => self.descriptor_loaded(response.body),
            Err(error) => self.fetch_failed(&error),
        }

        self
    }

    fn descriptor_loaded(&mut self, body: Option<Value>) {
        let Some(data) = body else {
            self.settle(status::OK, None);
            return;
        };

        self.services = AccessServices::parse(&data, self.model.as_ref());

        let id = document_id(&data);
        let id = urlencoding::decode(id)
            .map_or_else(|_| id.to_string(), std::borrow::Cow::into_owned);
        let redirected = strip_descriptor_suffix(&id) != strip_descriptor_suffix(&self.data_uri);

        self.data = Some(data);

        if redirected && self.services.login.is_some() {
            tracing::warn!(
                requested = %self.data_uri,
                served = %id,
                "degraded resource served, login service available"
            );
            self.settle(status::MOVED_TEMPORARILY, None);
        } else {
            self.settle(status::OK, None);
        }
    }

    fn fetch_failed(&mut self, error: &TransportError) {
        tracing::warn!(
            uri = %self.data_uri,
            status = error.status(),
            "resource fetch failed: {error}"
        );

        if let Some(body) = error.body() {
            self.services = AccessServices::parse(body, self.model.as_ref());
        }
        self.settle(error.status(), Some(FetchFailure::from(error)));
    }

    fn settle(&mut self, status: u16, error: Option<FetchFailure>) {
        self.status = Some(status);
        self.error = error;
    }
}

/// Builder for [`ExternalResource`].
///
/// # Defaults
///
/// - CORS enabled, so the credentialed transport is used
/// - [`JsonDocumentModel`] for service lookup
/// - `x`, `y` and `index` are `0`
#[derive(Debug)]
pub struct ExternalResourceBuilder {
    descriptor: Value,
    data_uri: String,
    is_cors_enabled: bool,
    transport: Option<Arc<dyn Transport>>,
    model: Option<Arc<dyn DocumentModel>>,
    user_agent_prefix: Option<String>,
    x: i64,
    y: i64,
    index: usize,
}

impl ExternalResourceBuilder {
    fn new(descriptor: Value, data_uri: String) -> Self {
        Self {
            descriptor,
            data_uri,
            is_cors_enabled: true,
            transport: None,
            model: None,
            user_agent_prefix: None,
            x: 0,
            y: 0,
            index: 0,
        }
    }

    /// Sets whether cross-origin requests are enabled.
    #[must_use]
    pub const fn cors_enabled(mut self, enabled: bool) -> Self {
        self.is_cors_enabled = enabled;
        self
    }

    /// Uses `transport` instead of the one implied by the CORS flag.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Uses `model` for service lookup.
    #[must_use]
    pub fn document_model(mut self, model: Arc<dyn DocumentModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Sets the user agent prefix for the default transport.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the layout offset.
    #[must_use]
    pub const fn position(mut self, x: i64, y: i64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Sets the position in the host's list.
    #[must_use]
    pub const fn index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Builds the resource, detecting auth services on the descriptor.
    #[must_use]
    pub fn build(self) -> ExternalResource {
        let transport = self.transport.unwrap_or_else(|| {
            transport_for(
                TransportStrategy::for_cors(self.is_cors_enabled),
                IMAGE_INFO_CALLBACK,
                self.user_agent_prefix.as_deref(),
            )
        });
        let model = self
            .model
            .unwrap_or_else(|| Arc::new(JsonDocumentModel::new()));
        let services = AccessServices::parse(&self.descriptor, model.as_ref());

        ExternalResource {
            data_uri: self.data_uri,
            data: None,
            status: None,
            error: None,
            services,
            width: self.descriptor.get("width").and_then(Value::as_u64),
            height: self.descriptor.get("height").and_then(Value::as_u64),
            x: self.x,
            y: self.y,
            index: self.index,
            is_response_handled: false,
            descriptor: self.descriptor,
            is_cors_enabled: self.is_cors_enabled,
            transport,
            model,
        }
    }
}
