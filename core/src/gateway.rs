//! Request construction and response normalization shared by every endpoint.
//!
//! # Design
//! `RequestGateway` keeps the build/parse split of a host-does-IO client:
//! `resolve` builds a `ResolvedRequest`, `classify` turns an `HttpResponse`
//! into an outcome, and neither touches the network. `send` glues the two
//! around a `Transport`. The gateway holds only the immutable `ApiConfig`
//! and its transport, so one instance can serve any number of callers.

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::{merge_headers, Credentials, HttpResponse, RequestBody, RequestSpec, ResolvedRequest};

/// Characters of a non-JSON body kept for diagnostics.
pub const PREVIEW_CHARS: usize = 200;

/// Result of one gateway call.
pub type ResponseOutcome = Result<Value, ApiError>;

/// The transport could not obtain a response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    /// Rejected locally; nothing was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No complete response arrived.
    #[error("connection failed: {0}")]
    Connection(String),
}

/// Executes a `ResolvedRequest` over the network.
///
/// Implementations must return every response they receive as
/// `HttpResponse`, including 4xx and 5xx. `Err` is reserved for requests
/// that could not be built and for responses that never fully arrived.
pub trait Transport {
    fn execute(&self, request: &ResolvedRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &ResolvedRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

#[derive(Debug, Clone)]
pub struct RequestGateway<T> {
    config: ApiConfig,
    transport: T,
}

impl<T: Transport> RequestGateway<T> {
    pub fn new(config: ApiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Join `spec` with the base URL, merge the default JSON content type
    /// under the caller's headers and attach credentials.
    ///
    /// Multipart bodies get no default content type; the transport supplies
    /// one carrying the form boundary.
    pub fn resolve(&self, spec: RequestSpec) -> ResolvedRequest {
        let defaults = match spec.body {
            Some(RequestBody::Multipart(_)) => Vec::new(),
            _ => vec![("Content-Type".to_string(), "application/json".to_string())],
        };
        ResolvedRequest {
            method: spec.method,
            url: self.config.url_for(&spec.path),
            headers: merge_headers(&defaults, &spec.headers),
            body: spec.body,
            credentials: Credentials::Include,
        }
    }

    /// Normalize a response received for `request`.
    pub fn classify(&self, request: &ResolvedRequest, response: HttpResponse) -> ResponseOutcome {
        let content_type = response.header("content-type");
        let is_json = content_type.is_some_and(|ct| ct.contains("application/json"));

        if !is_json {
            let preview: String = response.body.chars().take(PREVIEW_CHARS).collect();
            warn!(
                status = response.status,
                reason = %response.reason,
                url = %request.url,
                content_type = content_type.unwrap_or("<none>"),
                preview = %preview,
                "non-JSON response received"
            );
            if !response.is_success() {
                return Err(ApiError::NonJsonErrorResponse {
                    status: response.status,
                    reason: response.reason,
                    preview,
                });
            }
            return Err(ApiError::UnexpectedNonJsonResponse {
                status: response.status,
                preview,
            });
        }

        let data: Value = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::MalformedJson(e.to_string()))?;

        if !response.is_success() {
            let message = message_field(&data, "error")
                .or_else(|| message_field(&data, "message"))
                .unwrap_or_else(|| format!("HTTP error! status: {}", response.status));
            return Err(ApiError::HttpError {
                status: response.status,
                message,
            });
        }

        Ok(data)
    }

    /// Resolve, execute and classify `spec`, logging any failure before
    /// returning it.
    pub fn send(&self, spec: RequestSpec) -> ResponseOutcome {
        let request = self.resolve(spec);
        debug!(method = request.method.as_str(), url = %request.url, "sending request");

        let outcome = match self.transport.execute(&request) {
            Ok(response) => self.classify(&request, response),
            Err(TransportError::InvalidRequest(message)) => {
                Err(ApiError::InvalidRequest { message })
            }
            Err(TransportError::Connection(cause)) => {
                debug!(url = %request.url, "connection failed: {cause}");
                Err(ApiError::NetworkUnreachable {
                    message: format!(
                        "Network error: Unable to reach the server. Make sure the backend server is running on {}",
                        self.config.base_url()
                    ),
                })
            }
        };

        if let Err(e) = &outcome {
            error!(method = request.method.as_str(), url = %request.url, "API request failed: {e}");
        }
        outcome
    }
}

/// A usable message under `key`: present, not null, not `false` and not an
/// empty string. Non-string values are rendered as JSON.
fn message_field(data: &Value, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
