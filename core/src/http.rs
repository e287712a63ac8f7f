//! HTTP transport types for the trip-planner API.
//!
//! # Design
//! Requests and responses are plain data. `RequestGateway` turns a
//! `RequestSpec` into a `ResolvedRequest` and classifies an `HttpResponse`
//! without touching the network; the `Transport` in between does the I/O.
//!
//! Headers are ordered `(name, value)` pairs. Lookups are case-insensitive.

use serde_json::Value;

use crate::multipart::MultipartForm;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Payload of an outgoing request.
///
/// The caller picks the variant; the gateway never inspects a JSON value to
/// decide whether it should have been a form.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Multipart(MultipartForm),
}

/// Whether session cookies accompany the request.
///
/// There is a single variant: the backend authenticates by session cookie,
/// so every request carries credentials regardless of origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Credentials {
    #[default]
    Include,
}

/// A request as described by an endpoint operation, before the base URL is
/// applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestSpec {
    pub path: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl RequestSpec {
    /// A `GET` to `path` with no headers and no body.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = Some(RequestBody::Multipart(form));
        self
    }
}

/// A request ready for the transport: full URL, merged headers, credentials.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    pub credentials: Credentials,
}

impl ResolvedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
///
/// Built by the transport after a round-trip, then handed to
/// `RequestGateway::classify`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Overlay `overrides` on `defaults`. A header in `overrides` replaces any
/// default with the same name, compared case-insensitively.
pub(crate) fn merge_headers(
    defaults: &[(String, String)],
    overrides: &[(String, String)],
) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = defaults
        .iter()
        .filter(|(key, _)| !overrides.iter().any(|(k, _)| k.eq_ignore_ascii_case(key)))
        .cloned()
        .collect();
    merged.extend(overrides.iter().cloned());
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn request_spec_defaults_to_get() {
        let spec = RequestSpec::new("/bucket-list/");
        assert_eq!(spec.method, HttpMethod::Get);
        assert!(spec.headers.is_empty());
        assert!(spec.body.is_none());
    }

    #[test]
    fn merge_keeps_defaults_without_collision() {
        let merged = merge_headers(&[pair("Content-Type", "application/json")], &[pair("X-Trace", "1")]);
        assert_eq!(
            merged,
            vec![pair("Content-Type", "application/json"), pair("X-Trace", "1")]
        );
    }

    #[test]
    fn merge_prefers_caller_value_case_insensitively() {
        let merged = merge_headers(
            &[pair("Content-Type", "application/json")],
            &[pair("content-type", "text/plain")],
        );
        assert_eq!(merged, vec![pair("content-type", "text/plain")]);
    }

    #[test]
    fn header_lookup_ignores_case() {
        let response = HttpResponse {
            status: 200,
            reason: "OK".to_string(),
            headers: vec![pair("Content-Type", "application/json")],
            body: String::new(),
        };
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert!(response.header("x-missing").is_none());
    }

    #[test]
    fn success_range_is_2xx() {
        let mut response = HttpResponse {
            status: 204,
            reason: String::new(),
            headers: Vec::new(),
            body: String::new(),
        };
        assert!(response.is_success());
        response.status = 302;
        assert!(!response.is_success());
        response.status = 199;
        assert!(!response.is_success());
    }
}
