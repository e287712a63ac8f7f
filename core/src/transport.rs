//! Network transport built on a `ureq` agent.
//!
//! The agent keeps a cookie jar, so the session cookie set by `/login/` is
//! replayed on every later request made through the same transport (and its
//! clones). 4xx/5xx statuses come back as data, never as `Err`.

use tracing::error;
use ureq::http::{HeaderName, HeaderValue};
use ureq::{Agent, RequestBuilder};

use crate::gateway::{Transport, TransportError};
use crate::http::{Credentials, HttpMethod, HttpResponse, RequestBody, ResolvedRequest};

/// Largest response body read before the transport gives up.
pub const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
    origin: Option<String>,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            agent,
            origin: None,
        }
    }

    /// Origin used to complete same-origin relative URLs such as
    /// `/api/login/`.
    pub fn with_origin(mut self, origin: &str) -> Self {
        self.origin = Some(origin.trim_end_matches('/').to_string());
        self
    }

    fn absolute_url(&self, url: &str) -> Result<String, TransportError> {
        if !url.starts_with('/') {
            return Ok(url.to_string());
        }
        match &self.origin {
            Some(origin) => Ok(format!("{origin}{url}")),
            None => Err(TransportError::InvalidRequest(format!(
                "relative URL {url} needs a page origin"
            ))),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &ResolvedRequest) -> Result<HttpResponse, TransportError> {
        let prepared = self.absolute_url(&request.url).and_then(|url| {
            check_headers(&request.headers)?;
            Ok(url)
        });
        let url = prepared.inspect_err(|e| error!(url = %request.url, "{e}"))?;

        // The agent's cookie jar carries the session.
        let agent = match request.credentials {
            Credentials::Include => &self.agent,
        };

        let mut headers = request.headers.clone();
        let body = match &request.body {
            None => None,
            Some(RequestBody::Json(value)) => Some(
                serde_json::to_vec(value)
                    .map_err(|e| TransportError::InvalidRequest(e.to_string()))?,
            ),
            Some(RequestBody::Multipart(form)) => {
                let encoded = form.encode();
                headers.retain(|(k, _)| !k.eq_ignore_ascii_case("content-type"));
                headers.push(("Content-Type".to_string(), encoded.content_type));
                Some(encoded.body)
            }
        };

        let result = match (request.method, body) {
            (HttpMethod::Get, _) => with_headers(agent.get(&url), &headers).call(),
            (HttpMethod::Delete, None) => with_headers(agent.delete(&url), &headers).call(),
            (HttpMethod::Delete, Some(body)) => {
                with_headers(agent.delete(&url).force_send_body(), &headers).send(&body[..])
            }
            (HttpMethod::Post, Some(body)) => {
                with_headers(agent.post(&url), &headers).send(&body[..])
            }
            (HttpMethod::Post, None) => with_headers(agent.post(&url), &headers).send_empty(),
            (HttpMethod::Patch, Some(body)) => {
                with_headers(agent.patch(&url), &headers).send(&body[..])
            }
            (HttpMethod::Patch, None) => with_headers(agent.patch(&url), &headers).send_empty(),
        };
        let mut response = result.map_err(request_error)?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let bytes = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_vec()
            .map_err(|e| TransportError::Connection(format!("reading response body: {e}")))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/// Reject header names and values the wire cannot carry before connecting.
fn check_headers(headers: &[(String, String)]) -> Result<(), TransportError> {
    for (name, value) in headers {
        HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
            TransportError::InvalidRequest(format!("header name {name:?} is not valid"))
        })?;
        HeaderValue::from_str(value).map_err(|_| {
            TransportError::InvalidRequest(format!("value of header {name:?} is not valid"))
        })?;
    }
    Ok(())
}

fn request_error(err: ureq::Error) -> TransportError {
    match &err {
        ureq::Error::BadUri(_) | ureq::Error::Http(_) => {
            error!("request rejected before sending: {err}");
            TransportError::InvalidRequest(err.to_string())
        }
        _ => TransportError::Connection(err.to_string()),
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;

    use super::*;
    use crate::config::ApiConfig;
    use crate::gateway::RequestGateway;
    use crate::http::RequestSpec;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    fn get(url: &str, headers: Vec<(String, String)>) -> ResolvedRequest {
        ResolvedRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers,
            body: None,
            credentials: Credentials::Include,
        }
    }

    /// Answer one connection with a fixed response, then close it.
    fn serve_once(status: u16, content_type: &str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let head = format!(
            "HTTP/1.1 {status} X\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    return;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(&body).unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn absolute_urls_pass_through() {
        let transport = UreqTransport::new();
        assert_eq!(
            transport.absolute_url("http://localhost:8000/api/user/").unwrap(),
            "http://localhost:8000/api/user/"
        );
    }

    #[test]
    fn relative_urls_use_origin() {
        let transport = UreqTransport::new().with_origin("http://127.0.0.1:8000/");
        assert_eq!(
            transport.absolute_url("/api/user/").unwrap(),
            "http://127.0.0.1:8000/api/user/"
        );
    }

    #[test]
    fn relative_url_without_origin_is_invalid_request() {
        assert!(matches!(
            UreqTransport::new().absolute_url("/api/user/"),
            Err(TransportError::InvalidRequest(_))
        ));
    }

    #[test]
    fn bad_header_is_rejected_before_connecting() {
        // Nothing listens on the discard port; an attempt to connect would
        // surface as `Connection`.
        let request = get("http://127.0.0.1:9/api/check-auth/", vec![pair("bad name", "x")]);
        let err = UreqTransport::new().execute(&request).unwrap_err();
        assert_eq!(
            err,
            TransportError::InvalidRequest("header name \"bad name\" is not valid".to_string())
        );

        let request = get("http://127.0.0.1:9/api/check-auth/", vec![pair("X-Note", "a\nb")]);
        assert!(matches!(
            UreqTransport::new().execute(&request),
            Err(TransportError::InvalidRequest(_))
        ));
    }

    #[test]
    fn body_over_ten_megabytes_is_read_whole() {
        let payload = format!(r#"{{"trips":"{}"}}"#, "a".repeat(11 * 1024 * 1024));
        let origin = serve_once(200, "application/json", payload.clone().into_bytes());

        let response = UreqTransport::new()
            .execute(&get(&format!("{origin}/api/bucket-list/"), Vec::new()))
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body.len(), payload.len());

        let origin = serve_once(200, "application/json", payload.into_bytes());
        let gateway = RequestGateway::new(
            ApiConfig::with_base_url(&format!("{origin}/api")),
            UreqTransport::new(),
        );
        let data = gateway.send(RequestSpec::new("/bucket-list/")).unwrap();
        assert_eq!(data["trips"].as_str().unwrap().len(), 11 * 1024 * 1024);
    }

    #[test]
    fn invalid_utf8_body_is_kept_lossily() {
        let origin = serve_once(500, "text/plain", vec![b'o', b'k', 0xff]);
        let response = UreqTransport::new()
            .execute(&get(&format!("{origin}/"), Vec::new()))
            .unwrap();
        assert_eq!(response.status, 500);
        assert_eq!(response.reason, "Internal Server Error");
        assert_eq!(response.body, "ok\u{fffd}");
    }
}
