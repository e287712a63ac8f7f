//! Base-URL resolution.
//!
//! The base URL is chosen once, when `ApiConfig` is built, and is never
//! changed afterwards. Resolution order:
//! 1. an explicit override (`TRIP_API_URL` when loaded from the environment);
//! 2. the relative path `/api` when the client is served from the backend's
//!    own origin (port 8000);
//! 3. `DEFAULT_BASE_URL`.

use std::env;

use tracing::{debug, info};

/// Environment variable holding the base-URL override.
pub const BASE_URL_ENV: &str = "TRIP_API_URL";

/// Used when there is no override and the page is not served by the backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Relative base used when the page shares the backend's origin.
pub const SAME_ORIGIN_BASE_PATH: &str = "/api";

/// Port the backend serves pages and API from.
pub const BACKEND_PORT: u16 = 8000;

/// Immutable client configuration, constructed once at process start and
/// handed to `RequestGateway`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    page_origin: Option<String>,
}

impl ApiConfig {
    /// Resolve the base URL from an optional override and the origin the
    /// client is served from (e.g. `http://localhost:8000`).
    pub fn resolve(override_url: Option<&str>, page_origin: Option<&str>) -> Self {
        let page_origin = page_origin
            .map(|origin| origin.trim_end_matches('/').to_string())
            .filter(|origin| !origin.is_empty());

        let base_url = match override_url.map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => url.to_string(),
            None if page_origin.as_deref().is_some_and(is_backend_origin) => {
                SAME_ORIGIN_BASE_PATH.to_string()
            }
            None => DEFAULT_BASE_URL.to_string(),
        };

        let config = Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            page_origin,
        };
        debug!(base_url = %config.base_url, "resolved API base URL");
        config
    }

    /// Resolve using `TRIP_API_URL` as the override.
    pub fn from_env(page_origin: Option<&str>) -> Self {
        let override_url = env::var(BASE_URL_ENV).ok();
        if let Some(url) = &override_url {
            info!("{BASE_URL_ENV} set, using {url}");
        }
        Self::resolve(override_url.as_deref(), page_origin)
    }

    /// Configuration pointing straight at `base_url`.
    pub fn with_base_url(base_url: &str) -> Self {
        Self::resolve(Some(base_url), None)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn page_origin(&self) -> Option<&str> {
        self.page_origin.as_deref()
    }

    /// `true` when the base URL is a same-origin relative path.
    pub fn is_relative(&self) -> bool {
        self.base_url.starts_with('/')
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::resolve(None, None)
    }
}

/// Whether `origin` (scheme://host[:port]) is served on the backend port.
fn is_backend_origin(origin: &str) -> bool {
    let authority = origin.split_once("://").map_or(origin, |(_, rest)| rest);
    let authority = authority.split('/').next().unwrap_or(authority);
    authority
        .rsplit_once(':')
        .and_then(|(_, port)| port.parse::<u16>().ok())
        == Some(BACKEND_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_takes_precedence() {
        let config = ApiConfig::resolve(
            Some("https://trips.example.com/api/"),
            Some("http://localhost:8000"),
        );
        assert_eq!(config.base_url(), "https://trips.example.com/api");
        assert!(!config.is_relative());
    }

    #[test]
    fn same_origin_uses_relative_path() {
        let config = ApiConfig::resolve(None, Some("http://127.0.0.1:8000"));
        assert_eq!(config.base_url(), "/api");
        assert!(config.is_relative());
        assert_eq!(config.page_origin(), Some("http://127.0.0.1:8000"));
    }

    #[test]
    fn dev_server_origin_falls_back_to_default() {
        let config = ApiConfig::resolve(None, Some("http://localhost:5173"));
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn no_origin_falls_back_to_default() {
        assert_eq!(ApiConfig::default().base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn blank_override_is_ignored() {
        let config = ApiConfig::resolve(Some("  "), None);
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn port_must_match_exactly() {
        assert!(is_backend_origin("http://localhost:8000"));
        assert!(is_backend_origin("https://host:8000/"));
        assert!(!is_backend_origin("http://localhost:18000"));
        assert!(!is_backend_origin("http://localhost"));
    }

    #[test]
    fn url_for_joins_path() {
        let config = ApiConfig::with_base_url("http://localhost:8000/api");
        assert_eq!(config.url_for("/login/"), "http://localhost:8000/api/login/");
    }
}
