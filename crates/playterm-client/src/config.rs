use playterm_types::{Geometry, DEFAULT_BASE_URL};
use url::Url;

use crate::error::UrlError;

/// Client-side configuration shared by the bootstrap, API client and session
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Service root, e.g. `http://play-with-docker.com`
    pub base_url: String,
    /// Geometry widgets fall back to before they can measure anything
    pub default_geometry: Geometry,
    /// Optional `User-Agent` for request/reply exchanges
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_geometry: Geometry::default(),
            user_agent: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Resolve a service path against the base URL
    ///
    /// The base may carry a path prefix; `path` is appended after it rather
    /// than replacing its last segment.
    pub fn endpoint(&self, path: &str) -> Result<Url, UrlError> {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let raw = format!("{}/{}", base, path);
        Url::parse(&raw).map_err(|source| UrlError { url: raw, source: Some(source) })
    }

    /// `<base>/sessions/<id>/<leaf>` with the id escaped as one path segment
    pub fn session_endpoint(&self, session_id: &str, leaf: &str) -> Result<Url, UrlError> {
        let mut url = self.endpoint("sessions")?;
        url.path_segments_mut()
            .map_err(|_| UrlError {
                url: self.base_url.clone(),
                source: None,
            })?
            .push(session_id)
            .push(leaf);
        Ok(url)
    }

    /// Control channel URL for a session: `<base>/sessions/<id>/ws` over ws(s)
    pub fn channel_url(&self, session_id: &str) -> Result<Url, UrlError> {
        let mut url = self.session_endpoint(session_id, "ws")?;
        let scheme = match url.scheme() {
            "https" | "wss" => "wss",
            _ => "ws",
        };
        url.set_scheme(scheme).map_err(|_| UrlError {
            url: url.to_string(),
            source: None,
        })?;
        Ok(url)
    }
}
