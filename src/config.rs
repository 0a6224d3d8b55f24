//! Client configuration.
//!
//! Construction-time knobs for `Client`: the deployment region (a fixed
//! per-region hostname table), the app identifier embedded in the
//! `User-Agent` header, optional credentials, and the session cache
//! directory. Everything has a documented default.

use std::path::PathBuf;

/// Directory name for the session cache under the user cache dir
const APP_DIR: &str = "classeviva";

/// REST API path prefix, identical on every region host
const REST_PATH: &str = "/rest/v1";

/// Platform client version advertised in the User-Agent header
const CLIENT_VERSION: &str = "4.2.3";

/// Deployment region, mapping to a fixed platform hostname.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    #[default]
    Italy,
    SanMarino,
    Argentina,
}

impl Region {
    pub(crate) fn host(self) -> &'static str {
        match self {
            Region::Italy => "web.spaggiari.eu",
            Region::SanMarino => "web.spaggiari.sm",
            Region::Argentina => "ar.spaggiari.eu",
        }
    }
}

/// Configuration for [`crate::Client`].
///
/// `..Default::default()` gives the Italy host, the stock app identifier,
/// no credentials, and the user cache directory.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub region: Region,
    /// App identifier embedded in the `User-Agent` header. Defaults to
    /// `"std"`, producing the stock mobile-client agent string.
    pub app: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Session cache directory override. Defaults to
    /// `{user cache dir}/classeviva`.
    pub cache_dir: Option<PathBuf>,
    /// Scheme+authority override for every request URL, e.g.
    /// `http://127.0.0.1:8080`. `region` is ignored when set. Meant for
    /// tests and staging mirrors.
    pub base_url: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            region: Region::default(),
            app: "std".to_string(),
            username: None,
            password: None,
            cache_dir: None,
            base_url: None,
        }
    }
}

impl ClientConfig {
    /// Default configuration carrying a credential pair.
    pub fn with_credentials(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    /// Scheme and authority every URL is built on.
    pub(crate) fn origin(&self) -> String {
        match &self.base_url {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.region.host()),
        }
    }

    /// Base for the REST endpoint namespace: `{origin}/rest/v1`.
    pub(crate) fn rest_base(&self) -> String {
        format!("{}{}", self.origin(), REST_PATH)
    }

    pub(crate) fn user_agent(&self) -> String {
        format!("CVVS/{}/{} Android/12", self.app, CLIENT_VERSION)
    }

    pub(crate) fn cache_dir_or_default(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_DIR)
        })
    }
}
