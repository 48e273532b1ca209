//! HTTP client settings and their environment overrides.

use std::time::Duration;

/// Default origin of the Pwned Passwords range API.
pub const DEFAULT_BASE_URL: &str = "https://api.pwnedpasswords.com";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default `User-Agent` sent with range requests.
pub const DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Environment variable overriding [`ClientConfig::base_url`].
pub const BASE_URL_ENV: &str = "HIBP_RANGE_BASE_URL";

/// Environment variable overriding [`ClientConfig::timeout`], in whole seconds.
pub const TIMEOUT_SECS_ENV: &str = "HIBP_RANGE_TIMEOUT_SECS";

/// Environment variable overriding [`ClientConfig::user_agent`].
pub const USER_AGENT_ENV: &str = "HIBP_RANGE_USER_AGENT";

/// Settings for the HTTP range transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin the `/range/{prefix}` path is appended to. A trailing slash is ignored.
    pub base_url: String,
    pub timeout: Duration,
    /// Identifying client tag, sent as the `User-Agent` header.
    pub user_agent: String,
    /// Honour `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` from the environment.
    pub use_system_proxy: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            use_system_proxy: true,
        }
    }
}

impl ClientConfig {
    /// Defaults, with any of [`BASE_URL_ENV`], [`TIMEOUT_SECS_ENV`] and
    /// [`USER_AGENT_ENV`] applied on top. Unparseable or empty values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(base_url) = non_empty(BASE_URL_ENV) {
            config.base_url = base_url.trim().to_owned();
        }
        if let Some(secs) = non_empty(TIMEOUT_SECS_ENV).and_then(|v| v.trim().parse::<u64>().ok()) {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(user_agent) = non_empty(USER_AGENT_ENV) {
            config.user_agent = user_agent;
        }
        config
    }

    /// The URL for a given prefix: `{base_url}/range/{prefix}`.
    pub fn range_url(&self, prefix: &str) -> String {
        format!("{}/range/{}", self.base_url.trim_end_matches('/'), prefix)
    }
}
