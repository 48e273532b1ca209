//! The public lookup API: [`BreachClient`] and its builder.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::cache::RangeCache;
use crate::config::ClientConfig;
use crate::error::Error;
use crate::fetch::{HttpTransport, RangeFetcher, RangeTransport};
use crate::hash::PasswordHash;
use crate::parser::find_suffix;

/// Outcome of a breach lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub breached: bool,
    /// Times the hash was seen in the corpus; `0` when not breached.
    pub count: u64,
}

impl CheckResult {
    pub const NOT_FOUND: Self = Self { breached: false, count: 0 };

    fn from_count(count: Option<u64>) -> Self {
        match count {
            Some(count) => Self { breached: true, count },
            None => Self::NOT_FOUND,
        }
    }
}

/// Checks passwords against a k-anonymity range API.
///
/// Only the first five hex characters of a password's SHA-1 ever leave the process.
/// The client is cheap to clone and safe to share between threads; its only shared
/// mutable state is the optional cache.
#[derive(Clone)]
pub struct BreachClient {
    fetcher: RangeFetcher,
}

impl BreachClient {
    /// A client against the public API with default settings and no cache.
    pub fn new() -> Result<Self, Error> {
        Self::builder().build()
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, Error> {
        Self::builder().config(config).build()
    }

    pub fn builder() -> BreachClientBuilder {
        BreachClientBuilder::default()
    }

    pub fn fetcher(&self) -> &RangeFetcher {
        &self.fetcher
    }

    /// Checks a plaintext password.
    ///
    /// An empty password is reported as not breached without hashing it or
    /// touching the network.
    pub fn check(&self, password: &str) -> Result<CheckResult, Error> {
        if password.is_empty() {
            return Ok(CheckResult::NOT_FOUND);
        }
        self.lookup(&PasswordHash::from_secret(password))
    }

    /// Checks a hex SHA-1 hash. Surrounding whitespace and case are ignored.
    ///
    /// Returns [`Error::Format`] before any I/O if the hash isn't 40 hex characters.
    pub fn check_hash(&self, hash: &str) -> Result<CheckResult, Error> {
        self.lookup(&PasswordHash::parse(hash)?)
    }

    pub fn lookup(&self, hash: &PasswordHash) -> Result<CheckResult, Error> {
        let (prefix, suffix) = hash.split();
        let body = self.fetcher.fetch_range(prefix)?;
        let result = CheckResult::from_count(find_suffix(&body, suffix));
        debug!(prefix, breached = result.breached, "range lookup complete");
        Ok(result)
    }
}

#[cfg(feature = "tokio")]
impl BreachClient {
    /// Async [`check`](Self::check): runs the blocking lookup on tokio's blocking pool.
    pub async fn check_async(&self, password: &str) -> Result<CheckResult, Error> {
        if password.is_empty() {
            return Ok(CheckResult::NOT_FOUND);
        }
        self.lookup_async(PasswordHash::from_secret(password)).await
    }

    /// Async [`check_hash`](Self::check_hash).
    pub async fn check_hash_async(&self, hash: &str) -> Result<CheckResult, Error> {
        self.lookup_async(PasswordHash::parse(hash)?).await
    }

    async fn lookup_async(&self, hash: PasswordHash) -> Result<CheckResult, Error> {
        let client = self.clone();
        tokio::task::spawn_blocking(move || client.lookup(&hash)).await?
    }
}

/// Builder for [`BreachClient`].
#[derive(Default)]
pub struct BreachClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn RangeTransport>>,
    cache: Option<Arc<dyn RangeCache>>,
}

impl BreachClientBuilder {
    /// HTTP settings. Ignored when a custom transport is supplied.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn transport(mut self, transport: Arc<dyn RangeTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn cache(mut self, cache: Arc<dyn RangeCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Result<BreachClient, Error> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(self.config)?),
        };
        Ok(BreachClient { fetcher: RangeFetcher::new(transport, self.cache) })
    }
}
