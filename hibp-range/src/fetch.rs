//! Fetching range bodies, through the cache when one is configured.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::RangeCache;
use crate::config::ClientConfig;
use crate::error::Error;

/// Retrieves the raw range body for a prefix from wherever the breach corpus lives.
///
/// One call is one attempt; implementations must not retry.
pub trait RangeTransport: Send + Sync {
    fn fetch(&self, prefix: &str) -> Result<String, Error>;
}

/// Blocking HTTP transport for `GET {base_url}/range/{prefix}`.
///
/// Inside a tokio runtime the underlying blocking client can't be built, so there
/// it is built on the first fetch instead, which the async API runs on tokio's
/// blocking pool.
#[derive(Debug)]
pub struct HttpTransport {
    client: Mutex<Option<reqwest::blocking::Client>>,
    config: ClientConfig,
}

impl HttpTransport {
    /// Builds the underlying HTTP client with the configured timeout and `User-Agent`.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let transport = Self { client: Mutex::new(None), config };
        if !inside_async_runtime() {
            transport.client()?;
        }
        Ok(transport)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn client(&self) -> Result<reqwest::blocking::Client, Error> {
        let mut slot = self.client.lock();
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        let mut builder = reqwest::blocking::Client::builder()
            .timeout(self.config.timeout)
            .user_agent(self.config.user_agent.as_str());
        if !self.config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(Error::Client)?;
        *slot = Some(client.clone());
        Ok(client)
    }
}

#[cfg(feature = "tokio")]
fn inside_async_runtime() -> bool {
    tokio::runtime::Handle::try_current().is_ok()
}

#[cfg(not(feature = "tokio"))]
fn inside_async_runtime() -> bool {
    false
}

impl RangeTransport for HttpTransport {
    fn fetch(&self, prefix: &str) -> Result<String, Error> {
        let url = self.config.range_url(prefix);

        let response = self
            .client()?
            .get(&url)
            .send()
            .map_err(|e| Error::Network { prefix: prefix.to_owned(), source: Box::new(e) })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Remote { prefix: prefix.to_owned(), status: status.as_u16() });
        }

        response
            .text()
            .map_err(|e| Error::Network { prefix: prefix.to_owned(), source: Box::new(e) })
    }
}

/// Resolves prefixes to range bodies: cache first, then a single transport call.
#[derive(Clone)]
pub struct RangeFetcher {
    transport: Arc<dyn RangeTransport>,
    cache: Option<Arc<dyn RangeCache>>,
}

impl RangeFetcher {
    pub fn new(transport: Arc<dyn RangeTransport>, cache: Option<Arc<dyn RangeCache>>) -> Self {
        Self { transport, cache }
    }

    pub fn cache(&self) -> Option<&Arc<dyn RangeCache>> {
        self.cache.as_ref()
    }

    /// Returns the range body for `prefix`.
    ///
    /// A cache hit makes no transport call. On a miss the body is fetched and stored
    /// with the cache's default TTL; failures are returned as-is and nothing is cached.
    pub fn fetch_range(&self, prefix: &str) -> Result<String, Error> {
        if let Some(cache) = &self.cache {
            if let Some(body) = cache.get(prefix) {
                debug!(prefix, "range cache hit");
                return Ok(body);
            }
        }

        debug!(prefix, "fetching range");
        let body = self.transport.fetch(prefix).inspect_err(|err| {
            debug!(prefix, error = %err, "range fetch failed");
        })?;

        if let Some(cache) = &self.cache {
            cache.set(prefix, body.clone(), Duration::ZERO);
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::cache::{MemoryCache, MemoryCacheConfig};

    struct CountingTransport {
        calls: AtomicUsize,
        status: Option<u16>,
    }

    impl CountingTransport {
        fn ok() -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), status: None })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), status: Some(status) })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl RangeTransport for CountingTransport {
        fn fetch(&self, prefix: &str) -> Result<String, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.status {
                Some(status) => Err(Error::Remote { prefix: prefix.to_owned(), status }),
                None => Ok(format!("{prefix}-body")),
            }
        }
    }

    fn memory_cache() -> Arc<MemoryCache> {
        Arc::new(MemoryCache::new(MemoryCacheConfig::default()))
    }

    #[test]
    fn test_cache_hit_skips_transport() {
        let transport = CountingTransport::ok();
        let fetcher = RangeFetcher::new(transport.clone(), Some(memory_cache()));

        assert_eq!(fetcher.fetch_range("5baa6").unwrap(), "5baa6-body");
        assert_eq!(fetcher.fetch_range("5baa6").unwrap(), "5baa6-body");
        assert_eq!(transport.calls(), 1);

        fetcher.fetch_range("cbfda").unwrap();
        assert_eq!(transport.calls(), 2);
    }

    #[test]
    fn test_prefilled_cache_makes_zero_calls() {
        let transport = CountingTransport::ok();
        let cache = memory_cache();
        cache.set("5baa6", "cached".into(), Duration::ZERO);
        let fetcher = RangeFetcher::new(transport.clone(), Some(cache));

        assert_eq!(fetcher.fetch_range("5baa6").unwrap(), "cached");
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn test_without_cache_every_call_fetches() {
        let transport = CountingTransport::ok();
        let fetcher = RangeFetcher::new(transport.clone(), None);

        fetcher.fetch_range("5baa6").unwrap();
        fetcher.fetch_range("5baa6").unwrap();
        assert_eq!(transport.calls(), 2);
        assert!(fetcher.cache().is_none());
    }

    #[test]
    fn test_failures_are_not_cached() {
        let transport = CountingTransport::failing(503);
        let cache = memory_cache();
        let fetcher = RangeFetcher::new(transport.clone(), Some(cache.clone()));

        let err = fetcher.fetch_range("5baa6").unwrap_err();
        assert!(matches!(err, Error::Remote { status: 503, .. }));
        assert!(fetcher.fetch_range("5baa6").is_err());
        assert_eq!(transport.calls(), 2, "no retries, and no cached failure");
        assert!(cache.is_empty());
    }

    #[test]
    fn test_http_transport_builds_with_defaults() {
        let transport = HttpTransport::new(ClientConfig::default()).unwrap();
        assert_eq!(transport.config().timeout, Duration::from_secs(10));
        assert!(transport.client.lock().is_some());
    }

    #[test]
    fn test_invalid_user_agent_fails_at_build() {
        let config = ClientConfig { user_agent: "bad\nagent".into(), ..ClientConfig::default() };
        assert!(matches!(HttpTransport::new(config), Err(Error::Client(_))));
    }

    #[cfg(feature = "tokio")]
    #[tokio::test]
    async fn test_http_transport_defers_client_inside_runtime() {
        let transport = HttpTransport::new(ClientConfig::default()).unwrap();
        assert!(transport.client.lock().is_none());
    }
}
