/// Boxed error used by transports to report transport-level failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid SHA-1 hash ({input_len} chars): {reason}")]
    Format { input_len: usize, reason: &'static str },

    #[error("range request failed for prefix {prefix}: {source}")]
    Network {
        prefix: String,
        #[source]
        source: BoxError,
    },

    #[error("HTTP {status} for prefix {prefix}")]
    Remote { prefix: String, status: u16 },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[cfg(feature = "tokio")]
    #[error("lookup task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    /// Returns true for failures of the remote lookup itself (transport or status),
    /// as opposed to bad input or local setup.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, Error::Network { .. } | Error::Remote { .. })
    }
}
