//! Breached password lookups against the Have I Been Pwned range API.
//!
//! Lookups use k-anonymity: the password is hashed with SHA-1 locally, only the
//! first 5 hex characters of the hash are sent (`GET /range/{prefix}`), and the
//! remaining 35 characters are matched locally against the returned
//! `SUFFIX:COUNT` lines. Each prefix is shared by hundreds of hashes, so the
//! remote side cannot tell which password was checked.
//!
//! Range bodies can be cached in-process by prefix through any [`RangeCache`];
//! [`MemoryCache`] is a bounded, expiring, first-in-first-out implementation.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use hibp_range::{BreachClient, MemoryCache, MemoryCacheConfig};
//!
//! let client = BreachClient::builder()
//!     .cache(Arc::new(MemoryCache::new(MemoryCacheConfig::default())))
//!     .build()?;
//!
//! let result = client.check("password123")?;
//! if result.breached {
//!     println!("seen {} times in breaches", result.count);
//! }
//! # Ok::<(), hibp_range::Error>(())
//! ```
//!
//! # Errors
//!
//! Every failure is returned to the caller, never retried or swallowed. A caller
//! folding breach status into a larger decision (for example a password strength
//! verdict) should usually treat [`Error::is_lookup_failure`] as "no information"
//! and carry on as if the password had not been found.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod hash;
pub mod parser;

pub use cache::{CacheStats, MemoryCache, MemoryCacheConfig, RangeCache};
pub use client::{BreachClient, BreachClientBuilder, CheckResult};
pub use config::ClientConfig;
pub use error::Error;
pub use fetch::{HttpTransport, RangeFetcher, RangeTransport};
pub use hash::{HASH_LEN, PREFIX_LEN, PasswordHash, SUFFIX_LEN, sha1_hex, split_hash};
pub use parser::{RangeEntry, find_suffix, parse_line};
