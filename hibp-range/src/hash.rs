//! SHA-1 hashing and k-anonymity prefix/suffix splitting.

use std::fmt;
use std::str::FromStr;

use sha1::{Digest, Sha1};

use crate::error::Error;

/// Length of a hex-encoded SHA-1 digest.
pub const HASH_LEN: usize = 40;

/// The length of the disclosed hash prefix (5 hex characters).
pub const PREFIX_LEN: usize = 5;

/// The length of the withheld hash suffix.
pub const SUFFIX_LEN: usize = HASH_LEN - PREFIX_LEN;

/// Hex lookup table for digest rendering.
pub const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

/// Computes the SHA-1 digest of `secret` as 40 lowercase hex characters.
pub fn sha1_hex(secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(secret.as_bytes());
    let digest: [u8; 20] = hasher.finalize().into();

    let mut out = String::with_capacity(HASH_LEN);
    for byte in digest {
        out.push(HEX_CHARS[(byte >> 4) as usize] as char);
        out.push(HEX_CHARS[(byte & 0x0f) as usize] as char);
    }
    out
}

/// Splits a 40 character hex hash into its prefix (5 chars) and suffix (35 chars).
///
/// Case is accepted as given; this does not normalize. Fails with
/// [`Error::Format`] if the input is not exactly 40 hex characters.
pub fn split_hash(hash: &str) -> Result<(&str, &str), Error> {
    validate(hash)?;
    // All bytes are ASCII past validation, so the split lands on a char boundary.
    Ok(hash.split_at(PREFIX_LEN))
}

fn validate(hash: &str) -> Result<(), Error> {
    if hash.len() != HASH_LEN {
        return Err(Error::Format {
            input_len: hash.len(),
            reason: "expected 40 hex characters",
        });
    }
    if !hash.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::Format {
            input_len: hash.len(),
            reason: "contains a non-hex character",
        });
    }
    Ok(())
}

/// A validated, lowercase, hex-encoded SHA-1 password hash.
///
/// `Debug` only shows the prefix; the suffix is the part that must stay local.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hashes a plaintext secret.
    pub fn from_secret(secret: &str) -> Self {
        Self(sha1_hex(secret))
    }

    /// Parses a hex hash, trimming surrounding whitespace and lowercasing it first.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let normalized = input.trim().to_ascii_lowercase();
        validate(&normalized)?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The disclosed part, sent to the range API.
    pub fn prefix(&self) -> &str {
        &self.0[..PREFIX_LEN]
    }

    /// The withheld part, only ever compared locally.
    pub fn suffix(&self) -> &str {
        &self.0[PREFIX_LEN..]
    }

    pub fn split(&self) -> (&str, &str) {
        self.0.split_at(PREFIX_LEN)
    }
}

impl FromStr for PasswordHash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PasswordHash({}…)", self.prefix())
    }
}
