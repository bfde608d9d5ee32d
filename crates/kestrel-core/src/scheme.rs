//! Signing scheme resolution
//!
//! The `signature_scheme` of a connection file is untrusted text. It is parsed
//! exactly once into a [`SignatureConfig`]; signing never looks at the string
//! again.
//!
//! Accepted shapes:
//! - `hmac-<algorithm>` with a non-empty algorithm → [`SignatureConfig::Hmac`]
//! - `""`, or an empty prefix before a single separator (`"-"`) →
//!   [`SignatureConfig::Disabled`]
//!
//! Anything else is [`SessionError::InvalidScheme`].

use crate::errors::{Result, SessionError};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Prefix naming the HMAC mechanism
pub const HMAC_PREFIX: &str = "hmac";

/// Separator between mechanism and digest algorithm
pub const SCHEME_SEPARATOR: char = '-';

/// Secret HMAC key, wiped on drop and never printed
///
/// Serializes as the bare key string.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct SigningKey(String);

impl SigningKey {
    /// Wrap a key string
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw key bytes for the MAC primitive
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Key length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the key is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// Resolved message signing configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureConfig {
    /// Messages are not authenticated; every signature is empty
    Disabled,
    /// Messages are authenticated with HMAC over the named digest
    Hmac {
        /// Digest algorithm name, e.g. `sha256`
        algorithm: String,
        /// Secret key
        key: SigningKey,
    },
}

impl SignatureConfig {
    /// Resolve a scheme string and key into a signing configuration
    ///
    /// The key is ignored when the scheme resolves to `Disabled`.
    pub fn parse(scheme: &str, key: &str) -> Result<Self> {
        Self::from_scheme(scheme, SigningKey::new(key))
    }

    /// Resolve a scheme string with an already wrapped key
    ///
    /// The key is dropped, and so wiped, when the scheme resolves to
    /// `Disabled` or is rejected.
    pub fn from_scheme(scheme: &str, key: SigningKey) -> Result<Self> {
        if scheme.is_empty() {
            return Ok(Self::Disabled);
        }

        match scheme.split_once(SCHEME_SEPARATOR) {
            Some((_, rest)) if rest.contains(SCHEME_SEPARATOR) => {
                Err(SessionError::invalid_scheme(scheme))
            }
            Some(("", _)) => Ok(Self::Disabled),
            Some((HMAC_PREFIX, algorithm)) if !algorithm.is_empty() => Ok(Self::Hmac {
                algorithm: algorithm.to_string(),
                key,
            }),
            _ => Err(SessionError::invalid_scheme(scheme)),
        }
    }

    /// Create an HMAC configuration directly
    pub fn hmac(algorithm: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Hmac {
            algorithm: algorithm.into(),
            key: SigningKey::new(key),
        }
    }

    /// Whether messages are signed
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Hmac { .. })
    }

    /// Digest algorithm, if signing is enabled
    pub fn algorithm(&self) -> Option<&str> {
        match self {
            Self::Disabled => None,
            Self::Hmac { algorithm, .. } => Some(algorithm),
        }
    }

    /// Canonical scheme string, empty when disabled
    pub fn scheme(&self) -> String {
        match self {
            Self::Disabled => String::new(),
            Self::Hmac { algorithm, .. } => format!("{HMAC_PREFIX}{SCHEME_SEPARATOR}{algorithm}"),
        }
    }
}
