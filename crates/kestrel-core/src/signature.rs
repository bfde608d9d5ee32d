//! Message signature engine
//!
//! A protocol message is signed over its four serialized sections, always in
//! the order header, parent header, metadata, content, concatenated without a
//! separator. The engine keeps no state of its own: the output is a pure
//! function of the [`SignatureConfig`] and the parts.

use crate::errors::{Result, SessionError};
use crate::scheme::SignatureConfig;
use hmac::digest::core_api::BlockSizeUser;
use hmac::digest::Digest;
use hmac::{Mac, SimpleHmac};
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Digest algorithms understood by [`HmacDigestHandler`]
pub const SUPPORTED_ALGORITHMS: &[&str] = &["sha1", "sha224", "sha256", "sha384", "sha512"];

/// The four serialized sections of a protocol message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageParts<'a> {
    /// Serialized header
    pub header: &'a str,
    /// Serialized parent header
    pub parent_header: &'a str,
    /// Serialized metadata
    pub metadata: &'a str,
    /// Serialized content
    pub content: &'a str,
}

impl<'a> MessageParts<'a> {
    /// Bundle the four sections
    pub fn new(header: &'a str, parent_header: &'a str, metadata: &'a str, content: &'a str) -> Self {
        Self {
            header,
            parent_header,
            metadata,
            content,
        }
    }

    /// Sections in signing order
    pub fn ordered(&self) -> [&'a str; 4] {
        [self.header, self.parent_header, self.metadata, self.content]
    }
}

/// Keyed digest primitive
///
/// Implementations must fail with [`SessionError::UnsupportedAlgorithm`] for
/// any algorithm name they cannot compute.
pub trait DigestEffects: Send + Sync {
    /// Lowercase hex HMAC of the concatenated parts
    fn hmac_hex(&self, algorithm: &str, key: &[u8], parts: &[&str]) -> Result<String>;
}

/// Production digest handler over the RustCrypto hash crates
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacDigestHandler;

impl HmacDigestHandler {
    /// Create a new digest handler
    pub fn new() -> Self {
        Self
    }

    /// Whether `algorithm` can be computed by this handler
    pub fn supports(algorithm: &str) -> bool {
        SUPPORTED_ALGORITHMS.contains(&algorithm)
    }
}

impl DigestEffects for HmacDigestHandler {
    fn hmac_hex(&self, algorithm: &str, key: &[u8], parts: &[&str]) -> Result<String> {
        match algorithm {
            "sha1" => mac_hex::<Sha1>(key, parts),
            "sha224" => mac_hex::<Sha224>(key, parts),
            "sha256" => mac_hex::<Sha256>(key, parts),
            "sha384" => mac_hex::<Sha384>(key, parts),
            "sha512" => mac_hex::<Sha512>(key, parts),
            other => Err(SessionError::unsupported_algorithm(other)),
        }
    }
}

fn mac_hex<D>(key: &[u8], parts: &[&str]) -> Result<String>
where
    D: Digest + BlockSizeUser,
{
    let mut mac = <SimpleHmac<D> as Mac>::new_from_slice(key)
        .map_err(|e| SessionError::crypto(format!("HMAC key rejected: {e}")))?;
    for part in parts {
        mac.update(part.as_bytes());
    }
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Computes and verifies message signatures
#[derive(Clone)]
pub struct SignatureEngine {
    digest: Arc<dyn DigestEffects>,
}

impl SignatureEngine {
    /// Engine over the production digest handler
    pub fn new() -> Self {
        Self::with_digest(Arc::new(HmacDigestHandler::new()))
    }

    /// Engine over a custom digest primitive
    pub fn with_digest(digest: Arc<dyn DigestEffects>) -> Self {
        Self { digest }
    }

    /// Signature of `parts` under `config`
    ///
    /// Returns the empty string when signing is disabled.
    pub fn compute_signature(&self, config: &SignatureConfig, parts: &MessageParts<'_>) -> Result<String> {
        match config {
            SignatureConfig::Disabled => Ok(String::new()),
            SignatureConfig::Hmac { algorithm, key } => {
                self.digest
                    .hmac_hex(algorithm, key.as_bytes(), &parts.ordered())
            }
        }
    }

    /// Check a received signature against the one recomputed for `parts`
    ///
    /// Any signature is accepted when signing is disabled. The comparison is
    /// constant time.
    pub fn verify_signature(
        &self,
        config: &SignatureConfig,
        signature: &str,
        parts: &MessageParts<'_>,
    ) -> Result<()> {
        if !config.is_enabled() {
            return Ok(());
        }

        let expected = self.compute_signature(config, parts)?;
        if expected.len() != signature.len() {
            return Err(SessionError::SignatureMismatch);
        }
        if bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
            Ok(())
        } else {
            Err(SessionError::SignatureMismatch)
        }
    }
}

impl Default for SignatureEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SignatureEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureEngine")
            .field("digest", &"<Arc<dyn DigestEffects>>")
            .finish()
    }
}
