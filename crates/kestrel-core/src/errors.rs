//! Unified error type for Kestrel sessions
//!
//! Every failure a session can surface, from scheme parsing at startup to a
//! stopped owner task, is a variant of [`SessionError`].

use serde::{Deserialize, Serialize};

/// Unified error type for all session operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum SessionError {
    /// The `signature_scheme` string is neither `hmac-<algorithm>` nor a
    /// disabled scheme
    #[error("Invalid signature scheme: {scheme:?}")]
    InvalidScheme {
        /// The rejected scheme string
        scheme: String,
    },

    /// The digest primitive does not know the configured algorithm
    #[error("Unsupported digest algorithm: {algorithm}")]
    UnsupportedAlgorithm {
        /// The rejected algorithm name
        algorithm: String,
    },

    /// Connection info is missing a field or could not be read
    #[error("Invalid connection info: {message}")]
    InvalidConnectionInfo {
        /// Error message describing the problem
        message: String,
    },

    /// Session configuration failed to parse or validate
    #[error("Invalid session config: {message}")]
    InvalidConfig {
        /// Error message describing the problem
        message: String,
    },

    /// A message signature did not match the recomputed one
    #[error("Message signature mismatch")]
    SignatureMismatch,

    /// The MAC primitive rejected its input
    #[error("Crypto error: {message}")]
    Crypto {
        /// Error message describing the cryptographic failure
        message: String,
    },

    /// The session owner has stopped; its state is gone
    #[error("Session terminated")]
    Terminated,

    /// A process-wide session is already installed
    #[error("Session already initialized")]
    AlreadyInitialized,
}

impl SessionError {
    /// Create an invalid scheme error
    pub fn invalid_scheme(scheme: impl Into<String>) -> Self {
        Self::InvalidScheme {
            scheme: scheme.into(),
        }
    }

    /// Create an unsupported algorithm error
    pub fn unsupported_algorithm(algorithm: impl Into<String>) -> Self {
        Self::UnsupportedAlgorithm {
            algorithm: algorithm.into(),
        }
    }

    /// Create an invalid connection info error
    pub fn invalid_connection_info(message: impl Into<String>) -> Self {
        Self::InvalidConnectionInfo {
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a crypto error
    pub fn crypto(message: impl Into<String>) -> Self {
        Self::Crypto {
            message: message.into(),
        }
    }

    /// Whether the error must stop the session owner
    ///
    /// A session that cannot sign would emit unauthenticated messages.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::UnsupportedAlgorithm { .. } | Self::Crypto { .. })
    }
}

/// Standard result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
