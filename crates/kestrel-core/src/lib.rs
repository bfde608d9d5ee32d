//! Kestrel Core - Session Signing Foundation
//!
//! Pure building blocks for a kernel session: the signing scheme resolved from
//! connection info, the message signature engine, and the interfaces of the
//! collaborators a session depends on.
//!
//! # Components
//!
//! - [`SignatureConfig`]: tagged signing configuration, parsed once from the
//!   `signature_scheme` string of a connection file
//! - [`SignatureEngine`]: computes and verifies the HMAC over the four ordered
//!   message parts (header, parent header, metadata, content)
//! - [`DigestEffects`]: the keyed digest primitive, with [`HmacDigestHandler`]
//!   as the production implementation
//! - [`SessionHistory`]: source of the session identifier, with
//!   [`UuidSessionHistory`] as the default
//! - [`ConnectionInfo`]: serde model of a kernel connection file

#![forbid(unsafe_code)]

/// Connection file model
pub mod connection;

/// Unified error handling
pub mod errors;

/// Session identifier source
pub mod history;

/// Signing scheme parsing
pub mod scheme;

/// Message signature computation
pub mod signature;

pub use connection::ConnectionInfo;
pub use errors::{Result, SessionError};
pub use history::{SessionHistory, UuidSessionHistory};
pub use scheme::{SignatureConfig, SigningKey};
pub use signature::{DigestEffects, HmacDigestHandler, MessageParts, SignatureEngine};
