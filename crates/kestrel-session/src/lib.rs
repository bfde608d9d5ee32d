//! Kestrel Session - the single owner of kernel session state
//!
//! A kernel process holds one session: an identifier handed out by the history
//! store, an execution counter, and the signing configuration resolved from
//! its connection file. All of it lives inside one owner task and is reached
//! only through a [`SessionHandle`], which serializes every read, counter
//! increment and signature request through a single FIFO queue.
//!
//! ```text
//! ConnectionInfo ──init──▶ SessionStore ──spawn──▶ owner task
//!                                                    ▲
//!   SessionHandle (clone per caller) ──requests──────┘
//! ```
//!
//! Startup goes through [`init`] (or [`global::init_global`] for the
//! process-wide session).

#![forbid(unsafe_code)]

/// Serialized access to the session owner
pub mod actor;

/// Session runtime configuration
pub mod config;

/// Process-wide session slot
pub mod global;

/// Session state and the operations applied to it
pub mod store;

pub use actor::{SessionHandle, SessionPhase};
pub use config::SessionConfig;
pub use kestrel_core::{ConnectionInfo, Result, SessionError, SessionHistory, SignatureConfig};
pub use store::{SessionState, SessionStore};

use kestrel_core::SignatureEngine;
use tracing::{error, info, warn};

/// Initialize a session with the production signature engine
///
/// See [`init_with_engine`].
pub async fn init(
    info: &ConnectionInfo,
    history: &dyn SessionHistory,
    config: SessionConfig,
) -> Result<SessionHandle> {
    init_with_engine(info, history, config, SignatureEngine::new()).await
}

/// Initialize a session and start its owner task
///
/// The signing scheme is resolved before anything else; a rejected scheme is
/// reported and returned without consulting `history` or spawning an owner.
/// On success `history` has been asked for the session id exactly once and
/// the returned handle is `Ready` with a counter of zero.
pub async fn init_with_engine(
    info: &ConnectionInfo,
    history: &dyn SessionHistory,
    config: SessionConfig,
    engine: SignatureEngine,
) -> Result<SessionHandle> {
    config.validate()?;

    let signature_data = match info.signature_config() {
        Ok(signature_data) => signature_data,
        Err(e) => {
            error!(scheme = %info.signature_scheme, error = %e, "Rejected signature scheme");
            return Err(e);
        }
    };
    if !signature_data.is_enabled() {
        warn!(
            scheme = %info.signature_scheme,
            "Message signing disabled; session messages are unauthenticated"
        );
    }

    let session_id = history.get_session().await;
    info!(
        session_id = %session_id,
        scheme = %signature_data.scheme(),
        "Session ready"
    );

    let store = SessionStore::new(SessionState::new(session_id, signature_data), engine);
    Ok(SessionHandle::spawn(store, &config))
}
