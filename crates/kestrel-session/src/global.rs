//! Process-wide session slot
//!
//! A kernel process serves exactly one session. [`init_global`] installs it
//! once; any later attempt fails with [`SessionError::AlreadyInitialized`],
//! even after the installed session has terminated. A restart is a new
//! process.

use crate::actor::{SessionHandle, SessionPhase};
use crate::config::SessionConfig;
use kestrel_core::{ConnectionInfo, Result, SessionError, SessionHistory};
use tokio::sync::{Mutex, OnceCell};

static SESSION: OnceCell<SessionHandle> = OnceCell::const_new();

/// Held across check, init and install so only one caller ever runs `init`
static INSTALL: Mutex<()> = Mutex::const_new(());

/// Initialize and install the process session
///
/// Concurrent callers are serialized: the first runs `init` (and so the
/// history collaborator) once, every other caller gets
/// [`SessionError::AlreadyInitialized`] without touching `history`.
pub async fn init_global(
    info: &ConnectionInfo,
    history: &dyn SessionHistory,
    config: SessionConfig,
) -> Result<&'static SessionHandle> {
    let _install = INSTALL.lock().await;
    if SESSION.initialized() {
        return Err(SessionError::AlreadyInitialized);
    }

    let handle = crate::init(info, history, config).await?;
    SESSION
        .set(handle)
        .map_err(|_| SessionError::AlreadyInitialized)?;
    SESSION.get().ok_or(SessionError::AlreadyInitialized)
}

/// The installed process session, if any
pub fn global() -> Option<&'static SessionHandle> {
    SESSION.get()
}

/// Phase of the process session
pub fn phase() -> SessionPhase {
    global().map_or(SessionPhase::Uninitialized, SessionHandle::phase)
}
