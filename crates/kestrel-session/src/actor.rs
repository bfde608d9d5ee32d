//! Serialized access to the session owner
//!
//! One owner task holds the [`SessionStore`] by value and drains a single
//! bounded queue of requests, applying them strictly one at a time in arrival
//! order. [`SessionHandle`] is the only way in.
//!
//! ## Ordering
//!
//! - Synchronous requests (`get_session`, `get_counter`, `signature_scheme`,
//!   `compute_signature`, `verify_signature`, `shutdown`) carry a oneshot
//!   reply. The reply reflects every request enqueued before it and none
//!   enqueued after.
//! - `increase_counter` carries no reply. Its future completes once the
//!   message is in the queue, before the owner has applied it.
//! - All handle clones feed the same FIFO queue. Once a caller's
//!   `increase_counter().await` has returned, every later request from that
//!   caller is queued behind the increment and observes it. Callers on
//!   independent tasks get no relative ordering unless they synchronise
//!   among themselves.
//!
//! ## Termination
//!
//! The owner stops on an explicit shutdown, when every handle is dropped, or
//! on a fatal signing error (an algorithm the digest primitive cannot
//! compute). The state, counter included, is dropped with it; later requests
//! fail with [`SessionError::Terminated`].

use crate::config::SessionConfig;
use crate::store::SessionStore;
use kestrel_core::{MessageParts, Result, SessionError};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

/// Lifecycle phase of the process session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No session has been initialized
    Uninitialized,
    /// The owner is serving requests
    Ready,
    /// The owner has stopped; there is no way back
    Terminated,
}

/// Owned copy of the four message sections, sent to the owner
#[derive(Debug, Clone, PartialEq, Eq)]
struct OwnedParts {
    header: String,
    parent_header: String,
    metadata: String,
    content: String,
}

impl OwnedParts {
    fn new(header: &str, parent_header: &str, metadata: &str, content: &str) -> Self {
        Self {
            header: header.to_string(),
            parent_header: parent_header.to_string(),
            metadata: metadata.to_string(),
            content: content.to_string(),
        }
    }

    fn borrowed(&self) -> MessageParts<'_> {
        MessageParts::new(&self.header, &self.parent_header, &self.metadata, &self.content)
    }
}

/// Requests understood by the session owner
#[derive(Debug)]
enum SessionRequest {
    GetSession {
        reply: oneshot::Sender<String>,
    },
    GetCounter {
        reply: oneshot::Sender<u64>,
    },
    GetScheme {
        reply: oneshot::Sender<String>,
    },
    IncreaseCounter,
    ComputeSignature {
        parts: OwnedParts,
        reply: oneshot::Sender<Result<String>>,
    },
    VerifySignature {
        signature: String,
        parts: OwnedParts,
        reply: oneshot::Sender<Result<()>>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Handle to the session owner
///
/// Cheap to clone; every clone talks to the same owner through the same
/// queue.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    requests: mpsc::Sender<SessionRequest>,
}

impl SessionHandle {
    /// Start the owner task for `store`
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(store: SessionStore, config: &SessionConfig) -> Self {
        let (requests, request_rx) = mpsc::channel(config.request_buffer.max(1));
        tokio::spawn(run_owner(store, request_rx));
        Self { requests }
    }

    /// Session identifier
    pub async fn get_session(&self) -> Result<String> {
        self.call(|reply| SessionRequest::GetSession { reply }).await
    }

    /// Execution count after every request queued before this one
    pub async fn get_counter(&self) -> Result<u64> {
        self.call(|reply| SessionRequest::GetCounter { reply }).await
    }

    /// Canonical signing scheme, empty when signing is disabled
    pub async fn signature_scheme(&self) -> Result<String> {
        self.call(|reply| SessionRequest::GetScheme { reply }).await
    }

    /// Queue an increment of the execution count
    ///
    /// Returns as soon as the request is enqueued; the owner applies it in
    /// queue order. Fails only if the owner has stopped.
    pub async fn increase_counter(&self) -> Result<()> {
        self.requests
            .send(SessionRequest::IncreaseCounter)
            .await
            .map_err(|_| SessionError::Terminated)
    }

    /// Signature over header, parent header, metadata and content
    ///
    /// Empty when signing is disabled. An
    /// [`SessionError::UnsupportedAlgorithm`] is returned to this caller and
    /// stops the owner.
    pub async fn compute_signature(
        &self,
        header: &str,
        parent_header: &str,
        metadata: &str,
        content: &str,
    ) -> Result<String> {
        let parts = OwnedParts::new(header, parent_header, metadata, content);
        self.call(|reply| SessionRequest::ComputeSignature { parts, reply })
            .await?
    }

    /// Check the signature of a received message
    pub async fn verify_signature(
        &self,
        signature: &str,
        header: &str,
        parent_header: &str,
        metadata: &str,
        content: &str,
    ) -> Result<()> {
        let signature = signature.to_string();
        let parts = OwnedParts::new(header, parent_header, metadata, content);
        self.call(|reply| SessionRequest::VerifySignature {
            signature,
            parts,
            reply,
        })
        .await?
    }

    /// Stop the owner after every request queued before this one
    ///
    /// Requests still queued behind the shutdown fail with
    /// [`SessionError::Terminated`]. Stopping a stopped session is a no-op.
    pub async fn shutdown(&self) -> Result<()> {
        match self.call(|reply| SessionRequest::Shutdown { reply }).await {
            Ok(()) | Err(SessionError::Terminated) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> SessionPhase {
        if self.requests.is_closed() {
            SessionPhase::Terminated
        } else {
            SessionPhase::Ready
        }
    }

    /// Wait until the owner has stopped
    pub async fn terminated(&self) {
        self.requests.closed().await;
    }

    async fn call<T>(&self, request: impl FnOnce(oneshot::Sender<T>) -> SessionRequest) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(request(reply))
            .await
            .map_err(|_| SessionError::Terminated)?;
        response.await.map_err(|_| SessionError::Terminated)
    }
}

/// Owner loop: apply requests one at a time until told to stop
async fn run_owner(mut store: SessionStore, mut requests: mpsc::Receiver<SessionRequest>) {
    let session_id = store.get_session().to_string();
    info!(session_id = %session_id, "Session owner started");

    let mut shutdown_ack = None;
    while let Some(request) = requests.recv().await {
        match request {
            SessionRequest::GetSession { reply } => {
                let _ = reply.send(store.get_session().to_string());
            }
            SessionRequest::GetCounter { reply } => {
                let _ = reply.send(store.get_counter());
            }
            SessionRequest::GetScheme { reply } => {
                let _ = reply.send(store.state().signature_data().scheme());
            }
            SessionRequest::IncreaseCounter => {
                let counter = store.increase_counter();
                debug!(session_id = %session_id, counter, "Execution counter advanced");
            }
            SessionRequest::ComputeSignature { parts, reply } => {
                let result = store.compute_signature(&parts.borrowed());
                let fatal = stop_on_fatal(&session_id, &result, &mut requests);
                let _ = reply.send(result);
                if fatal {
                    break;
                }
            }
            SessionRequest::VerifySignature {
                signature,
                parts,
                reply,
            } => {
                let result = store.verify_signature(&signature, &parts.borrowed());
                if let Err(SessionError::SignatureMismatch) = &result {
                    debug!(session_id = %session_id, "Rejected message signature");
                }
                let fatal = stop_on_fatal(&session_id, &result, &mut requests);
                let _ = reply.send(result);
                if fatal {
                    break;
                }
            }
            SessionRequest::Shutdown { reply } => {
                requests.close();
                shutdown_ack = Some(reply);
                break;
            }
        }
    }

    let counter = store.get_counter();
    drop(store);
    drop(requests);
    info!(session_id = %session_id, counter, "Session owner stopped");

    if let Some(reply) = shutdown_ack {
        let _ = reply.send(());
    }
}

/// Close the queue if `result` carries a fatal signing error
///
/// The queue is closed before the caller is answered so the handle already
/// reports `Terminated` when the error arrives.
fn stop_on_fatal<T>(
    session_id: &str,
    result: &Result<T>,
    requests: &mut mpsc::Receiver<SessionRequest>,
) -> bool {
    match result {
        Err(e) if e.is_fatal() => {
            error!(session_id = %session_id, error = %e, "Fatal signing failure; stopping session");
            requests.close();
            true
        }
        _ => false,
    }
}
