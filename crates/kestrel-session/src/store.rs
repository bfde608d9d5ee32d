//! Session state and the operations applied to it
//!
//! [`SessionStore`] is plain synchronous data. It is never shared: the owner
//! task in [`crate::actor`] holds it by value and applies requests to it one
//! at a time.

use kestrel_core::{MessageParts, Result, SignatureConfig, SignatureEngine};

/// State of the one session of a kernel process
///
/// `session_id` and `signature_data` are fixed at construction. The execution
/// count starts at zero and only moves up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    session_id: String,
    execution_count: u64,
    signature_data: SignatureConfig,
}

impl SessionState {
    /// Fresh state with a zero execution count
    pub fn new(session_id: impl Into<String>, signature_data: SignatureConfig) -> Self {
        Self {
            session_id: session_id.into(),
            execution_count: 0,
            signature_data,
        }
    }

    /// Session identifier
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Current execution count
    pub fn execution_count(&self) -> u64 {
        self.execution_count
    }

    /// Resolved signing configuration
    pub fn signature_data(&self) -> &SignatureConfig {
        &self.signature_data
    }
}

/// Session state paired with the engine that signs its messages
#[derive(Debug)]
pub struct SessionStore {
    state: SessionState,
    engine: SignatureEngine,
}

impl SessionStore {
    /// Create a store over initialized state
    pub fn new(state: SessionState, engine: SignatureEngine) -> Self {
        Self { state, engine }
    }

    /// Read-only view of the state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Session identifier
    pub fn get_session(&self) -> &str {
        self.state.session_id()
    }

    /// Current execution count
    pub fn get_counter(&self) -> u64 {
        self.state.execution_count
    }

    /// Advance the execution count by one, returning the new value
    pub fn increase_counter(&mut self) -> u64 {
        self.state.execution_count = self.state.execution_count.saturating_add(1);
        self.state.execution_count
    }

    /// Signature of a message under the session's signing configuration
    pub fn compute_signature(&self, parts: &MessageParts<'_>) -> Result<String> {
        self.engine
            .compute_signature(&self.state.signature_data, parts)
    }

    /// Check a received signature under the session's signing configuration
    pub fn verify_signature(&self, signature: &str, parts: &MessageParts<'_>) -> Result<()> {
        self.engine
            .verify_signature(&self.state.signature_data, signature, parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_core::SessionError;

    fn store(config: SignatureConfig) -> SessionStore {
        SessionStore::new(SessionState::new("session-1", config), SignatureEngine::new())
    }

    #[test]
    fn test_new_state_starts_at_zero() {
        let store = store(SignatureConfig::hmac("sha256", "abc"));
        assert_eq!(store.get_session(), "session-1");
        assert_eq!(store.get_counter(), 0);
        assert_eq!(
            store.state().signature_data(),
            &SignatureConfig::hmac("sha256", "abc")
        );
    }

    #[test]
    fn test_counter_is_monotonic() {
        let mut store = store(SignatureConfig::Disabled);
        let mut last = store.get_counter();
        for expected in 1..=5 {
            let next = store.increase_counter();
            assert_eq!(next, expected);
            assert!(next > last);
            last = next;
        }
        assert_eq!(store.state().execution_count(), 5);
    }

    #[test]
    fn test_counter_saturates() {
        let mut store = SessionStore::new(
            SessionState {
                session_id: "s".to_string(),
                execution_count: u64::MAX,
                signature_data: SignatureConfig::Disabled,
            },
            SignatureEngine::new(),
        );
        assert_eq!(store.increase_counter(), u64::MAX);
    }

    #[test]
    fn test_signing_uses_session_config() {
        let store = store(SignatureConfig::hmac("sha256", "abc"));
        let parts = MessageParts::new("h", "p", "m", "c");

        let signature = store.compute_signature(&parts).unwrap();
        assert_eq!(signature.len(), 64);
        assert!(store.verify_signature(&signature, &parts).is_ok());
        assert_eq!(
            store.verify_signature("deadbeef", &parts),
            Err(SessionError::SignatureMismatch)
        );
    }

    #[test]
    fn test_disabled_store_signs_empty() {
        let store = store(SignatureConfig::Disabled);
        let parts = MessageParts::new("h", "p", "m", "c");
        assert_eq!(store.compute_signature(&parts).unwrap(), "");
    }
}
