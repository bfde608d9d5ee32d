//! Session identifier source
//!
//! The identifier of a session comes from the kernel's history store. A
//! session asks for it exactly once, while it is being initialized.

use async_trait::async_trait;
use uuid::Uuid;

/// History collaborator that hands out the session identifier
#[async_trait]
pub trait SessionHistory: Send + Sync {
    /// Identifier of the current session
    async fn get_session(&self) -> String;
}

/// History source that mints a random v4 UUID per call
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSessionHistory;

impl UuidSessionHistory {
    /// Create a new UUID history source
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SessionHistory for UuidSessionHistory {
    async fn get_session(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_uuid_history_mints_distinct_ids() {
        let history = UuidSessionHistory::new();
        let first = history.get_session().await;
        let second = history.get_session().await;

        assert_ne!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());
    }
}
