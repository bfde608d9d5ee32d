//! Kernel connection file model
//!
//! A front-end launches the kernel with a JSON connection file describing the
//! transport endpoints and the signing scheme. Only `signature_scheme` and
//! `key` matter to the session; the endpoint fields are carried so a whole
//! file round-trips.

use crate::errors::{Result, SessionError};
use crate::scheme::{SignatureConfig, SigningKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

fn default_transport() -> String {
    "tcp".to_string()
}

fn default_ip() -> String {
    "127.0.0.1".to_string()
}

/// Connection info handed to a kernel at startup
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    /// Signing scheme, e.g. `hmac-sha256`; empty disables signing
    pub signature_scheme: String,
    /// Shared signing key, wiped when the connection info is dropped
    pub key: SigningKey,
    /// Transport name
    #[serde(default = "default_transport")]
    pub transport: String,
    /// Bind address
    #[serde(default = "default_ip")]
    pub ip: String,
    /// Shell channel port
    #[serde(default)]
    pub shell_port: u16,
    /// IOPub channel port
    #[serde(default)]
    pub iopub_port: u16,
    /// Stdin channel port
    #[serde(default)]
    pub stdin_port: u16,
    /// Control channel port
    #[serde(default)]
    pub control_port: u16,
    /// Heartbeat port
    #[serde(default)]
    pub hb_port: u16,
    /// Kernel spec name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernel_name: Option<String>,
}

impl ConnectionInfo {
    /// Connection info carrying only the signing fields
    pub fn new(signature_scheme: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            signature_scheme: signature_scheme.into(),
            key: SigningKey::new(key),
            transport: default_transport(),
            ip: default_ip(),
            shell_port: 0,
            iopub_port: 0,
            stdin_port: 0,
            control_port: 0,
            hb_port: 0,
            kernel_name: None,
        }
    }

    /// Parse connection info from a JSON mapping
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| SessionError::invalid_connection_info(e.to_string()))
    }

    /// Parse connection info from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SessionError::invalid_connection_info(e.to_string()))
    }

    /// Load connection info from a connection file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SessionError::invalid_connection_info(format!(
                "Failed to read connection file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&content)
    }

    /// Resolve the signing configuration described by this connection
    pub fn signature_config(&self) -> Result<SignatureConfig> {
        SignatureConfig::from_scheme(&self.signature_scheme, self.key.clone())
    }
}

impl fmt::Debug for ConnectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionInfo")
            .field("signature_scheme", &self.signature_scheme)
            .field("key", &self.key)
            .field("transport", &self.transport)
            .field("ip", &self.ip)
            .field("shell_port", &self.shell_port)
            .field("iopub_port", &self.iopub_port)
            .field("stdin_port", &self.stdin_port)
            .field("control_port", &self.control_port)
            .field("hb_port", &self.hb_port)
            .field("kernel_name", &self.kernel_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_from_value_minimal() {
        let info = ConnectionInfo::from_value(json!({
            "signature_scheme": "hmac-sha256",
            "key": "abc",
        }))
        .unwrap();

        assert_eq!(info, ConnectionInfo::new("hmac-sha256", "abc"));
        assert_eq!(info.key, SigningKey::new("abc"));
        assert_eq!(info.transport, "tcp");
        assert_eq!(
            info.signature_config().unwrap(),
            SignatureConfig::hmac("sha256", "abc")
        );
    }

    #[test]
    fn test_missing_key_is_rejected() {
        assert_matches!(
            ConnectionInfo::from_value(json!({ "signature_scheme": "hmac-sha256" })),
            Err(SessionError::InvalidConnectionInfo { .. })
        );
        assert_matches!(
            ConnectionInfo::from_value(json!({ "signature_scheme": 7, "key": "k" })),
            Err(SessionError::InvalidConnectionInfo { .. })
        );
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "shell_port": 53794,
                "iopub_port": 53795,
                "stdin_port": 53796,
                "control_port": 53797,
                "hb_port": 53798,
                "ip": "127.0.0.1",
                "key": "a0436f6c-1916-498b-8eb9-e81ab9368e84",
                "transport": "tcp",
                "signature_scheme": "hmac-sha256",
                "kernel_name": "kestrel",
                "extra": true
            }}"#
        )
        .unwrap();

        let info = ConnectionInfo::from_file(file.path()).unwrap();
        assert_eq!(info.shell_port, 53794);
        assert_eq!(info.hb_port, 53798);
        assert_eq!(info.kernel_name.as_deref(), Some("kestrel"));
        assert!(info.signature_config().unwrap().is_enabled());
    }

    #[test]
    fn test_unreadable_file() {
        assert_matches!(
            ConnectionInfo::from_file(Path::new("/nonexistent/kernel.json")),
            Err(SessionError::InvalidConnectionInfo { message }) if message.contains("Failed to read")
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", ConnectionInfo::new("hmac-sha256", "hunter2"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("SigningKey(<redacted>)"));
    }

    #[test]
    fn test_key_round_trips_as_string() {
        let info = ConnectionInfo::new("hmac-sha256", "hunter2");
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["key"], "hunter2");
        assert_eq!(ConnectionInfo::from_value(value).unwrap(), info);
    }
}
