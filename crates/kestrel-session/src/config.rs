//! Session runtime configuration
//!
//! Layered the usual way: defaults, then an optional TOML file, then
//! environment overrides, then validation.

use kestrel_core::{Result, SessionError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding [`SessionConfig::request_buffer`]
pub const REQUEST_BUFFER_ENV: &str = "KESTREL_REQUEST_BUFFER";

/// Configuration for the session owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Capacity of the owner's request queue
    ///
    /// Callers wait for a free slot when the queue is full; nothing waits on
    /// the owner having processed a request beyond that.
    pub request_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { request_buffer: 64 }
    }
}

impl SessionConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SessionError::invalid_config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        toml::from_str(&content).map_err(|e| SessionError::invalid_config(format!("Invalid TOML: {e}")))
    }

    /// Apply overrides from the process environment
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply overrides from `(name, value)` pairs
    pub fn merge_with_vars<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            if name == REQUEST_BUFFER_ENV {
                self.request_buffer = value.trim().parse().map_err(|e| {
                    SessionError::invalid_config(format!("{REQUEST_BUFFER_ENV}={value:?}: {e}"))
                })?;
            }
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.request_buffer == 0 {
            return Err(SessionError::invalid_config("request_buffer must be greater than zero"));
        }
        Ok(())
    }
}
