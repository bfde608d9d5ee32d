//! Subcommands and their handlers

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use kestrel_core::{ConnectionInfo, UuidSessionHistory};
use kestrel_session::{SessionConfig, SessionHandle};
use std::path::Path;

#[derive(Subcommand)]
pub enum Commands {
    /// Show the signing scheme resolved from the connection file
    Scheme,

    /// Print the signature of a message
    Sign(MessageArgs),

    /// Check the signature of a message
    Verify {
        /// Signature to check (lowercase hex)
        #[arg(short, long)]
        signature: String,

        #[command(flatten)]
        message: MessageArgs,
    },
}

/// The four serialized sections of a message, in signing order
#[derive(Args, Debug)]
pub struct MessageArgs {
    /// Serialized header
    pub header: String,
    /// Serialized parent header
    pub parent_header: String,
    /// Serialized metadata
    pub metadata: String,
    /// Serialized content
    pub content: String,
}

/// Start a session from a connection file and optional TOML config
pub async fn open_session(connection_file: &Path, config_file: Option<&Path>) -> Result<SessionHandle> {
    let mut config = match config_file {
        Some(path) => SessionConfig::load_from_file(path)?,
        None => SessionConfig::default(),
    };
    config.merge_with_env()?;

    let info = ConnectionInfo::from_file(connection_file)?;
    tracing::debug!(
        path = %connection_file.display(),
        transport = %info.transport,
        request_buffer = config.request_buffer,
        "Loaded connection file"
    );
    let session = kestrel_session::init(&info, &UuidSessionHistory::new(), config)
        .await
        .with_context(|| format!("Failed to start session from {}", connection_file.display()))?;
    Ok(session)
}

/// Run a subcommand against `session`, returning what to print
pub async fn execute(command: &Commands, session: &SessionHandle) -> Result<String> {
    match command {
        Commands::Scheme => {
            let scheme = session.signature_scheme().await?;
            let session_id = session.get_session().await?;
            if scheme.is_empty() {
                Ok(format!("session {session_id}: signing disabled"))
            } else {
                Ok(format!("session {session_id}: {scheme}"))
            }
        }
        Commands::Sign(message) => {
            let signature = session
                .compute_signature(
                    &message.header,
                    &message.parent_header,
                    &message.metadata,
                    &message.content,
                )
                .await?;
            session.increase_counter().await?;
            Ok(signature)
        }
        Commands::Verify { signature, message } => {
            session
                .verify_signature(
                    signature,
                    &message.header,
                    &message.parent_header,
                    &message.metadata,
                    &message.content,
                )
                .await
                .context("Signature rejected")?;
            Ok("ok".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn connection_file(scheme: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"signature_scheme": "{scheme}", "key": "abc", "transport": "tcp"}}"#
        )
        .unwrap();
        file
    }

    fn message(content: &str) -> MessageArgs {
        MessageArgs {
            header: "h".to_string(),
            parent_header: "p".to_string(),
            metadata: "m".to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_then_verify() {
        let file = connection_file("hmac-sha256");
        let session = open_session(file.path(), None).await.unwrap();

        let signature = execute(&Commands::Sign(message("c")), &session).await.unwrap();
        assert_eq!(signature.len(), 64);
        assert_eq!(session.get_counter().await.unwrap(), 1);

        let verified = execute(
            &Commands::Verify {
                signature: signature.clone(),
                message: message("c"),
            },
            &session,
        )
        .await
        .unwrap();
        assert_eq!(verified, "ok");

        let rejected = execute(
            &Commands::Verify {
                signature,
                message: message("tampered"),
            },
            &session,
        )
        .await;
        assert!(rejected.is_err());
    }

    #[tokio::test]
    async fn test_scheme_reports_disabled() {
        let file = connection_file("");
        let session = open_session(file.path(), None).await.unwrap();

        let output = execute(&Commands::Scheme, &session).await.unwrap();
        assert!(output.ends_with("signing disabled"));
    }

    #[tokio::test]
    async fn test_scheme_reports_hmac_algorithm() {
        let file = connection_file("hmac-sha384");
        let session = open_session(file.path(), None).await.unwrap();

        let output = execute(&Commands::Scheme, &session).await.unwrap();
        assert!(output.ends_with(": hmac-sha384"));
    }

    #[tokio::test]
    async fn test_bad_scheme_fails_to_open() {
        let file = connection_file("sha256");
        assert!(open_session(file.path(), None).await.is_err());
    }

    #[tokio::test]
    async fn test_config_file_is_applied() {
        let file = connection_file("hmac-sha256");
        let mut config = tempfile::NamedTempFile::new().unwrap();
        writeln!(config, "request_buffer = 0").unwrap();

        let result = open_session(file.path(), Some(config.path())).await;
        assert!(result.is_err());
    }
}
