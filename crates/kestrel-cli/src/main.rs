//! Kestrel session CLI
//!
//! Signs and verifies protocol messages with the key and scheme of a kernel
//! connection file, going through a real session owner.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::Commands;

#[derive(Parser)]
#[command(name = "kestrel")]
#[command(about = "Kestrel - kernel session signing tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Kernel connection file
    #[arg(short = 'f', long, global = true, default_value = "kernel.json")]
    connection_file: PathBuf,

    /// Session config file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let session = commands::open_session(&cli.connection_file, cli.config.as_deref()).await?;
    let outcome = commands::execute(&cli.command, &session).await;
    session.shutdown().await?;

    println!("{}", outcome?);
    Ok(())
}
