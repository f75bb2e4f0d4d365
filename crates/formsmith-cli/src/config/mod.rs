//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── client: ReqwestConfig    # API URL, timeout, user agent
//! ├── session: SessionConfig   # Session token file
//! └── command: Command         # What to do
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.

mod session;

use std::process;

use anyhow::Context;
use clap::Parser;
use formsmith_reqwest::ReqwestConfig;
pub use session::SessionConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::command::Command;
use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "formsmith")]
#[command(about = "Browse, search and build form templates")]
#[command(version)]
pub struct Cli {
    /// HTTP client configuration.
    #[clap(flatten)]
    pub client: ReqwestConfig,

    /// Session token storage.
    #[clap(flatten)]
    pub session: SessionConfig,

    /// Log at info level unless `RUST_LOG` says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing on stderr, so command output stays clean.
    pub fn init_tracing(&self) {
        let default_level = if self.verbose { "info" } else { "warn" };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.client
            .validate()
            .context("invalid client configuration")?;
        self.session
            .validate()
            .context("invalid session configuration")?;
        Ok(())
    }

    /// Logs configuration at debug level (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            api_url = %self.client.api_url,
            http_timeout_secs = ?self.client.http_timeout,
            user_agent = %self.client.effective_user_agent(),
            session_file = ?self.session.session_file,
            command = self.command.name(),
            "Client configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_are_flattened() {
        let cli = Cli::try_parse_from([
            "formsmith",
            "--api-url",
            "http://localhost:5000/api",
            "--http-timeout",
            "15",
            "--session-file",
            "/tmp/session",
            "home",
        ])
        .unwrap();

        assert_eq!(cli.client.api_url, "http://localhost:5000/api");
        assert_eq!(cli.client.http_timeout, Some(15));
        assert!(cli.validate().is_ok());
        assert!(matches!(cli.command, Command::Home));
    }

    #[test]
    fn test_zero_timeout_fails_validation() {
        let cli = Cli::try_parse_from(["formsmith", "--http-timeout", "0", "logout"]).unwrap();
        assert!(cli.validate().is_err());
    }
}
