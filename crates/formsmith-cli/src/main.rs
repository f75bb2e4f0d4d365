#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod command;
mod config;
mod render;

use std::{io, process};

use anyhow::Context;
use formsmith_reqwest::ReqwestClient;

use crate::command::CommandContext;
use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "formsmith_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "formsmith_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "formsmith_cli::config";
pub const TRACING_TARGET_COMMAND: &str = "formsmith_cli::command";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::debug!(
            target: TRACING_TARGET_SHUTDOWN,
            "command completed successfully"
        );
        process::exit(0);
    };

    let message = failure_message(&error);
    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %message,
            "command failed"
        );
    } else {
        eprintln!("Error: {message}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    cli.init_tracing();
    cli.log();
    cli.validate()?;

    let session = cli.session.open()?;
    let client = ReqwestClient::new(cli.client.clone(), session.clone())
        .context("failed to create HTTP client")?;
    let context = CommandContext::new(client.into_service(), session);

    let mut stdout = io::stdout();
    cli.command.execute(&context, &mut stdout).await
}

/// Renders an error with its whole context chain on one line.
fn failure_message(error: &anyhow::Error) -> String {
    format!("{error:#}")
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn test_failure_message_keeps_context_chain() {
        let error = anyhow!("connection refused").context("failed to create HTTP client");
        assert_eq!(
            failure_message(&error),
            "failed to create HTTP client: connection refused"
        );
    }
}
