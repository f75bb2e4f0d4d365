//! Session storage configuration.

use std::path::PathBuf;

use anyhow::{Context, Result as AnyhowResult, anyhow};
use clap::Args;
use formsmith_core::Session;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Directory under `$HOME` holding the default session file.
const DEFAULT_SESSION_DIR: &str = ".formsmith";

/// Where the bearer token is kept between invocations.
///
/// # Environment Variables
///
/// - `FORMSMITH_SESSION_FILE` - Path of the session file
///   (default: `$HOME/.formsmith/session`)
#[derive(Debug, Clone, Default, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct SessionConfig {
    /// Path of the file storing the session token.
    #[arg(long = "session-file", env = "FORMSMITH_SESSION_FILE")]
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

impl SessionConfig {
    /// Resolves the session file path, falling back to the home directory.
    pub fn resolve_path(&self) -> AnyhowResult<PathBuf> {
        if let Some(path) = &self.session_file {
            return Ok(path.clone());
        }

        let home = std::env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .ok_or_else(|| anyhow!("HOME is not set; pass --session-file"))?;

        Ok(PathBuf::from(home).join(DEFAULT_SESSION_DIR).join("session"))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AnyhowResult<()> {
        if let Some(path) = &self.session_file
            && path.as_os_str().is_empty()
        {
            return Err(anyhow!("session file path must not be empty"));
        }
        Ok(())
    }

    /// Opens the persisted session.
    pub fn open(&self) -> AnyhowResult<Session> {
        let path = self.resolve_path()?;
        let session = Session::open(&path)
            .with_context(|| format!("failed to open session file {}", path.display()))?;

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            path = %path.display(),
            authenticated = session.is_authenticated(),
            "Session opened"
        );

        Ok(session)
    }
}
