//! Session context holding the bearer token.
//!
//! The token is read by the provider on every request and written by
//! login and logout. A [`Session`] is a cheap handle; clones share state.
//! When opened with a path, the token also survives process restarts.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::{ErrorKind, Result};

/// Tracing target for session changes.
pub const TRACING_TARGET: &str = "formsmith_core::session";

/// Opaque credential proving an authenticated session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wraps a raw token, rejecting empty or whitespace-only input.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into().trim().to_owned();
        if token.is_empty() {
            return Err(ErrorKind::InvalidInput.with_message("bearer token is empty"));
        }
        Ok(Self(token))
    }

    /// Returns the raw token.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

struct SessionInner {
    token: RwLock<Option<BearerToken>>,
    path: Option<PathBuf>,
}

/// Shared holder of the current bearer token.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("path", &self.inner.path)
            .finish()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl Session {
    fn with_parts(token: Option<BearerToken>, path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                token: RwLock::new(token),
                path,
            }),
        }
    }

    /// Creates a session that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::with_parts(None, None)
    }

    /// Opens a session persisted at `path`, loading any stored token.
    ///
    /// A missing or blank file means "logged out".
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let token = match fs::read_to_string(&path) {
            Ok(contents) => BearerToken::new(contents).ok(),
            Err(error) if error.kind() == io::ErrorKind::NotFound => None,
            Err(error) => {
                return Err(crate::Error::from(error)
                    .with_context(format!("reading session file {}", path.display())));
            }
        };

        tracing::debug!(
            target: TRACING_TARGET,
            path = %path.display(),
            authenticated = token.is_some(),
            "Opened session"
        );

        Ok(Self::with_parts(token, Some(path)))
    }

    /// Returns the current token, if any.
    pub fn get(&self) -> Option<BearerToken> {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a token is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Stores a new token, replacing any previous one.
    pub fn set(&self, token: BearerToken) -> Result<()> {
        if let Some(path) = &self.inner.path {
            write_token(path, &token)?;
        }

        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token);

        tracing::info!(target: TRACING_TARGET, "Session token stored");
        Ok(())
    }

    /// Forgets the token and removes it from durable storage.
    pub fn clear(&self) -> Result<()> {
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;

        if let Some(path) = &self.inner.path {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(error) if error.kind() == io::ErrorKind::NotFound => {}
                Err(error) => {
                    return Err(crate::Error::from(error)
                        .with_context(format!("removing session file {}", path.display())));
                }
            }
        }

        tracing::info!(target: TRACING_TARGET, "Session token cleared");
        Ok(())
    }

    /// Path of the backing file, for persisted sessions.
    pub fn path(&self) -> Option<&Path> {
        self.inner.path.as_deref()
    }
}

fn write_token(path: &Path, token: &BearerToken) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let with_path =
        |e: io::Error| crate::Error::from(e).with_context(format!("writing {}", path.display()));

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path).map_err(with_path)?;

    // The creation mode does not apply to a file that already exists.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(with_path)?;
    }

    file.write_all(token.expose().as_bytes()).map_err(with_path)?;
    Ok(())
}
