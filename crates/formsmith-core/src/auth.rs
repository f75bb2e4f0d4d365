//! Login and registration payloads.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::session::BearerToken;

/// Request body for `POST /users/login`.
#[must_use]
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Response body of a login.
///
/// The token is optional on purpose: a 2xx without one is treated as
/// "nothing happened" rather than as an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default, deserialize_with = "deserialize_token")]
    pub token: Option<BearerToken>,
}

fn deserialize_token<'de, D>(deserializer: D) -> Result<Option<BearerToken>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|token| BearerToken::new(token).ok()))
}

/// Request body for `POST /users/register`.
///
/// Only the email format is checked on the client.
#[must_use]
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct Registration {
    pub name: String,
    #[validate(email(message = "Please enter a valid email."))]
    pub email: String,
    pub password: String,
}

impl Registration {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}
