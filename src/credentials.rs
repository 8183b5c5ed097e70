//! API credentials and their masked form.
//!
//! The credentials file is the JSON the BBC Monitoring account page hands
//! out: an array whose first element holds the login.
//!
//! ```json
//! [{ "username": "bob", "password": "secret" }]
//! ```
//!
//! [`Credentials`] are consumed by the login request. Afterwards only
//! [`MaskedCredentials`] survive, for error messages.

use crate::error::ApiError;
use crate::utils::mask_secret;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{debug, instrument};

/// Username and password, serialized as the login request body.
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Read the first entry of a credentials file.
    ///
    /// # Errors
    ///
    /// - [`ApiError::CredentialsRead`] if the file cannot be read
    /// - [`ApiError::CredentialsParse`] if it is not an array of logins
    /// - [`ApiError::EmptyCredentials`] if the array is empty
    #[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ApiError::CredentialsRead {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<Credentials> =
            serde_json::from_str(&raw).map_err(|source| ApiError::CredentialsParse {
                path: path.to_path_buf(),
                source,
            })?;
        let count = entries.len();
        let first = entries
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::EmptyCredentials {
                path: path.to_path_buf(),
            })?;
        debug!(entries = count, username = %first.username, "Loaded credentials");
        Ok(first)
    }

    /// The form kept around after login.
    pub fn masked(&self) -> MaskedCredentials {
        MaskedCredentials {
            username: self.username.clone(),
            masked_password: mask_secret(&self.password),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &mask_secret(&self.password))
            .finish()
    }
}

/// Username in plain text plus one asterisk per password character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedCredentials {
    pub username: String,
    pub masked_password: String,
}
