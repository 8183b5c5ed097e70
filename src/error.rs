//! Error taxonomy for the BBC Monitoring client.
//!
//! [`ApiError`] covers both API-level rejections (the *domain* errors that the
//! service signals through HTTP status codes) and the local failures around
//! them: reading credentials, loading configuration, talking to the network
//! and parsing article HTML.
//!
//! # Status mapping
//!
//! | Status | Variant |
//! |--------|---------|
//! | 401 | [`ApiError::AuthenticationFailed`] |
//! | 402 | [`ApiError::SubscriptionRequired`] |
//! | 403 | [`ApiError::TermsNotAccepted`] |
//! | 404 | [`ApiError::ResourceNotFound`] |
//! | 429 | [`ApiError::RateLimitExceeded`] |
//! | 500 | [`ApiError::ServerUnavailable`] |
//! | anything else | [`ApiError::UnexpectedStatus`] |

use crate::credentials::MaskedCredentials;
use reqwest::StatusCode;
use std::path::PathBuf;

/// Errors returned by every fallible operation in this crate.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested resource does not exist (HTTP 404).
    #[error("{url} can not be found")]
    ResourceNotFound { url: String },

    /// Login rejected (HTTP 401). Only the masked password is carried.
    #[error(
        "Unsuccessful authorization for username: {username} and password: {masked_password}"
    )]
    AuthenticationFailed {
        username: String,
        masked_password: String,
    },

    /// HTTP 402.
    #[error("The requested content is not available under your current subscription.")]
    SubscriptionRequired,

    /// HTTP 403: the account has not accepted the terms and conditions.
    #[error("BBC Monitoring Terms and Conditions not yet accepted.")]
    TermsNotAccepted,

    /// HTTP 429.
    #[error("The rate limit of 60 requests per second has been exceeded")]
    RateLimitExceeded,

    /// HTTP 500.
    #[error("BBC Monitoring can not currently be accessed.")]
    ServerUnavailable,

    /// A status code the client has no mapping for.
    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// Connection-level failure.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response body, or a result being printed, that is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An id that cannot be a single URL path segment (empty, `.` or `..`).
    #[error("Invalid product id: {id:?}")]
    InvalidProductId { id: String },

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("Could not read credentials from {}: {source}", .path.display())]
    CredentialsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse credentials in {}: {source}", .path.display())]
    CredentialsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The credentials file holds an empty array.
    #[error("No credentials found in {}", .path.display())]
    EmptyCredentials { path: PathBuf },

    #[error("Could not read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The article has no `bodyHtml`, or it is not a string.
    #[error("Article has no bodyHtml field")]
    MissingBodyHtml,

    /// `bodyHtml` does not contain the `<p class="text">` marker.
    #[error("Article body does not contain a text paragraph")]
    MissingBodyMarker,
}

/// Translate an HTTP status into a domain error.
///
/// `url` is the request URL and `login` the masked credentials of the
/// session; each variant keeps only the context listed in the module table.
pub fn map_status(status: StatusCode, url: &str, login: &MaskedCredentials) -> ApiError {
    match status.as_u16() {
        404 => ApiError::ResourceNotFound {
            url: url.to_string(),
        },
        401 => ApiError::AuthenticationFailed {
            username: login.username.clone(),
            masked_password: login.masked_password.clone(),
        },
        402 => ApiError::SubscriptionRequired,
        403 => ApiError::TermsNotAccepted,
        429 => ApiError::RateLimitExceeded,
        500 => ApiError::ServerUnavailable,
        other => ApiError::UnexpectedStatus {
            status: other,
            url: url.to_string(),
        },
    }
}

impl ApiError {
    /// `true` for errors the remote API signalled through a status code.
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            ApiError::ResourceNotFound { .. }
                | ApiError::AuthenticationFailed { .. }
                | ApiError::SubscriptionRequired
                | ApiError::TermsNotAccepted
                | ApiError::RateLimitExceeded
                | ApiError::ServerUnavailable
                | ApiError::UnexpectedStatus { .. }
        )
    }
}
