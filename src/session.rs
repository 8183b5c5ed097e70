//! Authenticated session lifecycle.
//!
//! A [`Session`] is created by logging in and destroyed by logging out. The
//! service tracks the login with a cookie, so the session wraps a `reqwest`
//! client with a cookie store; every request made through it carries the
//! login.
//!
//! # Lifecycle
//!
//! 1. [`Session::initialize`] posts the credentials to `login/`. Status 204
//!    yields a session; anything else is mapped to an [`ApiError`].
//! 2. Requests are issued through [`Session::http`].
//! 3. [`Session::terminate`] posts to `logout` and consumes the session.
//!    Logout is best-effort and never fails.

use crate::credentials::{Credentials, MaskedCredentials};
use crate::error::{ApiError, map_status};
use crate::utils::truncate_for_log;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Headers sent with the login and logout requests.
pub fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// One logged-in connection to the API.
#[derive(Debug)]
pub struct Session {
    http: Client,
    base_url: Url,
    login: MaskedCredentials,
}

impl Session {
    /// Log in and return the authenticated session.
    ///
    /// `http` must have a cookie store enabled for the login to stick.
    /// The credentials are consumed; only their masked form is kept.
    ///
    /// # Errors
    ///
    /// Any non-204 status is mapped with [`map_status`], so a bad password
    /// surfaces as [`ApiError::AuthenticationFailed`], an expired plan as
    /// [`ApiError::SubscriptionRequired`] and so on. Network failures are
    /// [`ApiError::Transport`].
    #[instrument(level = "info", skip_all, fields(base_url = %base_url, username = %credentials.username))]
    pub async fn initialize(
        http: Client,
        base_url: &Url,
        credentials: Credentials,
    ) -> Result<Self, ApiError> {
        let login_url = base_url.join("login/")?;
        let login = credentials.masked();

        debug!(url = %login_url, "Sending login request");
        let response = http
            .post(login_url.clone())
            .headers(json_headers())
            .json(&credentials)
            .send()
            .await?;
        drop(credentials);

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            info!("Logged in");
            return Ok(Self {
                http,
                base_url: base_url.clone(),
                login,
            });
        }

        let body = response.text().await.unwrap_or_default();
        warn!(
            status = status.as_u16(),
            body = %truncate_for_log(&body, 200),
            "Login rejected"
        );
        Err(map_status(status, login_url.as_str(), &login))
    }

    /// Log out. Failures are logged and swallowed.
    #[instrument(level = "info", skip_all, fields(base_url = %self.base_url))]
    pub async fn terminate(self) {
        let logout_url = match self.base_url.join("logout") {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "Could not build logout URL");
                return;
            }
        };

        match self
            .http
            .post(logout_url.clone())
            .headers(json_headers())
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                info!(status = response.status().as_u16(), "Logged out");
            }
            Ok(response) => {
                warn!(
                    status = response.status().as_u16(),
                    url = %logout_url,
                    "Logout returned a non-success status"
                );
            }
            Err(e) => warn!(error = %e, url = %logout_url, "Logout request failed"),
        }
    }

    /// The cookie-carrying client requests are sent through.
    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Masked credentials of the logged-in user, for error context.
    pub fn login(&self) -> &MaskedCredentials {
        &self.login
    }
}
