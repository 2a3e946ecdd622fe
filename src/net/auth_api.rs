//! Sign-in against the quiz API.
//!
//! The server issues the token; this side only forwards the credentials it
//! was given and hands the answer to the session controller.

#[cfg(test)]
#[path = "auth_api_test.rs"]
mod auth_api_test;

use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use super::types::ApiError;
use crate::error::ErrorCode;
use crate::session::{SessionController, SessionError, UserIdentity};

pub const LOGIN_ENDPOINT: &str = "/auth/login";

#[derive(Debug, thiserror::Error)]
pub enum SignInError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ErrorCode for SignInError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Api(e) => e.error_code(),
            Self::Session(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Api(e) => e.retryable(),
            Self::Session(e) => e.retryable(),
        }
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
    user: UserIdentity,
}

/// The server stores usernames trimmed and lower-cased.
fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// `POST /auth/login` and install the returned session.
///
/// # Errors
///
/// [`SignInError::Api`] when the server refuses (401 for bad credentials,
/// 403 for suspended or unverified accounts) or is unreachable;
/// [`SignInError::Session`] when the returned payload cannot be installed.
pub async fn sign_in(
    client: &ApiClient,
    controller: &SessionController,
    username: &str,
    password: &str,
) -> Result<UserIdentity, SignInError> {
    let username = normalize_username(username);
    let resp: LoginResponse = client
        .post_json(LOGIN_ENDPOINT, &LoginRequest { username: &username, password })
        .await?;
    controller.login(&resp.access_token, resp.user.clone())?;
    Ok(resp.user)
}
