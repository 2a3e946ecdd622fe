//! Session hooks: attach the credential going out, react to 401 coming in.
//!
//! Both hooks read session state at the moment they run. Neither keeps a
//! copy of the credential, so a logout triggered by one response applies to
//! every request prepared after it.

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use tracing::{debug, warn};

use super::client::{RequestHook, ResponseHook};
use super::types::{ApiError, ApiResponse, OutboundRequest, bearer_header};
use crate::nav::Navigator;
use crate::session::{Credential, SessionController, SessionState};
use crate::store::{SessionStore, TOKEN_KEY};

// =============================================================================
// CREDENTIAL INJECTOR
// =============================================================================

/// Sets `Authorization: Bearer <token>` on every outbound request.
pub struct CredentialInjector {
    state: SessionState,
    store: Arc<dyn SessionStore>,
}

impl CredentialInjector {
    pub fn new(state: SessionState, store: Arc<dyn SessionStore>) -> Self {
        Self { state, store }
    }

    /// Live credential, or the stored token while restore is still pending.
    /// Once restore has run, storage is never consulted: after a logout the
    /// store may still hold a token whose removal failed.
    fn current_credential(&self) -> Option<Credential> {
        if let Some(credential) = self.state.credential() {
            return Some(credential);
        }
        if self.state.is_restored() {
            return None;
        }
        match self.store.get(TOKEN_KEY) {
            Ok(raw) => raw.and_then(Credential::new),
            Err(e) => {
                warn!(error = %e, "stored token unreadable; sending request without it");
                None
            }
        }
    }
}

impl RequestHook for CredentialInjector {
    fn name(&self) -> &'static str {
        "credential-injector"
    }

    fn on_request(&self, request: &mut OutboundRequest) {
        let Some(credential) = self.current_credential() else {
            return;
        };
        match bearer_header(&credential) {
            Some(value) => {
                request.headers.insert(AUTHORIZATION, value);
            }
            None => warn!(path = %request.path, "credential is not a valid header value; sending request without it"),
        }
    }
}

// =============================================================================
// REJECTION DETECTOR
// =============================================================================

/// Turns a 401 into a forced logout and a redirect to the login path.
///
/// A request that carried a token only forces sign-in if that token is still
/// the live one, so the rest of a burst rejected for the same token is
/// absorbed by the first. A request that carried no token always forces it.
pub struct RejectionDetector {
    controller: SessionController,
    navigator: Arc<dyn Navigator>,
    login_path: String,
}

impl RejectionDetector {
    pub fn new(controller: SessionController, navigator: Arc<dyn Navigator>, login_path: impl Into<String>) -> Self {
        Self { controller, navigator, login_path: login_path.into() }
    }
}

impl ResponseHook for RejectionDetector {
    fn name(&self) -> &'static str {
        "rejection-detector"
    }

    fn on_response(&self, request: &OutboundRequest, outcome: &Result<ApiResponse, ApiError>) {
        if !matches!(outcome, Err(ApiError::AuthRejected { .. })) {
            return;
        }
        let forced = match request.bearer_token() {
            Some(token) => self.controller.revoke(Some(token)),
            None => {
                self.controller.logout();
                true
            }
        };
        if forced {
            warn!(path = %request.path, login_path = %self.login_path, "request rejected; forcing sign-in");
            self.navigator.navigate(&self.login_path);
        } else {
            debug!(path = %request.path, "rejection for a credential that was already cleared");
        }
    }
}

#[cfg(test)]
#[path = "hooks_test.rs"]
mod tests;
