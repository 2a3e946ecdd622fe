//! Bootstrap: build the session singletons and restore before first use.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App::bootstrap` is the only place the shared state, store, default
//! headers, and hooks are wired together. It runs `restore_session` before
//! returning, so no caller can issue a request against a half-initialized
//! session.

use std::sync::Arc;

use tracing::info;

use crate::config::SessionConfig;
use crate::nav::Navigator;
use crate::net::auth_api::{self, SignInError};
use crate::net::{ApiClient, ApiError, CredentialInjector, DefaultHeaders, RejectionDetector};
use crate::session::{RestoreOutcome, SessionController, SessionState, UserIdentity};
use crate::store::SessionStore;

pub struct App {
    config: SessionConfig,
    controller: SessionController,
    client: ApiClient,
    restore: RestoreOutcome,
}

impl App {
    /// Wire the session core over `store` and restore any persisted session.
    ///
    /// Hook order: `credential-injector` on requests, `rejection-detector` on
    /// responses.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the HTTP transport cannot be built.
    pub fn bootstrap(
        config: SessionConfig,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let state = SessionState::new();
        let defaults = DefaultHeaders::new();
        let controller = SessionController::new(state.clone(), Arc::clone(&store), defaults.clone());

        let client = ApiClient::builder(&config.api_base_url)
            .timeouts(config.timeouts)
            .default_headers(defaults)
            .request_hook(Arc::new(CredentialInjector::new(state, store)))
            .response_hook(Arc::new(RejectionDetector::new(
                controller.clone(),
                navigator,
                config.login_path.clone(),
            )))
            .build()?;

        let restore = controller.restore_session();
        info!(?restore, base_url = %config.api_base_url, "session bootstrap complete");

        Ok(Self { config, controller, client, restore })
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        self.controller.state()
    }

    #[must_use]
    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// What startup restore found.
    #[must_use]
    pub fn restore_outcome(&self) -> RestoreOutcome {
        self.restore
    }

    /// Sign in through the API and install the returned session.
    ///
    /// # Errors
    ///
    /// See [`auth_api::sign_in`].
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<UserIdentity, SignInError> {
        auth_api::sign_in(&self.client, &self.controller, username, password).await
    }
}

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;
