//! Session state machine: `login`, `logout`, `restore_session`.
//!
//! DESIGN
//! ======
//! Every transition updates [`SessionState`] first, in a single step, then
//! mirrors it into the store and the client's default headers. Persistence
//! is a best-effort dual write with repair-on-read: a crash between the two
//! store writes leaves a partial record, which `restore_session` detects and
//! clears rather than guessing at the missing half.
//!
//! TRADE-OFFS
//! ==========
//! `logout` never fails. Storage cleanup errors are logged and dropped; the
//! process must not believe it is signed in once `logout` has been called,
//! even if the files on disk lag behind.

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use tracing::{debug, info, warn};

use super::SessionError;
use super::state::SessionState;
use super::types::{ActiveSession, Credential, UserIdentity};
use crate::net::DefaultHeaders;
use crate::net::types::bearer_header;
use crate::store::{SessionStore, StoreError, TOKEN_KEY, USER_KEY};

/// What `restore_session` found on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Both entries were present and valid; the session is live again.
    Restored,
    /// Nothing was stored.
    Empty,
    /// A partial, malformed, or unreadable record was found and cleared.
    Repaired,
}

/// The only writer of [`SessionState`]. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SessionController {
    state: SessionState,
    store: Arc<dyn SessionStore>,
    defaults: DefaultHeaders,
}

impl SessionController {
    pub fn new(state: SessionState, store: Arc<dyn SessionStore>, defaults: DefaultHeaders) -> Self {
        Self { state, store, defaults }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    // =========================================================================
    // LOGIN
    // =========================================================================

    /// Install `credential` + `user` as the current session.
    ///
    /// Allowed from either state; signing in over an existing session
    /// replaces it.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidCredentialPayload`] for a blank credential, a
    /// credential that cannot travel in a header, or an identity without a
    /// username. Nothing is mutated in that case.
    ///
    /// [`SessionError::StorageFailure`] if the record could not be persisted.
    /// The session stays live in memory for this process; the partial record
    /// is removed so a restart comes up signed out.
    pub fn login(&self, credential: &str, user: UserIdentity) -> Result<(), SessionError> {
        let credential =
            Credential::new(credential).ok_or(SessionError::InvalidCredentialPayload("credential is empty"))?;
        let header = bearer_header(&credential).ok_or(SessionError::InvalidCredentialPayload(
            "credential contains characters not allowed in a header",
        ))?;
        if !user.is_complete() {
            return Err(SessionError::InvalidCredentialPayload("identity has no username"));
        }
        let encoded = serde_json::to_string(&user).map_err(|e| StoreError::Encode(e.to_string()))?;

        let (user_id, role) = (user.id, user.role);
        self.state
            .replace(Some(ActiveSession { credential: credential.clone(), user }));
        let persisted = self.persist(&credential, &encoded);
        self.defaults.set(AUTHORIZATION, header);

        if let Err(e) = persisted {
            warn!(error = %e, user_id, "session persist failed; clearing partial record");
            self.clear_store();
            return Err(e.into());
        }

        info!(user_id, %role, "logged in");
        Ok(())
    }

    fn persist(&self, credential: &Credential, encoded_user: &str) -> Result<(), StoreError> {
        self.store.set(TOKEN_KEY, credential.as_str())?;
        self.store.set(USER_KEY, encoded_user)
    }

    // =========================================================================
    // LOGOUT
    // =========================================================================

    /// Clear the session. Idempotent and infallible.
    pub fn logout(&self) {
        let was_authenticated = self.state.is_authenticated();
        self.state.replace(None);
        self.teardown();
        info!(was_authenticated, "logged out");
    }

    /// Log out because the server rejected `presented`.
    ///
    /// Only clears the session when it still holds that exact credential, so
    /// a burst of 401s for one token logs out once, and a late 401 for a
    /// token that has since been replaced leaves the new session alone.
    /// Returns whether a logout happened.
    pub fn revoke(&self, presented: Option<&str>) -> bool {
        let Some(presented) = presented else {
            return false;
        };
        if !self.state.clear_if_current(presented) {
            debug!("rejection for a credential that is no longer current");
            return false;
        }
        self.teardown();
        warn!("credential rejected by server; session cleared");
        true
    }

    fn teardown(&self) {
        self.clear_store();
        self.defaults.remove(&AUTHORIZATION);
    }

    fn clear_store(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.store.remove(key) {
                warn!(error = %e, key, "session storage cleanup failed");
            }
        }
    }

    // =========================================================================
    // RESTORE
    // =========================================================================

    /// Reload the persisted session. Call once at startup, before any request.
    pub fn restore_session(&self) -> RestoreOutcome {
        let outcome = match self.read_persisted() {
            Ok(Some(session)) => {
                if let Some(header) = bearer_header(&session.credential) {
                    self.defaults.set(AUTHORIZATION, header);
                }
                info!(user_id = session.user.id, role = %session.user.role, "session restored");
                self.state.replace(Some(session));
                RestoreOutcome::Restored
            }
            Ok(None) => RestoreOutcome::Empty,
            Err(reason) => {
                warn!(reason, "persisted session inconsistent; clearing");
                self.state.replace(None);
                self.teardown();
                RestoreOutcome::Repaired
            }
        };
        self.state.mark_restored();
        debug!(?outcome, "restore finished");
        outcome
    }

    fn read_persisted(&self) -> Result<Option<ActiveSession>, &'static str> {
        let (token, user) = match (self.store.get(TOKEN_KEY), self.store.get(USER_KEY)) {
            (Ok(token), Ok(user)) => (token, user),
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "session storage read failed");
                return Err("record unreadable");
            }
        };

        let credential = match token {
            Some(raw) => Some(Credential::new(raw).ok_or("token malformed")?),
            None => None,
        };

        match (credential, user) {
            (None, None) => Ok(None),
            (Some(_), None) => Err("identity missing"),
            (None, Some(_)) => Err("token missing"),
            (Some(credential), Some(raw)) => {
                let user: UserIdentity = serde_json::from_str(&raw).map_err(|_| "identity malformed")?;
                if !user.is_complete() {
                    return Err("identity incomplete");
                }
                if bearer_header(&credential).is_none() {
                    return Err("token malformed");
                }
                Ok(Some(ActiveSession { credential, user }))
            }
        }
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
