//! In-memory session shared by the controller, hooks, and views.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `SessionState` is created at bootstrap and cloned into every consumer;
//! all clones point at the same session. Lock guards are scoped to a single
//! statement and never live across an `.await`, so each mutation lands in one
//! step and is visible to every task before the mutating call returns.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::types::{ActiveSession, Credential, Role, UserIdentity};

#[derive(Debug, Default)]
struct StateInner {
    session: Option<ActiveSession>,
    restored: bool,
}

/// Shared handle to the current session.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    inner: Arc<RwLock<StateInner>>,
}

impl SessionState {
    /// Empty, not-yet-restored session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, StateInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StateInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.read().session.is_some()
    }

    /// True iff the signed-in user holds `role`. False when signed out.
    pub fn has_role(&self, role: Role) -> bool {
        self.read()
            .session
            .as_ref()
            .is_some_and(|s| s.user.role == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    pub fn credential(&self) -> Option<Credential> {
        self.read()
            .session
            .as_ref()
            .map(|s| s.credential.clone())
    }

    pub fn user(&self) -> Option<UserIdentity> {
        self.read().session.as_ref().map(|s| s.user.clone())
    }

    pub fn snapshot(&self) -> Option<ActiveSession> {
        self.read().session.clone()
    }

    /// Whether startup restore has finished. Before that, the stored token is
    /// the only credential the request hook can see.
    pub fn is_restored(&self) -> bool {
        self.read().restored
    }

    // =========================================================================
    // MUTATION (controller only)
    // =========================================================================

    pub(crate) fn replace(&self, session: Option<ActiveSession>) {
        self.write().session = session;
    }

    /// Clear the session only if it still holds `credential`. Returns whether
    /// it cleared. Check and clear happen under one write guard.
    pub(crate) fn clear_if_current(&self, credential: &str) -> bool {
        let mut inner = self.write();
        let is_current = inner
            .session
            .as_ref()
            .is_some_and(|s| s.credential.as_str() == credential);
        if is_current {
            inner.session = None;
        }
        is_current
    }

    pub(crate) fn mark_restored(&self) {
        self.write().restored = true;
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
