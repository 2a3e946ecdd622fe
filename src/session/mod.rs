//! Session state and the controller that owns its transitions.
//!
//! ARCHITECTURE
//! ============
//! [`SessionState`] is the read side handed to views and hooks.
//! [`SessionController`] is the only writer: it mutates the state first and
//! then mirrors it into the store, so in-memory state is always the source of
//! truth while the process lives.

pub mod controller;
pub mod state;
pub mod types;

pub use controller::{RestoreOutcome, SessionController};
pub use state::SessionState;
pub use types::{ActiveSession, Credential, Role, UserIdentity};

use crate::error::ErrorCode;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// `login` input was missing a credential or a usable identity.
    #[error("invalid credential payload: {0}")]
    InvalidCredentialPayload(&'static str),

    /// The session is live in memory but could not be persisted.
    #[error("session storage failed: {0}")]
    StorageFailure(#[from] StoreError),
}

impl ErrorCode for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentialPayload(_) => "E_INVALID_CREDENTIAL_PAYLOAD",
            Self::StorageFailure(_) => "E_STORAGE_FAILURE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::StorageFailure(e) if e.retryable())
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
