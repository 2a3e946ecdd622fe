//! Durable key-value storage for the persisted session record.
//!
//! DESIGN
//! ======
//! The session is mirrored as two independent entries, the raw token under
//! [`TOKEN_KEY`] and the JSON identity under [`USER_KEY`]. Writes are not
//! transactional across the pair; the controller repairs any partial record
//! on restore.
//!
//! The trait is synchronous: both implementations complete immediately, which
//! lets the request hook consult storage without suspending.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::ErrorCode;

/// Entry holding the bearer token as a plain string.
pub const TOKEN_KEY: &str = "authToken";
/// Entry holding the serialized [`crate::session::UserIdentity`].
pub const USER_KEY: &str = "user";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing medium failed to read or write the entry.
    #[error("storage io failed for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be mapped onto the backing medium.
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    /// A record could not be serialized for storage.
    #[error("record encode failed: {0}")]
    Encode(String),
}

impl ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "E_STORE_IO",
            Self::InvalidKey(_) => "E_STORE_KEY",
            Self::Encode(_) => "E_STORE_ENCODE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Key-value persistence that survives process restarts.
pub trait SessionStore: Send + Sync {
    /// Read an entry. A missing entry is `Ok(None)`, not an error.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write an entry, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete an entry. Deleting a missing entry succeeds.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::*;

    /// Memory store whose operations can be switched to fail, and which
    /// counts removals so tests can tell how many logouts touched storage.
    #[derive(Default)]
    pub struct FlakyStore {
        pub inner: MemoryStore,
        pub fail_get: AtomicBool,
        pub fail_set: AtomicBool,
        pub fail_remove: AtomicBool,
        pub removes: AtomicUsize,
    }

    impl FlakyStore {
        fn io(key: &str) -> StoreError {
            StoreError::Io { key: key.to_owned(), source: std::io::Error::other("injected failure") }
        }
    }

    impl SessionStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            if self.fail_get.load(Ordering::SeqCst) {
                return Err(Self::io(key));
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.fail_set.load(Ordering::SeqCst) {
                return Err(Self::io(key));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.removes.fetch_add(1, Ordering::SeqCst);
            if self.fail_remove.load(Ordering::SeqCst) {
                return Err(Self::io(key));
            }
            self.inner.remove(key)
        }
    }
}
