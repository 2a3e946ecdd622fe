//! Navigation requests issued by the session core.
//!
//! SYSTEM CONTEXT
//! ==============
//! The core never renders. When a rejection forces a logout it asks the host
//! to move to the login entry point and leaves the rest to the host.

use std::sync::{Mutex, PoisonError};

use tracing::warn;

pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Host without a router (the CLI): record the redirect in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, path: &str) {
        warn!(%path, "session ended; sign in again");
    }
}

/// Keeps every requested path, in order.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_owned());
    }
}
