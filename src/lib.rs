//! Client-side session manager for the quiz platform API.
//!
//! ARCHITECTURE
//! ============
//! The crate owns the authenticated user's credential for the lifetime of a
//! client process:
//!
//! - [`store`] persists the credential and identity across restarts.
//! - [`session`] holds the in-memory session and the controller that keeps
//!   memory and storage in step (`login`, `logout`, `restore_session`).
//! - [`net`] is the API client; its request hook attaches the credential and
//!   its response hook turns a 401 into a forced logout + redirect.
//! - [`app`] wires the singletons together and restores the session before
//!   anything else runs.

pub mod app;
pub mod config;
pub mod error;
pub mod nav;
pub mod net;
pub mod session;
pub mod store;

pub use app::App;
pub use config::SessionConfig;
pub use error::ErrorCode;
pub use nav::{LogNavigator, Navigator, RecordingNavigator};
pub use net::{ApiClient, ApiError, ApiResponse, OutboundRequest};
pub use session::{ActiveSession, Credential, Role, SessionController, SessionError, SessionState, UserIdentity};
pub use store::{FileStore, MemoryStore, SessionStore, StoreError};
