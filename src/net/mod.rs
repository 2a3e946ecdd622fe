//! API client and the session hooks that ride on it.
//!
//! ARCHITECTURE
//! ============
//! [`ApiClient`] runs every call through the same pipeline: merge the shared
//! [`DefaultHeaders`], run request hooks in registration order, dispatch,
//! then run response hooks in registration order over the outcome. Hooks
//! observe or adjust the request; they never replace the outcome the caller
//! receives.

pub mod auth_api;
pub mod client;
pub mod hooks;
pub mod types;

pub use client::{ApiClient, ApiClientBuilder, DefaultHeaders, RequestHook, ResponseHook};
pub use hooks::{CredentialInjector, RejectionDetector};
pub use types::{ApiError, ApiResponse, OutboundRequest};

// =============================================================================
// TEST HELPERS
// =============================================================================
