//! Shared error classification.
//!
//! Every error enum in the crate maps to a stable machine-readable code so
//! the CLI and callers can branch on it without matching display strings.

/// Stable code and retry hint for an error value.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
