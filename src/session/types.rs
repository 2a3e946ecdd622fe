//! Credential and identity records.
//!
//! DESIGN
//! ======
//! The persisted identity JSON keeps the field names the web client has
//! always written (`displayName`, role `"user"`/`"admin"`), and also accepts
//! the server's login payload shape (`name`) so the same type decodes both.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque bearer token. Never parsed; never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw token. Blank input yields `None`.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value for this token.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "user", alias = "regular")]
    Regular,
    #[serde(rename = "admin")]
    Admin,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity record paired with a credential.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Server-assigned user id.
    pub id: i64,
    /// Login name (the server uses the email address).
    pub username: String,
    /// Human-readable name.
    #[serde(rename = "displayName", alias = "name")]
    pub display_name: String,
    pub role: Role,
}

impl UserIdentity {
    /// An identity is usable only with a non-blank username.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty()
    }
}

/// A fully populated session. There is no partial form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveSession {
    pub credential: Credential,
    pub user: UserIdentity,
}
