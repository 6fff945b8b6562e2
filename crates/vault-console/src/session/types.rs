//! # Session Types
//!
//! The authenticated session: a bearer credential paired with the identity
//! record it authorizes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque bearer token issued by the backend.
///
/// `Debug` output is redacted so credentials never reach the logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `Authorization` header value for this credential.
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

/// The authenticated user record, as returned by the backend.
///
/// The console does not interpret its structure beyond a few display
/// accessors; it only has to be a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(Map<String, Value>);

impl Identity {
    /// Wraps a JSON object.
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Returns a field by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the record ID, if it is a string.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.get("id").and_then(Value::as_str)
    }

    /// Returns the email address, if present.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.get("email").and_then(Value::as_str)
    }

    /// Returns the username, if present.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.get("username").and_then(Value::as_str)
    }

    /// Best label for display: username, then email, then ID.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.username()
            .or_else(|| self.email())
            .or_else(|| self.id())
            .unwrap_or("unknown")
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// A populated session.
///
/// Absence of a session is `Option::<Session>::None`; there is no way to
/// hold a credential without an identity or the reverse.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Bearer credential.
    pub credential: Credential,
    /// Identity the credential authorizes.
    pub identity: Identity,
}

impl Session {
    /// Pairs a credential with its identity.
    #[must_use]
    pub fn new(credential: Credential, identity: Identity) -> Self {
        Self {
            credential,
            identity,
        }
    }
}
