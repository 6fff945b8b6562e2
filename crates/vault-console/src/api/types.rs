//! # API Types
//!
//! Request and response shapes exchanged with the Vault backend.

use serde::{Deserialize, Serialize};

use crate::session::Identity;

/// Success envelope wrapping every backend payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// The payload.
    pub data: T,
}

/// Error envelope returned alongside non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    /// Error details.
    pub error: ErrorBody,
}

/// Body of an [`ErrorEnvelope`].
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable code, e.g. `INVALID_CREDENTIALS`.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// Request body for password authentication.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordAuthRequest {
    /// Email or username.
    pub identity: String,
    /// Account password.
    pub password: String,
}

/// Successful password authentication.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// The authenticated user record.
    pub record: Identity,
    /// Refresh token. Issued by the backend but not persisted by the console.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Collection summary returned by the admin API.
///
/// Only the fields the console lists are typed; everything else the
/// backend sends is ignored.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CollectionInfo {
    /// Collection ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Collection name.
    pub name: String,
    /// Collection type (`base`, `auth`, ...).
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}
