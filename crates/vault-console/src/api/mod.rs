//! # API Client
//!
//! HTTP client for communicating with the Vault backend.
//!
//! This module provides the [`ConsoleClient`] for making API requests and
//! the [`Authorizer`] that keeps those requests in step with the session.

mod authorizer;
mod client;
mod error;
mod types;

pub use authorizer::Authorizer;
pub use client::{AuthEndpoint, ConsoleClient, AUTH_WITH_PASSWORD_PATH};
pub use error::{ApiError, ApiResult};
pub use types::{AuthResponse, CollectionInfo, PasswordAuthRequest};
