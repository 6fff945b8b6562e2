//! # Session Module
//!
//! Owns the authenticated-session lifecycle for the console.
//!
//! ## Components
//!
//! - [`SessionStore`] - in-memory session plus its durable mirror
//! - [`Session`] - a [`Credential`] paired with the [`Identity`] it authorizes

mod store;
mod types;

pub use store::SessionStore;
pub use types::{Credential, Identity, Session};
