//! # Vault Console
//!
//! Client-side session and access-control core of the Vault admin console.
//!
//! ## Architecture
//!
//! The console talks to a running Vault backend over HTTP. This crate owns
//! the authenticated session, keeps outgoing requests authorized with it,
//! and gates every page transition on it:
//!
//! ```text
//! Console::bootstrap
//!   -> SessionStore::restore      (durable storage -> memory)
//!   -> Authorizer bound to store  (requests carry the credential)
//!   -> Router activated           (guard runs per navigation)
//! ```
//!
//! ## Modules
//!
//! - [`api`] - HTTP client and request authorization
//! - [`bootstrap`] - startup sequencing and the application context
//! - [`config`] - persisted console settings
//! - [`router`] - route table, navigation guard, router
//! - [`session`] - session store and types
//! - [`storage`] - durable key/value storage

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod router;
pub mod session;
pub mod storage;

pub use api::{ApiError, ApiResult, Authorizer, ConsoleClient};
pub use bootstrap::Console;
pub use config::Config;
pub use router::{guard, GuardDecision, NavigationOutcome, RouteTable, Router};
pub use session::{Credential, Identity, Session, SessionStore};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
