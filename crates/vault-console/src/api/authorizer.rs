//! # Request Authorization
//!
//! Attaches the current session credential to outgoing requests.

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::RequestBuilder;

use crate::session::SessionStore;

/// Request interceptor bound to a [`SessionStore`].
///
/// The header value is derived from the session at the moment each request
/// is built, so a login or logout is reflected by the very next request.
#[derive(Clone)]
pub struct Authorizer {
    session: SessionStore,
}

impl Authorizer {
    /// Binds an authorizer to the given session store.
    #[must_use]
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    /// Returns `Bearer <credential>` for the current session, if any.
    #[must_use]
    pub fn header_value(&self) -> Option<HeaderValue> {
        let credential = self.session.credential()?;
        match HeaderValue::from_str(&credential.bearer()) {
            Ok(mut value) => {
                value.set_sensitive(true);
                Some(value)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Credential is not a valid header value, sending request unauthorized");
                None
            }
        }
    }

    /// Attaches the authorization header to `builder` when a session exists.
    pub fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.header_value() {
            Some(value) => builder.header(AUTHORIZATION, value),
            None => builder,
        }
    }
}
