//! # Session Store
//!
//! Single source of truth for the authenticated session, mirrored to
//! durable storage.

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;

use super::types::{Credential, Identity, Session};
use crate::api::AuthEndpoint;
use crate::storage::{
    KeyValueStorage, StorageError, StorageResult, CREDENTIAL_KEY, IDENTITY_KEY,
};

/// Session state shared by every handle.
struct Inner {
    session: RwLock<Option<Session>>,
    storage: Arc<dyn KeyValueStorage>,
    endpoint: Arc<dyn AuthEndpoint>,
    state_tx: watch::Sender<bool>,
}

/// Owner of the in-memory [`Session`] and its durable mirror.
///
/// Constructed once at startup through [`restore`](Self::restore) and
/// handed to the request layer and the router. Cloning yields another
/// handle to the same session.
///
/// Mutations take the session write lock for the whole memory + storage
/// update, so readers observe either the old session or the new one.
///
/// # Examples
///
/// ```rust,ignore
/// let store = SessionStore::restore(storage, Arc::new(client));
///
/// if !store.is_authenticated() && store.authenticate("admin@example.com", "secret").await {
///     println!("Logged in as {}", store.identity().unwrap().display_name());
/// }
/// ```
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    /// Restores the session from durable storage.
    ///
    /// Never fails: missing, half-written or malformed slots yield an empty
    /// session. Half-written and malformed slots, and an undecodable
    /// document, are also cleared.
    #[must_use]
    pub fn restore(storage: Arc<dyn KeyValueStorage>, endpoint: Arc<dyn AuthEndpoint>) -> Self {
        let session = load_persisted(storage.as_ref());
        if let Some(ref s) = session {
            tracing::info!(user = %s.identity.display_name(), "Restored session");
        }

        let (state_tx, _) = watch::channel(session.is_some());

        Self {
            inner: Arc::new(Inner {
                session: RwLock::new(session),
                storage,
                endpoint,
                state_tx,
            }),
        }
    }

    /// Authenticates against the backend and installs the new session.
    ///
    /// Returns `true` once memory and durable storage both hold the new
    /// session. On any failure both are left exactly as they were and
    /// `false` is returned; the cause is logged, never propagated.
    ///
    /// Concurrent calls are not serialized: the last one to complete wins.
    pub async fn authenticate(&self, identity: &str, password: &str) -> bool {
        let response = match self.inner.endpoint.auth_with_password(identity, password).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(identity = %identity, error = %e, "Login failed");
                return false;
            }
        };

        if response.token.is_empty() {
            tracing::warn!(identity = %identity, "Login failed: backend returned an empty token");
            return false;
        }

        let session = Session::new(Credential::new(response.token), response.record);
        match self.commit(session) {
            Ok(()) => {
                tracing::info!(identity = %identity, "Logged in");
                true
            }
            Err(e) => {
                tracing::warn!(identity = %identity, error = %e, "Login failed: could not persist session");
                false
            }
        }
    }

    /// Clears the session and both persisted slots.
    ///
    /// Does not contact the backend. Storage failures are logged; the
    /// in-memory session is cleared regardless.
    pub fn logout(&self) {
        let mut current = self.inner.session.write();
        *current = None;

        if let Err(e) = self.inner.storage.remove_many(&[CREDENTIAL_KEY, IDENTITY_KEY]) {
            tracing::warn!(error = %e, "Failed to clear persisted session");
        }
        self.inner.state_tx.send_replace(false);
        drop(current);

        tracing::info!("Logged out");
    }

    /// Returns true iff a credential is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.session.read().is_some()
    }

    /// Returns a snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.inner.session.read().clone()
    }

    /// Returns the current credential.
    #[must_use]
    pub fn credential(&self) -> Option<Credential> {
        self.inner
            .session
            .read()
            .as_ref()
            .map(|s| s.credential.clone())
    }

    /// Returns the current identity.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.inner
            .session
            .read()
            .as_ref()
            .map(|s| s.identity.clone())
    }

    /// Subscribes to authentication state changes.
    ///
    /// The channel is updated before `authenticate`/`logout` return.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.state_tx.subscribe()
    }

    /// Writes `session` to storage, then to memory, under the write lock.
    fn commit(&self, session: Session) -> StorageResult<()> {
        let identity_json = serde_json::to_string(&session.identity)?;

        let mut current = self.inner.session.write();
        if let Err(e) = self.inner.storage.set_many(&[
            (CREDENTIAL_KEY, session.credential.as_str()),
            (IDENTITY_KEY, &identity_json),
        ]) {
            self.rollback(current.as_ref());
            return Err(e);
        }

        *current = Some(session);
        self.inner.state_tx.send_replace(true);
        Ok(())
    }

    /// Puts the persisted slots back to match `previous`.
    fn rollback(&self, previous: Option<&Session>) {
        let result = match previous {
            Some(session) => serde_json::to_string(&session.identity)
                .map_err(StorageError::from)
                .and_then(|json| {
                    self.inner.storage.set_many(&[
                        (CREDENTIAL_KEY, session.credential.as_str()),
                        (IDENTITY_KEY, &json),
                    ])
                }),
            None => self
                .inner
                .storage
                .remove_many(&[CREDENTIAL_KEY, IDENTITY_KEY]),
        };

        if let Err(e) = result {
            tracing::error!(error = %e, "Failed to roll back persisted session");
        }
    }
}

/// Reads both slots and rebuilds the session they describe.
fn load_persisted(storage: &dyn KeyValueStorage) -> Option<Session> {
    let token = storage.get(CREDENTIAL_KEY);
    let user = storage.get(IDENTITY_KEY);

    match (token, user) {
        (Ok(Some(token)), Ok(Some(user))) if !token.is_empty() => {
            match serde_json::from_str::<Identity>(&user) {
                Ok(identity) => Some(Session::new(Credential::new(token), identity)),
                Err(e) => {
                    tracing::warn!(error = %e, "Persisted identity is malformed, starting without a session");
                    clear_slots(storage);
                    None
                }
            }
        }
        (Ok(None), Ok(None)) => {
            tracing::debug!("No persisted session");
            None
        }
        (Ok(_), Ok(_)) => {
            tracing::warn!("Persisted session is incomplete, starting without a session");
            clear_slots(storage);
            None
        }
        (Err(e @ StorageError::Serialization(_)), _)
        | (_, Err(e @ StorageError::Serialization(_))) => {
            tracing::warn!(error = %e, "Persisted session is unreadable, starting without a session");
            clear_slots(storage);
            None
        }
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(error = %e, "Failed to read persisted session, starting without a session");
            None
        }
    }
}

fn clear_slots(storage: &dyn KeyValueStorage) {
    if let Err(e) = storage.remove_many(&[CREDENTIAL_KEY, IDENTITY_KEY]) {
        tracing::warn!(error = %e, "Failed to clear persisted session");
    }
}
