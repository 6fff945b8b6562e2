//! # Bootstrap
//!
//! Process-start sequencing and the application context handed to the UI.

use std::sync::Arc;

use crate::api::{ApiResult, Authorizer, ConsoleClient};
use crate::config::Config;
use crate::router::{NavigationOutcome, RouteTable, Router, LOGIN_ROUTE};
use crate::session::SessionStore;
use crate::storage::KeyValueStorage;

/// Application context: the session, the authorized request layer and the
/// router, wired to one another.
///
/// Constructed once at startup and passed to consumers explicitly.
///
/// # Examples
///
/// ```rust,ignore
/// let config = Config::load();
/// let storage = Arc::new(FileStorage::new(config.session_path().unwrap()));
/// let mut console = Console::bootstrap(&config, storage, "/")?;
///
/// if console.login("admin@example.com", "secret").await {
///     let collections = console.client().list_collections().await?;
/// }
/// ```
pub struct Console {
    session: SessionStore,
    client: ConsoleClient,
    router: Router,
}

impl Console {
    /// Boots the console against the configured backend and the console
    /// route table, then navigates to `initial_path`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`](crate::api::ApiError::Network) if the
    /// HTTP client cannot be built.
    pub fn bootstrap(
        config: &Config,
        storage: Arc<dyn KeyValueStorage>,
        initial_path: &str,
    ) -> ApiResult<Self> {
        let transport = ConsoleClient::from_config(config)?;
        Ok(Self::bootstrap_with(
            transport,
            RouteTable::console(),
            storage,
            initial_path,
        ))
    }

    /// Boots the console from explicit parts.
    ///
    /// Order is fixed: restore the session, bind the authorizer to it, and
    /// only then activate routing. `transport` must not carry an authorizer;
    /// it is used unauthorized for the login call.
    #[must_use]
    pub fn bootstrap_with(
        transport: ConsoleClient,
        table: RouteTable,
        storage: Arc<dyn KeyValueStorage>,
        initial_path: &str,
    ) -> Self {
        tracing::debug!(server = %transport.base_url(), "Restoring session");
        let session = SessionStore::restore(storage, Arc::new(transport.clone()));

        tracing::debug!("Binding request authorizer");
        let client = transport.with_authorizer(Authorizer::new(session.clone()));

        tracing::debug!(path = %initial_path, "Activating router");
        let mut router = Router::new(table, session.clone());
        let outcome = router.navigate(initial_path);

        tracing::info!(
            authenticated = session.is_authenticated(),
            route = outcome.location().map_or("<none>", |l| l.name),
            "Console ready"
        );

        Self {
            session,
            client,
            router,
        }
    }

    /// Returns the session store.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Returns the authorized request layer.
    #[must_use]
    pub fn client(&self) -> &ConsoleClient {
        &self.client
    }

    /// Returns the router.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Navigates to a location through the guard.
    pub fn navigate(&mut self, path: &str) -> NavigationOutcome {
        self.router.navigate(path)
    }

    /// Logs in and, on success, lands on the default route.
    ///
    /// The route requested before login is not restored.
    pub async fn login(&mut self, identity: &str, password: &str) -> bool {
        if !self.session.authenticate(identity, password).await {
            return false;
        }
        let landing = self.router.table().landing();
        self.router.navigate_to(landing);
        true
    }

    /// Logs out and returns to the login route.
    pub fn logout(&mut self) -> NavigationOutcome {
        self.session.logout();
        self.router.navigate_to(LOGIN_ROUTE)
    }
}
