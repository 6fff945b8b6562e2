//! # Router
//!
//! Resolves locations, runs the navigation guard and tracks where the
//! console currently is.

use std::collections::HashMap;

use super::guard::{guard, GuardDecision};
use super::routes::{RouteDescriptor, RouteTable, View};
use crate::session::SessionStore;

/// A route the console has entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Route name.
    pub name: &'static str,
    /// Location as navigated to.
    pub path: String,
    /// Captured path parameters.
    pub params: HashMap<String, String>,
    /// View to render.
    pub view: View,
}

/// Result of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The requested route was entered.
    Entered(Location),
    /// The guard sent the navigation elsewhere.
    Redirected {
        /// Name of the route that was asked for.
        requested: &'static str,
        /// Where the console ended up.
        to: Location,
    },
    /// No route matches the location.
    NotFound(String),
}

impl NavigationOutcome {
    /// Returns the entered location, if any.
    #[must_use]
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::Entered(loc) | Self::Redirected { to: loc, .. } => Some(loc),
            Self::NotFound(_) => None,
        }
    }
}

/// Dispatches navigations through the guard.
///
/// Navigation takes `&mut self`, so at most one is evaluated at a time.
/// The guard reads the session synchronously at the moment of each call.
pub struct Router {
    table: RouteTable,
    session: SessionStore,
    current: Option<Location>,
}

impl Router {
    /// Creates a router over `table`, reading access state from `session`.
    #[must_use]
    pub fn new(table: RouteTable, session: SessionStore) -> Self {
        Self {
            table,
            session,
            current: None,
        }
    }

    /// Returns the route table.
    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Returns the current location, if any navigation has completed.
    #[must_use]
    pub fn current(&self) -> Option<&Location> {
        self.current.as_ref()
    }

    /// Navigates to a location such as `/collections/posts`.
    pub fn navigate(&mut self, path: &str) -> NavigationOutcome {
        let Some(m) = self.table.resolve(path) else {
            tracing::debug!(path = %path, "No route matches location");
            return NavigationOutcome::NotFound(path.to_string());
        };
        self.enter(m.route, path.to_string(), m.params)
    }

    /// Navigates to a parameterless route by name.
    ///
    /// Routes whose pattern captures parameters are reported as
    /// [`NotFound`](NavigationOutcome::NotFound); use [`navigate`](Self::navigate).
    pub fn navigate_to(&mut self, name: &str) -> NavigationOutcome {
        let Some(route) = self.table.by_name(name).copied() else {
            tracing::debug!(route = %name, "Unknown route name");
            return NavigationOutcome::NotFound(name.to_string());
        };
        if route.has_params() {
            tracing::debug!(route = %name, "Route needs path parameters, navigate by location");
            return NavigationOutcome::NotFound(name.to_string());
        }
        self.enter(route, route.path.to_string(), HashMap::new())
    }

    fn enter(
        &mut self,
        route: RouteDescriptor,
        path: String,
        params: HashMap<String, String>,
    ) -> NavigationOutcome {
        let authenticated = self.session.is_authenticated();

        match guard(&route, authenticated, self.table.landing()) {
            GuardDecision::Proceed => {
                let location = Location {
                    name: route.name,
                    path,
                    params,
                    view: (route.view)(),
                };
                tracing::debug!(route = route.name, "Entered route");
                self.current = Some(location.clone());
                NavigationOutcome::Entered(location)
            }
            GuardDecision::Redirect(target) => {
                let Some(target) = self.table.by_name(target) else {
                    tracing::warn!(route = target, "Guard redirected to an unknown route");
                    return NavigationOutcome::NotFound(target.to_string());
                };
                let location = Location {
                    name: target.name,
                    path: target.path.to_string(),
                    params: HashMap::new(),
                    view: (target.view)(),
                };
                tracing::debug!(requested = route.name, redirected_to = target.name, "Navigation redirected");
                self.current = Some(location.clone());
                NavigationOutcome::Redirected {
                    requested: route.name,
                    to: location,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::routes::{DEFAULT_LANDING_ROUTE, LOGIN_ROUTE};
    use crate::session::testing::seeded_store;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn router(seed: Option<(&str, &str)>) -> (Router, SessionStore) {
        let session = seeded_store(Arc::new(MemoryStorage::new()), seed);
        (Router::new(RouteTable::console(), session.clone()), session)
    }

    #[test]
    fn test_unauthenticated_deep_link_redirects_to_login() {
        let (mut router, _) = router(None);

        let outcome = router.navigate("/collections/posts/edit/r1");

        match outcome {
            NavigationOutcome::Redirected { requested, to } => {
                assert_eq!(requested, "RecordEdit");
                assert_eq!(to.name, LOGIN_ROUTE);
                assert_eq!(to.view, View::Login);
                assert!(to.params.is_empty());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(router.current().unwrap().name, LOGIN_ROUTE);
    }

    #[test]
    fn test_authenticated_enters_protected_route_with_params() {
        let (mut router, _) = router(Some(("abc123", "u1")));

        let outcome = router.navigate("/collections/posts");

        let loc = outcome.location().unwrap();
        assert!(matches!(outcome, NavigationOutcome::Entered(_)));
        assert_eq!(loc.name, "CollectionView");
        assert_eq!(loc.params["name"], "posts");
        assert_eq!(loc.view, View::CollectionView);
    }

    #[test]
    fn test_authenticated_login_redirects_to_landing() {
        let (mut router, _) = router(Some(("abc123", "u1")));

        let outcome = router.navigate_to(LOGIN_ROUTE);

        assert!(matches!(
            outcome,
            NavigationOutcome::Redirected { requested: LOGIN_ROUTE, ref to } if to.name == DEFAULT_LANDING_ROUTE
        ));
    }

    #[test]
    fn test_guard_reads_session_at_navigation_time() {
        let (mut router, session) = router(Some(("abc123", "u1")));
        assert!(matches!(router.navigate("/"), NavigationOutcome::Entered(_)));

        session.logout();

        let outcome = router.navigate("/");
        assert_eq!(outcome.location().unwrap().name, LOGIN_ROUTE);
    }

    #[test]
    fn test_unknown_location_is_not_found() {
        let (mut router, _) = router(None);

        assert_eq!(
            router.navigate("/nope"),
            NavigationOutcome::NotFound("/nope".to_string())
        );
        assert!(router.current().is_none());
        assert!(matches!(router.navigate_to("Nope"), NavigationOutcome::NotFound(_)));
    }

    #[test]
    fn test_navigate_to_rejects_parameterized_route() {
        let (mut router, _) = router(Some(("abc123", "u1")));

        assert_eq!(
            router.navigate_to("CollectionView"),
            NavigationOutcome::NotFound("CollectionView".to_string())
        );
        assert!(router.current().is_none());

        let outcome = router.navigate_to("Collections");
        assert_eq!(outcome.location().unwrap().path, "/collections");
    }
}
