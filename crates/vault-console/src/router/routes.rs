//! # Routes
//!
//! Defines the console's route table and path resolution.

use std::collections::HashMap;
use thiserror::Error;

/// Name of the login route.
pub const LOGIN_ROUTE: &str = "Login";

/// Route a session lands on after logging in.
pub const DEFAULT_LANDING_ROUTE: &str = "Dashboard";

/// Console pages.
///
/// The views themselves live in the UI layer; the router only hands out
/// which one to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Overview of the backend.
    Dashboard,
    /// Collection list.
    Collections,
    /// New collection form.
    CollectionNew,
    /// Records of one collection.
    CollectionView,
    /// Schema and rules of one collection.
    CollectionSettings,
    /// New record form.
    RecordNew,
    /// Record editor.
    RecordEdit,
    /// Login form.
    Login,
}

/// Lazily evaluated view reference.
pub type ViewLoader = fn() -> View;

/// One entry of the route table.
#[derive(Debug, Clone, Copy)]
pub struct RouteDescriptor {
    /// Path pattern; `:name` segments capture parameters.
    pub path: &'static str,
    /// Unique route name.
    pub name: &'static str,
    /// Access requirement. `None` is treated as not required.
    pub requires_auth: Option<bool>,
    /// View rendered when the route is entered.
    pub view: ViewLoader,
}

impl RouteDescriptor {
    /// Route that requires a session.
    #[must_use]
    pub const fn protected(path: &'static str, name: &'static str, view: ViewLoader) -> Self {
        Self {
            path,
            name,
            requires_auth: Some(true),
            view,
        }
    }

    /// Route open to everyone.
    #[must_use]
    pub const fn public(path: &'static str, name: &'static str, view: ViewLoader) -> Self {
        Self {
            path,
            name,
            requires_auth: None,
            view,
        }
    }

    /// Returns true if entering this route requires a session.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        self.requires_auth.unwrap_or(false)
    }

    /// Returns true if the pattern has `:name` segments.
    #[must_use]
    pub fn has_params(&self) -> bool {
        segments(self.path).any(|s| s.starts_with(':'))
    }

    /// Matches `path` against this route's pattern, returning captured
    /// parameters on success.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let mut pattern = segments(self.path);
        let mut actual = segments(path);
        let mut params = HashMap::new();

        loop {
            match (pattern.next(), actual.next()) {
                (None, None) => return Some(params),
                (Some(p), Some(a)) => {
                    if let Some(param) = p.strip_prefix(':') {
                        params.insert(param.to_string(), a.to_string());
                    } else if p != a {
                        return None;
                    }
                }
                _ => return None,
            }
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Strips the query string and fragment from a location.
fn strip_location(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

/// Invalid route table configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteTableError {
    /// No route named `Login`.
    #[error("route table has no 'Login' route")]
    MissingLogin,

    /// The `Login` route requires a session.
    #[error("'Login' route must not require authentication")]
    ProtectedLogin,

    /// Two routes share a name.
    #[error("duplicate route name: {0}")]
    DuplicateName(&'static str),

    /// The landing route is not in the table.
    #[error("landing route '{0}' is not in the route table")]
    UnknownLanding(&'static str),

    /// A redirect target has path parameters.
    #[error("redirect target '{0}' must not have path parameters")]
    ParameterizedTarget(&'static str),
}

/// A successful path resolution.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched route.
    pub route: RouteDescriptor,
    /// Captured path parameters.
    pub params: HashMap<String, String>,
}

/// Ordered, validated set of routes.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
    landing: &'static str,
}

impl RouteTable {
    /// Builds a table, checking that route names are unique, that exactly
    /// one public `Login` route exists, and that `landing` is present.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteTableError`] describing the first problem found.
    pub fn new(
        routes: Vec<RouteDescriptor>,
        landing: &'static str,
    ) -> Result<Self, RouteTableError> {
        for (i, route) in routes.iter().enumerate() {
            if routes[..i].iter().any(|r| r.name == route.name) {
                return Err(RouteTableError::DuplicateName(route.name));
            }
        }

        let login = routes
            .iter()
            .find(|r| r.name == LOGIN_ROUTE)
            .ok_or(RouteTableError::MissingLogin)?;
        if login.is_protected() {
            return Err(RouteTableError::ProtectedLogin);
        }

        if login.has_params() {
            return Err(RouteTableError::ParameterizedTarget(LOGIN_ROUTE));
        }

        let target = routes
            .iter()
            .find(|r| r.name == landing)
            .ok_or(RouteTableError::UnknownLanding(landing))?;
        if target.has_params() {
            return Err(RouteTableError::ParameterizedTarget(landing));
        }

        Ok(Self { routes, landing })
    }

    /// The console's route table.
    ///
    /// More specific literal paths precede parameterized siblings because
    /// resolution takes the first match.
    #[must_use]
    pub fn console() -> Self {
        Self {
            routes: vec![
                RouteDescriptor::protected("/", "Dashboard", || View::Dashboard),
                RouteDescriptor::protected("/collections", "Collections", || View::Collections),
                RouteDescriptor::protected("/collections/new", "CollectionNew", || {
                    View::CollectionNew
                }),
                RouteDescriptor::protected("/collections/:name", "CollectionView", || {
                    View::CollectionView
                }),
                RouteDescriptor::protected(
                    "/collections/:name/settings",
                    "CollectionSettings",
                    || View::CollectionSettings,
                ),
                RouteDescriptor::protected("/collections/:name/new", "RecordNew", || {
                    View::RecordNew
                }),
                RouteDescriptor::protected("/collections/:name/edit/:id", "RecordEdit", || {
                    View::RecordEdit
                }),
                RouteDescriptor::public("/login", LOGIN_ROUTE, || View::Login),
            ],
            landing: DEFAULT_LANDING_ROUTE,
        }
    }

    /// Returns the landing route name.
    #[must_use]
    pub fn landing(&self) -> &'static str {
        self.landing
    }

    /// Returns all routes in declaration order.
    #[must_use]
    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    /// Finds a route by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&RouteDescriptor> {
        self.routes.iter().find(|r| r.name == name)
    }

    /// Resolves a location to the first matching route.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let path = strip_location(path);
        self.routes.iter().find_map(|route| {
            route.matches(path).map(|params| RouteMatch {
                route: *route,
                params,
            })
        })
    }
}
