//! # Routing
//!
//! Route table, navigation guard and the router that ties them to the
//! session.

mod guard;
mod navigator;
mod routes;

pub use guard::{guard, GuardDecision};
pub use navigator::{Location, NavigationOutcome, Router};
pub use routes::{
    RouteDescriptor, RouteMatch, RouteTable, RouteTableError, View, ViewLoader,
    DEFAULT_LANDING_ROUTE, LOGIN_ROUTE,
};
