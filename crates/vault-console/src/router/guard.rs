//! # Navigation Guard
//!
//! Decides, before each route transition, whether it proceeds or is
//! redirected. Pure function of the target route and session state.

use super::routes::{RouteDescriptor, LOGIN_ROUTE};

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Enter the target route.
    Proceed,
    /// Enter the named route instead.
    Redirect(&'static str),
}

/// Evaluates a transition to `target`.
///
/// | protected | authenticated | target is Login | decision          |
/// |-----------|---------------|-----------------|-------------------|
/// | yes       | no            | -               | redirect to Login |
/// | yes       | yes           | -               | proceed           |
/// | no        | yes           | yes             | redirect to `landing` |
/// | no        | no            | yes             | proceed           |
/// | no        | any           | no              | proceed           |
///
/// The originally requested route is not remembered across a redirect.
#[must_use]
pub fn guard(
    target: &RouteDescriptor,
    is_authenticated: bool,
    landing: &'static str,
) -> GuardDecision {
    match (target.is_protected(), is_authenticated) {
        (true, false) => GuardDecision::Redirect(LOGIN_ROUTE),
        (false, true) if target.name == LOGIN_ROUTE => GuardDecision::Redirect(landing),
        _ => GuardDecision::Proceed,
    }
}
