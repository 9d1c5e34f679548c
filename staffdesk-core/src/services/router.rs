//! Router - fragment to page, through the access guard
//!
//! Navigation is a pure function of (fragment, principal). The router keeps
//! no state of its own, so reloading or replaying history always lands on
//! whatever the current session allows.

use serde::Serialize;

use crate::domain::{Access, Principal, Route};

pub const ADMIN_ONLY_WARNING: &str = "Access denied: Admin only";

/// Outcome of one navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Navigation {
    /// Show this page
    Render { route: Route },
    /// Change the fragment to `to`; `warning` is shown to the user
    Redirect {
        from: Route,
        to: Route,
        #[serde(skip_serializing_if = "Option::is_none")]
        warning: Option<String>,
    },
}

impl Navigation {
    /// The page that ends up displayed
    pub fn destination(&self) -> Route {
        match self {
            Navigation::Render { route } => *route,
            Navigation::Redirect { to, .. } => *to,
        }
    }
}

pub struct Router;

impl Router {
    /// Resolve a fragment for the given principal
    pub fn navigate(fragment: &str, principal: Principal) -> Navigation {
        Self::resolve(Route::parse(fragment), principal)
    }

    /// Apply the guard table to an already-parsed route
    pub fn resolve(route: Route, principal: Principal) -> Navigation {
        match route.access() {
            Access::Public => Navigation::Render { route },
            Access::Authenticated | Access::AdminOnly if !principal.is_signed_in() => {
                tracing::debug!(%route, "redirecting anonymous visitor to login");
                Navigation::Redirect {
                    from: route,
                    to: Route::Login,
                    warning: None,
                }
            }
            Access::AdminOnly if !principal.is_admin() => {
                tracing::debug!(%route, "redirecting non-admin to home");
                Navigation::Redirect {
                    from: route,
                    to: Route::Home,
                    warning: Some(ADMIN_ONLY_WARNING.to_string()),
                }
            }
            Access::Authenticated | Access::AdminOnly => Navigation::Render { route },
        }
    }
}
