//! Navigation gate over the client route table.

use crate::session::{AuthSession, SessionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Profile,
    Products,
    ProductCreate,
    Auth,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub guest_only: bool,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Home,
        Route::Profile,
        Route::Products,
        Route::ProductCreate,
        Route::Auth,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Profile => "/profile",
            Route::Products => "/products",
            Route::ProductCreate => "/products/create",
            Route::Auth => "/auth",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Profile => "Profile",
            Route::Products => "Products",
            Route::ProductCreate => "ProductCreate",
            Route::Auth => "Auth",
        }
    }

    /// Exact match; a single trailing slash is ignored.
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = match path.strip_suffix('/') {
            Some(rest) if !rest.is_empty() => rest,
            _ => path,
        };
        Route::ALL.into_iter().find(|r| r.path() == trimmed)
    }

    pub fn meta(self) -> RouteMeta {
        match self {
            Route::Profile | Route::Products | Route::ProductCreate => RouteMeta {
                requires_auth: true,
                guest_only: false,
            },
            Route::Auth => RouteMeta {
                requires_auth: false,
                guest_only: true,
            },
            Route::Home => RouteMeta::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Proceed,
    Redirect(Route),
}

/// Decide a navigation to `to`.
///
/// Before the session is ready every navigation proceeds; the UI is expected
/// to show a loading surface until then.
pub fn check(to: Route, state: &SessionState) -> Navigation {
    if !state.ready {
        tracing::debug!(route = to.name(), "session not ready, proceeding");
        return Navigation::Proceed;
    }

    let meta = to.meta();
    if meta.requires_auth && !state.is_authenticated() {
        tracing::debug!(route = to.name(), "route requires identity, redirecting");
        return Navigation::Redirect(Route::Auth);
    }
    if meta.guest_only && state.is_authenticated() {
        tracing::debug!(route = to.name(), "already signed in, redirecting");
        return Navigation::Redirect(Route::Home);
    }
    Navigation::Proceed
}

impl AuthSession {
    pub fn before_navigate(&self, to: Route) -> Navigation {
        check(to, &self.snapshot())
    }
}
