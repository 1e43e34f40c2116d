//! Route resolution and the employee access gate.
//!
//! [`resolve`] decides which view a session may see for a path, [`highlight`]
//! decides which navigation icon is active. The latter depends on the path
//! alone.

use crate::core::session::Session;

/// Views an employee can be routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    /// Sign-in page, also the fallback for anything the session may not see
    Login,
    /// Bills list
    Bills,
    /// New bill form
    NewBill,
}

impl Route {
    /// Path of the sign-in page
    pub const LOGIN_PATH: &'static str = "/";
    /// Path of the bills list
    pub const BILLS_PATH: &'static str = "/bills";
    /// Path of the new bill form
    pub const NEW_BILL_PATH: &'static str = "/new-bill";

    /// Canonical path of the route
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => Self::LOGIN_PATH,
            Self::Bills => Self::BILLS_PATH,
            Self::NewBill => Self::NEW_BILL_PATH,
        }
    }

    /// Matches a path, ignoring a trailing slash. Unknown paths map to `Login`.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };

        match normalized {
            Self::BILLS_PATH => Self::Bills,
            Self::NEW_BILL_PATH => Self::NewBill,
            _ => Self::Login,
        }
    }

    /// Whether only an `Employee` session may see the route
    #[must_use]
    pub const fn requires_employee(self) -> bool {
        matches!(self, Self::Bills | Self::NewBill)
    }

    /// Navigation icon lit while this route is shown
    #[must_use]
    pub const fn nav_icon(self) -> Option<NavIcon> {
        match self {
            Self::Login => None,
            Self::Bills => Some(NavIcon::Window),
            Self::NewBill => Some(NavIcon::Mail),
        }
    }
}

/// Icons of the vertical navigation bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavIcon {
    /// Bills list
    Window,
    /// New bill form
    Mail,
}

impl NavIcon {
    /// Icons in display order
    pub const ALL: [Self; 2] = [Self::Window, Self::Mail];

    /// `data-testid` of the icon in the layout
    #[must_use]
    pub const fn test_id(self) -> &'static str {
        match self {
            Self::Window => "icon-window",
            Self::Mail => "icon-mail",
        }
    }

    /// Route opened when the icon is clicked
    #[must_use]
    pub const fn target(self) -> Route {
        match self {
            Self::Window => Route::Bills,
            Self::Mail => Route::NewBill,
        }
    }
}

/// Route actually rendered for `path` given the current session.
#[must_use]
pub fn resolve(path: &str, session: Option<&Session>) -> Route {
    let requested = Route::from_path(path);
    if requested.requires_employee() && !session.is_some_and(Session::is_employee) {
        tracing::debug!(path, "employee route refused, falling back to login");
        return Route::Login;
    }
    requested
}

/// Navigation icon marked active for `path`.
#[must_use]
pub fn highlight(path: &str) -> Option<NavIcon> {
    Route::from_path(path).nav_icon()
}
