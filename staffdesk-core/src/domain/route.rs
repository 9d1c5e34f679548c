//! Routes, their access level, and who is asking

use std::fmt;

use serde::Serialize;

/// Every page reachable through a location fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Home,
    Register,
    VerifyEmail,
    Login,
    Profile,
    Employees,
    Departments,
    Accounts,
    Requests,
}

/// Who may see a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    AdminOnly,
}

/// The router's view of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    Anonymous,
    User,
    Admin,
}

impl Principal {
    pub fn is_signed_in(&self) -> bool {
        !matches!(self, Principal::Anonymous)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Principal::Admin)
    }
}

impl Route {
    pub const ALL: [Route; 9] = [
        Route::Home,
        Route::Register,
        Route::VerifyEmail,
        Route::Login,
        Route::Profile,
        Route::Employees,
        Route::Departments,
        Route::Accounts,
        Route::Requests,
    ];

    /// Parse a location fragment.
    ///
    /// Accepts `#/login`, `/login` and `login`; a trailing slash is ignored.
    /// Empty and unknown fragments map to Home.
    pub fn parse(fragment: &str) -> Route {
        let path = fragment.trim();
        let path = path.strip_prefix('#').unwrap_or(path);
        let path = path.trim_matches('/');

        match path {
            "register" => Route::Register,
            "verify-email" => Route::VerifyEmail,
            "login" => Route::Login,
            "profile" => Route::Profile,
            "employees" => Route::Employees,
            "departments" => Route::Departments,
            "accounts" => Route::Accounts,
            "requests" => Route::Requests,
            _ => Route::Home,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Register => "/register",
            Route::VerifyEmail => "/verify-email",
            Route::Login => "/login",
            Route::Profile => "/profile",
            Route::Employees => "/employees",
            Route::Departments => "/departments",
            Route::Accounts => "/accounts",
            Route::Requests => "/requests",
        }
    }

    /// `#/login`
    pub fn fragment(&self) -> String {
        format!("#{}", self.path())
    }

    /// Guard table
    pub fn access(&self) -> Access {
        match self {
            Route::Home | Route::Register | Route::VerifyEmail | Route::Login => Access::Public,
            Route::Profile | Route::Requests => Access::Authenticated,
            Route::Employees | Route::Departments | Route::Accounts => Access::AdminOnly,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(Route::parse("#/login"), Route::Login);
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("login/"), Route::Login);
        assert_eq!(Route::parse("#/verify-email"), Route::VerifyEmail);
    }

    #[test]
    fn test_empty_and_unknown_are_home() {
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("#/"), Route::Home);
        assert_eq!(Route::parse("#/nope"), Route::Home);
    }

    #[test]
    fn test_fragment_roundtrip() {
        for route in Route::ALL {
            assert_eq!(Route::parse(&route.fragment()), route);
        }
    }
}
