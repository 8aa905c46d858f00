//! Pure access decision for protected views.

use std::fmt;

use crate::error::{Violation, ViolationKind};

use super::AuthState;

/// Caller-supplied requirements for a protected view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardOptions {
    /// Whether a verified email is needed to render
    pub require_email_verification: bool,
    /// The originally requested path, carried to the login view
    pub redirect_path: String,
}

impl GuardOptions {
    /// Requires a signed-in user for `redirect_path`.
    pub fn new(redirect_path: impl Into<String>) -> Self {
        Self {
            require_email_verification: false,
            redirect_path: redirect_path.into(),
        }
    }

    /// Additionally requires a verified email.
    pub fn require_email_verification(mut self) -> Self {
        self.require_email_verification = true;
        self
    }
}

/// Locations of the views the guard redirects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardRoutes {
    /// Sign-in view
    pub login: String,
    /// Email verification view
    pub verify_email: String,
}

impl Default for GuardRoutes {
    fn default() -> Self {
        Self {
            login: "/login".to_string(),
            verify_email: "/verify-email".to_string(),
        }
    }
}

/// Outcome of evaluating an [`AuthState`] against [`GuardOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// The provider is still resolving; no decision may be made
    Loading,
    /// No signed-in user
    Unauthenticated,
    /// Signed in, but the email must be verified first
    Unverified,
    /// The protected view may render
    Authorized,
}

impl GuardState {
    /// Returns the violation this state represents, if any.
    pub fn violation(&self) -> Option<Violation> {
        match self {
            GuardState::Unauthenticated => Some(Violation::new(
                ViolationKind::Unauthenticated,
                "Sign-in required",
            )),
            GuardState::Unverified => Some(Violation::new(
                ViolationKind::EmailUnverified,
                "Email verification required",
            )),
            GuardState::Loading | GuardState::Authorized => None,
        }
    }
}

impl fmt::Display for GuardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardState::Loading => write!(f, "loading"),
            GuardState::Unauthenticated => write!(f, "unauthenticated"),
            GuardState::Unverified => write!(f, "unverified"),
            GuardState::Authorized => write!(f, "authorized"),
        }
    }
}

/// Decides whether a protected view may render.
///
/// # Examples
///
/// ```
/// use session_integrity::session::{evaluate, AuthState, GuardOptions, GuardState, Identity};
///
/// let options = GuardOptions::new("/mathlab").require_email_verification();
///
/// assert_eq!(evaluate(&AuthState::loading(), &options), GuardState::Loading);
/// assert_eq!(evaluate(&AuthState::signed_out(), &options), GuardState::Unauthenticated);
///
/// let unverified = AuthState::signed_in(Identity::new("u1", "a@example.com"), false);
/// assert_eq!(evaluate(&unverified, &options), GuardState::Unverified);
/// ```
pub fn evaluate(state: &AuthState, options: &GuardOptions) -> GuardState {
    if state.loading {
        return GuardState::Loading;
    }

    if state.user.is_none() {
        return GuardState::Unauthenticated;
    }

    if options.require_email_verification && !state.is_email_verified {
        return GuardState::Unverified;
    }

    GuardState::Authorized
}

/// Where the guard sends the user, valid for one decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    /// Destination path
    pub path: String,
    /// Location to return to afterwards
    pub return_to: Option<String>,
}

impl RedirectTarget {
    /// The login view, returning to `redirect_path`.
    pub fn login(routes: &GuardRoutes, redirect_path: &str) -> Self {
        Self {
            path: routes.login.clone(),
            return_to: Some(redirect_path.to_string()),
        }
    }

    /// The email verification view.
    pub fn verify_email(routes: &GuardRoutes) -> Self {
        Self {
            path: routes.verify_email.clone(),
            return_to: None,
        }
    }

    /// Renders the navigation URL, form-encoding the return path.
    ///
    /// # Examples
    ///
    /// ```
    /// use session_integrity::session::{GuardRoutes, RedirectTarget};
    ///
    /// let target = RedirectTarget::login(&GuardRoutes::default(), "/mathlab/history");
    /// assert_eq!(target.href(), "/login?redirectTo=%2Fmathlab%2Fhistory");
    /// ```
    pub fn href(&self) -> String {
        match &self.return_to {
            Some(return_to) => {
                let encoded: String =
                    url::form_urlencoded::byte_serialize(return_to.as_bytes()).collect();
                format!("{}?redirectTo={}", self.path, encoded)
            }
            None => self.path.clone(),
        }
    }

    /// Redirect for `state`, if it calls for one.
    pub fn for_state(state: GuardState, routes: &GuardRoutes, options: &GuardOptions) -> Option<Self> {
        match state {
            GuardState::Unauthenticated => Some(Self::login(routes, &options.redirect_path)),
            GuardState::Unverified => Some(Self::verify_email(routes)),
            GuardState::Loading | GuardState::Authorized => None,
        }
    }
}
