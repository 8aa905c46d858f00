//! CSRF token validation.
//!
//! Validation is a pure predicate over a [`CsrfTokenPair`]. Where the
//! session half of the pair comes from is a [`SessionTokenSource`]: the
//! default reads the `x-session-token` header, while [`CookieSessionToken`]
//! reads a server-issued cookie that page scripts cannot set.

use crate::error::{Violation, ViolationKind};
use crate::token::Token;
use crate::web::Request;

/// Header carrying the token echoed by the client.
pub const CSRF_TOKEN_HEADER: &str = "x-csrf-token";

/// Header carrying the session-bound token.
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// Checks a request-supplied token against a session-bound token.
///
/// Returns `false` when either token is absent or empty; otherwise compares
/// them in constant time. Never panics.
///
/// # Examples
///
/// ```
/// use session_integrity::{is_valid, Token};
///
/// let a = Token::new("abc");
/// let b = Token::new("abc");
/// assert!(is_valid(Some(&a), Some(&b)));
/// assert!(!is_valid(Some(&a), None));
/// assert!(!is_valid(Some(&Token::new("")), Some(&Token::new(""))));
/// ```
pub fn is_valid(request_token: Option<&Token>, session_token: Option<&Token>) -> bool {
    check(request_token, session_token).is_ok()
}

/// Like [`is_valid`], but reports why a pair was rejected.
///
/// # Errors
///
/// - [`ViolationKind::MissingCsrfToken`] if either token is absent or empty
/// - [`ViolationKind::CsrfTokenMismatch`] if both are present but differ
pub fn check(request_token: Option<&Token>, session_token: Option<&Token>) -> Result<(), Violation> {
    let (Some(request_token), Some(session_token)) = (request_token, session_token) else {
        return Err(Violation::new(
            ViolationKind::MissingCsrfToken,
            "CSRF token pair is incomplete",
        ));
    };

    if request_token.is_empty() || session_token.is_empty() {
        return Err(Violation::new(
            ViolationKind::MissingCsrfToken,
            "CSRF token pair contains an empty token",
        ));
    }

    if request_token.ct_eq(session_token) {
        Ok(())
    } else {
        Err(Violation::new(
            ViolationKind::CsrfTokenMismatch,
            "CSRF token does not match session token",
        ))
    }
}

/// The two tokens extracted from a single request.
///
/// Lives for one request and is never persisted.
#[derive(Debug)]
pub struct CsrfTokenPair {
    /// Token echoed by the client in `x-csrf-token`
    pub request_token: Option<Token>,
    /// Token bound to the session
    pub session_token: Option<Token>,
}

impl CsrfTokenPair {
    /// Extracts the pair from a request, reading the session half from `source`.
    pub fn from_request<S: SessionTokenSource + ?Sized>(request: &Request, source: &S) -> Self {
        Self {
            request_token: request.header(CSRF_TOKEN_HEADER).map(Token::new),
            session_token: source.session_token(request),
        }
    }

    /// Validates the pair.
    ///
    /// # Errors
    ///
    /// See [`check`].
    pub fn check(&self) -> Result<(), Violation> {
        check(self.request_token.as_ref(), self.session_token.as_ref())
    }

    /// Returns `true` if the pair validates.
    pub fn is_valid(&self) -> bool {
        self.check().is_ok()
    }
}

/// Resolves the session-bound half of a CSRF token pair.
pub trait SessionTokenSource {
    /// Returns the session token for this request, if one is available.
    fn session_token(&self, request: &Request) -> Option<Token>;
}

/// Reads the session token from the `x-session-token` request header.
///
/// Both halves of the pair are then client-supplied; pair it with
/// [`CookieSessionToken`] where the session half must come from a channel
/// the page cannot write.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderSessionToken;

impl SessionTokenSource for HeaderSessionToken {
    fn session_token(&self, request: &Request) -> Option<Token> {
        request.header(SESSION_TOKEN_HEADER).map(Token::new)
    }
}

/// Reads the session token from a named cookie.
///
/// # Examples
///
/// ```
/// use session_integrity::{CookieSessionToken, SessionTokenSource};
/// use session_integrity::web::{HttpMethod, Request};
///
/// let source = CookieSessionToken::new("__Host-csrf");
/// let request = Request::new("req-1", HttpMethod::Post, "/api/notes")
///     .with_header("cookie", "__Host-csrf=abc");
///
/// let token = source.session_token(&request).expect("cookie present");
/// assert_eq!(token.expose_secret(), "abc");
/// ```
#[derive(Debug, Clone)]
pub struct CookieSessionToken {
    cookie_name: String,
}

impl CookieSessionToken {
    /// Creates a source reading the given cookie.
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
        }
    }

    /// Returns the cookie name.
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }
}

impl SessionTokenSource for CookieSessionToken {
    fn session_token(&self, request: &Request) -> Option<Token> {
        request.cookie(&self.cookie_name).map(Token::new)
    }
}

impl<F> SessionTokenSource for F
where
    F: Fn(&Request) -> Option<Token>,
{
    fn session_token(&self, request: &Request) -> Option<Token> {
        self(request)
    }
}
