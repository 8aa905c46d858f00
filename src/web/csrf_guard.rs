//! CSRF guard for mutating requests.
//!
//! ```text
//! Request
//!   ↓
//! GET? ──yes──> inner handler
//!   ↓ no
//! CsrfTokenPair::from_request (x-csrf-token + session source)
//!   ↓
//! valid? ──no──> 403 {"error":"Invalid CSRF token"}
//!   ↓ yes
//! inner handler (response returned unchanged)
//! ```

use serde::Serialize;

use crate::csrf::{CsrfTokenPair, HeaderSessionToken, SessionTokenSource};

use super::{Handler, HttpMethod, Layer, Request, Response};

/// Status returned when a request fails CSRF validation.
pub const REJECTION_STATUS: u16 = 403;

/// Error message in the rejection body.
pub const REJECTION_MESSAGE: &str = "Invalid CSRF token";

#[derive(Debug, Serialize)]
struct RejectionBody {
    error: &'static str,
}

/// Builds the response returned for a failed CSRF check.
pub fn rejection() -> Response {
    Response::json(
        REJECTION_STATUS,
        &RejectionBody {
            error: REJECTION_MESSAGE,
        },
    )
}

/// Layer that rejects mutating requests without a valid CSRF token pair.
///
/// # Examples
///
/// ```
/// use session_integrity::web::{CsrfGuard, Handler, HttpMethod, Layer, Request, Response};
///
/// let guarded = CsrfGuard::new().wrap(|_: &Request, _: &()| Response::new(201));
///
/// let ok = Request::new("req-1", HttpMethod::Post, "/api/notes")
///     .with_header("x-csrf-token", "abc")
///     .with_header("x-session-token", "abc");
/// assert_eq!(guarded.call(&ok, &()).status(), 201);
///
/// let forged = Request::new("req-2", HttpMethod::Post, "/api/notes")
///     .with_header("x-csrf-token", "abc")
///     .with_header("x-session-token", "xyz");
/// assert_eq!(guarded.call(&forged, &()).status(), 403);
/// ```
#[derive(Debug, Clone)]
pub struct CsrfGuard<S = HeaderSessionToken> {
    source: S,
}

impl CsrfGuard<HeaderSessionToken> {
    /// Creates a guard reading both tokens from request headers.
    pub fn new() -> Self {
        Self {
            source: HeaderSessionToken,
        }
    }
}

impl Default for CsrfGuard<HeaderSessionToken> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SessionTokenSource> CsrfGuard<S> {
    /// Creates a guard reading the session token from `source`.
    pub fn with_source(source: S) -> Self {
        Self { source }
    }
}

impl<S, H> Layer<H> for CsrfGuard<S>
where
    S: SessionTokenSource + Clone,
{
    type Handler = CsrfProtected<H, S>;

    fn wrap(&self, inner: H) -> Self::Handler {
        CsrfProtected {
            inner,
            source: self.source.clone(),
        }
    }
}

/// A handler guarded by [`CsrfGuard`].
#[derive(Debug, Clone)]
pub struct CsrfProtected<H, S = HeaderSessionToken> {
    inner: H,
    source: S,
}

impl<C, H, S> Handler<C> for CsrfProtected<H, S>
where
    H: Handler<C>,
    S: SessionTokenSource,
{
    fn call(&self, request: &Request, context: &C) -> Response {
        if request.method() == HttpMethod::Get {
            return self.inner.call(request, context);
        }

        let pair = CsrfTokenPair::from_request(request, &self.source);

        if let Err(violation) = pair.check() {
            tracing::warn!(
                request_id = %request.request_id(),
                method = %request.method(),
                path = %request.path(),
                reason = violation.kind.as_str(),
                "rejected request: {}",
                violation.message
            );
            return rejection();
        }

        tracing::debug!(
            request_id = %request.request_id(),
            method = %request.method(),
            path = %request.path(),
            "CSRF token accepted"
        );

        self.inner.call(request, context)
    }
}
