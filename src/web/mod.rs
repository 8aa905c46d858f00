//! Server-side HTTP boundary.
//!
//! This module holds the framework-neutral request/response types and the
//! decorators that enforce request integrity:
//! - [`CsrfGuard`]: rejects mutating requests without a valid token pair
//! - [`SecurityHeaders`]: attaches the `Content-Security-Policy` header
//!
//! # Design Principles
//!
//! 1. **No Framework Dependencies**: Framework integrations convert their
//!    native request into a [`Request`] and back from a [`Response`].
//!
//! 2. **Same Shape In, Same Shape Out**: Every decorator is a [`Layer`]
//!    that takes a [`Handler`] and returns a [`Handler`], so they compose.
//!
//! 3. **Fixed Order**: The CSRF check runs before application logic; the
//!    security headers are attached last, to every response including
//!    CSRF rejections. [`protect`] applies exactly this stack.
//!
//! # Example Flow
//!
//! ```
//! use session_integrity::web::{protect, Handler, HttpMethod, Request, Response};
//! use session_integrity::{AdminConfig, SecurityConfig};
//!
//! let config = SecurityConfig::new(AdminConfig::new("admin@example.com"), "https://learn.example.com");
//! let handler = protect(|_: &Request, _: &()| Response::new(204), &config);
//!
//! let request = Request::new("req-1", HttpMethod::Delete, "/api/history/7");
//! let response = handler.call(&request, &());
//!
//! assert_eq!(response.status(), 403);
//! assert!(response.header("content-security-policy").is_some());
//! ```

mod csrf_guard;
mod handler;
mod http;
mod security_headers;

pub use csrf_guard::{rejection, CsrfGuard, CsrfProtected, REJECTION_MESSAGE, REJECTION_STATUS};
pub use handler::{Handler, Layer};
pub use http::{HttpMethod, Request, Response, UnknownMethod};
pub use security_headers::{SecurityHeaders, WithSecurityHeaders};

use crate::config::SecurityConfig;

/// The standard stack: security headers around the CSRF guard around `handler`.
pub fn protect<H>(handler: H, config: &SecurityConfig) -> WithSecurityHeaders<CsrfProtected<H>> {
    SecurityHeaders::new(&config.csp).wrap(CsrfGuard::new().wrap(handler))
}

/// Like [`protect`], with a custom [`CsrfGuard`] (for example one reading
/// the session token from a cookie).
pub fn protect_with<H, S>(
    handler: H,
    config: &SecurityConfig,
    guard: &CsrfGuard<S>,
) -> WithSecurityHeaders<CsrfProtected<H, S>>
where
    S: crate::csrf::SessionTokenSource + Clone,
{
    SecurityHeaders::new(&config.csp).wrap(guard.wrap(handler))
}
