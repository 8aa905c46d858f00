//! Request and session integrity layer.
//!
//! This crate decides whether a request or a navigation may proceed:
//! - **CSRF guarding**: mutating requests reach their handler only with a
//!   valid token pair, otherwise they get a `403` JSON rejection
//! - **Security headers**: a deterministic `Content-Security-Policy` value
//!   rendered from a declarative directive table
//! - **Session gating**: protected views render only for a resolved,
//!   signed-in (and, if required, verified) user; everyone else is redirected
//! - **Admin identity**: exact match against the configured admin address
//!
//! Authentication itself (credentials, token issuance, email verification)
//! belongs to the identity provider; this crate only consumes its signals.
//!
//! # Core Types
//!
//! - [`Token`]: Token wrapper that redacts itself in logs and compares in constant time
//! - [`CsrfTokenPair`]: The two tokens extracted from one request
//! - [`web::CsrfGuard`]: Handler decorator enforcing CSRF validation
//! - [`CspDirectiveTable`]: Ordered CSP directives, rendered by [`build_policy`]
//! - [`session::SessionGuard`]: Auth-state observer issuing redirects
//! - [`SecurityConfig`]: Process-wide configuration built once at startup
//!
//! # Examples
//!
//! ```
//! use session_integrity::web::{protect, Handler, HttpMethod, Request, Response};
//! use session_integrity::{AdminConfig, SecurityConfig};
//!
//! let config = SecurityConfig::new(AdminConfig::new("admin@example.com"), "https://learn.example.com");
//! let handler = protect(|_: &Request, _: &()| Response::text(200, "saved"), &config);
//!
//! let request = Request::new("req-42", HttpMethod::Post, "/api/progress")
//!     .with_header("x-csrf-token", "abc")
//!     .with_header("x-session-token", "abc");
//!
//! let response = handler.call(&request, &());
//! assert_eq!(response.status(), 200);
//! assert_eq!(response.body(), b"saved");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod admin;
mod config;
mod csp;
mod csrf;
mod error;
pub mod robots;
pub mod session;
mod token;
pub mod web;

pub use admin::{AdminConfig, Permission};
pub use config::{SecurityConfig, ADMIN_EMAIL_VAR, DEFAULT_SITE_URL, SITE_URL_VAR};
pub use csp::{build_policy, CspDirectiveTable, CSP_HEADER};
pub use csrf::{
    check, is_valid, CookieSessionToken, CsrfTokenPair, HeaderSessionToken, SessionTokenSource,
    CSRF_TOKEN_HEADER, SESSION_TOKEN_HEADER,
};
pub use error::{ConfigError, Error, Violation, ViolationKind};
pub use token::Token;
