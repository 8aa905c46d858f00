//! Handler and decorator traits.

use super::{Request, Response};

/// Something that turns a request into a response.
///
/// `C` is the per-request context the surrounding framework passes along
/// (route parameters, database handles, ...). Decorators forward it
/// untouched.
///
/// Closures of the shape `Fn(&Request, &C) -> Response` are handlers.
///
/// # Examples
///
/// ```
/// use session_integrity::web::{Handler, HttpMethod, Request, Response};
///
/// let handler = |_req: &Request, greeting: &&str| Response::text(200, *greeting);
///
/// let request = Request::new("req-1", HttpMethod::Get, "/");
/// let response = handler.call(&request, &"hello");
/// assert_eq!(response.body(), b"hello");
/// ```
pub trait Handler<C> {
    /// Handles a single request.
    fn call(&self, request: &Request, context: &C) -> Response;
}

impl<C, F> Handler<C> for F
where
    F: Fn(&Request, &C) -> Response,
{
    fn call(&self, request: &Request, context: &C) -> Response {
        self(request, context)
    }
}

/// A decorator that wraps a handler in another handler of the same shape.
pub trait Layer<H> {
    /// The wrapped handler type.
    type Handler;

    /// Wraps `inner`.
    fn wrap(&self, inner: H) -> Self::Handler;
}
