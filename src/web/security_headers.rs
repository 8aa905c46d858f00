use crate::csp::{build_policy, CspDirectiveTable, CSP_HEADER};

use super::{Handler, Layer, Request, Response};

/// Layer that attaches a `Content-Security-Policy` header to every response.
///
/// The header value is rendered once when the layer is built; handlers that
/// already set the header keep their own value.
///
/// # Examples
///
/// ```
/// use session_integrity::web::{Handler, HttpMethod, Layer, Request, Response, SecurityHeaders};
/// use session_integrity::CspDirectiveTable;
///
/// let table = CspDirectiveTable::new().with("default-src", ["'self'"]);
/// let handler = SecurityHeaders::new(&table).wrap(|_: &Request, _: &()| Response::new(200));
///
/// let response = handler.call(&Request::new("req-1", HttpMethod::Get, "/"), &());
/// assert_eq!(response.header("content-security-policy"), Some("default-src 'self'"));
/// ```
#[derive(Debug, Clone)]
pub struct SecurityHeaders {
    policy: String,
}

impl SecurityHeaders {
    /// Renders `table` into the header value.
    pub fn new(table: &CspDirectiveTable) -> Self {
        Self {
            policy: build_policy(table),
        }
    }

    /// Returns the rendered policy.
    pub fn policy(&self) -> &str {
        &self.policy
    }

    /// Attaches the policy header to `response` unless one is already set.
    pub fn apply(&self, response: Response) -> Response {
        if response.header(CSP_HEADER).is_some() {
            return response;
        }
        response.with_header(CSP_HEADER, self.policy.clone())
    }
}

impl<H> Layer<H> for SecurityHeaders {
    type Handler = WithSecurityHeaders<H>;

    fn wrap(&self, inner: H) -> Self::Handler {
        WithSecurityHeaders {
            inner,
            headers: self.clone(),
        }
    }
}

/// A handler wrapped by [`SecurityHeaders`].
#[derive(Debug, Clone)]
pub struct WithSecurityHeaders<H> {
    inner: H,
    headers: SecurityHeaders,
}

impl<C, H: Handler<C>> Handler<C> for WithSecurityHeaders<H> {
    fn call(&self, request: &Request, context: &C) -> Response {
        self.headers.apply(self.inner.call(request, context))
    }
}
