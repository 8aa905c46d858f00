use std::fmt;

use subtle::ConstantTimeEq;

/// A CSRF or session token that never shows up in logs.
///
/// Tokens arrive from request headers and cookies and must not leak
/// through `Debug` or `Display`, since rejected requests are logged.
/// The raw value is only reachable through [`expose_secret`](Self::expose_secret).
///
/// # Examples
///
/// ```
/// use session_integrity::Token;
///
/// let token = Token::new("f3a9c1");
///
/// assert_eq!(format!("{:?}", token), "[REDACTED]");
/// assert_eq!(token.to_string(), "[REDACTED]");
/// assert_eq!(token.expose_secret(), "f3a9c1");
/// ```
// Do NOT derive Debug, Display, PartialEq or Clone: equality goes through ct_eq.
pub struct Token {
    inner: String,
}

impl Token {
    /// Wraps a raw token value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: value.into(),
        }
    }

    /// Explicitly exposes the raw token value.
    pub fn expose_secret(&self) -> &str {
        &self.inner
    }

    /// Returns `true` if the token carries no characters.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Compares two tokens in time independent of where they first differ.
    ///
    /// Tokens of different length compare unequal; only the length is
    /// observable through timing.
    ///
    /// # Examples
    ///
    /// ```
    /// use session_integrity::Token;
    ///
    /// assert!(Token::new("abc").ct_eq(&Token::new("abc")));
    /// assert!(!Token::new("abc").ct_eq(&Token::new("abd")));
    /// ```
    pub fn ct_eq(&self, other: &Token) -> bool {
        self.inner.as_bytes().ct_eq(other.inner.as_bytes()).into()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}
