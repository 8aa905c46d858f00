use std::fmt;

/// Errors that can occur in the integrity layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Required configuration is missing or malformed
    Config(ConfigError),
    /// A request or session failed an integrity check
    Violation(Violation),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Violation(v) => write!(f, "Integrity violation: {}", v),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(e) => Some(e),
            Error::Violation(v) => Some(v),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<Violation> for Error {
    fn from(v: Violation) -> Self {
        Error::Violation(v)
    }
}

/// Startup configuration failure.
///
/// Raised once while building [`SecurityConfig`](crate::SecurityConfig);
/// required settings never fall back silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank
    Missing(&'static str),
    /// A variable is set but cannot be used
    Invalid {
        /// The offending variable
        key: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "required setting '{}' is not set", key),
            ConfigError::Invalid { key, reason } => {
                write!(f, "setting '{}' is invalid: {}", key, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// An integrity violation with details about what failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The kind of violation that occurred
    pub kind: ViolationKind,
    /// Human-readable message explaining the violation
    pub message: String,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Violation {}

/// The kind of integrity violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// One or both CSRF tokens were absent or empty
    MissingCsrfToken,
    /// Both CSRF tokens were present but did not match
    CsrfTokenMismatch,
    /// A protected view was requested without a signed-in user
    Unauthenticated,
    /// A protected view requires a verified email address
    EmailUnverified,
}

impl ViolationKind {
    /// Short machine-readable label used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::MissingCsrfToken => "missing_csrf_token",
            ViolationKind::CsrfTokenMismatch => "csrf_token_mismatch",
            ViolationKind::Unauthenticated => "unauthenticated",
            ViolationKind::EmailUnverified => "email_unverified",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::MissingCsrfToken => write!(f, "Missing CSRF token"),
            ViolationKind::CsrfTokenMismatch => write!(f, "CSRF token mismatch"),
            ViolationKind::Unauthenticated => write!(f, "Unauthenticated"),
            ViolationKind::EmailUnverified => write!(f, "Email not verified"),
        }
    }
}
