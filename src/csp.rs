//! Content-Security-Policy header generation.
//!
//! A [`CspDirectiveTable`] is static, trusted configuration: directive names
//! and source expressions are emitted verbatim, without escaping. Output
//! order follows insertion order so the header is byte-for-byte stable.

/// Name of the response header carrying the policy.
pub const CSP_HEADER: &str = "Content-Security-Policy";

/// Ordered mapping from directive name to source expressions.
///
/// An empty source list means the directive is emitted bare, as with
/// `upgrade-insecure-requests`.
///
/// # Examples
///
/// ```
/// use session_integrity::{build_policy, CspDirectiveTable};
///
/// let table = CspDirectiveTable::new()
///     .with("default-src", ["'self'"])
///     .with("img-src", ["'self'", "data:"])
///     .with("upgrade-insecure-requests", [] as [&str; 0]);
///
/// assert_eq!(
///     build_policy(&table),
///     "default-src 'self'; img-src 'self' data:; upgrade-insecure-requests"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CspDirectiveTable {
    directives: Vec<(String, Vec<String>)>,
}

impl CspDirectiveTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            directives: Vec::new(),
        }
    }

    /// Adds a directive, returning the table for chaining.
    ///
    /// Re-adding a directive that is already present replaces its sources
    /// but keeps its original position.
    pub fn with<I, S>(mut self, name: impl Into<String>, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let sources: Vec<String> = sources.into_iter().map(Into::into).collect();

        match self.directives.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = sources,
            None => self.directives.push((name, sources)),
        }

        self
    }

    /// Returns the sources for a directive, if present.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.directives
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, sources)| sources.as_slice())
    }

    /// Iterates directives in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.directives
            .iter()
            .map(|(name, sources)| (name.as_str(), sources.as_slice()))
    }

    /// Number of directives in the table.
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    /// Returns `true` if the table has no directives.
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

impl Default for CspDirectiveTable {
    /// The platform policy: self-hosted assets plus the Google identity and
    /// App Check origins the client talks to.
    fn default() -> Self {
        Self::new()
            .with("default-src", ["'self'"])
            .with(
                "script-src",
                [
                    "'self'",
                    "'unsafe-inline'",
                    "'unsafe-eval'",
                    "https://apis.google.com",
                    "https://www.gstatic.com",
                    "https://www.google.com/recaptcha/",
                ],
            )
            .with(
                "style-src",
                ["'self'", "'unsafe-inline'", "https://fonts.googleapis.com"],
            )
            .with("font-src", ["'self'", "https://fonts.gstatic.com", "data:"])
            .with("img-src", ["'self'", "data:", "blob:", "https:"])
            .with(
                "connect-src",
                [
                    "'self'",
                    "https://*.googleapis.com",
                    "https://*.firebaseio.com",
                    "https://firebaseappcheck.googleapis.com",
                    "wss://*.firebaseio.com",
                ],
            )
            .with(
                "frame-src",
                [
                    "'self'",
                    "https://*.firebaseapp.com",
                    "https://www.google.com/recaptcha/",
                ],
            )
            .with("object-src", ["'none'"])
            .with("base-uri", ["'self'"])
            .with("form-action", ["'self'"])
            .with("frame-ancestors", ["'none'"])
            .with("upgrade-insecure-requests", [] as [&str; 0])
    }
}

/// Renders a directive table as a single `Content-Security-Policy` value.
///
/// Each directive becomes `"<name> <source> <source> ..."`, or just
/// `"<name>"` when its source list is empty; fragments are joined with
/// `"; "`. Pure and infallible.
pub fn build_policy(table: &CspDirectiveTable) -> String {
    table
        .iter()
        .map(|(name, sources)| {
            if sources.is_empty() {
                name.to_string()
            } else {
                format!("{} {}", name, sources.join(" "))
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
