//! Process-wide security configuration.
//!
//! Built once at startup and passed by reference to the components that
//! need it. Required settings fail loudly; optional ones fall back with a
//! warning.

use url::Url;

use crate::admin::AdminConfig;
use crate::csp::CspDirectiveTable;
use crate::error::{ConfigError, Error};

/// Variable holding the admin email address (required).
pub const ADMIN_EMAIL_VAR: &str = "ADMIN_EMAIL";

/// Variable holding the public base URL of the site (optional).
pub const SITE_URL_VAR: &str = "SITE_URL";

/// Base URL used when `SITE_URL` is not set.
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";

/// Immutable configuration shared by the integrity layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityConfig {
    /// Admin identity
    pub admin: AdminConfig,
    /// Public base URL, without a trailing slash
    pub site_url: String,
    /// Content-Security-Policy directives
    pub csp: CspDirectiveTable,
}

impl SecurityConfig {
    /// Creates a config with the default policy table.
    pub fn new(admin: AdminConfig, site_url: impl Into<String>) -> Self {
        Self {
            admin,
            site_url: site_url.into().trim_end_matches('/').to_string(),
            csp: CspDirectiveTable::default(),
        }
    }

    /// Replaces the policy table.
    pub fn with_csp(mut self, csp: CspDirectiveTable) -> Self {
        self.csp = csp;
        self
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] for the failures listed on
    /// [`from_lookup`](Self::from_lookup).
    pub fn from_env() -> Result<Self, Error> {
        let config = Self::from_lookup(|key| std::env::var(key).ok()).map_err(|e| {
            tracing::error!(error = %e, "invalid security configuration");
            e
        })?;
        Ok(config)
    }

    /// Reads the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Missing`] if `ADMIN_EMAIL` is unset or blank
    /// - [`ConfigError::Invalid`] if `ADMIN_EMAIL` has no `@`, or `SITE_URL`
    ///   is not an absolute http(s) URL
    ///
    /// # Examples
    ///
    /// ```
    /// use session_integrity::SecurityConfig;
    ///
    /// let config = SecurityConfig::from_lookup(|key| match key {
    ///     "ADMIN_EMAIL" => Some("admin@example.com".to_string()),
    ///     "SITE_URL" => Some("https://learn.example.com/".to_string()),
    ///     _ => None,
    /// })
    /// .expect("valid config");
    ///
    /// assert!(config.admin.is_admin("admin@example.com"));
    /// assert_eq!(config.site_url, "https://learn.example.com");
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let admin_email = lookup(ADMIN_EMAIL_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing(ADMIN_EMAIL_VAR))?;

        if !admin_email.contains('@') {
            return Err(ConfigError::Invalid {
                key: ADMIN_EMAIL_VAR,
                reason: "not an email address".to_string(),
            });
        }

        let site_url = match lookup(SITE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            Some(raw) => parse_site_url(raw.trim())?,
            None => {
                tracing::warn!(
                    fallback = DEFAULT_SITE_URL,
                    "{} not set, using fallback",
                    SITE_URL_VAR
                );
                DEFAULT_SITE_URL.to_string()
            }
        };

        tracing::debug!(site_url = %site_url, "security configuration loaded");

        Ok(Self::new(AdminConfig::new(admin_email), site_url))
    }
}

fn parse_site_url(raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::Invalid {
        key: SITE_URL_VAR,
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(raw.trim_end_matches('/').to_string()),
        other => Err(ConfigError::Invalid {
            key: SITE_URL_VAR,
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}
