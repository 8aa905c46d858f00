//! Static admin identity.
//!
//! [`AdminConfig::is_admin`] establishes identity only. Mapping the admin
//! to allowed operations is left to the caller, which may consult
//! [`AdminConfig::permissions`].

use std::collections::BTreeSet;
use std::fmt;

/// An operation the configured admin is entitled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Permission {
    /// Manage learner and staff accounts
    ManageUsers,
    /// Edit lessons and exercises
    ManageContent,
    /// Read usage analytics
    ViewAnalytics,
    /// Change platform settings
    ManageSettings,
}

impl Permission {
    /// Every permission, in declaration order.
    pub const ALL: [Permission; 4] = [
        Permission::ManageUsers,
        Permission::ManageContent,
        Permission::ViewAnalytics,
        Permission::ManageSettings,
    ];
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::ManageUsers => write!(f, "manage_users"),
            Permission::ManageContent => write!(f, "manage_content"),
            Permission::ViewAnalytics => write!(f, "view_analytics"),
            Permission::ManageSettings => write!(f, "manage_settings"),
        }
    }
}

/// The configured admin address and its permission set.
///
/// # Examples
///
/// ```
/// use session_integrity::{AdminConfig, Permission};
///
/// let admin = AdminConfig::new("head@school.example");
///
/// assert!(admin.is_admin("head@school.example"));
/// assert!(!admin.is_admin("other@example.com"));
/// assert!(!admin.is_admin(""));
/// assert!(admin.permissions().contains(&Permission::ManageUsers));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    admin_email: String,
    permissions: BTreeSet<Permission>,
}

impl AdminConfig {
    /// Creates a config granting every permission to `admin_email`.
    pub fn new(admin_email: impl Into<String>) -> Self {
        Self {
            admin_email: admin_email.into(),
            permissions: Permission::ALL.into_iter().collect(),
        }
    }

    /// Replaces the permission set.
    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions = permissions.into_iter().collect();
        self
    }

    /// Returns `true` if `email` is exactly the configured admin address.
    ///
    /// Empty input, or an empty configured address, never matches.
    pub fn is_admin(&self, email: &str) -> bool {
        !email.is_empty() && !self.admin_email.is_empty() && email == self.admin_email
    }

    /// Returns the configured admin address.
    pub fn admin_email(&self) -> &str {
        &self.admin_email
    }

    /// Returns the admin's permission set.
    pub fn permissions(&self) -> &BTreeSet<Permission> {
        &self.permissions
    }
}
