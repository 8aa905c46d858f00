use serde::{Deserialize, Serialize};

/// A signed-in identity as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Provider-assigned user id
    pub uid: String,
    /// Primary email address, if the provider has one
    #[serde(default)]
    pub email: Option<String>,
}

impl Identity {
    /// Creates an identity with an email address.
    pub fn new(uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: Some(email.into()),
        }
    }
}

/// Role stored on the user's profile record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Learner account
    #[default]
    Student,
    /// Teaching staff
    Teacher,
    /// Platform administrator
    Admin,
}

/// Profile record loaded from the user store for a signed-in identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    /// Name shown in the UI
    #[serde(default)]
    pub display_name: Option<String>,
    /// Account role
    #[serde(default)]
    pub role: UserRole,
}

/// Snapshot of the identity provider's state.
///
/// Owned by the provider; the session guard only reads it. While `loading`
/// is `true` the other fields are indeterminate.
///
/// # Examples
///
/// ```
/// use session_integrity::session::AuthState;
///
/// let state: AuthState = serde_json::from_str(
///     r#"{"user":{"uid":"u1","email":"ada@example.com"},"isEmailVerified":true,"loading":false}"#,
/// )
/// .unwrap();
///
/// assert!(state.user.is_some());
/// assert!(state.user_data.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    /// Signed-in identity, if any
    #[serde(default)]
    pub user: Option<Identity>,
    /// Profile record for `user`, once loaded
    #[serde(default)]
    pub user_data: Option<UserData>,
    /// Whether the provider reports the email as verified
    #[serde(default)]
    pub is_email_verified: bool,
    /// Whether the provider is still resolving the session
    #[serde(default)]
    pub loading: bool,
}

impl AuthState {
    /// The initial, unresolved state.
    pub fn loading() -> Self {
        Self {
            user: None,
            user_data: None,
            is_email_verified: false,
            loading: true,
        }
    }

    /// Resolved with no signed-in user.
    pub fn signed_out() -> Self {
        Self {
            loading: false,
            ..Self::loading()
        }
    }

    /// Resolved with a signed-in user.
    pub fn signed_in(user: Identity, is_email_verified: bool) -> Self {
        Self {
            user: Some(user),
            user_data: None,
            is_email_verified,
            loading: false,
        }
    }

    /// Attaches a profile record.
    pub fn with_user_data(mut self, user_data: UserData) -> Self {
        self.user_data = Some(user_data);
        self
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::loading()
    }
}
