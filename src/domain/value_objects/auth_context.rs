use crate::domain::entities::{AuthUser, UserMetadata};

/// The signed-in user and the token the backend expects for their requests.
///
/// Passed explicitly into every use case that needs a current user, so no
/// part of the crate reads auth state from a process-wide client.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthContext {
    pub user: AuthUser,
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Unix timestamp (seconds)
    pub expires_at: Option<i64>,
}

impl AuthContext {
    pub fn new(user: AuthUser, access_token: impl Into<String>) -> Self {
        Self {
            user,
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn metadata(&self) -> &UserMetadata {
        &self.user.user_metadata
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.map(|exp| exp <= now).unwrap_or(false)
    }
}
