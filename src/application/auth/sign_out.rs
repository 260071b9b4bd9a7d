use std::sync::Arc;

use crate::domain::services::{Navigator, Notification, Notifier, Route};
use crate::domain::value_objects::AuthContext;
use crate::infrastructure::auth::{AuthError, AuthProvider};

/// Sign out use case
pub struct SignOut {
    auth: Arc<dyn AuthProvider>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl SignOut {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            auth,
            navigator,
            notifier,
        }
    }

    /// Revoke the token and go home. On failure the user stays where they are.
    pub async fn execute(&self, ctx: Option<&AuthContext>) -> Result<(), SignOutError> {
        let ctx = ctx.ok_or(SignOutError::NotAuthenticated)?;

        if let Err(e) = self.auth.sign_out(ctx).await {
            tracing::error!("Error signing out: {}", e);
            self.notifier
                .notify(Notification::error("Error", "Failed to log out"));
            return Err(e.into());
        }

        tracing::info!("Signed out {}", ctx.user_id());
        self.navigator.navigate(Route::Home);
        Ok(())
    }
}

/// Sign out error types
#[derive(Debug, thiserror::Error)]
pub enum SignOutError {
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error(transparent)]
    Auth(#[from] AuthError),
}
