use std::sync::Arc;

use crate::application::navigation::landing_route;
use crate::domain::entities::Profile;
use crate::domain::repositories::ProfileRepository;
use crate::domain::services::{Navigator, Notification, Notifier};
use crate::domain::value_objects::AuthContext;
use crate::infrastructure::auth::{AuthError, AuthProvider};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub ctx: AuthContext,
    /// `None` when the profile row could not be read
    pub profile: Option<Profile>,
}

/// Sign in use case
pub struct SignIn {
    auth: Arc<dyn AuthProvider>,
    profile_repo: Arc<dyn ProfileRepository>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl SignIn {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        profile_repo: Arc<dyn ProfileRepository>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            auth,
            profile_repo,
            navigator,
            notifier,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> Result<SignInOutput, SignInError> {
        let email = input.email.trim();
        if email.is_empty() || input.password.is_empty() {
            return Err(SignInError::Validation("All fields are required"));
        }

        let ctx = match self.auth.sign_in(email, &input.password).await {
            Ok(ctx) => ctx,
            Err(e) => {
                tracing::warn!("Sign-in for {} failed: {}", email, e);
                self.notifier.notify(Notification::error("Error", e.to_string()));
                return Err(e.into());
            }
        };

        let profile = match self.profile_repo.find_by_id(ctx.user_id()).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!("Could not load profile for {}: {}", ctx.user_id(), e);
                None
            }
        };

        tracing::info!("Signed in as {}", ctx.user.display_name());
        self.notifier
            .notify(Notification::success("Success", "Logged in successfully!"));
        self.navigator.navigate(landing_route(profile.as_ref()));

        Ok(SignInOutput { ctx, profile })
    }
}

/// Sign in error types
#[derive(Debug, thiserror::Error)]
pub enum SignInError {
    #[error("{0}")]
    Validation(&'static str),
    #[error(transparent)]
    Auth(#[from] AuthError),
}
