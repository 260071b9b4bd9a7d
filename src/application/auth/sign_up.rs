use std::sync::Arc;

use crate::domain::entities::{AuthUser, Role, UserMetadata};
use crate::domain::services::{Notification, Notifier};
use crate::infrastructure::auth::{AuthError, AuthProvider, SignUpRequest};

const MIN_USERNAME_LEN: usize = 3;

/// Sign up input
pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub username: String,
    pub role: Role,
}

/// Sign up use case
pub struct SignUp {
    auth: Arc<dyn AuthProvider>,
    notifier: Arc<dyn Notifier>,
}

impl SignUp {
    pub fn new(auth: Arc<dyn AuthProvider>, notifier: Arc<dyn Notifier>) -> Self {
        Self { auth, notifier }
    }

    /// Every failure, validation included, is reported as a "Registration Error"
    pub async fn execute(&self, input: SignUpInput) -> Result<AuthUser, SignUpError> {
        match self.register(input).await {
            Ok(user) => {
                self.notifier.notify(Notification::success(
                    "Account created!",
                    "Welcome! Please check your email to verify your account.",
                ));
                Ok(user)
            }
            Err(e) => {
                tracing::warn!("Sign-up failed: {}", e);
                self.notifier
                    .notify(Notification::error("Registration Error", e.to_string()));
                Err(e)
            }
        }
    }

    async fn register(&self, input: SignUpInput) -> Result<AuthUser, SignUpError> {
        if input.username.chars().count() < MIN_USERNAME_LEN {
            return Err(SignUpError::Validation(
                "Username must be at least 3 characters long",
            ));
        }
        if input.email.is_empty() || input.password.is_empty() || input.username.is_empty() {
            return Err(SignUpError::Validation("All fields are required"));
        }
        if input.role == Role::Admin {
            return Err(SignUpError::Validation("Choose either student or teacher"));
        }

        let request = SignUpRequest {
            email: input.email,
            password: input.password,
            metadata: UserMetadata {
                username: Some(input.username.clone()),
                role: Some(input.role.as_str().to_string()),
                ..Default::default()
            },
        };

        let user = self
            .auth
            .sign_up(&request)
            .await
            .map_err(|e| SignUpError::Rejected(registration_message(&e)))?;
        tracing::info!("Registered {} as {}", input.username, input.role.as_str());
        Ok(user)
    }
}

/// Message shown for a failed registration
pub fn registration_message(error: &AuthError) -> String {
    let raw = error.to_string();
    if raw.contains("duplicate key") {
        "This username is already taken".to_string()
    } else if raw.contains("Database error") {
        "There was an issue creating your account. Please try again later.".to_string()
    } else {
        raw
    }
}

/// Sign up error types
#[derive(Debug, thiserror::Error)]
pub enum SignUpError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("{0}")]
    Rejected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_message_mapping() {
        let duplicate = AuthError::Rejected(
            "Database error saving new user: duplicate key value violates unique constraint".into(),
        );
        assert_eq!(registration_message(&duplicate), "This username is already taken");

        let database = AuthError::Rejected("Database error saving new user".into());
        assert_eq!(
            registration_message(&database),
            "There was an issue creating your account. Please try again later."
        );

        let other = AuthError::Rejected("Password should be at least 6 characters".into());
        assert_eq!(registration_message(&other), "Password should be at least 6 characters");
    }
}
