use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::entities::{AuthUser, UserMetadata};
use crate::domain::value_objects::AuthContext;

/// Sign-up payload
#[derive(Debug, Clone)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub metadata: UserMetadata,
}

/// Auth error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid login credentials")]
    InvalidCredentials,
    /// The auth service refused the request; carries its message verbatim
    #[error("{0}")]
    Rejected(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unexpected auth response: {0}")]
    Decode(String),
}

/// Auth provider trait
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthUser, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthContext, AuthError>;

    /// Revoke the context's token
    async fn sign_out(&self, ctx: &AuthContext) -> Result<(), AuthError>;
}

struct MockAccount {
    password: String,
    user: AuthUser,
}

#[derive(Default)]
struct MockState {
    accounts: HashMap<String, MockAccount>,
    usernames: HashSet<String>,
    revoked: Vec<String>,
    next_error: Option<String>,
}

/// In-memory auth provider for tests and local runs
#[derive(Default)]
pub struct MockAuthProvider {
    state: Mutex<MockState>,
}

impl MockAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call fail with this service message
    pub fn fail_next(&self, message: &str) {
        self.lock().next_error = Some(message.to_string());
    }

    /// Tokens revoked by sign-out, oldest first
    pub fn revoked_tokens(&self) -> Vec<String> {
        self.lock().revoked.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn take_error(state: &mut MockState) -> Result<(), AuthError> {
        match state.next_error.take() {
            Some(message) => Err(AuthError::Rejected(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthUser, AuthError> {
        let mut state = self.lock();
        Self::take_error(&mut state)?;

        if state.accounts.contains_key(&request.email) {
            return Err(AuthError::Rejected("User already registered".to_string()));
        }
        if let Some(username) = &request.metadata.username {
            if !state.usernames.insert(username.to_lowercase()) {
                return Err(AuthError::Rejected(
                    "Database error saving new user: duplicate key value violates unique constraint \"profiles_username_key\"".to_string(),
                ));
            }
        }

        let user = AuthUser {
            id: uuid::Uuid::new_v4().to_string(),
            email: Some(request.email.clone()),
            user_metadata: request.metadata.clone(),
        };
        state.accounts.insert(
            request.email.clone(),
            MockAccount {
                password: request.password.clone(),
                user: user.clone(),
            },
        );
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthContext, AuthError> {
        let mut state = self.lock();
        Self::take_error(&mut state)?;

        match state.accounts.get(email) {
            Some(account) if account.password == password => Ok(AuthContext::new(
                account.user.clone(),
                format!("mock-token-{}", account.user.id),
            )),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    async fn sign_out(&self, ctx: &AuthContext) -> Result<(), AuthError> {
        let mut state = self.lock();
        Self::take_error(&mut state)?;
        state.revoked.push(ctx.access_token.clone());
        Ok(())
    }
}
