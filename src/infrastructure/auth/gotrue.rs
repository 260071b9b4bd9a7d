use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};

use super::provider::{AuthError, AuthProvider, SignUpRequest};
use crate::domain::entities::AuthUser;
use crate::domain::value_objects::AuthContext;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

/// Pull the human message out of a GoTrue error body
fn error_message(body: &str) -> String {
    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return body.to_string(),
    };
    ["msg", "error_description", "message", "error"]
        .iter()
        .find_map(|key| parsed.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}

/// Sign-up answers with a bare user, or with a session when autoconfirm is on
fn user_from_signup(body: Value) -> Result<AuthUser, AuthError> {
    let user = match body.get("user") {
        Some(user) if user.is_object() => user.clone(),
        _ => body,
    };
    serde_json::from_value(user).map_err(|e| AuthError::Decode(e.to_string()))
}

/// Supabase GoTrue client over `/auth/v1`
pub struct GoTrueClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GoTrueClient {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn post(&self, path: &str, bearer: &str, body: Value) -> Result<reqwest::Response, AuthError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("POST {}", url);
        let response = self
            .http
            .post(url)
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let message = error_message(&text);
        tracing::debug!("Auth request failed ({}): {}", status, message);
        if status == StatusCode::BAD_REQUEST && message == "Invalid login credentials" {
            return Err(AuthError::InvalidCredentials);
        }
        Err(AuthError::Rejected(message))
    }
}

#[async_trait]
impl AuthProvider for GoTrueClient {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthUser, AuthError> {
        let body = json!({
            "email": request.email,
            "password": request.password,
            "data": request.metadata,
        });
        let response = self.post("/signup", &self.api_key, body).await?;
        let value: Value = response
            .json()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))?;
        user_from_signup(value)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthContext, AuthError> {
        let body = json!({ "email": email, "password": password });
        let response = self
            .post("/token?grant_type=password", &self.api_key, body)
            .await?;
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))?;

        let mut ctx = AuthContext::new(token.user, token.access_token);
        ctx.refresh_token = token.refresh_token;
        ctx.expires_at = token.expires_at;
        Ok(ctx)
    }

    async fn sign_out(&self, ctx: &AuthContext) -> Result<(), AuthError> {
        self.post("/logout", &ctx.access_token, json!({})).await?;
        Ok(())
    }
}
