use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{AuthUser, UserMetadata};
use crate::domain::value_objects::AuthContext;

/// Audience Supabase stamps on user tokens
pub const AUDIENCE: &str = "authenticated";

/// Supabase access-token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub aud: String,
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl Claims {
    fn into_context(self, token: &str) -> AuthContext {
        let user = AuthUser {
            id: self.sub,
            email: self.email,
            user_metadata: self.user_metadata,
        };
        let mut ctx = AuthContext::new(user, token);
        ctx.expires_at = Some(self.exp as i64);
        ctx
    }
}

/// Verifies (and for local use, signs) project JWTs
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in_seconds: usize,
}

impl JwtService {
    pub fn new(secret: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expires_in_seconds: 60 * 60, // 1 hour, as Supabase issues them
        }
    }

    /// Sign a token for a user
    pub fn sign(&self, user: &AuthUser) -> Result<String, JwtError> {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: Some(AUDIENCE.to_string()),
            aud: AUDIENCE.to_string(),
            exp: now + self.expires_in_seconds,
            iat: now,
            user_metadata: user.user_metadata.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::Sign(e.to_string()))
    }

    /// Verify a token and turn it into an auth context
    pub fn verify(&self, token: &str) -> Result<AuthContext, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[AUDIENCE]);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims.into_context(token))
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::InvalidAudience => JwtError::Invalid,
                _ => JwtError::Verify(e.to_string()),
            })
    }

    /// Decode without verification, for when no project secret is configured.
    /// The backend still checks the signature on every request.
    pub fn decode_unverified(token: &str) -> Result<AuthContext, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims.into_context(token))
            .map_err(|e| JwtError::Verify(e.to_string()))
    }
}

/// JWT error types
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to sign token: {0}")]
    Sign(String),
    #[error("Token has expired")]
    Expired,
    #[error("Invalid token")]
    Invalid,
    #[error("Failed to verify token: {0}")]
    Verify(String),
}
