use crate::domain::value_objects::AuthContext;
use crate::infrastructure::auth::{AuthProvider, JwtService};
use crate::infrastructure::config::Config;

/// The signed-in user for this run.
///
/// `BRAINBOOST_ACCESS_TOKEN` wins over email/password. Without a JWT secret
/// the token is decoded as-is and left for the backend to check.
pub async fn current_context(
    config: &Config,
    auth: &dyn AuthProvider,
) -> anyhow::Result<Option<AuthContext>> {
    if let Some(token) = &config.access_token {
        let ctx = match &config.jwt_secret {
            Some(secret) => JwtService::new(secret.clone()).verify(token)?,
            None => {
                tracing::warn!("SUPABASE_JWT_SECRET not set, using access token unverified");
                JwtService::decode_unverified(token)?
            }
        };
        if ctx.is_expired(chrono::Utc::now().timestamp()) {
            tracing::warn!("Access token for {} has expired", ctx.user_id());
        }
        return Ok(Some(ctx));
    }

    if let (Some(email), Some(password)) = (&config.email, &config.password) {
        let ctx = auth.sign_in(email, password).await?;
        tracing::info!("Signed in as {}", ctx.user.display_name());
        return Ok(Some(ctx));
    }

    tracing::debug!("No credentials configured, continuing signed out");
    Ok(None)
}
