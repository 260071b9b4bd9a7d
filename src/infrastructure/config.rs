use std::time::Duration;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Client configuration, read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub anon_key: String,
    /// Project JWT secret used to verify access tokens handed in from outside
    pub jwt_secret: Option<String>,
    pub access_token: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let supabase_url = get("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        if !supabase_url.starts_with("http://") && !supabase_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                key: "SUPABASE_URL",
                value: supabase_url,
            });
        }
        let anon_key = get("SUPABASE_ANON_KEY").ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?;

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid {
                    key: "HTTP_TIMEOUT_SECS",
                    value: raw,
                })?,
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            supabase_url: supabase_url.trim_end_matches('/').to_string(),
            anon_key,
            jwt_secret: get("SUPABASE_JWT_SECRET"),
            access_token: get("BRAINBOOST_ACCESS_TOKEN"),
            email: get("BRAINBOOST_EMAIL"),
            password: get("BRAINBOOST_PASSWORD"),
            http_timeout,
        })
    }

    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.supabase_url)
    }

    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.supabase_url)
    }

    pub fn storage_url(&self) -> String {
        format!("{}/storage/v1", self.supabase_url)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}
