use std::sync::Arc;

use sqlx::SqlitePool;

use crate::domain::repositories::{
    ForumRepository, ProfileRepository, QuizRepository, ShopRepository,
};
use crate::domain::services::{Navigator, Notifier};
use crate::domain::value_objects::AuthContext;
use crate::infrastructure::auth::{AuthProvider, GoTrueClient, MockAuthProvider};
use crate::infrastructure::config::Config;
use crate::infrastructure::database::repositories::{
    SqliteForumRepository, SqliteProfileRepository, SqliteQuizRepository, SqliteShopRepository,
};
use crate::infrastructure::realtime::{BroadcastHub, PhoenixRealtime, RealtimeClient};
use crate::infrastructure::storage::{ImageStorage, MemoryStorage, SupabaseStorage};
use crate::infrastructure::supabase::{
    http_client, PostgrestClient, SupabaseForumRepository, SupabaseProfileRepository,
    SupabaseQuizRepository, SupabaseShopRepository,
};

/// Everything a use case may need, shared behind `Arc`s
#[derive(Clone)]
pub struct AppState {
    /// Sign-up, sign-in and sign-out
    pub auth: Arc<dyn AuthProvider>,

    pub quiz_repo: Arc<dyn QuizRepository>,
    pub shop_repo: Arc<dyn ShopRepository>,
    pub profile_repo: Arc<dyn ProfileRepository>,
    pub forum_repo: Arc<dyn ForumRepository>,

    /// Product image uploads
    pub storage: Arc<dyn ImageStorage>,

    /// Broadcast channel subscriptions
    pub realtime: Arc<dyn RealtimeClient>,

    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// Wire every adapter to a Supabase project. Requests carry the signed-in
    /// user's token when there is one, the anon key otherwise.
    pub fn supabase(
        config: &Config,
        ctx: Option<&AuthContext>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, reqwest::Error> {
        let http = http_client(config.http_timeout)?;
        let token = ctx.map(|c| c.access_token.as_str());

        tracing::info!("Using Supabase project at {}", config.supabase_url);

        let rest = PostgrestClient::new(http.clone(), &config.rest_url(), &config.anon_key, token);

        let mut realtime = PhoenixRealtime::new(&config.supabase_url, &config.anon_key);
        if let Some(token) = token {
            realtime = realtime.with_access_token(token);
        }

        Ok(Self {
            auth: Arc::new(GoTrueClient::new(http.clone(), &config.auth_url(), &config.anon_key)),
            quiz_repo: Arc::new(SupabaseQuizRepository::new(rest.clone())),
            shop_repo: Arc::new(SupabaseShopRepository::new(rest.clone())),
            profile_repo: Arc::new(SupabaseProfileRepository::new(rest.clone())),
            forum_repo: Arc::new(SupabaseForumRepository::new(rest)),
            storage: Arc::new(SupabaseStorage::new(
                http,
                &config.storage_url(),
                &config.anon_key,
                token,
            )),
            realtime: Arc::new(realtime),
            navigator,
            notifier,
        })
    }

    /// Wire every adapter to a local SQLite database and an in-process hub
    pub fn local(
        pool: SqlitePool,
        hub: Arc<BroadcastHub>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            auth: Arc::new(MockAuthProvider::new()),
            quiz_repo: Arc::new(SqliteQuizRepository::new(pool.clone())),
            shop_repo: Arc::new(SqliteShopRepository::new(pool.clone())),
            profile_repo: Arc::new(SqliteProfileRepository::new(pool.clone())),
            forum_repo: Arc::new(SqliteForumRepository::new(pool)),
            storage: Arc::new(MemoryStorage::new()),
            realtime: hub,
            navigator,
            notifier,
        }
    }
}
