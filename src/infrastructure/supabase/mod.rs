//! Supabase-backed repositories (PostgREST over HTTPS)

mod forum_repo;
mod postgrest;
mod profile_repo;
mod quiz_repo;
mod shop_repo;

pub use forum_repo::SupabaseForumRepository;
pub use postgrest::{PostgrestClient, Query};
pub use profile_repo::SupabaseProfileRepository;
pub use quiz_repo::SupabaseQuizRepository;
pub use shop_repo::SupabaseShopRepository;

use std::time::Duration;

/// Shared HTTP client for every Supabase adapter
pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("brainboost-client/", env!("CARGO_PKG_VERSION")))
        .build()
}
