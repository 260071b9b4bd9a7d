use async_trait::async_trait;
use serde_json::json;

use super::postgrest::{PostgrestClient, Query};
use crate::domain::entities::Profile;
use crate::domain::repositories::{ProfileRepository, RepositoryError};

/// Supabase implementation of ProfileRepository
pub struct SupabaseProfileRepository {
    client: PostgrestClient,
}

impl SupabaseProfileRepository {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProfileRepository for SupabaseProfileRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Profile>, RepositoryError> {
        let query = Query::new("profiles")
            .select("id,username,role,points")
            .eq("id", id)
            .limit(1);
        let rows: Vec<Profile> = self.client.select(&query).await?;
        Ok(rows.into_iter().next())
    }

    async fn update_points(&self, id: &str, points: i64) -> Result<(), RepositoryError> {
        self.client
            .update(&Query::new("profiles").eq("id", id), &json!({ "points": points }))
            .await
    }
}
