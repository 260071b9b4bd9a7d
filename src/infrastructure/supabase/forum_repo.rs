use async_trait::async_trait;
use serde_json::json;

use super::postgrest::{PostgrestClient, Query};
use crate::domain::entities::ForumCategory;
use crate::domain::repositories::{ForumRepository, RepositoryError};

/// Supabase implementation of ForumRepository
pub struct SupabaseForumRepository {
    client: PostgrestClient,
}

impl SupabaseForumRepository {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ForumRepository for SupabaseForumRepository {
    async fn list_categories(&self) -> Result<Vec<ForumCategory>, RepositoryError> {
        let query = Query::new("forum_categories")
            .select("id,name")
            .order("name", true);
        self.client.select(&query).await
    }

    async fn create_category(&self, name: &str) -> Result<(), RepositoryError> {
        self.client
            .insert_minimal(&Query::new("forum_categories"), &json!({ "name": name }))
            .await
    }

    async fn rename_category(&self, id: &str, name: &str) -> Result<(), RepositoryError> {
        self.client
            .update(
                &Query::new("forum_categories").eq("id", id),
                &json!({ "name": name }),
            )
            .await
    }

    async fn delete_category(&self, id: &str) -> Result<(), RepositoryError> {
        self.client
            .delete(&Query::new("forum_categories").eq("id", id))
            .await
    }

    async fn delete_posts_in_category(&self, category_id: &str) -> Result<(), RepositoryError> {
        self.client
            .delete(&Query::new("forum_posts").eq("category_id", category_id))
            .await
    }
}
