use async_trait::async_trait;

use crate::domain::entities::ForumCategory;
use crate::domain::repositories::RepositoryError;

/// Forum repository trait
#[async_trait]
pub trait ForumRepository: Send + Sync {
    /// All categories ordered by name ascending
    async fn list_categories(&self) -> Result<Vec<ForumCategory>, RepositoryError>;

    async fn create_category(&self, name: &str) -> Result<(), RepositoryError>;

    async fn rename_category(&self, id: &str, name: &str) -> Result<(), RepositoryError>;

    async fn delete_category(&self, id: &str) -> Result<(), RepositoryError>;

    /// Delete every post filed under the category
    async fn delete_posts_in_category(&self, category_id: &str) -> Result<(), RepositoryError>;
}
