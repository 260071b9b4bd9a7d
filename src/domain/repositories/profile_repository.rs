use async_trait::async_trait;

use crate::domain::entities::Profile;
use crate::domain::repositories::RepositoryError;

/// Profile repository trait
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Profile>, RepositoryError>;

    /// Overwrite the point balance
    async fn update_points(&self, id: &str, points: i64) -> Result<(), RepositoryError>;
}
