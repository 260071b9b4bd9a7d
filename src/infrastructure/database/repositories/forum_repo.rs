use async_trait::async_trait;
use sqlx::SqlitePool;

use super::write_error;
use crate::domain::entities::ForumCategory;
use crate::domain::repositories::{ForumRepository, RepositoryError};

/// SQLite implementation of ForumRepository
pub struct SqliteForumRepository {
    pool: SqlitePool,
}

impl SqliteForumRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ForumRepository for SqliteForumRepository {
    async fn list_categories(&self) -> Result<Vec<ForumCategory>, RepositoryError> {
        use sqlx::Row;

        let rows = sqlx::query("SELECT id, name FROM forum_categories ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|row| ForumCategory {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }

    async fn create_category(&self, name: &str) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO forum_categories (id, name) VALUES (?, ?)")
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(write_error)?;

        Ok(())
    }

    async fn rename_category(&self, id: &str, name: &str) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE forum_categories SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(write_error)?;

        Ok(())
    }

    async fn delete_category(&self, id: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM forum_categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete_posts_in_category(&self, category_id: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM forum_posts WHERE category_id = ?")
            .bind(category_id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }
}
