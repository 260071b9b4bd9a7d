use async_trait::async_trait;
use sqlx::SqlitePool;

use super::write_error;
use crate::domain::entities::{Profile, Role};
use crate::domain::repositories::{ProfileRepository, RepositoryError};

/// SQLite implementation of ProfileRepository
pub struct SqliteProfileRepository {
    pool: SqlitePool,
}

impl SqliteProfileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a profile row; the hosted backend does this from a sign-up trigger
    pub async fn create(&self, profile: &Profile) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO profiles (id, username, role, points) VALUES (?, ?, ?, ?)")
            .bind(&profile.id)
            .bind(&profile.username)
            .bind(profile.role.as_str())
            .bind(profile.points)
            .execute(&self.pool)
            .await
            .map_err(write_error)?;

        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for SqliteProfileRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Profile>, RepositoryError> {
        use sqlx::Row;

        let row = sqlx::query("SELECT id, username, role, points FROM profiles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(row.map(|row| {
            let role_str: String = row.get("role");
            Profile {
                id: row.get("id"),
                username: row.get("username"),
                role: Role::from_str(&role_str).unwrap_or(Role::Student),
                points: row.get("points"),
            }
        }))
    }

    async fn update_points(&self, id: &str, points: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE profiles SET points = ? WHERE id = ?")
            .bind(points)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("profile {}", id)));
        }
        Ok(())
    }
}
