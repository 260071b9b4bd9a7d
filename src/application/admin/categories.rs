use std::sync::Arc;

use super::store_message;
use crate::domain::entities::ForumCategory;
use crate::domain::repositories::{ForumRepository, RepositoryError};
use crate::domain::services::{Page, TableState};

/// List categories use case
pub struct ListCategories {
    forum_repo: Arc<dyn ForumRepository>,
}

impl ListCategories {
    pub fn new(forum_repo: Arc<dyn ForumRepository>) -> Self {
        Self { forum_repo }
    }

    /// Ordered by name, filtered and paged by the table state
    pub async fn execute(&self, table: &TableState) -> Result<Page<ForumCategory>, RepositoryError> {
        let categories = self.forum_repo.list_categories().await?;
        Ok(table.apply(&categories, |c| c.name.as_str()))
    }
}

/// Save category input. `id` set means rename.
#[derive(Debug, Clone, Default)]
pub struct SaveCategoryInput {
    pub id: Option<String>,
    pub name: String,
}

/// Save category use case
pub struct SaveCategory {
    forum_repo: Arc<dyn ForumRepository>,
}

impl SaveCategory {
    pub fn new(forum_repo: Arc<dyn ForumRepository>) -> Self {
        Self { forum_repo }
    }

    pub async fn execute(&self, input: SaveCategoryInput) -> Result<(), SaveCategoryError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(SaveCategoryError::MissingName);
        }

        let lowered = name.to_lowercase();
        let existing = self.forum_repo.list_categories().await?;
        let taken = existing.iter().any(|c| {
            c.name.to_lowercase() == lowered && input.id.as_deref() != Some(c.id.as_str())
        });
        if taken {
            return Err(SaveCategoryError::Duplicate);
        }

        match &input.id {
            Some(id) => self.forum_repo.rename_category(id, name).await?,
            None => self.forum_repo.create_category(name).await?,
        }

        tracing::info!("Category '{}' saved", name);
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SaveCategoryError {
    #[error("Category name is required.")]
    MissingName,
    #[error("Category name must be unique.")]
    Duplicate,
    #[error("{}", store_message(.0, "Failed to save category"))]
    Repository(#[from] RepositoryError),
}

/// Delete category use case: its posts go first, in a separate request
pub struct DeleteCategory {
    forum_repo: Arc<dyn ForumRepository>,
}

impl DeleteCategory {
    pub fn new(forum_repo: Arc<dyn ForumRepository>) -> Self {
        Self { forum_repo }
    }

    pub async fn execute(&self, category_id: &str) -> Result<(), DeleteCategoryError> {
        self.forum_repo
            .delete_posts_in_category(category_id)
            .await
            .map_err(DeleteCategoryError::Posts)?;
        self.forum_repo
            .delete_category(category_id)
            .await
            .map_err(DeleteCategoryError::Category)?;

        tracing::info!("Category {} and its posts deleted", category_id);
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteCategoryError {
    #[error("Failed to delete posts for this category.")]
    Posts(#[source] RepositoryError),
    #[error("{}", store_message(.0, "Failed to delete category"))]
    Category(#[source] RepositoryError),
}
