use std::sync::Arc;

use chrono::Utc;

use super::store_message;
use crate::domain::entities::{Product, ProductDraft};
use crate::domain::repositories::{RepositoryError, ShopRepository};
use crate::domain::services::{Page, TableState};
use crate::infrastructure::storage::{ImageFile, ImageStorage, StorageError};

pub const PRODUCT_IMAGE_BUCKET: &str = "product-images";

/// Storage path for a product image: whitespace runs become `_`, then a
/// millisecond timestamp and the file's extension.
pub fn product_image_path(product_name: &str, extension: &str, millis: i64) -> String {
    let mut stem = String::with_capacity(product_name.len());
    let mut in_space = false;
    for c in product_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
        } else {
            stem.push(c);
            in_space = false;
        }
    }
    format!("{}_{}.{}", stem, millis, extension)
}

/// List admin products use case
pub struct ListAdminProducts {
    shop_repo: Arc<dyn ShopRepository>,
}

impl ListAdminProducts {
    pub fn new(shop_repo: Arc<dyn ShopRepository>) -> Self {
        Self { shop_repo }
    }

    /// Newest first, filtered and paged by the table state
    pub async fn execute(&self, table: &TableState) -> Result<Page<Product>, RepositoryError> {
        let products = self.shop_repo.list_products().await?;
        Ok(table.apply(&products, |p| p.name.as_str()))
    }
}

/// Save product input. `id` set means edit.
#[derive(Debug, Clone, Default)]
pub struct SaveProductInput {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub points_required: Option<i64>,
    /// Current image URL, kept unless a new file is attached
    pub image_url: String,
    pub image: Option<ImageFile>,
}

/// Save product use case
pub struct SaveProduct {
    shop_repo: Arc<dyn ShopRepository>,
    storage: Arc<dyn ImageStorage>,
}

impl SaveProduct {
    pub fn new(shop_repo: Arc<dyn ShopRepository>, storage: Arc<dyn ImageStorage>) -> Self {
        Self { shop_repo, storage }
    }

    pub async fn execute(&self, input: SaveProductInput) -> Result<(), SaveProductError> {
        let points_required = match input.points_required {
            Some(points) if !input.name.trim().is_empty() => points,
            _ => return Err(SaveProductError::MissingFields),
        };

        let image_url = match &input.image {
            Some(file) => {
                let path = product_image_path(&input.name, file.extension(), Utc::now().timestamp_millis());
                self.storage
                    .upload(PRODUCT_IMAGE_BUCKET, &path, file)
                    .await
                    .map_err(SaveProductError::Upload)?;
                tracing::debug!("Uploaded product image to {}", path);
                self.storage.public_url(PRODUCT_IMAGE_BUCKET, &path)
            }
            None => input.image_url,
        };

        let draft = ProductDraft {
            name: input.name,
            description: input.description,
            points_required,
            image_url,
        };

        match &input.id {
            Some(id) => self.shop_repo.update_product(id, &draft).await?,
            None => self.shop_repo.create_product(&draft).await?,
        }

        tracing::info!("Product '{}' saved", draft.name);
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SaveProductError {
    #[error("Product name and points required are required.")]
    MissingFields,
    #[error("Failed to upload image.")]
    Upload(#[source] StorageError),
    #[error("{}", store_message(.0, "Failed to save product"))]
    Repository(#[from] RepositoryError),
}

/// Delete product use case: purchases of the product go first
pub struct DeleteProduct {
    shop_repo: Arc<dyn ShopRepository>,
}

impl DeleteProduct {
    pub fn new(shop_repo: Arc<dyn ShopRepository>) -> Self {
        Self { shop_repo }
    }

    pub async fn execute(&self, product_id: &str) -> Result<(), DeleteProductError> {
        self.shop_repo
            .delete_purchases_for_product(product_id)
            .await
            .map_err(DeleteProductError::Purchases)?;
        self.shop_repo
            .delete_product(product_id)
            .await
            .map_err(DeleteProductError::Product)?;

        tracing::info!("Product {} deleted", product_id);
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteProductError {
    #[error("Failed to delete related purchases. Product not deleted.")]
    Purchases(#[source] RepositoryError),
    #[error("{}", store_message(.0, "Failed to delete product"))]
    Product(#[source] RepositoryError),
}
