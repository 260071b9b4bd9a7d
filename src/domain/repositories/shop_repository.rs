use async_trait::async_trait;

use crate::domain::entities::{NewPurchase, Product, ProductDraft, PurchaseRecord};
use crate::domain::repositories::RepositoryError;

/// Shop repository trait (products and purchases)
#[async_trait]
pub trait ShopRepository: Send + Sync {
    // ========== Product operations ==========

    /// All products, newest first
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError>;

    async fn find_product(&self, id: &str) -> Result<Option<Product>, RepositoryError>;

    async fn create_product(&self, draft: &ProductDraft) -> Result<(), RepositoryError>;

    async fn update_product(&self, id: &str, draft: &ProductDraft) -> Result<(), RepositoryError>;

    async fn delete_product(&self, id: &str) -> Result<(), RepositoryError>;

    // ========== Purchase operations ==========

    /// A user's purchases with product summary, newest first
    async fn list_purchases(&self, user_id: &str) -> Result<Vec<PurchaseRecord>, RepositoryError>;

    async fn create_purchase(&self, purchase: &NewPurchase) -> Result<PurchaseRecord, RepositoryError>;

    async fn delete_purchases_for_product(&self, product_id: &str) -> Result<(), RepositoryError>;
}
