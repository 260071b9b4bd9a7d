use async_trait::async_trait;

use super::postgrest::{single, PostgrestClient, Query};
use crate::domain::entities::{NewPurchase, Product, ProductDraft, PurchaseRecord};
use crate::domain::repositories::{RepositoryError, ShopRepository};

/// Purchase listing with the product embedded through its foreign key
const PURCHASE_SELECT: &str =
    "id,status,points_spent,created_at,products:products!purchases_product_id_fkey(name,image_url)";

/// Supabase implementation of ShopRepository
pub struct SupabaseShopRepository {
    client: PostgrestClient,
}

impl SupabaseShopRepository {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ShopRepository for SupabaseShopRepository {
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let query = Query::new("products").select("*").order("created_at", false);
        self.client.select(&query).await
    }

    async fn find_product(&self, id: &str) -> Result<Option<Product>, RepositoryError> {
        let query = Query::new("products").select("*").eq("id", id).limit(1);
        let rows: Vec<Product> = self.client.select(&query).await?;
        Ok(rows.into_iter().next())
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<(), RepositoryError> {
        self.client
            .insert_minimal(&Query::new("products"), draft)
            .await
    }

    async fn update_product(&self, id: &str, draft: &ProductDraft) -> Result<(), RepositoryError> {
        self.client
            .update(&Query::new("products").eq("id", id), draft)
            .await
    }

    async fn delete_product(&self, id: &str) -> Result<(), RepositoryError> {
        self.client.delete(&Query::new("products").eq("id", id)).await
    }

    async fn list_purchases(&self, user_id: &str) -> Result<Vec<PurchaseRecord>, RepositoryError> {
        let query = Query::new("purchases")
            .select(PURCHASE_SELECT)
            .eq("user_id", user_id)
            .order("created_at", false);
        self.client.select(&query).await
    }

    async fn create_purchase(&self, purchase: &NewPurchase) -> Result<PurchaseRecord, RepositoryError> {
        let query = Query::new("purchases").select(PURCHASE_SELECT);
        let rows = self.client.insert(&query, purchase).await?;
        single(rows, "purchases")
    }

    async fn delete_purchases_for_product(&self, product_id: &str) -> Result<(), RepositoryError> {
        self.client
            .delete(&Query::new("purchases").eq("product_id", product_id))
            .await
    }
}
