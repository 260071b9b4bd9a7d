use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::write_error;
use crate::domain::entities::{
    NewPurchase, Product, ProductDraft, ProductSummary, PurchaseRecord, PurchaseStatus,
};
use crate::domain::repositories::{RepositoryError, ShopRepository};

const PURCHASE_SELECT: &str = r#"
    SELECT pu.id, pu.status, pu.points_spent, pu.created_at,
           p.name AS product_name, p.image_url AS product_image_url
    FROM purchases pu
    LEFT JOIN products p ON p.id = pu.product_id
"#;

/// SQLite implementation of ShopRepository
pub struct SqliteShopRepository {
    pool: SqlitePool,
}

impl SqliteShopRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_product(row: &sqlx::sqlite::SqliteRow) -> Product {
        use sqlx::Row;

        Product {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            points_required: row.get("points_required"),
            image_url: row.get("image_url"),
            created_at: row.get("created_at"),
        }
    }

    fn row_to_purchase(row: &sqlx::sqlite::SqliteRow) -> PurchaseRecord {
        use sqlx::Row;

        let status_str: String = row.get("status");
        let product_name: Option<String> = row.get("product_name");

        PurchaseRecord {
            id: row.get("id"),
            status: PurchaseStatus::from_str(&status_str).unwrap_or(PurchaseStatus::Pending),
            points_spent: row.get("points_spent"),
            created_at: row.get("created_at"),
            product: product_name.map(|name| ProductSummary {
                name,
                image_url: row.get("product_image_url"),
            }),
        }
    }
}

#[async_trait]
impl ShopRepository for SqliteShopRepository {
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM products ORDER BY created_at DESC, rowid DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(rows.iter().map(Self::row_to_product).collect())
    }

    async fn find_product(&self, id: &str) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(row.as_ref().map(Self::row_to_product))
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, points_required, image_url, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.points_required)
        .bind(&draft.image_url)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        Ok(())
    }

    async fn update_product(&self, id: &str, draft: &ProductDraft) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE products
            SET name = ?, description = ?, points_required = ?, image_url = ?
            WHERE id = ?
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.points_required)
        .bind(&draft.image_url)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        Ok(())
    }

    async fn delete_product(&self, id: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn list_purchases(&self, user_id: &str) -> Result<Vec<PurchaseRecord>, RepositoryError> {
        let query = format!(
            "{} WHERE pu.user_id = ? ORDER BY pu.created_at DESC, pu.rowid DESC",
            PURCHASE_SELECT
        );
        let rows = sqlx::query(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(rows.iter().map(Self::row_to_purchase).collect())
    }

    async fn create_purchase(&self, purchase: &NewPurchase) -> Result<PurchaseRecord, RepositoryError> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO purchases (id, user_id, product_id, status, points_spent, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&purchase.user_id)
        .bind(&purchase.product_id)
        .bind(PurchaseStatus::Pending.as_str())
        .bind(purchase.points_spent)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        let query = format!("{} WHERE pu.id = ?", PURCHASE_SELECT);
        let row = sqlx::query(&query)
            .bind(&id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(Self::row_to_purchase(&row))
    }

    async fn delete_purchases_for_product(&self, product_id: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM purchases WHERE product_id = ?")
            .bind(product_id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }
}
