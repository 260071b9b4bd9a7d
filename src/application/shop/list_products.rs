use std::sync::Arc;

use super::{load_student, ShopAccessError};
use crate::domain::entities::{Product, Profile};
use crate::domain::repositories::{ProfileRepository, RepositoryError, ShopRepository};
use crate::domain::services::pagination::{page_strip, paginate};
use crate::domain::services::{Page, PageMarker};
use crate::domain::value_objects::AuthContext;

pub const SHOP_PAGE_SIZE: usize = 6;

/// List shop products output
#[derive(Debug, Clone)]
pub struct ShopPage {
    pub profile: Profile,
    pub products: Page<Product>,
    pub strip: Vec<PageMarker>,
}

/// List shop products use case (newest first)
pub struct ListShopProducts {
    shop_repo: Arc<dyn ShopRepository>,
    profile_repo: Arc<dyn ProfileRepository>,
}

impl ListShopProducts {
    pub fn new(shop_repo: Arc<dyn ShopRepository>, profile_repo: Arc<dyn ProfileRepository>) -> Self {
        Self {
            shop_repo,
            profile_repo,
        }
    }

    pub async fn execute(&self, ctx: Option<&AuthContext>, page: usize) -> Result<ShopPage, ListShopProductsError> {
        let profile = load_student(self.profile_repo.as_ref(), ctx).await?;
        let products = self.shop_repo.list_products().await?;

        let products = paginate(&products, page, SHOP_PAGE_SIZE);
        let strip = page_strip(products.page, products.total_pages);
        tracing::debug!(
            "Shop page {}/{} ({} products)",
            products.page,
            products.total_pages,
            products.total_items
        );

        Ok(ShopPage {
            profile,
            products,
            strip,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListShopProductsError {
    #[error(transparent)]
    Access(#[from] ShopAccessError),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
