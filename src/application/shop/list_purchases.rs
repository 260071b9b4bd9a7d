use std::sync::Arc;

use super::{load_student, ShopAccessError};
use crate::domain::entities::{PurchaseRecord, PurchaseTab};
use crate::domain::repositories::{ProfileRepository, RepositoryError, ShopRepository};
use crate::domain::value_objects::AuthContext;

/// Purchases shown under `tab`, keeping their original order
pub fn filter_by_tab(purchases: &[PurchaseRecord], tab: PurchaseTab) -> Vec<PurchaseRecord> {
    purchases
        .iter()
        .filter(|p| tab.matches(p.status))
        .cloned()
        .collect()
}

/// List purchases use case (newest first)
pub struct ListPurchases {
    shop_repo: Arc<dyn ShopRepository>,
    profile_repo: Arc<dyn ProfileRepository>,
}

impl ListPurchases {
    pub fn new(shop_repo: Arc<dyn ShopRepository>, profile_repo: Arc<dyn ProfileRepository>) -> Self {
        Self {
            shop_repo,
            profile_repo,
        }
    }

    pub async fn execute(
        &self,
        ctx: Option<&AuthContext>,
        tab: PurchaseTab,
    ) -> Result<Vec<PurchaseRecord>, ListPurchasesError> {
        let profile = load_student(self.profile_repo.as_ref(), ctx).await?;
        let purchases = self.shop_repo.list_purchases(&profile.id).await?;
        Ok(filter_by_tab(&purchases, tab))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListPurchasesError {
    #[error(transparent)]
    Access(#[from] ShopAccessError),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
