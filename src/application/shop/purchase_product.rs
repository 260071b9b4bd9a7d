use std::sync::Arc;

use super::{load_student, ShopAccessError};
use crate::domain::entities::{NewPurchase, PurchaseRecord};
use crate::domain::repositories::{ProfileRepository, RepositoryError, ShopRepository};
use crate::domain::services::{Notification, Notifier};
use crate::domain::value_objects::AuthContext;

/// Purchase product output
#[derive(Debug, Clone)]
pub struct PurchaseOutcome {
    pub purchase: PurchaseRecord,
    pub new_balance: i64,
}

/// Purchase product use case.
///
/// Writes the purchase, then the new balance. The two writes are not atomic:
/// if the second fails the purchase row stays.
pub struct PurchaseProduct {
    shop_repo: Arc<dyn ShopRepository>,
    profile_repo: Arc<dyn ProfileRepository>,
    notifier: Arc<dyn Notifier>,
}

impl PurchaseProduct {
    pub fn new(
        shop_repo: Arc<dyn ShopRepository>,
        profile_repo: Arc<dyn ProfileRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            shop_repo,
            profile_repo,
            notifier,
        }
    }

    pub async fn execute(
        &self,
        ctx: Option<&AuthContext>,
        product_id: &str,
    ) -> Result<PurchaseOutcome, PurchaseProductError> {
        let profile = load_student(self.profile_repo.as_ref(), ctx).await?;
        let product = self
            .shop_repo
            .find_product(product_id)
            .await?
            .ok_or(PurchaseProductError::ProductNotFound)?;

        if profile.points < product.points_required {
            let needed = product.points_required - profile.points;
            self.notifier.notify(Notification::error(
                "Not enough points",
                format!("You need {} more points to purchase this item.", needed),
            ));
            return Err(PurchaseProductError::InsufficientPoints { needed });
        }

        let new_balance = profile.points - product.points_required;
        let result = async {
            let purchase = self
                .shop_repo
                .create_purchase(&NewPurchase {
                    user_id: profile.id.clone(),
                    product_id: product.id.clone(),
                    points_spent: product.points_required,
                })
                .await?;
            self.profile_repo
                .update_points(&profile.id, new_balance)
                .await?;
            Ok::<_, RepositoryError>(purchase)
        }
        .await;

        match result {
            Ok(purchase) => {
                tracing::info!(
                    "{} bought {} for {} points",
                    profile.username,
                    product.name,
                    product.points_required
                );
                self.notifier.notify(Notification::success(
                    "🎉 Purchase Complete!",
                    format!(
                        "Successfully purchased {} for {} points. Your new balance: {} points",
                        product.name, product.points_required, new_balance
                    ),
                ));
                Ok(PurchaseOutcome {
                    purchase,
                    new_balance,
                })
            }
            Err(e) => {
                tracing::error!("Purchase of {} failed: {}", product.id, e);
                self.notifier.notify(Notification::error(
                    "Purchase Failed",
                    "There was an error processing your purchase. Please try again.",
                ));
                Err(e.into())
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PurchaseProductError {
    #[error(transparent)]
    Access(#[from] ShopAccessError),
    #[error("Product not found")]
    ProductNotFound,
    #[error("Not enough points: {needed} more needed")]
    InsufficientPoints { needed: i64 },
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
