mod list_products;
mod list_purchases;
mod purchase_product;

pub use list_products::*;
pub use list_purchases::*;
pub use purchase_product::*;

use crate::domain::entities::Profile;
use crate::domain::repositories::{ProfileRepository, RepositoryError};
use crate::domain::value_objects::AuthContext;

/// Why the shop turned a caller away
#[derive(Debug, thiserror::Error)]
pub enum ShopAccessError {
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Profile not found")]
    ProfileNotFound,
    #[error("Only students can use the shop")]
    NotStudent,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// The caller's profile, provided they are a student
async fn load_student(
    profile_repo: &dyn ProfileRepository,
    ctx: Option<&AuthContext>,
) -> Result<Profile, ShopAccessError> {
    let ctx = ctx.ok_or(ShopAccessError::NotAuthenticated)?;
    let profile = profile_repo
        .find_by_id(ctx.user_id())
        .await?
        .ok_or(ShopAccessError::ProfileNotFound)?;
    if !profile.is_student() {
        return Err(ShopAccessError::NotStudent);
    }
    Ok(profile)
}
