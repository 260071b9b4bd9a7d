use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reward product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub points_required: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert/update payload for a product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub points_required: i64,
    pub image_url: String,
}
