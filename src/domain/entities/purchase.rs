use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Purchase status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Pending,
    Completed,
    Cancelled,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Pending => "pending",
            PurchaseStatus::Completed => "completed",
            PurchaseStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PurchaseStatus::Pending),
            "completed" => Some(PurchaseStatus::Completed),
            "cancelled" => Some(PurchaseStatus::Cancelled),
            _ => None,
        }
    }
}

/// Tabs of the purchase history dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PurchaseTab {
    #[default]
    All,
    Pending,
    Completed,
    Cancelled,
}

impl PurchaseTab {
    pub const ALL: [PurchaseTab; 4] = [
        PurchaseTab::All,
        PurchaseTab::Pending,
        PurchaseTab::Completed,
        PurchaseTab::Cancelled,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PurchaseTab::All => "All",
            PurchaseTab::Pending => "Pending",
            PurchaseTab::Completed => "Completed",
            PurchaseTab::Cancelled => "Cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "all" => Some(PurchaseTab::All),
            "pending" => Some(PurchaseTab::Pending),
            "completed" => Some(PurchaseTab::Completed),
            "cancelled" => Some(PurchaseTab::Cancelled),
            _ => None,
        }
    }

    pub fn matches(&self, status: PurchaseStatus) -> bool {
        match self {
            PurchaseTab::All => true,
            PurchaseTab::Pending => status == PurchaseStatus::Pending,
            PurchaseTab::Completed => status == PurchaseStatus::Completed,
            PurchaseTab::Cancelled => status == PurchaseStatus::Cancelled,
        }
    }
}

/// Product fields embedded in a purchase listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSummary {
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Purchase as shown in the history dropdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub id: String,
    pub status: PurchaseStatus,
    pub points_spent: i64,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "products", default)]
    pub product: Option<ProductSummary>,
}

impl PurchaseRecord {
    pub fn product_name(&self) -> &str {
        self.product.as_ref().map(|p| p.name.as_str()).unwrap_or("")
    }
}

/// Insert payload for a shop checkout
#[derive(Debug, Clone, Serialize)]
pub struct NewPurchase {
    pub user_id: String,
    pub product_id: String,
    pub points_spent: i64,
}
