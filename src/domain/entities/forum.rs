use serde::{Deserialize, Serialize};

/// Forum category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumCategory {
    pub id: String,
    pub name: String,
}
