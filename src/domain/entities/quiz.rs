use serde::{Deserialize, Serialize};

/// Quiz publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizStatus {
    Draft,
    Published,
    Archived,
}

impl QuizStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizStatus::Draft => "draft",
            QuizStatus::Published => "published",
            QuizStatus::Archived => "archived",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(QuizStatus::Draft),
            "published" => Some(QuizStatus::Published),
            "archived" => Some(QuizStatus::Archived),
            _ => None,
        }
    }
}

/// Whether a looked-up quiz can be joined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joinability {
    Joinable,
    Archived,
    Unavailable,
}

impl Joinability {
    /// Message shown instead of the join button
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Joinability::Joinable => None,
            Joinability::Archived => Some("This quiz is archived and cannot be joined."),
            Joinability::Unavailable => {
                Some("This quiz is not available to join. Only published quizzes can be joined.")
            }
        }
    }
}

/// Quiz entity, as projected by the `quizzes_with_creator` view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub access_code: String,
    pub status: QuizStatus,
    pub created_by: String,
    #[serde(default)]
    pub question_count: i64,
    #[serde(default)]
    pub creator_username: Option<String>,
}

impl Quiz {
    pub fn joinability(&self) -> Joinability {
        match self.status {
            QuizStatus::Published => Joinability::Joinable,
            QuizStatus::Archived => Joinability::Archived,
            QuizStatus::Draft => Joinability::Unavailable,
        }
    }

    pub fn creator_label(&self) -> &str {
        self.creator_username.as_deref().unwrap_or("Unknown")
    }
}

/// Question row; only the timer is read by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub quiz_id: String,
    pub order_number: i32,
    pub time_limit: i32,
}
