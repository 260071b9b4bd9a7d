use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Countdown used when a quiz has no questions yet
pub const DEFAULT_TIME_LIMIT: i32 = 60;

/// Quiz session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Waiting,
    Active,
    Ended,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Waiting => "waiting",
            SessionStatus::Active => "active",
            SessionStatus::Ended => "ended",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "waiting" => Some(SessionStatus::Waiting),
            "active" => Some(SessionStatus::Active),
            "ended" => Some(SessionStatus::Ended),
            _ => None,
        }
    }
}

/// A single run of a quiz
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    pub id: String,
    pub quiz_id: String,
    #[serde(default)]
    pub created_by: Option<String>,
    pub status: SessionStatus,
    pub current_question_index: i32,
    pub time_remaining: i32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
}

/// Insert payload for a new session
#[derive(Debug, Clone, Serialize)]
pub struct NewQuizSession {
    pub quiz_id: String,
    pub created_by: String,
    pub current_question_index: i32,
    pub status: SessionStatus,
    pub time_remaining: i32,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl NewQuizSession {
    /// A waiting session at the first question
    pub fn waiting(quiz_id: &str, created_by: &str, time_remaining: i32) -> Self {
        Self {
            quiz_id: quiz_id.to_string(),
            created_by: created_by.to_string(),
            current_question_index: 0,
            status: SessionStatus::Waiting,
            time_remaining,
            started_at: Utc::now(),
            ended_at: None,
        }
    }
}
