use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Participation status. Only `joined` is written by this client; other
/// values set by the host are carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParticipantStatus {
    Joined,
    Other(String),
}

impl ParticipantStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ParticipantStatus::Joined => "joined",
            ParticipantStatus::Other(s) => s,
        }
    }
}

impl From<String> for ParticipantStatus {
    fn from(s: String) -> Self {
        if s == "joined" {
            ParticipantStatus::Joined
        } else {
            ParticipantStatus::Other(s)
        }
    }
}

impl From<ParticipantStatus> for String {
    fn from(status: ParticipantStatus) -> Self {
        status.as_str().to_string()
    }
}

/// A user's membership in a quiz session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizParticipant {
    pub id: String,
    pub session_id: String,
    pub quiz_id: String,
    pub user_id: String,
    pub status: ParticipantStatus,
    pub joined_at: DateTime<Utc>,
}

/// Insert payload for a participation
#[derive(Debug, Clone, Serialize)]
pub struct NewQuizParticipant {
    pub session_id: String,
    pub quiz_id: String,
    pub user_id: String,
    pub status: ParticipantStatus,
    pub joined_at: DateTime<Utc>,
}

impl NewQuizParticipant {
    pub fn joined(session_id: &str, quiz_id: &str, user_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            quiz_id: quiz_id.to_string(),
            user_id: user_id.to_string(),
            status: ParticipantStatus::Joined,
            joined_at: Utc::now(),
        }
    }
}
