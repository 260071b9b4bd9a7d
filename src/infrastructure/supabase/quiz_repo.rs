use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::postgrest::{single, PostgrestClient, Query};
use crate::domain::entities::{
    NewQuizParticipant, NewQuizSession, ParticipantStatus, Question, Quiz, QuizParticipant,
    QuizSession,
};
use crate::domain::repositories::{QuizRepository, RepositoryError};
use crate::domain::value_objects::AccessCode;

/// Participant row as stored. Older rows carry only `student_id`.
#[derive(Debug, Deserialize)]
struct ParticipantRow {
    id: String,
    session_id: String,
    quiz_id: String,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    student_id: Option<String>,
    status: ParticipantStatus,
    joined_at: DateTime<Utc>,
}

impl From<ParticipantRow> for QuizParticipant {
    fn from(row: ParticipantRow) -> Self {
        QuizParticipant {
            id: row.id,
            session_id: row.session_id,
            quiz_id: row.quiz_id,
            user_id: row.user_id.or(row.student_id).unwrap_or_default(),
            status: row.status,
            joined_at: row.joined_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct ParticipantInsert<'a> {
    session_id: &'a str,
    quiz_id: &'a str,
    user_id: &'a str,
    student_id: &'a str,
    status: &'a str,
    joined_at: DateTime<Utc>,
}

/// Supabase implementation of QuizRepository
pub struct SupabaseQuizRepository {
    client: PostgrestClient,
}

impl SupabaseQuizRepository {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QuizRepository for SupabaseQuizRepository {
    async fn find_by_access_code(&self, code: &AccessCode) -> Result<Option<Quiz>, RepositoryError> {
        let query = Query::new("quizzes_with_creator")
            .select("*")
            .eq("access_code_lower", &code.lower())
            .limit(1);
        let rows: Vec<Quiz> = self.client.select(&query).await?;
        Ok(rows.into_iter().next())
    }

    async fn list_questions(&self, quiz_id: &str) -> Result<Vec<Question>, RepositoryError> {
        let query = Query::new("questions")
            .select("id,quiz_id,order_number,time_limit")
            .eq("quiz_id", quiz_id)
            .order("order_number", true);
        self.client.select(&query).await
    }

    async fn latest_session(&self, quiz_id: &str) -> Result<Option<QuizSession>, RepositoryError> {
        let query = Query::new("quiz_sessions")
            .select("*")
            .eq("quiz_id", quiz_id)
            .order("created_at", false)
            .limit(1);
        let rows: Vec<QuizSession> = self.client.select(&query).await?;
        Ok(rows.into_iter().next())
    }

    async fn create_session(&self, session: &NewQuizSession) -> Result<QuizSession, RepositoryError> {
        let query = Query::new("quiz_sessions").select("*");
        let rows = self.client.insert(&query, session).await?;
        single(rows, "quiz_sessions")
    }

    async fn find_participations(
        &self,
        quiz_id: &str,
        user_id: &str,
    ) -> Result<Vec<QuizParticipant>, RepositoryError> {
        let query = Query::new("quiz_participants")
            .select("*")
            .eq("quiz_id", quiz_id)
            .eq("student_id", user_id);
        let rows: Vec<ParticipantRow> = self.client.select(&query).await?;
        Ok(rows.into_iter().map(QuizParticipant::from).collect())
    }

    async fn add_participant(
        &self,
        participant: &NewQuizParticipant,
    ) -> Result<QuizParticipant, RepositoryError> {
        let body = ParticipantInsert {
            session_id: &participant.session_id,
            quiz_id: &participant.quiz_id,
            user_id: &participant.user_id,
            student_id: &participant.user_id,
            status: participant.status.as_str(),
            joined_at: participant.joined_at,
        };
        let query = Query::new("quiz_participants").select("*");
        let rows: Vec<ParticipantRow> = self.client.insert(&query, &body).await?;
        single(rows, "quiz_participants").map(QuizParticipant::from)
    }
}
