use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::write_error;
use crate::domain::entities::{
    NewQuizParticipant, NewQuizSession, ParticipantStatus, Question, Quiz, QuizParticipant,
    QuizSession, QuizStatus, SessionStatus,
};
use crate::domain::repositories::{QuizRepository, RepositoryError};
use crate::domain::value_objects::AccessCode;

/// SQLite implementation of QuizRepository
pub struct SqliteQuizRepository {
    pool: SqlitePool,
}

impl SqliteQuizRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_quiz(row: &sqlx::sqlite::SqliteRow) -> Quiz {
        use sqlx::Row;

        let status_str: String = row.get("status");

        Quiz {
            id: row.get("id"),
            title: row.get("title"),
            description: row.get("description"),
            access_code: row.get("access_code"),
            status: QuizStatus::from_str(&status_str).unwrap_or(QuizStatus::Draft),
            created_by: row.get("created_by"),
            question_count: row.get::<i64, _>("question_count"),
            creator_username: row.get("creator_username"),
        }
    }

    fn row_to_session(row: &sqlx::sqlite::SqliteRow) -> QuizSession {
        use sqlx::Row;

        let status_str: String = row.get("status");

        QuizSession {
            id: row.get("id"),
            quiz_id: row.get("quiz_id"),
            created_by: row.get("created_by"),
            status: SessionStatus::from_str(&status_str).unwrap_or(SessionStatus::Waiting),
            current_question_index: row.get("current_question_index"),
            time_remaining: row.get("time_remaining"),
            created_at: row.get("created_at"),
            started_at: row.get("started_at"),
            ended_at: row.get("ended_at"),
        }
    }

    fn row_to_participant(row: &sqlx::sqlite::SqliteRow) -> QuizParticipant {
        use sqlx::Row;

        let status: String = row.get("status");

        QuizParticipant {
            id: row.get("id"),
            session_id: row.get("session_id"),
            quiz_id: row.get("quiz_id"),
            user_id: row.get("user_id"),
            status: ParticipantStatus::from(status),
            joined_at: row.get("joined_at"),
        }
    }
}

#[async_trait]
impl QuizRepository for SqliteQuizRepository {
    async fn find_by_access_code(&self, code: &AccessCode) -> Result<Option<Quiz>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM quizzes_with_creator WHERE access_code_lower = ? LIMIT 1")
            .bind(code.lower())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(row.as_ref().map(Self::row_to_quiz))
    }

    async fn list_questions(&self, quiz_id: &str) -> Result<Vec<Question>, RepositoryError> {
        use sqlx::Row;

        let rows = sqlx::query(
            "SELECT id, quiz_id, order_number, time_limit FROM questions WHERE quiz_id = ? ORDER BY order_number ASC",
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|row| Question {
                id: row.get("id"),
                quiz_id: row.get("quiz_id"),
                order_number: row.get("order_number"),
                time_limit: row.get("time_limit"),
            })
            .collect())
    }

    async fn latest_session(&self, quiz_id: &str) -> Result<Option<QuizSession>, RepositoryError> {
        let row = sqlx::query(
            "SELECT * FROM quiz_sessions WHERE quiz_id = ? ORDER BY created_at DESC, rowid DESC LIMIT 1",
        )
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(row.as_ref().map(Self::row_to_session))
    }

    async fn create_session(&self, session: &NewQuizSession) -> Result<QuizSession, RepositoryError> {
        let stored = QuizSession {
            id: uuid::Uuid::new_v4().to_string(),
            quiz_id: session.quiz_id.clone(),
            created_by: Some(session.created_by.clone()),
            status: session.status,
            current_question_index: session.current_question_index,
            time_remaining: session.time_remaining,
            created_at: Utc::now(),
            started_at: Some(session.started_at),
            ended_at: session.ended_at,
        };

        sqlx::query(
            r#"
            INSERT INTO quiz_sessions (id, quiz_id, created_by, status, current_question_index,
                                       time_remaining, created_at, started_at, ended_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&stored.id)
        .bind(&stored.quiz_id)
        .bind(&stored.created_by)
        .bind(stored.status.as_str())
        .bind(stored.current_question_index)
        .bind(stored.time_remaining)
        .bind(stored.created_at)
        .bind(stored.started_at)
        .bind(stored.ended_at)
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        Ok(stored)
    }

    async fn find_participations(
        &self,
        quiz_id: &str,
        user_id: &str,
    ) -> Result<Vec<QuizParticipant>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM quiz_participants WHERE quiz_id = ? AND user_id = ?")
            .bind(quiz_id)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(rows.iter().map(Self::row_to_participant).collect())
    }

    async fn add_participant(
        &self,
        participant: &NewQuizParticipant,
    ) -> Result<QuizParticipant, RepositoryError> {
        let stored = QuizParticipant {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: participant.session_id.clone(),
            quiz_id: participant.quiz_id.clone(),
            user_id: participant.user_id.clone(),
            status: participant.status.clone(),
            joined_at: participant.joined_at,
        };

        sqlx::query(
            r#"
            INSERT INTO quiz_participants (id, session_id, quiz_id, user_id, status, joined_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&stored.id)
        .bind(&stored.session_id)
        .bind(&stored.quiz_id)
        .bind(&stored.user_id)
        .bind(stored.status.as_str())
        .bind(stored.joined_at)
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        Ok(stored)
    }
}
