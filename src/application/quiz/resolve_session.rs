use std::sync::Arc;

use crate::domain::entities::{NewQuizSession, QuizSession, SessionStatus, DEFAULT_TIME_LIMIT};
use crate::domain::repositories::{QuizRepository, RepositoryError};
use crate::domain::value_objects::AuthContext;

/// Find the session to join, creating a waiting one when the quiz has none.
///
/// The most recently created session is reused whatever its status. An
/// ended session is reused too; that case is logged.
pub struct ResolveSession {
    quiz_repo: Arc<dyn QuizRepository>,
}

impl ResolveSession {
    pub fn new(quiz_repo: Arc<dyn QuizRepository>) -> Self {
        Self { quiz_repo }
    }

    pub async fn execute(
        &self,
        quiz_id: &str,
        ctx: Option<&AuthContext>,
    ) -> Result<QuizSession, ResolveSessionError> {
        let ctx = ctx.ok_or(ResolveSessionError::NotAuthenticated)?;

        if let Some(session) = self.quiz_repo.latest_session(quiz_id).await? {
            if session.status == SessionStatus::Ended {
                tracing::warn!(
                    "Reusing ended session {} for quiz {}",
                    session.id,
                    quiz_id
                );
            } else {
                tracing::debug!("Reusing session {} ({})", session.id, session.status.as_str());
            }
            return Ok(session);
        }

        let questions = self.quiz_repo.list_questions(quiz_id).await?;
        let time_remaining = questions
            .first()
            .map(|q| q.time_limit)
            .unwrap_or(DEFAULT_TIME_LIMIT);

        let new_session = NewQuizSession::waiting(quiz_id, ctx.user_id(), time_remaining);
        let session = self.quiz_repo.create_session(&new_session).await?;

        tracing::info!(
            "Created waiting session {} for quiz {} ({}s)",
            session.id,
            quiz_id,
            time_remaining
        );
        Ok(session)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveSessionError {
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
