use std::sync::Arc;

use crate::domain::entities::{NewQuizParticipant, QuizParticipant, QuizSession};
use crate::domain::repositories::{QuizRepository, RepositoryError};
use crate::domain::value_objects::AuthContext;

/// Register participation output
#[derive(Debug, Clone)]
pub enum Registration {
    /// A new participation row was written
    Joined(QuizParticipant),
    /// The user already takes part in this quiz; nothing was written
    AlreadyJoined,
}

impl Registration {
    pub fn is_new(&self) -> bool {
        matches!(self, Registration::Joined(_))
    }
}

/// Record the current user as a participant of a session, at most once per quiz.
///
/// The store's unique (quiz, user) index is what guarantees "at most once";
/// a write it rejects is reported as [`Registration::AlreadyJoined`].
pub struct RegisterParticipation {
    quiz_repo: Arc<dyn QuizRepository>,
}

impl RegisterParticipation {
    pub fn new(quiz_repo: Arc<dyn QuizRepository>) -> Self {
        Self { quiz_repo }
    }

    pub async fn execute(
        &self,
        session: &QuizSession,
        ctx: Option<&AuthContext>,
    ) -> Result<Registration, RegisterParticipationError> {
        let ctx = ctx.ok_or(RegisterParticipationError::NotAuthenticated)?;
        let user_id = ctx.user_id();

        let existing = self
            .quiz_repo
            .find_participations(&session.quiz_id, user_id)
            .await?;
        if !existing.is_empty() {
            tracing::debug!(
                "User {} already in quiz {} ({} rows)",
                user_id,
                session.quiz_id,
                existing.len()
            );
            return Ok(Registration::AlreadyJoined);
        }

        let participant = NewQuizParticipant::joined(&session.id, &session.quiz_id, user_id);
        match self.quiz_repo.add_participant(&participant).await {
            Ok(stored) => {
                tracing::info!("User {} joined session {}", user_id, session.id);
                Ok(Registration::Joined(stored))
            }
            Err(e) if e.is_conflict() => {
                tracing::debug!("Concurrent join for user {} resolved by the store", user_id);
                Ok(Registration::AlreadyJoined)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterParticipationError {
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
