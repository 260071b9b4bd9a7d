use async_trait::async_trait;

use crate::domain::entities::{
    NewQuizParticipant, NewQuizSession, Question, Quiz, QuizParticipant, QuizSession,
};
use crate::domain::repositories::RepositoryError;
use crate::domain::value_objects::AccessCode;

/// Quiz repository trait
#[async_trait]
pub trait QuizRepository: Send + Sync {
    // ========== Quiz operations ==========

    /// Find quiz (with creator info) by access code, case-insensitively
    async fn find_by_access_code(&self, code: &AccessCode) -> Result<Option<Quiz>, RepositoryError>;

    /// List questions ordered by order number ascending
    async fn list_questions(&self, quiz_id: &str) -> Result<Vec<Question>, RepositoryError>;

    // ========== Session operations ==========

    /// Most recently created session for the quiz, whatever its status
    async fn latest_session(&self, quiz_id: &str) -> Result<Option<QuizSession>, RepositoryError>;

    /// Insert a session and return the stored row
    async fn create_session(&self, session: &NewQuizSession) -> Result<QuizSession, RepositoryError>;

    // ========== Participant operations ==========

    /// Participation rows for a (quiz, user) pair
    async fn find_participations(
        &self,
        quiz_id: &str,
        user_id: &str,
    ) -> Result<Vec<QuizParticipant>, RepositoryError>;

    /// Insert a participation. Fails with [`RepositoryError::AlreadyExists`]
    /// when the (quiz, user) pair is already present.
    async fn add_participant(
        &self,
        participant: &NewQuizParticipant,
    ) -> Result<QuizParticipant, RepositoryError>;
}
