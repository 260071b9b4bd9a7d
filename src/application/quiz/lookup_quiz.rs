use std::sync::Arc;

use crate::domain::entities::{Joinability, Quiz};
use crate::domain::repositories::{QuizRepository, RepositoryError};
use crate::domain::services::{Notification, Notifier};
use crate::domain::value_objects::AccessCode;

/// Lookup quiz output
#[derive(Debug, Clone)]
pub struct QuizPreview {
    pub code: AccessCode,
    pub quiz: Quiz,
    pub joinability: Joinability,
}

/// Find the quiz an access code points at.
///
/// Anything but a complete six-character code yields `Ok(None)` without
/// touching the store, as does an unknown code.
pub struct LookupQuiz {
    quiz_repo: Arc<dyn QuizRepository>,
    notifier: Arc<dyn Notifier>,
}

impl LookupQuiz {
    pub fn new(quiz_repo: Arc<dyn QuizRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self { quiz_repo, notifier }
    }

    pub async fn execute(&self, input: &str) -> Result<Option<QuizPreview>, LookupQuizError> {
        let Some(code) = AccessCode::parse(input) else {
            return Ok(None);
        };

        let quiz = match self.quiz_repo.find_by_access_code(&code).await {
            Ok(quiz) => quiz,
            Err(e) => {
                tracing::warn!("Quiz lookup for code {} failed: {}", code, e);
                self.notifier
                    .notify(Notification::error("Error", "Failed to check quiz code"));
                return Err(e.into());
            }
        };

        Ok(quiz.map(|quiz| {
            tracing::debug!("Code {} matches quiz {} ({})", code, quiz.id, quiz.status.as_str());
            QuizPreview {
                code,
                joinability: quiz.joinability(),
                quiz,
            }
        }))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LookupQuizError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
