use std::sync::Arc;

use super::{
    QuizStartWatch, RegisterParticipation, RegisterParticipationError, Registration,
    ResolveSession, ResolveSessionError, WatchQuizStart,
};
use crate::domain::entities::{Quiz, QuizSession};
use crate::domain::repositories::QuizRepository;
use crate::domain::services::{Navigator, Notification, Notifier, Route};
use crate::domain::value_objects::AuthContext;
use crate::infrastructure::realtime::RealtimeClient;

/// Join quiz output
#[derive(Debug)]
pub struct JoinQuizOutput {
    pub session: QuizSession,
    pub registration: Registration,
    /// Present only for a fresh registration whose channels opened
    pub watch: Option<QuizStartWatch>,
}

/// Join quiz use case: resolve the session, register, then watch for the start.
///
/// Every path that gets past registration ends on the waiting room; realtime
/// only adds the jump to the active view.
pub struct JoinQuiz {
    resolve_session: ResolveSession,
    register: RegisterParticipation,
    watch: WatchQuizStart,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl JoinQuiz {
    pub fn new(
        quiz_repo: Arc<dyn QuizRepository>,
        realtime: Arc<dyn RealtimeClient>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            resolve_session: ResolveSession::new(quiz_repo.clone()),
            register: RegisterParticipation::new(quiz_repo),
            watch: WatchQuizStart::new(realtime, navigator.clone()),
            navigator,
            notifier,
        }
    }

    pub async fn execute(
        &self,
        quiz: &Quiz,
        ctx: Option<&AuthContext>,
    ) -> Result<JoinQuizOutput, JoinQuizError> {
        match self.join(quiz, ctx).await {
            Ok(output) => Ok(output),
            Err(e) => {
                tracing::error!("Error joining quiz {}: {}", quiz.id, e);
                let description = match &e {
                    JoinQuizError::NotJoinable(message) => *message,
                    _ => "Failed to join quiz",
                };
                self.notifier
                    .notify(Notification::error("Error", description));
                Err(e)
            }
        }
    }

    async fn join(&self, quiz: &Quiz, ctx: Option<&AuthContext>) -> Result<JoinQuizOutput, JoinQuizError> {
        let ctx = ctx.ok_or(JoinQuizError::NotAuthenticated)?;

        if let Some(message) = quiz.joinability().message() {
            return Err(JoinQuizError::NotJoinable(message));
        }

        let session = self.resolve_session.execute(&quiz.id, Some(ctx)).await?;
        tracing::debug!("Using session {} for quiz {}", session.id, quiz.id);

        let registration = self.register.execute(&session, Some(ctx)).await?;
        let waiting_room = Route::waiting_room(&quiz.id);

        let watch = match &registration {
            Registration::AlreadyJoined => None,
            Registration::Joined(_) => match self.watch.execute(&quiz.id, &session.id).await {
                Ok(watch) => Some(watch),
                Err(e) => {
                    tracing::warn!("Realtime unavailable, waiting room only: {}", e);
                    None
                }
            },
        };

        self.navigator.navigate(waiting_room);

        Ok(JoinQuizOutput {
            session,
            registration,
            watch,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JoinQuizError {
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("{0}")]
    NotJoinable(&'static str),
    #[error("Session lookup failed: {0}")]
    Session(#[from] ResolveSessionError),
    #[error("Participation failed: {0}")]
    Participation(#[from] RegisterParticipationError),
}
