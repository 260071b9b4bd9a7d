use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::domain::entities::SessionStatus;
use crate::domain::services::{Navigator, Route};
use crate::infrastructure::realtime::{BroadcastMessage, RealtimeClient, RealtimeError, Subscription};

pub const QUIZ_STARTED_EVENT: &str = "quiz_started";
pub const SESSION_UPDATE_TOPIC: &str = "session-update";
pub const SESSION_STATUS_CHANGED_EVENT: &str = "session_status_changed";

/// Quiz-scoped channel topic
pub fn quiz_topic(quiz_id: &str) -> String {
    format!("quiz:{}", quiz_id)
}

/// Whether a `session_status_changed` payload says our session went live
pub fn is_session_activation(payload: &serde_json::Value, session_id: &str) -> bool {
    payload.get("session_id").and_then(|v| v.as_str()) == Some(session_id)
        && payload.get("status").and_then(|v| v.as_str()) == Some(SessionStatus::Active.as_str())
}

/// Listens for the host starting the quiz and moves to the active view once.
pub struct WatchQuizStart {
    realtime: Arc<dyn RealtimeClient>,
    navigator: Arc<dyn Navigator>,
}

impl WatchQuizStart {
    pub fn new(realtime: Arc<dyn RealtimeClient>, navigator: Arc<dyn Navigator>) -> Self {
        Self { realtime, navigator }
    }

    /// Open both subscriptions. Fails only when neither could be opened.
    pub async fn execute(&self, quiz_id: &str, session_id: &str) -> Result<QuizStartWatch, RealtimeError> {
        let quiz_channel = self
            .realtime
            .subscribe(&quiz_topic(quiz_id), QUIZ_STARTED_EVENT)
            .await;
        let status_channel = self
            .realtime
            .subscribe(SESSION_UPDATE_TOPIC, SESSION_STATUS_CHANGED_EVENT)
            .await;

        let open = [quiz_channel.is_ok(), status_channel.is_ok()]
            .iter()
            .filter(|ok| **ok)
            .count();
        let shared = Arc::new(Shared {
            cancel: CancellationToken::new(),
            fired: AtomicBool::new(false),
            live: AtomicUsize::new(open),
            started: watch::channel(false).0,
            navigator: self.navigator.clone(),
            route: Route::active_quiz(quiz_id),
        });
        let started = shared.started.subscribe();

        let mut tasks = Vec::with_capacity(2);
        let mut last_error = None;

        match quiz_channel {
            Ok(sub) => tasks.push(spawn_listener(sub, shared.clone(), |_| true)),
            Err(e) => {
                tracing::warn!("Could not subscribe to quiz channel for {}: {}", quiz_id, e);
                last_error = Some(e);
            }
        }

        match status_channel {
            Ok(sub) => {
                let session_id = session_id.to_string();
                tasks.push(spawn_listener(sub, shared.clone(), move |msg| {
                    is_session_activation(&msg.payload, &session_id)
                }));
            }
            Err(e) => {
                tracing::warn!("Could not subscribe to session updates: {}", e);
                last_error = Some(e);
            }
        }

        if tasks.is_empty() {
            if let Some(e) = last_error {
                return Err(e);
            }
        }

        tracing::debug!("Watching quiz {} for start ({} channels)", quiz_id, tasks.len());
        Ok(QuizStartWatch {
            quiz_id: quiz_id.to_string(),
            shared,
            tasks,
            started,
        })
    }
}

struct Shared {
    cancel: CancellationToken,
    fired: AtomicBool,
    /// Listeners still running; the last one out closes the watch
    live: AtomicUsize,
    started: watch::Sender<bool>,
    navigator: Arc<dyn Navigator>,
    route: Route,
}

fn spawn_listener<F>(mut sub: Subscription, shared: Arc<Shared>, accept: F) -> JoinHandle<()>
where
    F: Fn(&BroadcastMessage) -> bool + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = shared.cancel.cancelled() => break,
                next = sub.next() => {
                    let Some(message) = next else {
                        tracing::debug!("Channel '{}' closed", sub.topic());
                        break;
                    };
                    if !accept(&message) {
                        continue;
                    }
                    if shared.cancel.is_cancelled() || shared.fired.swap(true, Ordering::SeqCst) {
                        break;
                    }
                    tracing::info!("'{}' on '{}': quiz started", message.event, message.topic);
                    shared.navigator.navigate(shared.route.clone());
                    shared.started.send_replace(true);
                    shared.cancel.cancel();
                    break;
                }
            }
        }
        sub.release();
        if shared.live.fetch_sub(1, Ordering::SeqCst) == 1 {
            shared.cancel.cancel();
        }
    })
}

/// Live quiz-start subscriptions. Released by [`QuizStartWatch::close`] or on drop.
pub struct QuizStartWatch {
    quiz_id: String,
    shared: Arc<Shared>,
    tasks: Vec<JoinHandle<()>>,
    started: watch::Receiver<bool>,
}

impl QuizStartWatch {
    pub fn channel_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn has_started(&self) -> bool {
        *self.started.borrow()
    }

    pub fn is_closed(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }

    /// Wait until the quiz starts. `false` if every channel closed first.
    pub async fn wait_started(&mut self) -> bool {
        let cancel = self.shared.cancel.clone();
        tokio::select! {
            result = self.started.wait_for(|started| *started) => return result.is_ok(),
            _ = cancel.cancelled() => {}
        }
        *self.started.borrow()
    }

    /// Release both subscriptions; no navigation happens once this returns
    pub async fn close(mut self) {
        self.shared.cancel.cancel();
        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                tracing::warn!("Quiz start listener ended abnormally: {}", e);
            }
        }
        tracing::debug!("Stopped watching quiz {}", self.quiz_id);
    }
}

impl std::fmt::Debug for QuizStartWatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizStartWatch")
            .field("quiz_id", &self.quiz_id)
            .field("channels", &self.tasks.len())
            .field("started", &self.has_started())
            .finish()
    }
}

impl Drop for QuizStartWatch {
    fn drop(&mut self) {
        self.shared.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_activation_filter() {
        assert!(is_session_activation(&json!({"session_id": "s1", "status": "active"}), "s1"));
        assert!(!is_session_activation(&json!({"session_id": "s2", "status": "active"}), "s1"));
        assert!(!is_session_activation(&json!({"session_id": "s1", "status": "ended"}), "s1"));
        assert!(!is_session_activation(&json!({"status": "active"}), "s1"));
    }

    #[test]
    fn test_quiz_topic() {
        assert_eq!(quiz_topic("abc"), "quiz:abc");
    }
}
