//! Realtime channels
//!
//! Topic-keyed broadcast subscriptions. Two backends: an in-process hub and
//! the Supabase Realtime (Phoenix) websocket.

mod hub;
mod phoenix;

pub use hub::*;
pub use phoenix::*;

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use serde::{Deserialize, Serialize};

/// A broadcast event on a topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastMessage {
    pub topic: String,
    pub event: String,
    pub payload: serde_json::Value,
}

impl BroadcastMessage {
    pub fn new(topic: &str, event: &str, payload: serde_json::Value) -> Self {
        Self {
            topic: topic.to_string(),
            event: event.to_string(),
            payload,
        }
    }
}

/// Realtime error types
#[derive(Debug, thiserror::Error)]
pub enum RealtimeError {
    #[error("Failed to connect: {0}")]
    Connect(String),
    #[error("Connection closed")]
    Closed,
    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// Realtime client trait
#[async_trait]
pub trait RealtimeClient: Send + Sync {
    /// Subscribe to `event` broadcasts on `topic`. Events sent before the
    /// subscription exists are not replayed.
    async fn subscribe(&self, topic: &str, event: &str) -> Result<Subscription, RealtimeError>;
}

pub type ReleaseFn = Box<dyn FnOnce() + Send>;

/// An open subscription. Released exactly once, by [`Subscription::release`]
/// or on drop, whichever comes first.
pub struct Subscription {
    topic: String,
    event: String,
    events: BoxStream<'static, BroadcastMessage>,
    on_release: Option<ReleaseFn>,
    released: bool,
}

impl Subscription {
    pub fn new(
        topic: &str,
        event: &str,
        events: BoxStream<'static, BroadcastMessage>,
        on_release: Option<ReleaseFn>,
    ) -> Self {
        Self {
            topic: topic.to_string(),
            event: event.to_string(),
            events,
            on_release,
            released: false,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    /// Next matching event; `None` once the channel is gone or released
    pub async fn next(&mut self) -> Option<BroadcastMessage> {
        if self.released {
            return None;
        }
        self.events.next().await
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.events = futures::stream::empty().boxed();
        if let Some(release) = self.on_release.take() {
            release();
        }
        tracing::debug!(topic = %self.topic, event = %self.event, "Subscription released");
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("event", &self.event)
            .field("released", &self.released)
            .finish()
    }
}
