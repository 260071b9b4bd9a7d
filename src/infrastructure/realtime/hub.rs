use async_broadcast::{broadcast, InactiveReceiver, RecvError, Sender, TrySendError};
use async_trait::async_trait;
use futures::StreamExt;

use super::{BroadcastMessage, RealtimeClient, RealtimeError, Subscription};

/// In-process broadcast hub.
///
/// Every subscriber gets its own receiver on one shared channel and keeps
/// only the messages matching its topic and event.
pub struct BroadcastHub {
    sender: Sender<BroadcastMessage>,
    // Keeps the channel open while nobody is subscribed
    _keepalive: InactiveReceiver<BroadcastMessage>,
}

impl BroadcastHub {
    pub fn new(capacity: usize) -> Self {
        let (mut sender, receiver) = broadcast(capacity);
        sender.set_overflow(true);
        Self {
            sender,
            _keepalive: receiver.deactivate(),
        }
    }

    /// Publish to every live subscriber; returns how many receivers saw it
    pub fn publish(&self, message: BroadcastMessage) -> usize {
        let receiver_count = self.sender.receiver_count();
        tracing::debug!(
            "Broadcasting '{}' on '{}' to {} receivers",
            message.event,
            message.topic,
            receiver_count
        );
        match self.sender.try_broadcast(message) {
            Ok(_) => receiver_count,
            Err(TrySendError::Inactive(_)) => {
                tracing::debug!("Event broadcast but no active receivers");
                0
            }
            Err(e) => {
                tracing::warn!("Failed to broadcast event: {:?}", e);
                0
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[async_trait]
impl RealtimeClient for BroadcastHub {
    async fn subscribe(&self, topic: &str, event: &str) -> Result<Subscription, RealtimeError> {
        if self.sender.is_closed() {
            return Err(RealtimeError::Closed);
        }

        let mut receiver = self.sender.new_receiver();
        let wanted_topic = topic.to_string();
        let wanted_event = event.to_string();

        let events = async_stream::stream! {
            loop {
                match receiver.recv().await {
                    Ok(message) => {
                        if message.topic == wanted_topic && message.event == wanted_event {
                            yield message;
                        }
                    }
                    Err(RecvError::Overflowed(skipped)) => {
                        tracing::warn!("Subscriber on '{}' lagged, {} events skipped", wanted_topic, skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        };

        Ok(Subscription::new(topic, event, events.boxed(), None))
    }
}
