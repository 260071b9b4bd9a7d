//! Supabase Realtime client over the Phoenix channels websocket protocol.
//!
//! One socket is shared by every subscription. The first listener on a
//! topic sends `phx_join`; the last one to go sends `phx_leave`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::{mpsc, Mutex};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_util::sync::CancellationToken;

use super::{BroadcastMessage, RealtimeClient, RealtimeError, Subscription};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);
const PHOENIX_TOPIC: &str = "phoenix";
const TOPIC_PREFIX: &str = "realtime:";

/// Websocket endpoint for a Supabase project URL
pub fn realtime_endpoint(base_url: &str, api_key: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let ws_base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        base.to_string()
    };
    format!("{}/realtime/v1/websocket?apikey={}&vsn=1.0.0", ws_base, api_key)
}

/// Phoenix wire frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoenixMessage {
    pub topic: String,
    pub event: String,
    pub payload: Value,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
}

impl PhoenixMessage {
    pub fn join(topic: &str, reference: String, access_token: Option<&str>) -> Self {
        let mut payload = json!({
            "config": {
                "broadcast": { "ack": false, "self": false },
                "presence": { "key": "" },
                "postgres_changes": [],
                "private": false
            }
        });
        if let Some(token) = access_token {
            payload["access_token"] = Value::String(token.to_string());
        }
        Self {
            topic: format!("{}{}", TOPIC_PREFIX, topic),
            event: "phx_join".to_string(),
            payload,
            reference: Some(reference),
        }
    }

    pub fn leave(topic: &str, reference: String) -> Self {
        Self {
            topic: format!("{}{}", TOPIC_PREFIX, topic),
            event: "phx_leave".to_string(),
            payload: json!({}),
            reference: Some(reference),
        }
    }

    pub fn heartbeat(reference: String) -> Self {
        Self {
            topic: PHOENIX_TOPIC.to_string(),
            event: "heartbeat".to_string(),
            payload: json!({}),
            reference: Some(reference),
        }
    }

    /// Unwrap a `broadcast` frame into the application event it carries
    pub fn into_broadcast(self) -> Option<BroadcastMessage> {
        if self.event != "broadcast" {
            return None;
        }
        let topic = self
            .topic
            .strip_prefix(TOPIC_PREFIX)
            .unwrap_or(&self.topic)
            .to_string();
        let event = self.payload.get("event")?.as_str()?.to_string();
        let payload = self.payload.get("payload").cloned().unwrap_or(Value::Null);
        Some(BroadcastMessage {
            topic,
            event,
            payload,
        })
    }
}

struct Listener {
    id: u64,
    event: String,
    sender: mpsc::UnboundedSender<BroadcastMessage>,
}

/// Shared state of one open socket
struct Connection {
    outbound: mpsc::UnboundedSender<PhoenixMessage>,
    listeners: RwLock<HashMap<String, Vec<Listener>>>,
    next_ref: AtomicU64,
    next_listener: AtomicU64,
    cancel: CancellationToken,
}

impl Connection {
    fn new(outbound: mpsc::UnboundedSender<PhoenixMessage>) -> Self {
        Self {
            outbound,
            listeners: RwLock::new(HashMap::new()),
            next_ref: AtomicU64::new(1),
            next_listener: AtomicU64::new(1),
            cancel: CancellationToken::new(),
        }
    }

    async fn open(endpoint: &str) -> Result<Arc<Self>, RealtimeError> {
        let (stream, _) = connect_async(endpoint)
            .await
            .map_err(|e| RealtimeError::Connect(e.to_string()))?;
        let (mut writer, mut reader) = stream.split();
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<PhoenixMessage>();
        let conn = Arc::new(Self::new(outbound));

        tracing::info!("Realtime socket connected");

        let cancel = conn.cancel.clone();
        tokio::spawn(async move {
            let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
            heartbeat.tick().await;
            let mut beats: u64 = 0;

            loop {
                let frame = tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = heartbeat.tick() => {
                        beats += 1;
                        PhoenixMessage::heartbeat(format!("hb-{}", beats))
                    }
                    next = outbound_rx.recv() => match next {
                        Some(frame) => frame,
                        None => break,
                    },
                };

                let text = match serde_json::to_string(&frame) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!("Failed to encode realtime frame: {}", e);
                        continue;
                    }
                };
                tracing::trace!("Realtime tx: {}", text);
                if let Err(e) = writer.send(Message::Text(text)).await {
                    tracing::warn!("Realtime write failed, closing socket: {}", e);
                    cancel.cancel();
                    break;
                }
            }

            let _ = writer.close().await;
        });

        let reader_conn = conn.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = reader_conn.cancel.cancelled() => break,
                    frame = reader.next() => match frame {
                        Some(Ok(Message::Text(text))) => reader_conn.dispatch(&text),
                        Some(Ok(Message::Close(_))) | None => {
                            tracing::debug!("Realtime socket closed by server");
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            tracing::warn!("Realtime read failed: {}", e);
                            break;
                        }
                    },
                }
            }
            reader_conn.shutdown();
        });

        Ok(conn)
    }

    fn next_ref(&self) -> String {
        self.next_ref.fetch_add(1, Ordering::Relaxed).to_string()
    }

    fn send(&self, frame: PhoenixMessage) -> Result<(), RealtimeError> {
        self.outbound.send(frame).map_err(|_| RealtimeError::Closed)
    }

    /// Returns the listener id and whether it is the first on its topic
    fn add_listener(
        &self,
        topic: &str,
        event: &str,
        sender: mpsc::UnboundedSender<BroadcastMessage>,
    ) -> (u64, bool) {
        let id = self.next_listener.fetch_add(1, Ordering::Relaxed);
        let mut listeners = self.listeners.write().unwrap_or_else(|e| e.into_inner());
        let entry = listeners.entry(topic.to_string()).or_default();
        let first = entry.is_empty();
        entry.push(Listener {
            id,
            event: event.to_string(),
            sender,
        });
        (id, first)
    }

    fn remove_listener(&self, topic: &str, id: u64) {
        let now_empty = {
            let mut listeners = self.listeners.write().unwrap_or_else(|e| e.into_inner());
            let emptied = match listeners.get_mut(topic) {
                Some(entry) => {
                    entry.retain(|l| l.id != id);
                    entry.is_empty()
                }
                None => false,
            };
            if emptied {
                listeners.remove(topic);
            }
            emptied
        };

        if now_empty && !self.cancel.is_cancelled() {
            if let Err(e) = self.send(PhoenixMessage::leave(topic, self.next_ref())) {
                tracing::debug!("Could not leave '{}': {}", topic, e);
            }
        }
    }

    fn dispatch(&self, text: &str) {
        let frame: PhoenixMessage = match serde_json::from_str(text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("Unparseable realtime frame: {}", e);
                return;
            }
        };

        match frame.event.as_str() {
            "phx_reply" => {
                let status = frame.payload.get("status").and_then(Value::as_str);
                if status != Some("ok") {
                    tracing::warn!(topic = %frame.topic, payload = %frame.payload, "Realtime request rejected");
                }
            }
            "phx_error" | "phx_close" => {
                tracing::debug!(topic = %frame.topic, event = %frame.event, "Realtime channel event");
            }
            _ => {
                let Some(message) = frame.into_broadcast() else {
                    return;
                };
                let listeners = self.listeners.read().unwrap_or_else(|e| e.into_inner());
                if let Some(entry) = listeners.get(&message.topic) {
                    for listener in entry.iter().filter(|l| l.event == message.event) {
                        let _ = listener.sender.send(message.clone());
                    }
                }
            }
        }
    }

    /// Ends every subscription stream
    fn shutdown(&self) {
        self.cancel.cancel();
        let mut listeners = self.listeners.write().unwrap_or_else(|e| e.into_inner());
        listeners.clear();
    }
}

/// Supabase Realtime client. Connects lazily on the first subscription.
pub struct PhoenixRealtime {
    endpoint: String,
    access_token: Option<String>,
    connection: Mutex<Option<Arc<Connection>>>,
}

impl PhoenixRealtime {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            endpoint: realtime_endpoint(base_url, api_key),
            access_token: None,
            connection: Mutex::new(None),
        }
    }

    pub fn with_access_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }

    async fn connection(&self) -> Result<Arc<Connection>, RealtimeError> {
        let mut guard = self.connection.lock().await;
        if let Some(conn) = guard.as_ref() {
            if !conn.cancel.is_cancelled() {
                return Ok(conn.clone());
            }
        }
        let conn = Connection::open(&self.endpoint).await?;
        *guard = Some(conn.clone());
        Ok(conn)
    }
}

impl Drop for PhoenixRealtime {
    fn drop(&mut self) {
        if let Some(conn) = self.connection.get_mut().take() {
            conn.shutdown();
        }
    }
}

#[async_trait]
impl RealtimeClient for PhoenixRealtime {
    async fn subscribe(&self, topic: &str, event: &str) -> Result<Subscription, RealtimeError> {
        let conn = self.connection().await?;
        let (sender, receiver) = mpsc::unbounded_channel();
        let (id, first) = conn.add_listener(topic, event, sender);

        if first {
            let join = PhoenixMessage::join(topic, conn.next_ref(), self.access_token.as_deref());
            if let Err(e) = conn.send(join) {
                conn.remove_listener(topic, id);
                return Err(e);
            }
            tracing::debug!("Joined realtime channel '{}'", topic);
        }

        let release_conn = conn.clone();
        let release_topic = topic.to_string();
        Ok(Subscription::new(
            topic,
            event,
            UnboundedReceiverStream::new(receiver).boxed(),
            Some(Box::new(move || release_conn.remove_listener(&release_topic, id))),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realtime_endpoint() {
        assert_eq!(
            realtime_endpoint("https://abc.supabase.co/", "key"),
            "wss://abc.supabase.co/realtime/v1/websocket?apikey=key&vsn=1.0.0"
        );
        assert_eq!(
            realtime_endpoint("http://localhost:54321", "k"),
            "ws://localhost:54321/realtime/v1/websocket?apikey=k&vsn=1.0.0"
        );
    }

    #[test]
    fn test_join_frame() {
        let frame = PhoenixMessage::join("quiz:q1", "1".into(), Some("tok"));
        let encoded = serde_json::to_value(&frame).unwrap();
        assert_eq!(encoded["topic"], "realtime:quiz:q1");
        assert_eq!(encoded["event"], "phx_join");
        assert_eq!(encoded["ref"], "1");
        assert_eq!(encoded["payload"]["access_token"], "tok");
        assert_eq!(encoded["payload"]["config"]["broadcast"]["self"], false);
    }

    #[test]
    fn test_broadcast_frame_unwraps() {
        let raw = r#"{"topic":"realtime:session-update","event":"broadcast","payload":{"type":"broadcast","event":"session_status_changed","payload":{"session_id":"s1","status":"active"}},"ref":null}"#;
        let frame: PhoenixMessage = serde_json::from_str(raw).unwrap();
        let message = frame.into_broadcast().unwrap();
        assert_eq!(message.topic, "session-update");
        assert_eq!(message.event, "session_status_changed");
        assert_eq!(message.payload["session_id"], "s1");
    }

    #[test]
    fn test_non_broadcast_frame_is_ignored() {
        let frame = PhoenixMessage::heartbeat("hb-1".into());
        assert!(frame.into_broadcast().is_none());
    }

    #[tokio::test]
    async fn test_dispatch_routes_by_topic_and_event() {
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel();
        let conn = Connection::new(outbound);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (id, first) = conn.add_listener("quiz:q1", "quiz_started", tx);
        assert!(first);

        conn.dispatch(r#"{"topic":"realtime:quiz:q1","event":"broadcast","payload":{"event":"other","payload":{}},"ref":null}"#);
        conn.dispatch(r#"{"topic":"realtime:quiz:q1","event":"broadcast","payload":{"event":"quiz_started","payload":{"quiz_id":"q1"}},"ref":null}"#);

        let message = rx.recv().await.unwrap();
        assert_eq!(message.event, "quiz_started");
        assert!(rx.try_recv().is_err());

        conn.remove_listener("quiz:q1", id);
        let leave = outbound_rx.recv().await.unwrap();
        assert_eq!(leave.event, "phx_leave");
        assert_eq!(leave.topic, "realtime:quiz:q1");
    }

    #[tokio::test]
    async fn test_leave_sent_only_for_last_listener() {
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel();
        let conn = Connection::new(outbound);
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let (a, _) = conn.add_listener("quiz:q1", "quiz_started", tx1);
        let (b, first) = conn.add_listener("quiz:q1", "quiz_started", tx2);
        assert!(!first);

        conn.remove_listener("quiz:q1", a);
        assert!(outbound_rx.try_recv().is_err());
        conn.remove_listener("quiz:q1", b);
        assert_eq!(outbound_rx.try_recv().unwrap().event, "phx_leave");
    }
}
