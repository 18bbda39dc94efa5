// WebSocket dashboard session: one hub session per socket.

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{Duration, Instant, MissedTickBehavior, interval_at, timeout};

use super::AppState;
use crate::hub::{BroadcastHub, SessionId};
use crate::models::ServerEvent;

const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Disconnects the hub session on drop, whichever way the socket loop ends.
struct SessionGuard {
    hub: Arc<BroadcastHub>,
    id: SessionId,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.hub.disconnect(self.id);
    }
}

pub(super) async fn ws_dashboard(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = stream_dashboard(socket, state).await {
            tracing::info!("Dashboard stream error: {}", e);
        }
    })
}

/// Serialize and send one event. `Ok(false)` when the client is gone or too slow.
async fn send_event(
    sink: &mut SplitSink<WebSocket, Message>,
    event: &ServerEvent,
) -> anyhow::Result<bool> {
    let json = serde_json::to_string(event)?;
    let r = timeout(WS_SEND_TIMEOUT, sink.send(Message::Text(json.into()))).await;
    Ok(matches!(r, Ok(Ok(()))))
}

async fn stream_dashboard(socket: WebSocket, state: AppState) -> anyhow::Result<()> {
    let (mut sink, mut stream) = socket.split();
    let (outbound_tx, mut outbound_rx) =
        mpsc::channel::<ServerEvent>(state.config.monitoring.session_channel_capacity);
    // Subscribe first so no history update slips between the snapshot and the subscription.
    let mut history_rx = state.hub.subscribe();

    let Some(id) = state.hub.connect(&state.deps, outbound_tx).await else {
        return Ok(());
    };
    let _guard = SessionGuard {
        hub: state.hub.clone(),
        id,
    };

    let mut ping_interval = interval_at(Instant::now() + WS_PING_INTERVAL, WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    'session: loop {
        tokio::select! {
            // Drain the session's own queue first so the connect snapshot precedes any update.
            biased;
            event = outbound_rx.recv() => {
                let Some(event) = event else { break };
                if !send_event(&mut sink, &event).await? {
                    break;
                }
            }
            update = history_rx.recv() => {
                match update {
                    Ok(snapshot) => {
                        for event in ServerEvent::history(&snapshot) {
                            if !send_event(&mut sink, &event).await? {
                                break 'session;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(session_id = id, "Dashboard session lagged, skipped {} history updates", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
            _ = ping_interval.tick() => {
                let r = timeout(WS_SEND_TIMEOUT, sink.send(Message::Ping(Bytes::new()))).await;
                if !matches!(r, Ok(Ok(()))) {
                    break;
                }
            }
        }
    }
    tracing::debug!(session_id = id, "dashboard socket closed");
    Ok(())
}
