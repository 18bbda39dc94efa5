// Registry of connected dashboard sessions and the shared history fan-out.

use crate::models::{HistorySnapshot, ServerEvent};
use crate::session::{self, ClientSession, PollerDeps};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{broadcast, mpsc};

pub type SessionId = u64;

pub struct BroadcastHub {
    sessions: Mutex<HashMap<SessionId, ClientSession>>,
    history_tx: broadcast::Sender<Arc<HistorySnapshot>>,
    next_id: AtomicU64,
}

impl BroadcastHub {
    /// `capacity`: history updates buffered per subscriber before it lags.
    pub fn new(capacity: usize) -> Self {
        let (history_tx, _) = broadcast::channel(capacity);
        Self {
            sessions: Mutex::new(HashMap::new()),
            history_tx,
            next_id: AtomicU64::new(1),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<SessionId, ClientSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Receive every history update from now on. Subscribe before `connect`.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<HistorySnapshot>> {
        self.history_tx.subscribe()
    }

    /// Send the full history and one immediate sample to this session only, then start
    /// its poller. `None` if the session went away during the handshake.
    pub async fn connect(
        &self,
        deps: &PollerDeps,
        outbound: mpsc::Sender<ServerEvent>,
    ) -> Option<SessionId> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let snapshot = deps.orchestrator.history().snapshot().await;
        for event in ServerEvent::history(&snapshot) {
            outbound.send(event).await.ok()?;
        }
        let (containers, (sample, verdict)) = tokio::join!(
            session::fetch_containers(deps),
            session::fetch_system_stats(deps)
        );
        outbound.send(ServerEvent::Containers(containers)).await.ok()?;
        outbound
            .send(ServerEvent::system_stats(sample, verdict))
            .await
            .ok()?;

        let session = ClientSession::spawn(id, deps.clone(), outbound);
        let count = {
            let mut sessions = self.sessions();
            sessions.insert(id, session);
            sessions.len()
        };
        tracing::info!(session_id = id, sessions = count, "session connected");
        Some(id)
    }

    /// Stop and discard the session's poller. Both timers are cancelled before this returns.
    pub fn disconnect(&self, id: SessionId) -> bool {
        let removed = self.sessions().remove(&id);
        match removed {
            Some(session) => {
                session.cancel();
                tracing::info!(session_id = id, sessions = self.session_count(), "session disconnected");
                true
            }
            None => false,
        }
    }

    /// Push one snapshot to every subscribed session. Returns how many received it.
    pub fn broadcast_history_update(&self, snapshot: Arc<HistorySnapshot>) -> usize {
        match self.history_tx.send(snapshot) {
            Ok(n) => n,
            Err(_) => {
                tracing::debug!(operation = "broadcast_history", "No active sessions; history update not delivered");
                0
            }
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions().len()
    }

    /// Cancel every session (process shutdown).
    pub fn shutdown(&self) {
        let drained: Vec<ClientSession> = self.sessions().drain().map(|(_, s)| s).collect();
        for session in &drained {
            session.cancel();
        }
        tracing::debug!(sessions = drained.len(), "all sessions cancelled");
    }
}
