//! Live notification hub.
//!
//! Owns the registry of connected viewers and fans out "new segment"
//! events to all of them. The registry is the only concurrently-mutated
//! shared state in the process; every insert, removal, and broadcast
//! iteration happens under the same lock so a connection can never be
//! removed out from under a send.

pub mod ws;

use std::collections::HashMap;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Per-connection channel capacity. A viewer that falls this far behind
/// starts losing events; each event is idempotent (it names the newest
/// available index file), so dropped events cost latency, not correctness.
const CLIENT_BUFFER: usize = 64;

/// Notification sent to viewers when a new index playlist is available.
///
/// Wire shape: `{"frame": "<path>"}`, where the path is relative to the
/// server's base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentEvent {
    pub frame: String,
}

impl SegmentEvent {
    /// Build the event for a newly observed index file name.
    pub fn for_file(public_base: &str, file_name: &str) -> Self {
        Self {
            frame: format!("{}/{}", public_base.trim_end_matches('/'), file_name),
        }
    }
}

/// Registry of open viewer connections.
pub struct LiveHub {
    clients: Mutex<HashMap<Uuid, mpsc::Sender<SegmentEvent>>>,
}

impl Default for LiveHub {
    fn default() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }
}

impl LiveHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to the registry, returning its id and the receive
    /// side of its event channel.
    pub fn register(&self) -> (Uuid, mpsc::Receiver<SegmentEvent>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(CLIENT_BUFFER);
        self.clients.lock().insert(id, tx);
        tracing::info!(client = %id, "Viewer connected");
        (id, rx)
    }

    /// Remove a connection after its transport closed or errored.
    pub fn unregister(&self, id: Uuid) {
        if self.clients.lock().remove(&id).is_some() {
            tracing::info!(client = %id, "Viewer disconnected");
        }
    }

    /// Send an event to every registered connection, best-effort.
    ///
    /// `try_send` keeps the watch loop from ever blocking on a slow
    /// viewer: a full or closed channel drops the event for that viewer
    /// only. Closed channels are cleaned up by the connection task's own
    /// `unregister`, not here.
    pub fn broadcast(&self, event: SegmentEvent) {
        let clients = self.clients.lock();
        tracing::debug!(frame = %event.frame, viewers = clients.len(), "Broadcasting segment event");
        for (id, tx) in clients.iter() {
            if let Err(e) = tx.try_send(event.clone()) {
                tracing::debug!(client = %id, "Dropping event for viewer: {e}");
            }
        }
    }

    /// Number of currently registered connections.
    pub fn client_count(&self) -> usize {
        self.clients.lock().len()
    }

    /// Drop every connection's sender so its forward loop completes.
    /// Used on process shutdown.
    pub fn shutdown(&self) {
        let mut clients = self.clients.lock();
        let n = clients.len();
        clients.clear();
        if n > 0 {
            tracing::info!("Closed {n} viewer connections");
        }
    }
}
