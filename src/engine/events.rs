//! Host events published by the engine handles.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use crate::engine::backend::BackendKind;
use crate::logging::LogLevel;

/// Event emitted when connection, device or logging state changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostEvent {
    pub timestamp_ms: u64,
    pub kind: HostEventKind,
}

/// Types of host events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostEventKind {
    BackendConnected { backend: BackendKind },
    BackendDisconnected { backend: BackendKind },
    ConnectFailed { code: i32 },
    DevicesEnumerated { count: usize, default_index: i32 },
    LogLevelChanged { level: LogLevel },
}

/// Broadcast fan-out of [`HostEvent`]s.
///
/// Publishing never fails: with no subscribers the event is dropped.
pub(crate) struct EventBus {
    tx: broadcast::Sender<HostEvent>,
    start_instant: Instant,
}

impl EventBus {
    /// `capacity` must be non-zero.
    pub(crate) fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            start_instant: Instant::now(),
        }
    }

    pub(crate) fn publish(&self, kind: HostEventKind) {
        let timestamp_ms = self.start_instant.elapsed().as_millis() as u64;
        let _ = self.tx.send(HostEvent { timestamp_ms, kind });
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
        self.tx.subscribe()
    }

    /// Stream of events; lagged receivers skip what they missed.
    pub(crate) fn stream(&self) -> impl Stream<Item = HostEvent> {
        BroadcastStream::new(self.tx.subscribe()).filter_map(|item| item.ok())
    }
}
