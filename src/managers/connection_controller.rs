// ConnectionController: connect/disconnect state machine over the backend
//
// The connection state is never stored here; it is always read live from
// the backend handle.

use serde::{Deserialize, Serialize};

use crate::engine::backend::{BackendKind, SoundBackend};
use crate::engine::events::{EventBus, HostEventKind};
use crate::engine::EngineHandles;
use crate::error::{log_host_error, ErrorCode, HostError, NativeError};

/// Connection state derived from the backend handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    Disconnected,
    Connected(BackendKind),
}

/// Manages the backend connection
///
/// States `{Disconnected, Connected}`, initially `Disconnected`:
/// - `connect` while connected is a reconnect: the previous connection is
///   released first, never stacked
/// - a failed `connect` always leaves the backend `Disconnected`
/// - `disconnect` while disconnected is a no-op
pub struct ConnectionController<'h> {
    handles: &'h EngineHandles,
}

impl<'h> ConnectionController<'h> {
    pub fn new(handles: &'h EngineHandles) -> Self {
        Self { handles }
    }

    pub fn state(&self) -> ConnectionState {
        let backend = self.handles.lock_backend_recovering();
        match backend.current_backend() {
            Some(kind) => ConnectionState::Connected(kind),
            None => ConnectionState::Disconnected,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state(), ConnectionState::Connected(_))
    }

    /// Connect the sound backend
    ///
    /// # Arguments
    /// * `backend` - Kind to connect to, or `None` to auto-select in the
    ///   configured priority order
    ///
    /// # Returns
    /// * `Ok(BackendKind)` - The kind actually connected
    /// * `Err(HostError::Native)` - The backend refused; state is `Disconnected`
    /// * `Err(HostError::LockPoisoned)` - Backend lock poisoned
    pub fn connect(&self, backend: Option<BackendKind>) -> Result<BackendKind, HostError> {
        self.connect_resolved(|| Ok(backend))
    }

    /// Connect by raw host id (`BACKEND_*`, 0 for auto-select).
    ///
    /// The id is resolved after the current connection is released, so an
    /// unknown id fails with `Native(Invalid)` and leaves `Disconnected`.
    pub fn connect_raw(&self, raw: i64) -> Result<BackendKind, HostError> {
        self.connect_resolved(|| BackendKind::from_raw(raw))
    }

    fn connect_resolved(
        &self,
        resolve: impl FnOnce() -> Result<Option<BackendKind>, NativeError>,
    ) -> Result<BackendKind, HostError> {
        let mut guard = self.handles.lock_backend().map_err(|err| {
            log_host_error(&err, "connect");
            err
        })?;
        let events = self.handles.events();

        if let Some(previous) = release(&mut **guard, events) {
            log::info!("[Connection] reconnecting, released {}", previous.name());
        }

        let result = resolve().and_then(|backend| match backend {
            Some(kind) => guard.connect(kind).map(|()| kind),
            None => guard.connect_auto(self.handles.backend_priority()),
        });

        match result {
            Ok(kind) => {
                log::info!("[Connection] connected to {}", kind.name());
                events.publish(HostEventKind::BackendConnected { backend: kind });
                Ok(kind)
            }
            Err(native) => {
                if guard.current_backend().is_some() {
                    guard.disconnect();
                }
                let err = HostError::Native(native);
                events.publish(HostEventKind::ConnectFailed {
                    code: native.code(),
                });
                log_host_error(&err, "connect");
                Err(err)
            }
        }
    }

    /// Release the current connection. Never fails.
    pub fn disconnect(&self) {
        let mut guard = self.handles.lock_backend_recovering();
        if let Some(previous) = release(&mut **guard, self.handles.events()) {
            log::info!("[Connection] disconnected from {}", previous.name());
        }
    }
}

fn release(backend: &mut dyn SoundBackend, events: &EventBus) -> Option<BackendKind> {
    let previous = backend.current_backend()?;
    backend.disconnect();
    events.publish(HostEventKind::BackendDisconnected { backend: previous });
    Some(previous)
}
