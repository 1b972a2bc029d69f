//! EngineHandles: process-wide owner of the media engine and sound backend.
//!
//! Every component borrows the handles; only the exit finalizer may destroy
//! them. Tests build a fresh instance each, the process holds exactly one.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tokio_stream::Stream;

use crate::config::HostConfig;
use crate::engine::backend::{platform_backend, BackendKind, SoundBackend};
use crate::engine::events::{EventBus, HostEvent};
use crate::engine::media::MediaEngine;
use crate::error::HostError;
use crate::managers::{ConnectionController, DeviceEnumerator, EngineFacade};

/// Handle destroyed by [`EngineHandles::teardown`], in destruction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Engine,
    Backend,
}

/// Owns the single media engine handle and the single sound backend handle.
pub struct EngineHandles {
    engine: MediaEngine,
    backend: Mutex<Box<dyn SoundBackend>>,
    events: EventBus,
    backend_priority: Vec<BackendKind>,
}

impl EngineHandles {
    /// Create both handles with the platform sound backend.
    ///
    /// # Errors
    /// `FatalInitialization` if either handle cannot be created. The process
    /// loader treats this as unrecoverable.
    pub fn initialize(config: &HostConfig) -> Result<Self, HostError> {
        let backend =
            platform_backend(&config.dummy).map_err(|err| HostError::FatalInitialization {
                reason: format!("unable to initialize sound backend: {}", err),
            })?;
        Self::with_backend(config, backend)
    }

    /// Create the engine handle around an already constructed backend.
    ///
    /// The backend is created first and the engine second, so teardown
    /// destroys them in the reverse order.
    pub fn with_backend(
        config: &HostConfig,
        backend: Box<dyn SoundBackend>,
    ) -> Result<Self, HostError> {
        if config.event_capacity == 0 {
            return Err(HostError::FatalInitialization {
                reason: "event_capacity must be greater than 0".to_string(),
            });
        }

        let engine = MediaEngine::create(config.log_level);

        Ok(Self {
            engine,
            backend: Mutex::new(backend),
            events: EventBus::new(config.event_capacity),
            backend_priority: config.backend_priority.clone(),
        })
    }

    pub fn engine(&self) -> &MediaEngine {
        &self.engine
    }

    pub fn connection(&self) -> ConnectionController<'_> {
        ConnectionController::new(self)
    }

    pub fn devices(&self) -> DeviceEnumerator<'_> {
        DeviceEnumerator::new(self)
    }

    pub fn facade(&self) -> EngineFacade<'_> {
        EngineFacade::new(self)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<HostEvent> {
        self.events.subscribe()
    }

    pub fn event_stream(&self) -> impl Stream<Item = HostEvent> {
        self.events.stream()
    }

    pub(crate) fn events(&self) -> &EventBus {
        &self.events
    }

    pub(crate) fn backend_priority(&self) -> &[BackendKind] {
        &self.backend_priority
    }

    /// Safely acquire the backend lock
    ///
    /// Returns the guard or `HostError::LockPoisoned` on lock failure
    pub(crate) fn lock_backend(
        &self,
    ) -> Result<MutexGuard<'_, Box<dyn SoundBackend>>, HostError> {
        self.backend.lock().map_err(|_| HostError::LockPoisoned {
            component: "sound_backend".to_string(),
        })
    }

    /// Acquire the backend lock, recovering the inner value if poisoned.
    pub(crate) fn lock_backend_recovering(&self) -> MutexGuard<'_, Box<dyn SoundBackend>> {
        self.backend.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Destroy the engine handle, then the backend handle.
    ///
    /// Consumes the handles, so it runs at most once per instance.
    pub(crate) fn teardown(self) -> Vec<HandleKind> {
        let EngineHandles {
            engine, backend, ..
        } = self;
        let mut order = Vec::with_capacity(2);

        engine.destroy();
        order.push(HandleKind::Engine);

        let mut backend = backend.into_inner().unwrap_or_else(PoisonError::into_inner);
        backend.shutdown();
        drop(backend);
        order.push(HandleKind::Backend);

        log::info!("[EngineHandles] teardown complete");
        order
    }
}

// ========================================================================
// TEST HELPERS
// ========================================================================
