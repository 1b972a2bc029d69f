//! Process exit finalizer.
//!
//! Holds the process's engine handles and tears them down exactly once, from
//! a process-exit hook or an explicit call. After finalization every entry
//! point fails with `InvalidState` instead of touching destroyed handles.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::engine::{EngineHandles, HandleKind};
use crate::error::{log_host_error, HostError};

pub struct ExitFinalizer {
    slot: Mutex<Option<EngineHandles>>,
    finalized: AtomicBool,
}

impl ExitFinalizer {
    pub fn new(handles: EngineHandles) -> Self {
        Self {
            slot: Mutex::new(Some(handles)),
            finalized: AtomicBool::new(false),
        }
    }

    /// Run `f` against the live handles.
    ///
    /// # Errors
    /// * `InvalidState` once the handles have been finalized
    /// * `LockPoisoned` if a previous call panicked while holding them
    pub fn with_handles<R>(
        &self,
        f: impl FnOnce(&EngineHandles) -> Result<R, HostError>,
    ) -> Result<R, HostError> {
        let guard = self.slot.lock().map_err(|_| {
            let err = HostError::LockPoisoned {
                component: "engine_handles".to_string(),
            };
            log_host_error(&err, "with_handles");
            err
        })?;

        match guard.as_ref() {
            Some(handles) => f(handles),
            None => Err(HostError::invalid_state("module finalized")),
        }
    }

    /// Tear down the handles. Returns `true` only for the call that actually
    /// destroyed them; later calls are no-ops.
    pub fn finalize(&self) -> bool {
        let taken = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match taken {
            Some(handles) => {
                let order: Vec<HandleKind> = handles.teardown();
                self.finalized.store(true, Ordering::SeqCst);
                log::info!("[Finalizer] destroyed {:?}", order);
                true
            }
            None => false,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized.load(Ordering::SeqCst)
    }
}

/// Register `callback` to run when the process exits normally.
pub(crate) fn register_at_exit(callback: extern "C" fn()) -> Result<(), HostError> {
    // SAFETY: `callback` is a plain function with no captured state, valid for
    // the life of the process.
    let status = unsafe { libc::atexit(callback) };
    if status != 0 {
        return Err(HostError::FatalInitialization {
            reason: format!("unable to register exit hook (status {})", status),
        });
    }
    Ok(())
}
