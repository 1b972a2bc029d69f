//! Module load: the one place process-wide state is created.
//!
//! The first `load` creates the engine handles, registers the exit hook and
//! builds the surface. Failure to create the handles aborts the process,
//! since no entry point can work without them.

use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::config::HostConfig;
use crate::engine::EngineHandles;
use crate::error::{log_host_error, HostError};
use crate::finalizer::{register_at_exit, ExitFinalizer};
use crate::registry::{build_surface, ModuleSurface, Subsystem};

static MODULE: OnceCell<HostModule> = OnceCell::new();

/// Engine handles plus the surface exposed over them.
pub struct HostModule {
    finalizer: ExitFinalizer,
    surface: ModuleSurface,
}

impl HostModule {
    /// Build a module that is not bound to the process. Used by [`load`] and
    /// by tests that need their own instance.
    pub fn new(
        handles: EngineHandles,
        subsystems: &[Box<dyn Subsystem>],
    ) -> Result<Self, HostError> {
        let surface = build_surface(subsystems)?;
        Ok(Self {
            finalizer: ExitFinalizer::new(handles),
            surface,
        })
    }

    /// Call an entry point on the live handles.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, HostError> {
        self.finalizer
            .with_handles(|handles| self.surface.invoke(handles, name, args))
    }

    pub fn surface(&self) -> &ModuleSurface {
        &self.surface
    }

    pub fn finalizer(&self) -> &ExitFinalizer {
        &self.finalizer
    }
}

/// Load the module with only the core entry points.
pub fn load() -> &'static HostModule {
    load_with(Vec::new())
}

/// Load the module, attaching `subsystems` after the core entry points.
///
/// Only the first call initializes; later calls return the same module and
/// drop their `subsystems`.
pub fn load_with(subsystems: Vec<Box<dyn Subsystem>>) -> &'static HostModule {
    MODULE.get_or_init(|| match initialize(&HostConfig::load(), &subsystems) {
        Ok(module) => module,
        Err(err) => abort_load(err),
    })
}

/// The loaded module, if `load` has run.
pub fn loaded() -> Option<&'static HostModule> {
    MODULE.get()
}

fn initialize(
    config: &HostConfig,
    subsystems: &[Box<dyn Subsystem>],
) -> Result<HostModule, HostError> {
    let handles = EngineHandles::initialize(config)?;
    let module = HostModule::new(handles, subsystems)?;
    register_at_exit(finalize_at_exit)?;
    log::info!(
        "[Module] loaded with {} entry points",
        module.surface.method_names().len()
    );
    Ok(module)
}

fn abort_load(err: HostError) -> ! {
    log_host_error(&err, "module load");
    eprintln!("playback host: {}", err);
    std::process::abort()
}

extern "C" fn finalize_at_exit() {
    if let Some(module) = MODULE.get() {
        module.finalizer.finalize();
    }
}
