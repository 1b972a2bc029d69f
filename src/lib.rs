// Playback Host - lifecycle and device management for a media engine
// Owns the engine and sound backend handles, exposes the host entry points,
// and tears everything down once at process exit.

// Module declarations
pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod finalizer;
pub mod logging;
pub mod managers;
pub mod module;
pub mod registry;

// Re-exports for convenience
pub use config::HostConfig;
pub use engine::{BackendKind, EngineHandles, HostEvent, HostEventKind, VersionTriple};
pub use error::{HostError, NativeError};
pub use logging::LogLevel;
pub use managers::{ConnectionState, DeviceDescriptor, DeviceList};
pub use module::{load, load_with, HostModule};
pub use registry::{CollaboratorEntry, ModuleSurface, Subsystem, SubsystemRegistry};
