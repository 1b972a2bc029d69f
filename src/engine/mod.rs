//! Engine module housing the process-wide handles.
//!
//! This module exposes the sound backends (`backend`), the media engine
//! handle (`media`), host events (`events`) and the `EngineHandles` owner
//! (`core`).

pub mod backend;
pub mod core;
pub mod events;
pub mod media;

#[cfg(not(target_os = "android"))]
pub use backend::CpalBackend;
pub use backend::{
    BackendKind, DummyBackend, DummyConfig, EmulatedHost, HotplugChange, HotplugHandle, RawDevice,
    SoundBackend,
};
pub use self::core::{EngineHandles, HandleKind};
pub use events::{HostEvent, HostEventKind};
pub use media::{MediaEngine, VersionTriple};
