//! Sound backend abstractions owned by the engine handles.

use serde::{Deserialize, Serialize};

use crate::error::NativeError;

/// Platform audio APIs a backend handle can connect to.
///
/// The "none" member of the native enumeration is modelled as
/// `Option::<BackendKind>::None` (raw id 0), so a connected state can never
/// carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Jack,
    PulseAudio,
    Alsa,
    CoreAudio,
    Wasapi,
    Dummy,
}

impl BackendKind {
    pub const ALL: [BackendKind; 6] = [
        BackendKind::Jack,
        BackendKind::PulseAudio,
        BackendKind::Alsa,
        BackendKind::CoreAudio,
        BackendKind::Wasapi,
        BackendKind::Dummy,
    ];

    /// Raw id exposed to hosts as `BACKEND_*`.
    pub fn raw(self) -> i32 {
        match self {
            BackendKind::Jack => 1,
            BackendKind::PulseAudio => 2,
            BackendKind::Alsa => 3,
            BackendKind::CoreAudio => 4,
            BackendKind::Wasapi => 5,
            BackendKind::Dummy => 6,
        }
    }

    /// Resolve a raw host value. `0` selects auto-connect.
    pub fn from_raw(raw: i64) -> Result<Option<Self>, NativeError> {
        if raw == 0 {
            return Ok(None);
        }
        Self::ALL
            .into_iter()
            .find(|kind| i64::from(kind.raw()) == raw)
            .map(Some)
            .ok_or(NativeError::Invalid)
    }

    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Jack => "JACK",
            BackendKind::PulseAudio => "PulseAudio",
            BackendKind::Alsa => "ALSA",
            BackendKind::CoreAudio => "CoreAudio",
            BackendKind::Wasapi => "WASAPI",
            BackendKind::Dummy => "Dummy",
        }
    }

    /// Case-insensitive lookup used by the CLI and config files.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

/// One output device as reported by a backend, before it is wrapped into a
/// host-facing descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDevice {
    pub id: String,
    pub name: String,
    pub backend: BackendKind,
    pub is_raw: bool,
    pub sample_rate_current: u32,
    pub channel_count: u16,
    pub probe_error: Option<NativeError>,
}

/// Trait implemented by platform sound backends.
///
/// A backend holds at most one connection. Device queries reflect the
/// snapshot taken by the most recent [`SoundBackend::flush_events`] call, so
/// callers must flush before trusting them.
pub trait SoundBackend: Send {
    /// Connect to a specific backend kind. Must only be called while
    /// disconnected.
    fn connect(&mut self, kind: BackendKind) -> Result<(), NativeError>;

    /// Try each kind in `priority` order and keep the first that connects.
    fn connect_auto(&mut self, priority: &[BackendKind]) -> Result<BackendKind, NativeError> {
        let mut last_err = NativeError::BackendUnavailable;
        for &kind in priority {
            match self.connect(kind) {
                Ok(()) => return Ok(kind),
                Err(err) => {
                    log::debug!("[Backend] auto-connect skipped {}: {}", kind.name(), err);
                    last_err = err;
                }
            }
        }
        Err(last_err)
    }

    /// Release the current connection. No-op when disconnected.
    fn disconnect(&mut self);

    fn current_backend(&self) -> Option<BackendKind>;

    /// Process pending device/state notifications and refresh the device
    /// snapshot.
    fn flush_events(&mut self);

    fn output_device_count(&self) -> usize;

    /// Index of the system default output device, or a negative value when
    /// there is none. Passed through unvalidated.
    fn default_output_device_index(&self) -> i32;

    fn output_device(&self, index: usize) -> Result<RawDevice, NativeError>;

    /// Final release before the handle is dropped.
    fn shutdown(&mut self) {
        self.disconnect();
    }
}

#[cfg(not(target_os = "android"))]
mod cpal_host;
#[cfg(not(target_os = "android"))]
pub use cpal_host::CpalBackend;

mod dummy;
pub use dummy::{DummyBackend, DummyConfig, EmulatedHost, HotplugChange, HotplugHandle};

/// Create the sound backend for the current platform.
pub fn platform_backend(config: &DummyConfig) -> Result<Box<dyn SoundBackend>, NativeError> {
    cfg_if::cfg_if! {
        if #[cfg(target_os = "android")] {
            Ok(Box::new(DummyBackend::new(config.clone())?))
        } else {
            Ok(Box::new(CpalBackend::new(config.clone())?))
        }
    }
}
