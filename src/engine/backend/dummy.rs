use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::NativeError;

use super::{BackendKind, RawDevice, SoundBackend};

/// A backend kind emulated in memory by [`DummyBackend`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmulatedHost {
    pub kind: BackendKind,
    /// Output device names in reported order.
    #[serde(default)]
    pub devices: Vec<String>,
    /// Reported default output index; negative for none.
    #[serde(default)]
    pub default_index: i32,
    /// Raw native error code returned by every connect attempt.
    #[serde(default)]
    pub connect_error: Option<i32>,
}

impl EmulatedHost {
    pub fn new(kind: BackendKind, devices: &[&str], default_index: i32) -> Self {
        Self {
            kind,
            devices: devices.iter().map(|name| name.to_string()).collect(),
            default_index,
            connect_error: None,
        }
    }

    pub fn failing(kind: BackendKind, err: NativeError) -> Self {
        Self {
            kind,
            devices: Vec::new(),
            default_index: -1,
            connect_error: Some(err.raw()),
        }
    }
}

/// Emulated hosts served by the dummy backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DummyConfig {
    pub hosts: Vec<EmulatedHost>,
    pub sample_rate: u32,
    pub channel_count: u16,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            hosts: vec![EmulatedHost::new(
                BackendKind::Dummy,
                &["Dummy Output Device"],
                0,
            )],
            sample_rate: 48000,
            channel_count: 2,
        }
    }
}

/// Device change queued on a [`HotplugHandle`].
#[derive(Debug, Clone, PartialEq)]
pub enum HotplugChange {
    Plug { kind: BackendKind, name: String },
    Unplug { kind: BackendKind, name: String },
    SetDefault { kind: BackendKind, index: i32 },
}

/// Queue of device changes that become visible on the next flush.
#[derive(Debug, Clone, Default)]
pub struct HotplugHandle {
    pending: Arc<Mutex<Vec<HotplugChange>>>,
}

impl HotplugHandle {
    pub fn plug(&self, kind: BackendKind, name: &str) {
        self.push(HotplugChange::Plug {
            kind,
            name: name.to_string(),
        });
    }

    pub fn unplug(&self, kind: BackendKind, name: &str) {
        self.push(HotplugChange::Unplug {
            kind,
            name: name.to_string(),
        });
    }

    pub fn set_default(&self, kind: BackendKind, index: i32) {
        self.push(HotplugChange::SetDefault { kind, index });
    }

    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    fn push(&self, change: HotplugChange) {
        self.lock().push(change);
    }

    fn drain(&self) -> Vec<HotplugChange> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<HotplugChange>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// In-memory backend used for the `Dummy` kind, Android builds, tests and
/// CLI tooling.
///
/// Each emulated host behaves like a native backend: connecting yields an
/// empty device snapshot until events are flushed, and hotplug changes are
/// applied only during a flush.
pub struct DummyBackend {
    hosts: Vec<EmulatedHost>,
    sample_rate: u32,
    channel_count: u16,
    current: Option<BackendKind>,
    snapshot: Vec<RawDevice>,
    default_index: i32,
    hotplug: HotplugHandle,
}

impl DummyBackend {
    pub fn new(config: DummyConfig) -> Result<Self, NativeError> {
        let mut seen = HashSet::new();
        for host in &config.hosts {
            if !seen.insert(host.kind) {
                log::error!("[DummyBackend] {} emulated twice", host.kind.name());
                return Err(NativeError::Invalid);
            }
            if let Some(raw) = host.connect_error {
                NativeError::from_raw(raw).ok_or(NativeError::Invalid)?;
            }
        }

        Ok(Self {
            hosts: config.hosts,
            sample_rate: config.sample_rate,
            channel_count: config.channel_count,
            current: None,
            snapshot: Vec::new(),
            default_index: -1,
            hotplug: HotplugHandle::default(),
        })
    }

    /// Handle for queueing device changes from tests or tooling.
    pub fn hotplug(&self) -> HotplugHandle {
        self.hotplug.clone()
    }

    /// Kinds this backend can connect to.
    pub fn emulated_kinds(&self) -> Vec<BackendKind> {
        self.hosts.iter().map(|host| host.kind).collect()
    }

    fn host_mut(&mut self, kind: BackendKind) -> Option<&mut EmulatedHost> {
        self.hosts.iter_mut().find(|host| host.kind == kind)
    }

    fn apply(&mut self, change: HotplugChange) {
        match change {
            HotplugChange::Plug { kind, name } => {
                if let Some(host) = self.host_mut(kind) {
                    host.devices.push(name);
                }
            }
            HotplugChange::Unplug { kind, name } => {
                if let Some(host) = self.host_mut(kind) {
                    if let Some(pos) = host.devices.iter().position(|dev| *dev == name) {
                        host.devices.remove(pos);
                        if host.default_index == pos as i32 {
                            host.default_index = -1;
                        } else if host.default_index > pos as i32 {
                            host.default_index -= 1;
                        }
                    }
                }
            }
            HotplugChange::SetDefault { kind, index } => {
                if let Some(host) = self.host_mut(kind) {
                    host.default_index = index;
                }
            }
        }
    }

    fn refresh_snapshot(&mut self) {
        let Some(kind) = self.current else {
            self.snapshot.clear();
            self.default_index = -1;
            return;
        };
        let Some(host) = self.hosts.iter().find(|host| host.kind == kind) else {
            self.snapshot.clear();
            self.default_index = -1;
            return;
        };

        self.snapshot = host
            .devices
            .iter()
            .enumerate()
            .map(|(index, name)| RawDevice {
                id: format!("{}:{}", kind.name().to_ascii_lowercase(), index),
                name: name.clone(),
                backend: kind,
                is_raw: false,
                sample_rate_current: self.sample_rate,
                channel_count: self.channel_count,
                probe_error: None,
            })
            .collect();
        self.default_index = host.default_index;
    }
}

impl SoundBackend for DummyBackend {
    fn connect(&mut self, kind: BackendKind) -> Result<(), NativeError> {
        let host = self
            .hosts
            .iter()
            .find(|host| host.kind == kind)
            .ok_or(NativeError::BackendUnavailable)?;

        if let Some(raw) = host.connect_error {
            return Err(NativeError::from_raw(raw).unwrap_or(NativeError::Invalid));
        }

        self.current = Some(kind);
        self.snapshot.clear();
        self.default_index = -1;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.current = None;
        self.snapshot.clear();
        self.default_index = -1;
    }

    fn current_backend(&self) -> Option<BackendKind> {
        self.current
    }

    fn flush_events(&mut self) {
        for change in self.hotplug.drain() {
            self.apply(change);
        }
        self.refresh_snapshot();
    }

    fn output_device_count(&self) -> usize {
        self.snapshot.len()
    }

    fn default_output_device_index(&self) -> i32 {
        self.default_index
    }

    fn output_device(&self, index: usize) -> Result<RawDevice, NativeError> {
        self.snapshot
            .get(index)
            .cloned()
            .ok_or(NativeError::NoSuchDevice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_host_config() -> DummyConfig {
        DummyConfig {
            hosts: vec![
                EmulatedHost::new(BackendKind::Alsa, &["hw:0", "hw:1"], 1),
                EmulatedHost::new(BackendKind::Dummy, &["Dummy Output Device"], 0),
            ],
            ..DummyConfig::default()
        }
    }

    #[test]
    fn test_devices_hidden_until_flush() {
        let mut backend = DummyBackend::new(two_host_config()).unwrap();
        backend.connect(BackendKind::Alsa).unwrap();
        assert_eq!(backend.output_device_count(), 0);

        backend.flush_events();
        assert_eq!(backend.output_device_count(), 2);
        assert_eq!(backend.default_output_device_index(), 1);
        assert_eq!(backend.output_device(0).unwrap().name, "hw:0");
    }

    #[test]
    fn test_unknown_kind_is_unavailable() {
        let mut backend = DummyBackend::new(DummyConfig::default()).unwrap();
        assert_eq!(
            backend.connect(BackendKind::Jack),
            Err(NativeError::BackendUnavailable)
        );
        assert_eq!(backend.current_backend(), None);
    }

    #[test]
    fn test_injected_connect_error() {
        let config = DummyConfig {
            hosts: vec![EmulatedHost::failing(
                BackendKind::PulseAudio,
                NativeError::NoSuchClient,
            )],
            ..DummyConfig::default()
        };
        let mut backend = DummyBackend::new(config).unwrap();
        assert_eq!(
            backend.connect(BackendKind::PulseAudio),
            Err(NativeError::NoSuchClient)
        );
    }

    #[test]
    fn test_auto_connect_skips_failing_hosts() {
        let config = DummyConfig {
            hosts: vec![
                EmulatedHost::failing(BackendKind::Jack, NativeError::InitAudioBackend),
                EmulatedHost::new(BackendKind::Dummy, &["Dummy Output Device"], 0),
            ],
            ..DummyConfig::default()
        };
        let mut backend = DummyBackend::new(config).unwrap();
        let kind = backend
            .connect_auto(&[BackendKind::Jack, BackendKind::Alsa, BackendKind::Dummy])
            .unwrap();
        assert_eq!(kind, BackendKind::Dummy);
    }

    #[test]
    fn test_hotplug_applies_on_flush() {
        let mut backend = DummyBackend::new(two_host_config()).unwrap();
        let hotplug = backend.hotplug();
        backend.connect(BackendKind::Alsa).unwrap();
        backend.flush_events();

        hotplug.unplug(BackendKind::Alsa, "hw:0");
        hotplug.plug(BackendKind::Alsa, "usb:0");
        assert_eq!(hotplug.pending(), 2);
        assert_eq!(backend.output_device_count(), 2);
        assert_eq!(backend.output_device(0).unwrap().name, "hw:0");

        backend.flush_events();
        assert_eq!(hotplug.pending(), 0);
        let names: Vec<String> = (0..backend.output_device_count())
            .map(|i| backend.output_device(i).unwrap().name)
            .collect();
        assert_eq!(names, vec!["hw:1".to_string(), "usb:0".to_string()]);
        // default followed the device that shifted down
        assert_eq!(backend.default_output_device_index(), 0);
    }

    #[test]
    fn test_unplugging_default_clears_it() {
        let mut backend = DummyBackend::new(DummyConfig::default()).unwrap();
        let hotplug = backend.hotplug();
        backend.connect(BackendKind::Dummy).unwrap();
        hotplug.unplug(BackendKind::Dummy, "Dummy Output Device");
        backend.flush_events();
        assert_eq!(backend.output_device_count(), 0);
        assert_eq!(backend.default_output_device_index(), -1);
    }

    #[test]
    fn test_duplicate_hosts_rejected() {
        let config = DummyConfig {
            hosts: vec![
                EmulatedHost::new(BackendKind::Dummy, &[], -1),
                EmulatedHost::new(BackendKind::Dummy, &[], -1),
            ],
            ..DummyConfig::default()
        };
        assert!(matches!(
            DummyBackend::new(config),
            Err(NativeError::Invalid)
        ));
    }

    #[test]
    fn test_disconnect_clears_snapshot() {
        let mut backend = DummyBackend::new(DummyConfig::default()).unwrap();
        backend.connect(BackendKind::Dummy).unwrap();
        backend.flush_events();
        backend.disconnect();
        assert_eq!(backend.current_backend(), None);
        assert_eq!(backend.output_device_count(), 0);
        assert!(backend.output_device(0).is_err());
    }
}
