//! CPAL-based sound backend for desktop platforms (Linux, macOS, Windows)
//!
//! Backend kinds are matched against the hosts CPAL was built with. The
//! `Dummy` kind is always served by an inner [`DummyBackend`], so a
//! connection is possible even on machines without audio hardware.

use cpal::traits::{DeviceTrait, HostTrait};

use crate::error::NativeError;

use super::{BackendKind, DummyBackend, DummyConfig, RawDevice, SoundBackend};

enum Connection {
    Host {
        kind: BackendKind,
        host_id: cpal::HostId,
        devices: Vec<RawDevice>,
        default_index: i32,
    },
    Dummy,
}

/// Sound backend driving the CPAL host matching the requested kind.
pub struct CpalBackend {
    connection: Option<Connection>,
    dummy: DummyBackend,
}

impl CpalBackend {
    pub fn new(dummy: DummyConfig) -> Result<Self, NativeError> {
        let hosts: Vec<&'static str> = cpal::available_hosts()
            .into_iter()
            .map(|id| id.name())
            .collect();
        log::info!("[CpalBackend] available hosts: {:?}", hosts);

        Ok(Self {
            connection: None,
            dummy: DummyBackend::new(dummy)?,
        })
    }

    fn find_host(kind: BackendKind) -> Option<cpal::HostId> {
        cpal::available_hosts()
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(kind.name()))
    }

    fn snapshot(kind: BackendKind, host_id: cpal::HostId) -> (Vec<RawDevice>, i32) {
        let host = match cpal::host_from_id(host_id) {
            Ok(host) => host,
            Err(err) => {
                log::warn!("[CpalBackend] {} host went away: {}", kind.name(), err);
                return (Vec::new(), -1);
            }
        };

        let outputs = match host.output_devices() {
            Ok(outputs) => outputs,
            Err(err) => {
                log::warn!("[CpalBackend] failed to list {} outputs: {}", kind.name(), err);
                return (Vec::new(), -1);
            }
        };

        let devices: Vec<RawDevice> = outputs
            .enumerate()
            .map(|(index, device)| {
                let name = device
                    .name()
                    .unwrap_or_else(|_| format!("{} output {}", kind.name(), index));
                let mut raw = RawDevice {
                    id: format!("{}:{}", kind.name().to_ascii_lowercase(), name),
                    name,
                    backend: kind,
                    is_raw: false,
                    sample_rate_current: 0,
                    channel_count: 0,
                    probe_error: None,
                };
                match device.default_output_config() {
                    Ok(config) => {
                        raw.sample_rate_current = config.sample_rate().0;
                        raw.channel_count = config.channels();
                    }
                    Err(err) => {
                        log::debug!("[CpalBackend] probe failed for {}: {}", raw.name, err);
                        raw.probe_error = Some(NativeError::OpeningDevice);
                    }
                }
                raw
            })
            .collect();

        let default_index = host
            .default_output_device()
            .and_then(|device| device.name().ok())
            .and_then(|name| devices.iter().position(|dev| dev.name == name))
            .map(|pos| pos as i32)
            .unwrap_or(-1);

        (devices, default_index)
    }
}

impl SoundBackend for CpalBackend {
    fn connect(&mut self, kind: BackendKind) -> Result<(), NativeError> {
        if kind == BackendKind::Dummy {
            self.dummy.connect(kind)?;
            self.connection = Some(Connection::Dummy);
            return Ok(());
        }

        let host_id = Self::find_host(kind).ok_or(NativeError::BackendUnavailable)?;
        cpal::host_from_id(host_id).map_err(|err| {
            log::warn!("[CpalBackend] unable to open {}: {}", kind.name(), err);
            NativeError::InitAudioBackend
        })?;

        self.connection = Some(Connection::Host {
            kind,
            host_id,
            devices: Vec::new(),
            default_index: -1,
        });
        Ok(())
    }

    fn disconnect(&mut self) {
        if let Some(Connection::Dummy) = self.connection.take() {
            self.dummy.disconnect();
        }
    }

    fn current_backend(&self) -> Option<BackendKind> {
        match &self.connection {
            Some(Connection::Host { kind, .. }) => Some(*kind),
            Some(Connection::Dummy) => self.dummy.current_backend(),
            None => None,
        }
    }

    fn flush_events(&mut self) {
        match &mut self.connection {
            Some(Connection::Host {
                kind,
                host_id,
                devices,
                default_index,
            }) => {
                let (fresh, default) = Self::snapshot(*kind, *host_id);
                *devices = fresh;
                *default_index = default;
            }
            Some(Connection::Dummy) => self.dummy.flush_events(),
            None => {}
        }
    }

    fn output_device_count(&self) -> usize {
        match &self.connection {
            Some(Connection::Host { devices, .. }) => devices.len(),
            Some(Connection::Dummy) => self.dummy.output_device_count(),
            None => 0,
        }
    }

    fn default_output_device_index(&self) -> i32 {
        match &self.connection {
            Some(Connection::Host { default_index, .. }) => *default_index,
            Some(Connection::Dummy) => self.dummy.default_output_device_index(),
            None => -1,
        }
    }

    fn output_device(&self, index: usize) -> Result<RawDevice, NativeError> {
        match &self.connection {
            Some(Connection::Host { devices, .. }) => {
                devices.get(index).cloned().ok_or(NativeError::NoSuchDevice)
            }
            Some(Connection::Dummy) => self.dummy.output_device(index),
            None => Err(NativeError::NoSuchDevice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dummy_kind_always_connects() {
        let mut backend = CpalBackend::new(DummyConfig::default()).unwrap();
        backend.connect(BackendKind::Dummy).unwrap();
        assert_eq!(backend.current_backend(), Some(BackendKind::Dummy));

        backend.flush_events();
        assert_eq!(backend.output_device_count(), 1);
        assert_eq!(backend.default_output_device_index(), 0);

        backend.disconnect();
        assert_eq!(backend.current_backend(), None);
        assert_eq!(backend.output_device_count(), 0);
    }

    #[test]
    fn test_pulseaudio_is_not_a_cpal_host() {
        let mut backend = CpalBackend::new(DummyConfig::default()).unwrap();
        assert_eq!(
            backend.connect(BackendKind::PulseAudio),
            Err(NativeError::BackendUnavailable)
        );
        assert_eq!(backend.current_backend(), None);
    }
}
