// DeviceEnumerator: output device listing for the connected backend
//
// Devices are never cached. Every listing flushes backend events first so
// hotplug changes since the previous call are reflected.

use serde::{Deserialize, Serialize};

use crate::engine::backend::{BackendKind, RawDevice};
use crate::engine::events::HostEventKind;
use crate::engine::EngineHandles;
use crate::error::{log_host_error, HostError};

/// Snapshot of one output device, valid for the enumeration that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDescriptor {
    pub id: String,
    pub name: String,
    pub backend: BackendKind,
    pub is_raw: bool,
    pub is_default: bool,
    pub sample_rate_current: u32,
    pub channel_count: u16,
    pub probe_error: Option<String>,
}

impl DeviceDescriptor {
    /// Wrap a raw backend device.
    pub fn wrap(raw: RawDevice, is_default: bool) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            backend: raw.backend,
            is_raw: raw.is_raw,
            is_default,
            sample_rate_current: raw.sample_rate_current,
            channel_count: raw.channel_count,
            probe_error: raw.probe_error.map(|err| err.describe().to_string()),
        }
    }
}

/// Devices in backend-reported order plus the reported default index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceList {
    pub list: Vec<DeviceDescriptor>,
    /// As reported by the backend; any negative value means no default.
    pub default_index: i32,
}

impl DeviceList {
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// The default device, if the reported index points into the list.
    pub fn default_device(&self) -> Option<&DeviceDescriptor> {
        usize::try_from(self.default_index)
            .ok()
            .and_then(|index| self.list.get(index))
    }
}

/// Lists output devices of the connected backend.
pub struct DeviceEnumerator<'h> {
    handles: &'h EngineHandles,
}

impl<'h> DeviceEnumerator<'h> {
    pub fn new(handles: &'h EngineHandles) -> Self {
        Self { handles }
    }

    /// List output devices
    ///
    /// # Returns
    /// * `Ok(DeviceList)` - One descriptor per backend index, in order
    /// * `Err(HostError::InvalidState)` - No backend connected
    /// * `Err(HostError::Native)` - Backend lost a device mid-listing
    pub fn list_output_devices(&self) -> Result<DeviceList, HostError> {
        let mut backend = self.handles.lock_backend().map_err(|err| {
            log_host_error(&err, "list_output_devices");
            err
        })?;

        if backend.current_backend().is_none() {
            let err = HostError::invalid_state("no backend connected");
            log_host_error(&err, "list_output_devices");
            return Err(err);
        }

        backend.flush_events();

        let count = backend.output_device_count();
        let default_index = backend.default_output_device_index();

        let list = (0..count)
            .map(|index| {
                backend
                    .output_device(index)
                    .map(|raw| DeviceDescriptor::wrap(raw, index as i64 == default_index as i64))
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|native| {
                let err = HostError::Native(native);
                log_host_error(&err, "list_output_devices");
                err
            })?;

        log::debug!(
            "[Devices] {} output devices, default index {}",
            list.len(),
            default_index
        );
        self.handles.events().publish(HostEventKind::DevicesEnumerated {
            count: list.len(),
            default_index,
        });

        Ok(DeviceList {
            list,
            default_index,
        })
    }
}
