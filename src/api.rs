// Public host API
// Entry points registered on the module surface. Each one validates the raw
// host arguments, delegates to a manager, and converts the result to a host
// value.

use serde::Serialize;
use serde_json::{json, Value};

use crate::engine::EngineHandles;
use crate::error::{log_host_error, HostError, NativeError};
use crate::logging::LogLevel;
use crate::registry::SubsystemRegistry;

/// Integer value of a numeric host argument. Fractional numbers truncate.
fn numeric_arg(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float.trunc() as i64)),
        _ => None,
    }
}

fn reject(err: HostError, context: &str) -> HostError {
    log_host_error(&err, context);
    err
}

fn to_host_value<T: Serialize>(value: &T) -> Result<Value, HostError> {
    serde_json::to_value(value).map_err(|err| {
        log::error!("[Api] unable to encode host value: {}", err);
        HostError::Native(NativeError::EncodingString)
    })
}

/// Set engine logging verbosity
///
/// # Arguments
/// * `args` - Exactly one number, one of the `LOG_*` constants
///
/// # Returns
/// * `Ok(Value::Null)` on success
/// * `Err(HostError::InvalidArgument)` - Missing, extra, non-numeric or unknown level
pub fn set_logging(handles: &EngineHandles, args: &[Value]) -> Result<Value, HostError> {
    let raw = match args {
        [value] => numeric_arg(value),
        _ => None,
    }
    .ok_or_else(|| {
        reject(
            HostError::invalid_argument("Expected 1 number argument"),
            "setLogging",
        )
    })?;

    let level = LogLevel::from_raw(raw).ok_or_else(|| {
        reject(
            HostError::invalid_argument(format!("Unknown log level {}", raw)),
            "setLogging",
        )
    })?;

    handles.facade().set_logging(level);
    Ok(Value::Null)
}

/// Connect to a sound backend, replacing any existing connection
///
/// # Arguments
/// * `args` - Empty, or one number: a `BACKEND_*` constant, 0 for auto-select
///
/// # Returns
/// * `Ok(Value::Null)` on success
/// * `Err(HostError::InvalidArgument)` - More than one argument or a non-number
/// * `Err(HostError::Native)` - Unknown backend id or the connect attempt failed;
///   any previous connection has been released
pub fn connect_sound_backend(handles: &EngineHandles, args: &[Value]) -> Result<Value, HostError> {
    let raw = match args {
        [] => 0,
        [value] => numeric_arg(value).ok_or_else(|| {
            reject(
                HostError::invalid_argument("Expected arg 1 to be a number"),
                "connectSoundBackend",
            )
        })?,
        _ => {
            return Err(reject(
                HostError::invalid_argument("Expected 0 or 1 args"),
                "connectSoundBackend",
            ))
        }
    };

    handles.connection().connect_raw(raw)?;
    Ok(Value::Null)
}

/// Release the current backend connection. Arguments are ignored and the call
/// never fails.
pub fn disconnect_sound_backend(handles: &EngineHandles, _args: &[Value]) -> Result<Value, HostError> {
    handles.connection().disconnect();
    Ok(Value::Null)
}

/// List output devices of the connected backend
///
/// # Returns
/// * `Ok({ list, defaultIndex })` - Device snapshot
/// * `Err(HostError::InvalidState)` - No backend connected
pub fn get_devices(handles: &EngineHandles, _args: &[Value]) -> Result<Value, HostError> {
    let devices = handles.devices().list_output_devices()?;
    to_host_value(&devices)
}

/// Engine version as `{ major, minor, patch }`
pub fn get_version(handles: &EngineHandles, _args: &[Value]) -> Result<Value, HostError> {
    let version = handles.facade().version();
    Ok(json!({
        "major": version.major,
        "minor": version.minor,
        "patch": version.patch,
    }))
}

/// Register the core entry points on the surface.
pub fn register_core(registry: &mut SubsystemRegistry) -> Result<(), HostError> {
    registry.method("setLogging", set_logging)?;
    registry.method("connectSoundBackend", connect_sound_backend)?;
    registry.method("disconnectSoundBackend", disconnect_sound_backend)?;
    registry.method("getDevices", get_devices)?;
    registry.method("getVersion", get_version)?;
    Ok(())
}
