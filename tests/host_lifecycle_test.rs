//! Integration tests for the host surface over emulated backends
//!
//! These tests drive the entry points the way a scripting host does:
//! - Connect / reconnect / disconnect state machine
//! - Device listing with hotplug changes between calls
//! - Logging and version queries
//! - Teardown through the exit finalizer
//!
//! Every test builds its own handles over a dummy backend, so no audio
//! hardware is required.

use futures::executor::block_on;
use futures::StreamExt;
use playback_host::engine::{DummyBackend, DummyConfig, EmulatedHost, HotplugHandle};
use playback_host::{
    BackendKind, ConnectionState, EngineHandles, HostConfig, HostError, HostEventKind, HostModule,
    LogLevel, NativeError,
};
use serde_json::{json, Value};

fn module_with(hosts: Vec<EmulatedHost>) -> (HostModule, HotplugHandle) {
    let config = HostConfig {
        dummy: DummyConfig {
            hosts,
            ..DummyConfig::default()
        },
        ..HostConfig::default()
    };
    let backend = DummyBackend::new(config.dummy.clone()).expect("valid dummy config");
    let hotplug = backend.hotplug();
    let handles =
        EngineHandles::with_backend(&config, Box::new(backend)).expect("handles created");
    let module = HostModule::new(handles, &[]).expect("surface built");
    (module, hotplug)
}

fn default_module() -> HostModule {
    module_with(DummyConfig::default().hosts).0
}

fn device_names(devices: &Value) -> Vec<String> {
    devices["list"]
        .as_array()
        .expect("list array")
        .iter()
        .map(|device| device["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

fn connection_state(module: &HostModule) -> ConnectionState {
    module
        .finalizer()
        .with_handles(|handles| Ok(handles.connection().state()))
        .expect("handles alive")
}

/// connect(None) → getDevices → disconnect → getDevices fails
#[test]
fn test_auto_connect_list_disconnect() {
    let module = default_module();

    module.call("connectSoundBackend", &[]).unwrap();
    assert_eq!(
        connection_state(&module),
        ConnectionState::Connected(BackendKind::Dummy)
    );

    let devices = module.call("getDevices", &[]).unwrap();
    assert_eq!(device_names(&devices), vec!["Dummy Output Device"]);

    module.call("disconnectSoundBackend", &[]).unwrap();
    assert_eq!(connection_state(&module), ConnectionState::Disconnected);

    assert!(matches!(
        module.call("getDevices", &[]),
        Err(HostError::InvalidState { .. })
    ));
}

#[test]
fn test_invalid_argument_shapes_leave_disconnected() {
    let module = default_module();

    for args in [
        vec![json!(1), json!(2)],
        vec![json!("alsa")],
        vec![json!(true)],
        vec![json!([6])],
    ] {
        assert!(
            matches!(
                module.call("connectSoundBackend", &args),
                Err(HostError::InvalidArgument { .. })
            ),
            "accepted {:?}",
            args
        );
        assert_eq!(connection_state(&module), ConnectionState::Disconnected);
    }
}

#[test]
fn test_unknown_backend_id_is_native_error() {
    let module = default_module();
    let err = module.call("connectSoundBackend", &[json!(99)]).unwrap_err();
    assert_eq!(err, HostError::Native(NativeError::Invalid));
    assert_eq!(connection_state(&module), ConnectionState::Disconnected);
}

#[test]
fn test_unknown_backend_id_while_connected_disconnects() {
    let module = default_module();
    module.call("connectSoundBackend", &[]).unwrap();
    assert_eq!(
        connection_state(&module),
        ConnectionState::Connected(BackendKind::Dummy)
    );

    let err = module.call("connectSoundBackend", &[json!(42)]).unwrap_err();
    assert_eq!(err, HostError::Native(NativeError::Invalid));
    assert_eq!(connection_state(&module), ConnectionState::Disconnected);
    assert!(matches!(
        module.call("getDevices", &[]),
        Err(HostError::InvalidState { .. })
    ));
}

#[test]
fn test_reconnect_overrides_previous_backend() {
    let (module, _) = module_with(vec![
        EmulatedHost::new(BackendKind::Alsa, &["hw:0,0", "hw:1,0"], 1),
        EmulatedHost::new(BackendKind::Dummy, &["Dummy Output Device"], 0),
    ]);

    module
        .call("connectSoundBackend", &[json!(BackendKind::Alsa.raw())])
        .unwrap();
    module
        .call("connectSoundBackend", &[json!(BackendKind::Dummy.raw())])
        .unwrap();

    let devices = module.call("getDevices", &[]).unwrap();
    assert_eq!(device_names(&devices), vec!["Dummy Output Device"]);
    assert!(devices["list"]
        .as_array()
        .unwrap()
        .iter()
        .all(|device| device["backend"] == "dummy"));
}

#[test]
fn test_disconnect_when_disconnected_is_noop() {
    let module = default_module();
    for _ in 0..3 {
        assert_eq!(
            module.call("disconnectSoundBackend", &[]).unwrap(),
            Value::Null
        );
    }
    assert_eq!(connection_state(&module), ConnectionState::Disconnected);
}

#[test]
fn test_device_count_and_default_index_track_hotplug() {
    let (module, hotplug) = module_with(vec![EmulatedHost::new(
        BackendKind::Dummy,
        &["Speakers"],
        0,
    )]);
    module.call("connectSoundBackend", &[]).unwrap();

    let first = module.call("getDevices", &[]).unwrap();
    assert_eq!(device_names(&first), vec!["Speakers"]);
    assert_eq!(first["defaultIndex"], 0);

    hotplug.plug(BackendKind::Dummy, "Headphones");
    hotplug.set_default(BackendKind::Dummy, 1);
    let second = module.call("getDevices", &[]).unwrap();
    assert_eq!(device_names(&second), vec!["Speakers", "Headphones"]);
    assert_eq!(second["defaultIndex"], 1);
    assert_eq!(second["list"][1]["isDefault"], true);

    hotplug.unplug(BackendKind::Dummy, "Speakers");
    let third = module.call("getDevices", &[]).unwrap();
    assert_eq!(device_names(&third), vec!["Headphones"]);
    let default_index = third["defaultIndex"].as_i64().unwrap();
    assert!(default_index == -1 || (default_index as usize) < device_names(&third).len());
}

#[test]
fn test_failing_backend_keeps_disconnected() {
    let (module, _) = module_with(vec![EmulatedHost::failing(
        BackendKind::Dummy,
        NativeError::OpeningDevice,
    )]);

    let err = module
        .call("connectSoundBackend", &[json!(BackendKind::Dummy.raw())])
        .unwrap_err();
    assert_eq!(err, HostError::Native(NativeError::OpeningDevice));
    assert_eq!(connection_state(&module), ConnectionState::Disconnected);
}

#[test]
fn test_set_logging_last_call_wins() {
    let module = default_module();
    module
        .call("setLogging", &[json!(LogLevel::Error.raw())])
        .unwrap();
    module
        .call("setLogging", &[json!(LogLevel::Quiet.raw())])
        .unwrap();

    let level = module
        .finalizer()
        .with_handles(|handles| Ok(handles.facade().log_level()))
        .unwrap();
    assert_eq!(level, LogLevel::Quiet);
}

#[test]
fn test_version_is_immutable() {
    let module = default_module();
    let first = module.call("getVersion", &[]).unwrap();
    module.call("connectSoundBackend", &[]).unwrap();
    module.call("setLogging", &[json!(32)]).unwrap();
    assert_eq!(module.call("getVersion", &[]).unwrap(), first);
    assert_eq!(first["major"], env!("CARGO_PKG_VERSION_MAJOR").parse::<u64>().unwrap());
}

#[test]
fn test_event_stream_reports_lifecycle() {
    let module = default_module();
    let stream = module
        .finalizer()
        .with_handles(|handles| Ok(handles.event_stream()))
        .unwrap();

    module.call("connectSoundBackend", &[]).unwrap();
    module.call("getDevices", &[]).unwrap();
    module.call("disconnectSoundBackend", &[]).unwrap();

    let kinds: Vec<HostEventKind> =
        block_on(stream.take(3).map(|event| event.kind).collect());
    assert_eq!(
        kinds,
        vec![
            HostEventKind::BackendConnected {
                backend: BackendKind::Dummy
            },
            HostEventKind::DevicesEnumerated {
                count: 1,
                default_index: 0
            },
            HostEventKind::BackendDisconnected {
                backend: BackendKind::Dummy
            },
        ]
    );
}

#[test]
fn test_finalize_blocks_further_calls() {
    let module = default_module();
    module.call("connectSoundBackend", &[]).unwrap();

    assert!(module.finalizer().finalize());
    assert!(module.finalizer().is_finalized());
    assert!(!module.finalizer().finalize());

    for name in ["getVersion", "getDevices", "disconnectSoundBackend"] {
        assert!(matches!(
            module.call(name, &[]),
            Err(HostError::InvalidState { .. })
        ));
    }
}
