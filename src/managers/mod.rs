// Managers Module
//
// Focused components borrowing the engine handles, one concern each:
// - ConnectionController: backend connect/disconnect state machine
// - DeviceEnumerator: output device listing with mandatory event flush
// - EngineFacade: engine version and logging verbosity

pub mod connection_controller;
pub mod device_enumerator;
pub mod engine_facade;

pub use connection_controller::{ConnectionController, ConnectionState};
pub use device_enumerator::{DeviceDescriptor, DeviceEnumerator, DeviceList};
pub use engine_facade::EngineFacade;
