//! Subsystem registry: wiring of entry points and constants onto the module
//! surface.
//!
//! The registry performs no engine logic. Core entry points come from
//! [`crate::api`], numeric enumerations from [`constants`], and the external
//! collaborators (file, player, playlist, analysers, encoder, waveform
//! builder) attach their constructors through the [`Subsystem`] trait.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::engine::EngineHandles;
use crate::error::{log_host_error, HostError};

pub mod constants;

pub use constants::{FillMode, PlaybackEventKind, TagMatchFlags};

/// Entry point callable by the host.
pub type HostMethod =
    Arc<dyn Fn(&EngineHandles, &[Value]) -> Result<Value, HostError> + Send + Sync>;

/// Canonical names of the collaborator constructor entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollaboratorEntry {
    Open,
    CreatePlayer,
    CreatePlaylist,
    CreateLoudnessDetector,
    CreateEncoder,
    CreateFingerprinter,
    EncodeFingerprint,
    DecodeFingerprint,
    CreateWaveformBuilder,
}

impl CollaboratorEntry {
    pub const ALL: [CollaboratorEntry; 9] = [
        CollaboratorEntry::Open,
        CollaboratorEntry::CreatePlayer,
        CollaboratorEntry::CreatePlaylist,
        CollaboratorEntry::CreateLoudnessDetector,
        CollaboratorEntry::CreateEncoder,
        CollaboratorEntry::CreateFingerprinter,
        CollaboratorEntry::EncodeFingerprint,
        CollaboratorEntry::DecodeFingerprint,
        CollaboratorEntry::CreateWaveformBuilder,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CollaboratorEntry::Open => "open",
            CollaboratorEntry::CreatePlayer => "createPlayer",
            CollaboratorEntry::CreatePlaylist => "createPlaylist",
            CollaboratorEntry::CreateLoudnessDetector => "createLoudnessDetector",
            CollaboratorEntry::CreateEncoder => "createEncoder",
            CollaboratorEntry::CreateFingerprinter => "createFingerprinter",
            CollaboratorEntry::EncodeFingerprint => "encodeFingerprint",
            CollaboratorEntry::DecodeFingerprint => "decodeFingerprint",
            CollaboratorEntry::CreateWaveformBuilder => "createWaveformBuilder",
        }
    }
}

/// An external collaborator attaching its entry points to the surface.
pub trait Subsystem: Send + Sync {
    fn name(&self) -> &'static str;

    fn register(&self, registry: &mut SubsystemRegistry) -> Result<(), HostError>;
}

/// Builder collecting constants and methods under one shared namespace.
#[derive(Default)]
pub struct SubsystemRegistry {
    constants: BTreeMap<&'static str, i64>,
    methods: BTreeMap<String, HostMethod>,
    subsystems: Vec<&'static str>,
}

impl SubsystemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_free(&self, name: &str) -> Result<(), HostError> {
        if self.constants.contains_key(name) || self.methods.contains_key(name) {
            let err = HostError::DuplicateEntry {
                name: name.to_string(),
            };
            log_host_error(&err, "registry");
            return Err(err);
        }
        Ok(())
    }

    pub fn constant(&mut self, name: &'static str, value: i64) -> Result<(), HostError> {
        self.ensure_free(name)?;
        self.constants.insert(name, value);
        Ok(())
    }

    pub fn method<F>(&mut self, name: impl Into<String>, method: F) -> Result<(), HostError>
    where
        F: Fn(&EngineHandles, &[Value]) -> Result<Value, HostError> + Send + Sync + 'static,
    {
        let name = name.into();
        self.ensure_free(&name)?;
        self.methods.insert(name, Arc::new(method));
        Ok(())
    }

    /// Register a collaborator constructor under its canonical name.
    pub fn collaborator<F>(&mut self, entry: CollaboratorEntry, method: F) -> Result<(), HostError>
    where
        F: Fn(&EngineHandles, &[Value]) -> Result<Value, HostError> + Send + Sync + 'static,
    {
        self.method(entry.name(), method)
    }

    pub fn attach(&mut self, subsystem: &dyn Subsystem) -> Result<(), HostError> {
        subsystem.register(self)?;
        log::debug!("[Registry] attached subsystem {}", subsystem.name());
        self.subsystems.push(subsystem.name());
        Ok(())
    }

    pub fn finish(self) -> ModuleSurface {
        ModuleSurface {
            constants: self.constants,
            methods: self.methods,
            subsystems: self.subsystems,
        }
    }
}

/// Build the complete module surface: core entry points, constants, then
/// every collaborator subsystem in order.
pub fn build_surface(subsystems: &[Box<dyn Subsystem>]) -> Result<ModuleSurface, HostError> {
    let mut registry = SubsystemRegistry::new();
    crate::api::register_core(&mut registry)?;
    constants::register_constants(&mut registry)?;
    for subsystem in subsystems {
        registry.attach(subsystem.as_ref())?;
    }
    Ok(registry.finish())
}

/// The functions and constants exposed to the host.
pub struct ModuleSurface {
    constants: BTreeMap<&'static str, i64>,
    methods: BTreeMap<String, HostMethod>,
    subsystems: Vec<&'static str>,
}

impl ModuleSurface {
    pub fn constant(&self, name: &str) -> Option<i64> {
        self.constants.get(name).copied()
    }

    pub fn constants(&self) -> impl Iterator<Item = (&'static str, i64)> + '_ {
        self.constants.iter().map(|(name, value)| (*name, *value))
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn method_names(&self) -> Vec<&str> {
        self.methods.keys().map(String::as_str).collect()
    }

    pub fn subsystems(&self) -> &[&'static str] {
        &self.subsystems
    }

    /// Collaborator entry points no subsystem has attached yet.
    pub fn missing_collaborators(&self) -> Vec<CollaboratorEntry> {
        CollaboratorEntry::ALL
            .into_iter()
            .filter(|entry| !self.methods.contains_key(entry.name()))
            .collect()
    }

    /// Call an entry point by name.
    pub fn invoke(
        &self,
        handles: &EngineHandles,
        name: &str,
        args: &[Value],
    ) -> Result<Value, HostError> {
        let method = self.methods.get(name).ok_or_else(|| {
            let err = HostError::UnknownEntry {
                name: name.to_string(),
            };
            log_host_error(&err, "invoke");
            err
        })?;
        method(handles, args)
    }

    /// Constants as a JSON object, for tooling.
    pub fn constants_json(&self) -> Value {
        Value::Object(
            self.constants
                .iter()
                .map(|(name, value)| (name.to_string(), Value::from(*value)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FingerprintStub;

    impl Subsystem for FingerprintStub {
        fn name(&self) -> &'static str {
            "fingerprinter"
        }

        fn register(&self, registry: &mut SubsystemRegistry) -> Result<(), HostError> {
            registry.collaborator(CollaboratorEntry::CreateFingerprinter, |_, _| {
                Ok(json!({ "kind": "fingerprinter" }))
            })?;
            registry.collaborator(CollaboratorEntry::EncodeFingerprint, |_, args| {
                Ok(Value::from(args.len()))
            })?;
            registry.collaborator(CollaboratorEntry::DecodeFingerprint, |_, _| Ok(Value::Null))
        }
    }

    #[test]
    fn test_core_surface_has_all_core_methods() {
        let surface = build_surface(&[]).unwrap();
        for name in [
            "setLogging",
            "connectSoundBackend",
            "disconnectSoundBackend",
            "getDevices",
            "getVersion",
        ] {
            assert!(surface.has_method(name), "missing {}", name);
        }
        assert_eq!(surface.missing_collaborators().len(), CollaboratorEntry::ALL.len());
    }

    #[test]
    fn test_subsystem_attaches_entries() {
        let subsystems: Vec<Box<dyn Subsystem>> = vec![Box::new(FingerprintStub)];
        let surface = build_surface(&subsystems).unwrap();
        assert_eq!(surface.subsystems(), &["fingerprinter"]);
        assert!(surface.has_method("createFingerprinter"));
        assert!(!surface
            .missing_collaborators()
            .contains(&CollaboratorEntry::EncodeFingerprint));

        let handles = EngineHandles::new_dummy_test();
        let result = surface
            .invoke(&handles, "encodeFingerprint", &[json!(1), json!(2)])
            .unwrap();
        assert_eq!(result, json!(2));
    }

    #[test]
    fn test_duplicate_subsystem_rejected() {
        let subsystems: Vec<Box<dyn Subsystem>> =
            vec![Box::new(FingerprintStub), Box::new(FingerprintStub)];
        assert!(matches!(
            build_surface(&subsystems),
            Err(HostError::DuplicateEntry { .. })
        ));
    }

    #[test]
    fn test_method_cannot_shadow_constant() {
        let mut registry = SubsystemRegistry::new();
        registry.constant("LOG_INFO", 32).unwrap();
        let err = registry
            .method("LOG_INFO", |_, _| Ok(Value::Null))
            .unwrap_err();
        assert_eq!(
            err,
            HostError::DuplicateEntry {
                name: "LOG_INFO".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_entry() {
        let surface = build_surface(&[]).unwrap();
        let handles = EngineHandles::new_dummy_test();
        assert!(matches!(
            surface.invoke(&handles, "createPlayer", &[]),
            Err(HostError::UnknownEntry { .. })
        ));
    }

    #[test]
    fn test_constants_json() {
        let surface = build_surface(&[]).unwrap();
        let json = surface.constants_json();
        assert_eq!(json["BACKEND_ALSA"], 3);
        assert_eq!(json["LOG_WARNING"], 24);
    }
}
