//! Numeric enumerations exposed on the module surface.

use crate::engine::backend::BackendKind;
use crate::error::HostError;
use crate::logging::LogLevel;

use super::SubsystemRegistry;

/// Tag matching flags understood by the file collaborator.
pub struct TagMatchFlags {}

impl TagMatchFlags {
    pub const MATCH_CASE: i64 = 1;
    pub const DONT_OVERWRITE: i64 = 16;
    pub const APPEND: i64 = 32;
}

/// When a multi-sink playlist stops decoding ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    EverySinkFull,
    AnySinkFull,
}

impl FillMode {
    pub fn raw(self) -> i64 {
        match self {
            FillMode::EverySinkFull => 0,
            FillMode::AnySinkFull => 1,
        }
    }
}

/// Events a player collaborator reports to its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEventKind {
    NowPlaying,
    BufferUnderrun,
    DeviceClosed,
    DeviceOpened,
    DeviceOpenError,
    EndOfPlaylist,
    Wakeup,
}

impl PlaybackEventKind {
    pub const ALL: [PlaybackEventKind; 7] = [
        PlaybackEventKind::NowPlaying,
        PlaybackEventKind::BufferUnderrun,
        PlaybackEventKind::DeviceClosed,
        PlaybackEventKind::DeviceOpened,
        PlaybackEventKind::DeviceOpenError,
        PlaybackEventKind::EndOfPlaylist,
        PlaybackEventKind::Wakeup,
    ];

    pub fn raw(self) -> i64 {
        match self {
            PlaybackEventKind::NowPlaying => 0,
            PlaybackEventKind::BufferUnderrun => 1,
            PlaybackEventKind::DeviceClosed => 2,
            PlaybackEventKind::DeviceOpened => 3,
            PlaybackEventKind::DeviceOpenError => 4,
            PlaybackEventKind::EndOfPlaylist => 5,
            PlaybackEventKind::Wakeup => 6,
        }
    }

    /// Name on the module surface. The leading underscore marks these as
    /// internal to the player wrapper.
    pub fn constant_name(self) -> &'static str {
        match self {
            PlaybackEventKind::NowPlaying => "_EVENT_NOWPLAYING",
            PlaybackEventKind::BufferUnderrun => "_EVENT_BUFFERUNDERRUN",
            PlaybackEventKind::DeviceClosed => "_EVENT_DEVICE_CLOSED",
            PlaybackEventKind::DeviceOpened => "_EVENT_DEVICE_OPENED",
            PlaybackEventKind::DeviceOpenError => "_EVENT_DEVICE_OPEN_ERROR",
            PlaybackEventKind::EndOfPlaylist => "_EVENT_END_OF_PLAYLIST",
            PlaybackEventKind::Wakeup => "_EVENT_WAKEUP",
        }
    }
}

fn log_level_name(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Quiet => "LOG_QUIET",
        LogLevel::Error => "LOG_ERROR",
        LogLevel::Warning => "LOG_WARNING",
        LogLevel::Info => "LOG_INFO",
    }
}

fn backend_name(kind: BackendKind) -> &'static str {
    match kind {
        BackendKind::Jack => "BACKEND_JACK",
        BackendKind::PulseAudio => "BACKEND_PULSEAUDIO",
        BackendKind::Alsa => "BACKEND_ALSA",
        BackendKind::CoreAudio => "BACKEND_COREAUDIO",
        BackendKind::Wasapi => "BACKEND_WASAPI",
        BackendKind::Dummy => "BACKEND_DUMMY",
    }
}

/// Register every numeric enumeration on the surface.
pub fn register_constants(registry: &mut SubsystemRegistry) -> Result<(), HostError> {
    for level in LogLevel::ALL {
        registry.constant(log_level_name(level), i64::from(level.raw()))?;
    }

    registry.constant("TAG_MATCH_CASE", TagMatchFlags::MATCH_CASE)?;
    registry.constant("TAG_DONT_OVERWRITE", TagMatchFlags::DONT_OVERWRITE)?;
    registry.constant("TAG_APPEND", TagMatchFlags::APPEND)?;

    registry.constant("EVERY_SINK_FULL", FillMode::EverySinkFull.raw())?;
    registry.constant("ANY_SINK_FULL", FillMode::AnySinkFull.raw())?;

    for event in PlaybackEventKind::ALL {
        registry.constant(event.constant_name(), event.raw())?;
    }

    for kind in BackendKind::ALL {
        registry.constant(backend_name(kind), i64::from(kind.raw()))?;
    }

    Ok(())
}
