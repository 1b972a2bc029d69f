// Native sound-library error set

use crate::error::ErrorCode;
use std::fmt;

/// Failure codes reported by the sound backend.
///
/// Raw values are stable and match the order the native library reports
/// them in; `0` is reserved for "no error" and never constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeError {
    NoMem,
    InitAudioBackend,
    SystemResources,
    OpeningDevice,
    NoSuchDevice,
    Invalid,
    BackendUnavailable,
    Streaming,
    IncompatibleDevice,
    NoSuchClient,
    IncompatibleBackend,
    BackendDisconnected,
    Interrupted,
    Underflow,
    EncodingString,
}

impl NativeError {
    /// Raw native code (1-15).
    pub fn raw(self) -> i32 {
        match self {
            NativeError::NoMem => 1,
            NativeError::InitAudioBackend => 2,
            NativeError::SystemResources => 3,
            NativeError::OpeningDevice => 4,
            NativeError::NoSuchDevice => 5,
            NativeError::Invalid => 6,
            NativeError::BackendUnavailable => 7,
            NativeError::Streaming => 8,
            NativeError::IncompatibleDevice => 9,
            NativeError::NoSuchClient => 10,
            NativeError::IncompatibleBackend => 11,
            NativeError::BackendDisconnected => 12,
            NativeError::Interrupted => 13,
            NativeError::Underflow => 14,
            NativeError::EncodingString => 15,
        }
    }

    pub fn from_raw(raw: i32) -> Option<Self> {
        let err = match raw {
            1 => NativeError::NoMem,
            2 => NativeError::InitAudioBackend,
            3 => NativeError::SystemResources,
            4 => NativeError::OpeningDevice,
            5 => NativeError::NoSuchDevice,
            6 => NativeError::Invalid,
            7 => NativeError::BackendUnavailable,
            8 => NativeError::Streaming,
            9 => NativeError::IncompatibleDevice,
            10 => NativeError::NoSuchClient,
            11 => NativeError::IncompatibleBackend,
            12 => NativeError::BackendDisconnected,
            13 => NativeError::Interrupted,
            14 => NativeError::Underflow,
            15 => NativeError::EncodingString,
            _ => return None,
        };
        Some(err)
    }

    /// Native error-to-string text.
    pub fn describe(self) -> &'static str {
        match self {
            NativeError::NoMem => "out of memory",
            NativeError::InitAudioBackend => "unable to initialize audio backend",
            NativeError::SystemResources => "system resource not available",
            NativeError::OpeningDevice => "unable to open device",
            NativeError::NoSuchDevice => "no such device",
            NativeError::Invalid => "invalid value",
            NativeError::BackendUnavailable => "backend not available",
            NativeError::Streaming => "unable to start device",
            NativeError::IncompatibleDevice => "incompatible device",
            NativeError::NoSuchClient => "no such client",
            NativeError::IncompatibleBackend => "incompatible backend",
            NativeError::BackendDisconnected => "backend disconnected",
            NativeError::Interrupted => "interrupted; try again",
            NativeError::Underflow => "buffer underflow",
            NativeError::EncodingString => {
                "unable to convert to or from UTF-8 to the native string format"
            }
        }
    }
}

impl ErrorCode for NativeError {
    fn code(&self) -> i32 {
        self.raw()
    }

    fn message(&self) -> String {
        self.describe().to_string()
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

impl std::error::Error for NativeError {}
