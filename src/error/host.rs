// Host boundary error types and constants

use crate::error::{ErrorCode, NativeError};
use log::error;
use std::fmt;

/// Host error code constants
///
/// Single source of truth for the codes a scripting host sees when a call
/// into the module fails.
///
/// Error code range: 3001-3007
pub struct HostErrorCodes {}

impl HostErrorCodes {
    /// Wrong argument count or type at an entry point
    pub const INVALID_ARGUMENT: i32 = 3001;

    /// Operation precondition on the connection state not met
    pub const INVALID_STATE: i32 = 3002;

    /// Sound backend or engine reported a failure code
    pub const NATIVE_ERROR: i32 = 3003;

    /// Engine or backend handle could not be created
    pub const FATAL_INITIALIZATION: i32 = 3004;

    /// Mutex was poisoned
    pub const LOCK_POISONED: i32 = 3005;

    /// Entry point registered twice
    pub const DUPLICATE_ENTRY: i32 = 3006;

    /// Entry point not registered on the module surface
    pub const UNKNOWN_ENTRY: i32 = 3007;
}

/// Log a host error with structured context
///
/// Logs the numeric code, the component and the human-readable message.
/// The logging is non-blocking and will not panic on failure.
pub fn log_host_error(err: &HostError, context: &str) {
    error!(
        "Host error in {}: code={}, component=PlaybackHost, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors reported to the immediate caller of a host entry point.
///
/// Every variant is synchronous and never retried by this layer.
/// `FatalInitialization` is only returned by the recoverable constructors;
/// the process loader turns it into an abort.
#[derive(Debug, Clone, PartialEq)]
pub enum HostError {
    /// Wrong argument count or type
    InvalidArgument { reason: String },

    /// Connection state precondition not met
    InvalidState { reason: String },

    /// Native backend failure
    Native(NativeError),

    /// Engine or backend handle allocation failed
    FatalInitialization { reason: String },

    /// Mutex was poisoned
    LockPoisoned { component: String },

    /// Entry point registered twice on the module surface
    DuplicateEntry { name: String },

    /// Entry point not registered on the module surface
    UnknownEntry { name: String },
}

impl HostError {
    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        HostError::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_state(reason: impl Into<String>) -> Self {
        HostError::InvalidState {
            reason: reason.into(),
        }
    }
}

impl ErrorCode for HostError {
    fn code(&self) -> i32 {
        match self {
            HostError::InvalidArgument { .. } => HostErrorCodes::INVALID_ARGUMENT,
            HostError::InvalidState { .. } => HostErrorCodes::INVALID_STATE,
            HostError::Native(_) => HostErrorCodes::NATIVE_ERROR,
            HostError::FatalInitialization { .. } => HostErrorCodes::FATAL_INITIALIZATION,
            HostError::LockPoisoned { .. } => HostErrorCodes::LOCK_POISONED,
            HostError::DuplicateEntry { .. } => HostErrorCodes::DUPLICATE_ENTRY,
            HostError::UnknownEntry { .. } => HostErrorCodes::UNKNOWN_ENTRY,
        }
    }

    fn message(&self) -> String {
        match self {
            HostError::InvalidArgument { reason } => reason.clone(),
            HostError::InvalidState { reason } => reason.clone(),
            HostError::Native(native) => native.describe().to_string(),
            HostError::FatalInitialization { reason } => {
                format!("Initialization failed: {}", reason)
            }
            HostError::LockPoisoned { component } => {
                format!("Lock poisoned on {}", component)
            }
            HostError::DuplicateEntry { name } => {
                format!("Entry '{}' is already registered", name)
            }
            HostError::UnknownEntry { name } => {
                format!("No entry named '{}' on the module surface", name)
            }
        }
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HostError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for HostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HostError::Native(native) => Some(native),
            _ => None,
        }
    }
}

impl From<NativeError> for HostError {
    fn from(err: NativeError) -> Self {
        HostError::Native(err)
    }
}
