// Error types for the playback host
//
// This module defines the error types surfaced at the host boundary plus the
// native sound-library error set, with stable numeric codes for callers that
// only see values.

mod host;
mod native;

pub use host::{log_host_error, HostError, HostErrorCodes};
pub use native::NativeError;

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the host boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
