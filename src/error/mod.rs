// Error types for the vocal scoring crate
//
// The scoring core itself never fails: degenerate input yields an
// `InsufficientData` result. Errors only arise in the outer layers that load
// fixtures, WAV files and expectation documents from disk.

mod fixture;

pub use fixture::{log_fixture_error, FixtureError, FixtureErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, so callers embedding the crate can map
/// failures without parsing strings.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
