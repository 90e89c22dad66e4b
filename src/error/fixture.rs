// Fixture error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Fixture error code constants
///
/// Error code range: 3001-3005
pub struct FixtureErrorCodes {}

impl FixtureErrorCodes {
    /// Fixture name or path could not be resolved
    pub const NOT_FOUND: i32 = 3001;

    /// WAV file could not be opened or its header is invalid
    pub const WAV_OPEN: i32 = 3002;

    /// WAV layout not supported (channels, bit depth)
    pub const UNSUPPORTED_FORMAT: i32 = 3003;

    /// Sample data could not be decoded
    pub const DECODE: i32 = 3004;

    /// Expectation document could not be read or parsed
    pub const EXPECTATION: i32 = 3005;
}

/// Log a fixture error with structured context
///
/// Logged fields:
/// - error_code: Numeric error code for programmatic handling
/// - component: The component where the error occurred
/// - message: Human-readable error message
/// - context: Additional contextual information
pub fn log_fixture_error(err: &FixtureError, context: &str) {
    error!(
        "Fixture error in {}: code={}, component=FixtureCatalog, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Fixture-related errors
///
/// These errors cover fixture discovery, WAV decoding and expectation
/// loading for the CLI harness and integration tests.
///
/// Error code ranges: 3001-3005
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureError {
    /// Fixture name or path could not be resolved
    NotFound { fixture: String, root: String },

    /// WAV file could not be opened
    WavOpen { path: String, reason: String },

    /// WAV layout not supported
    UnsupportedFormat { path: String, reason: String },

    /// Sample data could not be decoded
    Decode { path: String, reason: String },

    /// Expectation document could not be read or parsed
    Expectation { path: String, reason: String },
}

impl ErrorCode for FixtureError {
    fn code(&self) -> i32 {
        match self {
            FixtureError::NotFound { .. } => FixtureErrorCodes::NOT_FOUND,
            FixtureError::WavOpen { .. } => FixtureErrorCodes::WAV_OPEN,
            FixtureError::UnsupportedFormat { .. } => FixtureErrorCodes::UNSUPPORTED_FORMAT,
            FixtureError::Decode { .. } => FixtureErrorCodes::DECODE,
            FixtureError::Expectation { .. } => FixtureErrorCodes::EXPECTATION,
        }
    }

    fn message(&self) -> String {
        match self {
            FixtureError::NotFound { fixture, root } => {
                format!("Fixture '{}' not found in {}", fixture, root)
            }
            FixtureError::WavOpen { path, reason } => {
                format!("Failed to open WAV {}: {}", path, reason)
            }
            FixtureError::UnsupportedFormat { path, reason } => {
                format!("Unsupported WAV format in {}: {}", path, reason)
            }
            FixtureError::Decode { path, reason } => {
                format!("Failed to decode samples from {}: {}", path, reason)
            }
            FixtureError::Expectation { path, reason } => {
                format!("Invalid expectation file {}: {}", path, reason)
            }
        }
    }
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FixtureError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for FixtureError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason_error(make: fn(String, String) -> FixtureError) -> FixtureError {
        make("a.wav".to_string(), "boom".to_string())
    }

    #[test]
    fn test_fixture_error_codes() {
        assert_eq!(
            FixtureError::NotFound {
                fixture: "sine".to_string(),
                root: "fixtures".to_string()
            }
            .code(),
            FixtureErrorCodes::NOT_FOUND
        );
        assert_eq!(
            reason_error(|path, reason| FixtureError::WavOpen { path, reason }).code(),
            FixtureErrorCodes::WAV_OPEN
        );
        assert_eq!(
            reason_error(|path, reason| FixtureError::UnsupportedFormat { path, reason }).code(),
            FixtureErrorCodes::UNSUPPORTED_FORMAT
        );
        assert_eq!(
            reason_error(|path, reason| FixtureError::Decode { path, reason }).code(),
            FixtureErrorCodes::DECODE
        );
        assert_eq!(
            reason_error(|path, reason| FixtureError::Expectation { path, reason }).code(),
            FixtureErrorCodes::EXPECTATION
        );
    }

    #[test]
    fn test_fixture_error_messages() {
        let err = FixtureError::NotFound {
            fixture: "sine".to_string(),
            root: "fixtures".to_string(),
        };
        assert_eq!(err.message(), "Fixture 'sine' not found in fixtures");

        let err = reason_error(|path, reason| FixtureError::UnsupportedFormat { path, reason });
        assert_eq!(err.message(), "Unsupported WAV format in a.wav: boom");
    }

    #[test]
    fn test_fixture_error_display() {
        let err = reason_error(|path, reason| FixtureError::Decode { path, reason });
        let display = format!("{}", err);
        assert!(display.contains("FixtureError"));
        assert!(display.contains(&err.code().to_string()));
    }

    #[test]
    fn test_error_code_range() {
        assert_eq!(FixtureErrorCodes::NOT_FOUND, 3001);
        assert_eq!(FixtureErrorCodes::EXPECTATION, 3005);
    }
}
