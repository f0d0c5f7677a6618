//! Error types for the w1therm system

use thiserror::Error;

/// Core error type for w1therm operations
#[derive(Error, Debug)]
pub enum W1ThermError {
    /// Required kernel support is absent or could not be activated
    #[error("Prerequisite not met: {0}")]
    Prerequisite(String),

    /// No device node exists for the requested sensor
    #[error("Sensor not found: {0}")]
    SensorNotFound(String),

    /// Every read attempt failed
    #[error("Failed to read the temperature successfully after {attempts} attempts: {cause}")]
    ReadFailure {
        attempts: usize,
        cause: ReadFailureCause,
    },

    /// Malformed sensor identifier
    #[error("Invalid sensor ID: {0}")]
    InvalidSensorId(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for w1therm operations
pub type Result<T> = std::result::Result<T, W1ThermError>;

/// Why the last attempt of a failed read did not produce a value
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReadFailureCause {
    /// The data file could not be opened or read
    #[error("device file unreadable ({0})")]
    Unreadable(String),

    /// The file was read but its content failed validation
    #[error("{0}")]
    Invalid(#[from] ReadingError),
}

/// Validation failure for a single snapshot of the driver's data file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadingError {
    /// Fewer than the two expected lines
    #[error("expected 2 lines, got {0}")]
    TooFewLines(usize),

    /// Status line does not end with the CRC-passed marker
    #[error("CRC check failed: {0:?}")]
    CrcCheckFailed(String),

    /// Data line carries no `t=` field
    #[error("temperature field missing: {0:?}")]
    MissingTemperature(String),

    /// The `t=` field value is not an integer
    #[error("temperature value malformed: {0:?}")]
    MalformedTemperature(String),
}

impl From<toml::de::Error> for W1ThermError {
    fn from(err: toml::de::Error) -> Self {
        W1ThermError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: W1ThermError = io_err.into();

        match err {
            W1ThermError::Io(e) => {
                assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
            }
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let err: W1ThermError = toml_err.into();
        assert!(matches!(err, W1ThermError::Config(_)));
    }

    #[test]
    fn test_error_display() {
        let err = W1ThermError::Prerequisite("\"w1-gpio\" kernel module is not loaded".to_string());
        assert_eq!(
            format!("{}", err),
            "Prerequisite not met: \"w1-gpio\" kernel module is not loaded"
        );

        let err = W1ThermError::SensorNotFound("28-000000000099".to_string());
        assert_eq!(format!("{}", err), "Sensor not found: 28-000000000099");

        let err = W1ThermError::ReadFailure {
            attempts: 5,
            cause: ReadingError::CrcCheckFailed("crc=03 NO".to_string()).into(),
        };
        assert_eq!(
            format!("{}", err),
            "Failed to read the temperature successfully after 5 attempts: CRC check failed: \"crc=03 NO\""
        );

        let err = W1ThermError::ReadFailure {
            attempts: 5,
            cause: ReadFailureCause::Unreadable("permission denied".to_string()),
        };
        assert!(format!("{}", err).ends_with("device file unreadable (permission denied)"));
    }

    #[test]
    fn test_reading_error_display() {
        assert_eq!(
            ReadingError::TooFewLines(1).to_string(),
            "expected 2 lines, got 1"
        );
        assert_eq!(
            ReadingError::MalformedTemperature("t=2x062".to_string()).to_string(),
            "temperature value malformed: \"t=2x062\""
        );
    }
}
