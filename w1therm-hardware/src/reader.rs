//! Sensor Reader - validated temperature samples from the driver's data file
//!
//! The `w1-therm` driver regenerates `w1_slave` on every open and a read can
//! observe a torn or stale snapshot. A sample is only trusted when the
//! driver's CRC marker says so and the data line carries a well-formed
//! `t=` field:
//!
//! ```text
//! 62 01 4b 46 7f ff 0e 10 03 : crc=03 YES
//! 61 01 4b 46 7f ff 0f 10 02 t=22062
//! ```
//!
//! Each read makes up to [`SensorFamily::READ_ATTEMPTS`] back-to-back
//! attempts and returns the first one that validates.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use w1therm_core::{
    DefaultFamily, ReadFailureCause, ReadingError, Result, SensorFamily, SensorId, Temperature,
    W1ThermError,
};

use crate::source::{FsTextSource, TextSource};

/// Trailing token of the status line when the sensor's CRC matched
pub const CRC_OK_MARKER: &str = "YES";

/// Prefix of the temperature field on the data line
pub const TEMPERATURE_FIELD: &str = "t=";

/// Validate one snapshot of the data file and extract its temperature
///
/// Line 1, trimmed, must end with [`CRC_OK_MARKER`]. The last
/// whitespace-separated token of line 2 must be `t=<millidegrees>`.
///
/// # Examples
///
/// ```
/// use w1therm_hardware::parse_reading;
///
/// let text = "62 01 4b 46 7f ff 0e 10 03 : crc=03 YES\n\
///             61 01 4b 46 7f ff 0f 10 02 t=22062\n";
/// assert_eq!(parse_reading(text).unwrap().celsius(), 22.062);
/// ```
pub fn parse_reading(text: &str) -> std::result::Result<Temperature, ReadingError> {
    let mut lines = text.lines();
    let (status, data) = match (lines.next(), lines.next()) {
        (Some(status), Some(data)) => (status.trim(), data.trim()),
        _ => return Err(ReadingError::TooFewLines(text.lines().count())),
    };

    if !status.ends_with(CRC_OK_MARKER) {
        return Err(ReadingError::CrcCheckFailed(status.to_string()));
    }

    let field = data.split_whitespace().next_back().unwrap_or_default();
    let value = field
        .strip_prefix(TEMPERATURE_FIELD)
        .ok_or_else(|| ReadingError::MissingTemperature(data.to_string()))?;

    let millidegrees = value
        .parse::<i32>()
        .map_err(|_| ReadingError::MalformedTemperature(field.to_string()))?;

    Ok(Temperature::from_millidegrees(millidegrees))
}

/// A sensor bound to its data file
///
/// Holds no open file; every read opens the path afresh. The path is
/// checked once at construction, so a device that disappears later shows up
/// as a read failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorHandle {
    id: Option<SensorId>,
    device_path: PathBuf,
}

impl SensorHandle {
    /// Bind to a data file path
    ///
    /// # Errors
    ///
    /// Returns `SensorNotFound` if the path does not exist.
    pub fn new(device_path: impl Into<PathBuf>) -> Result<Self> {
        Self::bind(None, device_path.into())
    }

    pub(crate) fn bind(id: Option<SensorId>, device_path: PathBuf) -> Result<Self> {
        if !device_path.exists() {
            return Err(W1ThermError::SensorNotFound(format!(
                "no device file at {}",
                device_path.display()
            )));
        }

        debug!("Bound sensor handle to {}", device_path.display());
        Ok(Self { id, device_path })
    }

    /// Identifier the handle was resolved from, if any
    pub fn id(&self) -> Option<&SensorId> {
        self.id.as_ref()
    }

    /// Path of the data pseudo-file
    pub fn device_path(&self) -> &Path {
        &self.device_path
    }

    /// Read a validated sample straight from the filesystem
    pub fn read_temperature(&self) -> Result<Temperature> {
        SensorReader::new(FsTextSource).read_temperature(self)
    }
}

/// Runs the retrying read protocol against a [`TextSource`]
///
/// Generic over the source so tests can script the driver's output, and
/// over the sensor family for the attempt budget.
pub struct SensorReader<S: TextSource = FsTextSource, F: SensorFamily = DefaultFamily> {
    source: S,
    _family: PhantomData<F>,
}

impl Default for SensorReader {
    fn default() -> Self {
        Self::new(FsTextSource)
    }
}

impl<S: TextSource> SensorReader<S, DefaultFamily> {
    /// Create a reader for the default sensor family
    pub fn new(source: S) -> Self {
        Self::for_family(source)
    }
}

impl<S: TextSource, F: SensorFamily> SensorReader<S, F> {
    /// Create a reader for a specific sensor family
    pub fn for_family(source: S) -> Self {
        Self {
            source,
            _family: PhantomData,
        }
    }

    /// Maximum attempts per read
    pub fn max_attempts(&self) -> usize {
        F::READ_ATTEMPTS
    }

    /// Obtain one validated temperature sample
    ///
    /// # Errors
    ///
    /// Returns `ReadFailure` once every attempt has failed, carrying the
    /// cause of the last one.
    pub fn read_temperature(&self, handle: &SensorHandle) -> Result<Temperature> {
        let path = handle.device_path();
        let mut last_cause = None;

        for attempt in 1..=F::READ_ATTEMPTS {
            let cause = match self.source.read_text(path) {
                Ok(text) => match parse_reading(&text) {
                    Ok(temperature) => {
                        debug!(
                            "Read {} from {} on attempt {}",
                            temperature,
                            path.display(),
                            attempt
                        );
                        return Ok(temperature);
                    }
                    Err(e) => {
                        debug!("Attempt {} on {} rejected: {}", attempt, path.display(), e);
                        ReadFailureCause::Invalid(e)
                    }
                },
                Err(e) => {
                    debug!("Attempt {} on {} unreadable: {}", attempt, path.display(), e);
                    ReadFailureCause::Unreadable(e.to_string())
                }
            };
            last_cause = Some(cause);
        }

        let cause = last_cause
            .unwrap_or_else(|| ReadFailureCause::Unreadable("no read attempted".to_string()));
        warn!(
            "Giving up on {} after {} attempts: {}",
            path.display(),
            F::READ_ATTEMPTS,
            cause
        );

        Err(W1ThermError::ReadFailure {
            attempts: F::READ_ATTEMPTS,
            cause,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io;
    use std::sync::Mutex;

    const GOOD: &str = "62 01 4b 46 7f ff 0e 10 03 : crc=03 YES\n\
                        61 01 4b 46 7f ff 0f 10 02 t=22062\n";
    const BAD_CRC: &str = "62 01 4b 46 7f ff 0e 10 03 : crc=ff NO\n\
                           61 01 4b 46 7f ff 0f 10 02 t=22062\n";
    const NO_FIELD: &str = "62 01 4b 46 7f ff 0e 10 03 : crc=03 YES\n\
                            61 01 4b 46 7f ff 0f 10 02\n";

    enum Step {
        Text(String),
        Fail(io::ErrorKind),
    }

    /// Scripted driver output, one step per open
    struct ScriptedSource {
        steps: Mutex<VecDeque<Step>>,
        reads: Mutex<usize>,
    }

    impl ScriptedSource {
        fn new() -> Self {
            Self {
                steps: Mutex::new(VecDeque::new()),
                reads: Mutex::new(0),
            }
        }

        fn then_text(self, text: &str) -> Self {
            self.steps
                .lock()
                .unwrap()
                .push_back(Step::Text(text.to_string()));
            self
        }

        fn then_fail(self, kind: io::ErrorKind) -> Self {
            self.steps.lock().unwrap().push_back(Step::Fail(kind));
            self
        }

        fn reads(&self) -> usize {
            *self.reads.lock().unwrap()
        }
    }

    impl TextSource for ScriptedSource {
        fn read_text(&self, _path: &Path) -> io::Result<String> {
            *self.reads.lock().unwrap() += 1;
            match self.steps.lock().unwrap().pop_front() {
                Some(Step::Text(text)) => Ok(text),
                Some(Step::Fail(kind)) => Err(io::Error::new(kind, "scripted failure")),
                None => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted")),
            }
        }
    }

    /// Handle whose path exists; the scripted source never touches it
    fn create_handle(dir: &tempfile::TempDir) -> SensorHandle {
        let path = dir.path().join("w1_slave");
        std::fs::write(&path, "").unwrap();
        SensorHandle::new(path).unwrap()
    }

    fn data_line(value: &str) -> String {
        format!(
            "62 01 4b 46 7f ff 0e 10 03 : crc=03 YES\n61 01 4b 46 7f ff 0f 10 02 t={}\n",
            value
        )
    }

    // --- parse_reading ---

    #[test]
    fn test_parse_well_formed() {
        assert_eq!(parse_reading(GOOD).unwrap().millidegrees(), 22062);
        assert_eq!(parse_reading(GOOD).unwrap().celsius(), 22.062);
    }

    #[test]
    fn test_parse_boundaries() {
        assert_eq!(parse_reading(&data_line("0")).unwrap().celsius(), 0.0);
        assert_eq!(parse_reading(&data_line("-5000")).unwrap().celsius(), -5.0);
        assert_eq!(parse_reading(&data_line("9500")).unwrap().celsius(), 9.5);
        assert_eq!(parse_reading(&data_line("125000")).unwrap().celsius(), 125.0);
        assert_eq!(parse_reading(&data_line("-10125")).unwrap().celsius(), -10.125);
    }

    #[test]
    fn test_parse_surrounding_whitespace() {
        let text = "  62 01 4b 46 7f ff 0e 10 03 : crc=03 YES  \r\n\t61 01 4b 46 7f ff 0f 10 02 t=21375 \r\n";
        assert_eq!(parse_reading(text).unwrap().millidegrees(), 21375);
    }

    #[test]
    fn test_parse_crc_failure() {
        assert!(matches!(
            parse_reading(BAD_CRC),
            Err(ReadingError::CrcCheckFailed(_))
        ));

        // Marker must be the trailing token
        let text = "62 01 4b 46 7f ff 0e 10 03 : YES crc=03\n61 01 t=22062\n";
        assert!(matches!(
            parse_reading(text),
            Err(ReadingError::CrcCheckFailed(_))
        ));
    }

    #[test]
    fn test_parse_too_few_lines() {
        assert_eq!(parse_reading(""), Err(ReadingError::TooFewLines(0)));
        assert_eq!(
            parse_reading("62 01 4b 46 7f ff 0e 10 03 : crc=03 YES\n"),
            Err(ReadingError::TooFewLines(1))
        );
    }

    #[test]
    fn test_parse_missing_field() {
        assert!(matches!(
            parse_reading(NO_FIELD),
            Err(ReadingError::MissingTemperature(_))
        ));

        let text = "62 01 4b 46 7f ff 0e 10 03 : crc=03 YES\n\n";
        assert!(matches!(
            parse_reading(text),
            Err(ReadingError::MissingTemperature(_))
        ));
    }

    #[test]
    fn test_parse_malformed_value() {
        assert_eq!(
            parse_reading(&data_line("2x062")),
            Err(ReadingError::MalformedTemperature("t=2x062".to_string()))
        );
        assert!(matches!(
            parse_reading(&data_line("")),
            Err(ReadingError::MalformedTemperature(_))
        ));
    }

    // --- retry protocol ---

    #[test]
    fn test_first_attempt_wins() {
        let dir = tempfile::tempdir().unwrap();
        let handle = create_handle(&dir);
        let source = ScriptedSource::new().then_text(GOOD).then_text(BAD_CRC);

        let reader = SensorReader::new(&source);
        let temperature = reader.read_temperature(&handle).unwrap();

        assert_eq!(temperature.celsius(), 22.062);
        assert_eq!(source.reads(), 1);
    }

    #[test]
    fn test_recovers_after_invalid_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let handle = create_handle(&dir);
        let source = ScriptedSource::new()
            .then_text(BAD_CRC)
            .then_text(NO_FIELD)
            .then_fail(io::ErrorKind::Interrupted)
            .then_text(&data_line("-5000"))
            .then_text(GOOD);

        let reader = SensorReader::new(&source);
        let temperature = reader.read_temperature(&handle).unwrap();

        assert_eq!(temperature.celsius(), -5.0);
        assert_eq!(source.reads(), 4);
    }

    #[test]
    fn test_fifth_attempt_still_counts() {
        let dir = tempfile::tempdir().unwrap();
        let handle = create_handle(&dir);
        let source = ScriptedSource::new()
            .then_text(BAD_CRC)
            .then_text(BAD_CRC)
            .then_text(BAD_CRC)
            .then_text(BAD_CRC)
            .then_text(GOOD);

        let reader = SensorReader::new(&source);
        assert_eq!(reader.read_temperature(&handle).unwrap().millidegrees(), 22062);
        assert_eq!(source.reads(), 5);
    }

    #[test]
    fn test_gives_up_after_five_invalid_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let handle = create_handle(&dir);
        let source = ScriptedSource::new()
            .then_text(BAD_CRC)
            .then_text(BAD_CRC)
            .then_text(BAD_CRC)
            .then_text(BAD_CRC)
            .then_text(NO_FIELD)
            .then_text(GOOD);

        let reader = SensorReader::new(&source);
        let err = reader.read_temperature(&handle).unwrap_err();

        match err {
            W1ThermError::ReadFailure { attempts, cause } => {
                assert_eq!(attempts, 5);
                assert!(matches!(
                    cause,
                    ReadFailureCause::Invalid(ReadingError::MissingTemperature(_))
                ));
            }
            other => panic!("Expected ReadFailure, got {:?}", other),
        }
        assert_eq!(source.reads(), 5);
    }

    #[test]
    fn test_unreadable_file_reported_as_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let handle = create_handle(&dir);
        let source = ScriptedSource::new();

        let reader = SensorReader::new(&source);
        let err = reader.read_temperature(&handle).unwrap_err();

        assert!(matches!(
            err,
            W1ThermError::ReadFailure {
                attempts: 5,
                cause: ReadFailureCause::Unreadable(_)
            }
        ));
        assert_eq!(source.reads(), 5);
    }

    #[test]
    fn test_repeated_reads_are_stable() {
        let dir = tempfile::tempdir().unwrap();
        let handle = create_handle(&dir);
        let source = ScriptedSource::new().then_text(GOOD).then_text(GOOD);

        let reader = SensorReader::new(&source);
        let first = reader.read_temperature(&handle).unwrap();
        let second = reader.read_temperature(&handle).unwrap();

        assert_eq!(first, second);
        assert_eq!(source.reads(), 2);
    }

    // --- handle ---

    #[test]
    fn test_handle_requires_existing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = SensorHandle::new(dir.path().join("w1_slave")).unwrap_err();
        assert!(matches!(err, W1ThermError::SensorNotFound(_)));
    }

    #[test]
    fn test_handle_reads_from_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w1_slave");
        std::fs::write(&path, GOOD).unwrap();

        let handle = SensorHandle::new(&path).unwrap();
        assert_eq!(handle.device_path(), path.as_path());
        assert!(handle.id().is_none());
        assert_eq!(handle.read_temperature().unwrap().celsius(), 22.062);
    }

    #[test]
    fn test_removed_device_surfaces_as_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w1_slave");
        std::fs::write(&path, GOOD).unwrap();

        let handle = SensorHandle::new(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            handle.read_temperature(),
            Err(W1ThermError::ReadFailure {
                cause: ReadFailureCause::Unreadable(_),
                ..
            })
        ));
    }

    #[test]
    fn test_default_reader_attempt_budget() {
        let reader: SensorReader = SensorReader::default();
        assert_eq!(reader.max_attempts(), 5);
    }
}
