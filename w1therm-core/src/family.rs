//! Sensor family definitions
//!
//! The kernel one-wire subsystem names every slave device
//! `<family-code>-<serial>`, where the family code identifies the sensor
//! model. Each supported model implements [`SensorFamily`] with its
//! driver-facing characteristics.
//!
//! Note: actual filesystem I/O lives in the `w1therm-hardware` crate. This
//! module only carries model specifications.

/// Sensor model description
///
/// # Example
///
/// ```
/// use w1therm_core::family::{Ds18b20, SensorFamily};
///
/// assert_eq!(Ds18b20::FAMILY_CODE, "28");
/// assert_eq!(Ds18b20::device_dir_name("000005e2fdc3"), "28-000005e2fdc3");
/// ```
pub trait SensorFamily: Send + Sync + 'static {
    /// Human-readable model name
    const NAME: &'static str;

    /// Two-hex-digit one-wire family code
    const FAMILY_CODE: &'static str;

    /// Name of the data pseudo-file inside the device directory
    const DATA_FILE: &'static str;

    /// Kernel modules that must be loaded, bus master first
    const REQUIRED_MODULES: &'static [&'static str];

    /// Read attempts before giving up on a sample
    const READ_ATTEMPTS: usize;

    /// Directory name the driver uses for a sensor with the given serial
    fn device_dir_name(id: &str) -> String {
        format!("{}-{}", Self::FAMILY_CODE, id)
    }

    /// Extract the serial from a device directory name, if it belongs to
    /// this family
    fn id_from_dir_name(name: &str) -> Option<&str> {
        name.strip_prefix(Self::FAMILY_CODE)?.strip_prefix('-')
    }
}

/// Maxim DS18B20 programmable resolution thermometer
///
/// - Family code `28`
/// - Exposed by `w1-therm` as `w1_slave` under the bus device directory
/// - Needs the `w1-gpio` bus master and the `w1-therm` family driver
#[derive(Debug, Clone, Copy, Default)]
pub struct Ds18b20;

impl SensorFamily for Ds18b20 {
    const NAME: &'static str = "DS18B20";
    const FAMILY_CODE: &'static str = "28";
    const DATA_FILE: &'static str = "w1_slave";
    const REQUIRED_MODULES: &'static [&'static str] = &["w1-gpio", "w1-therm"];
    const READ_ATTEMPTS: usize = 5;
}

/// Default family used throughout the workspace
pub type DefaultFamily = Ds18b20;
