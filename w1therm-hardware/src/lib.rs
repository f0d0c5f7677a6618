//! w1therm-hardware
//!
//! Filesystem-facing crate: finds DS18B20 sensors under the kernel's
//! one-wire device directory, reads validated samples from them, and checks
//! or loads the kernel modules that expose them.
//!
//! Public API:
//! - `locator::Locator`: enumerate sensor IDs and resolve them to data files
//! - `reader::SensorHandle` / `reader::SensorReader`: the retrying read protocol
//! - `source::TextSource`: where raw driver text comes from (real files or fakes)
//! - `kmod::SupportProvider` / `kmod::KernelModules`: kernel module prerequisites

pub mod kmod;
pub mod locator;
pub mod reader;
pub mod source;

pub use kmod::{KernelModules, SupportProvider};
pub use locator::Locator;
pub use reader::{parse_reading, SensorHandle, SensorReader};
pub use source::{FsTextSource, TextSource};
