//! Device Locator - maps sensor IDs to the driver's filesystem layout
//!
//! The kernel exposes one directory per attached slave under the bus root
//! (`/sys/bus/w1/devices` by default), named `<family-code>-<serial>`. A
//! DS18B20 with serial `000005e2fdc3` is readable at
//! `/sys/bus/w1/devices/28-000005e2fdc3/w1_slave`.

use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use w1therm_core::{DefaultFamily, Result, SensorFamily, SensorId, W1ThermError};

use crate::reader::SensorHandle;

/// Finds sensors of one family under a bus root directory
///
/// Only inspects the filesystem; never writes to it.
#[derive(Debug, Clone)]
pub struct Locator<F: SensorFamily = DefaultFamily> {
    bus_root: PathBuf,
    _family: PhantomData<F>,
}

impl Locator<DefaultFamily> {
    /// Create a locator for the default sensor family
    pub fn new(bus_root: impl Into<PathBuf>) -> Self {
        Self::for_family(bus_root)
    }
}

impl<F: SensorFamily> Locator<F> {
    /// Create a locator for a specific sensor family
    pub fn for_family(bus_root: impl Into<PathBuf>) -> Self {
        Self {
            bus_root: bus_root.into(),
            _family: PhantomData,
        }
    }

    /// Directory being scanned
    pub fn bus_root(&self) -> &Path {
        &self.bus_root
    }

    /// List the IDs of all attached sensors of this family
    ///
    /// An absent bus root means nothing is attached (or the bus master is
    /// not loaded) and yields an empty list. Entries that are not
    /// directories of this family, or whose serial is not lowercase hex, are
    /// skipped. Every returned ID resolves. The result is sorted.
    pub fn enumerate(&self) -> Result<Vec<SensorId>> {
        let entries = match std::fs::read_dir(&self.bus_root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(
                    "Bus root {} does not exist; is the one-wire bus master loaded?",
                    self.bus_root.display()
                );
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let Some(suffix) = F::id_from_dir_name(name) else {
                continue;
            };

            match SensorId::new(suffix) {
                // The kernel names devices in lowercase; anything else would
                // not resolve back to this directory
                Ok(id) if id.as_str() != suffix => {
                    debug!("Skipping {}: serial is not lowercase", name)
                }
                Ok(id) => {
                    debug!("Found {} {} at {}", F::NAME, id, entry.path().display());
                    ids.push(id);
                }
                Err(e) => debug!("Skipping {}: {}", name, e),
            }
        }

        ids.sort();
        Ok(ids)
    }

    /// Path of the data file for `id`, whether or not it exists
    pub fn device_path(&self, id: &SensorId) -> PathBuf {
        self.bus_root
            .join(F::device_dir_name(id.as_str()))
            .join(F::DATA_FILE)
    }

    /// Resolve a sensor to its data file
    ///
    /// With `None`, picks the first attached sensor in ID order.
    ///
    /// # Errors
    ///
    /// Returns `SensorNotFound` if the sensor's data file does not exist, or
    /// if no ID was given and no sensor is attached.
    pub fn resolve(&self, id: Option<&SensorId>) -> Result<PathBuf> {
        let (_, path) = self.resolve_with_id(id)?;
        Ok(path)
    }

    /// Resolve and bind a sensor handle
    ///
    /// # Errors
    ///
    /// Same as [`Locator::resolve`].
    pub fn open(&self, id: Option<&SensorId>) -> Result<SensorHandle> {
        let (id, path) = self.resolve_with_id(id)?;
        SensorHandle::bind(Some(id), path)
    }

    fn resolve_with_id(&self, id: Option<&SensorId>) -> Result<(SensorId, PathBuf)> {
        let id = match id {
            Some(id) => id.clone(),
            None => self.enumerate()?.into_iter().next().ok_or_else(|| {
                W1ThermError::SensorNotFound(format!(
                    "no {} device found in '{}'",
                    F::NAME,
                    self.bus_root.display()
                ))
            })?,
        };

        let path = self.device_path(&id);
        if !path.exists() {
            return Err(W1ThermError::SensorNotFound(format!(
                "{} ({})",
                F::device_dir_name(id.as_str()),
                path.display()
            )));
        }

        debug!("Resolved {} to {}", id, path.display());
        Ok((id, path))
    }
}
