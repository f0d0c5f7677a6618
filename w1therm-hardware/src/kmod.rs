//! Kernel module prerequisites
//!
//! Sensors only appear under the bus root once the one-wire bus master
//! (`w1-gpio`) and the family driver (`w1-therm`) are loaded. Checking and
//! loading them is kept behind [`SupportProvider`] so the read path never
//! depends on process spawning.

use std::io;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::process::Command;

use nix::unistd::{geteuid, Uid};
use tracing::{debug, info, warn};
use w1therm_core::api::ModuleStatus;
use w1therm_core::{DefaultFamily, Result, SensorFamily, W1ThermError};

/// Checks and activates the kernel support sensors depend on
pub trait SupportProvider {
    /// Load state of every required module
    fn module_status(&self) -> Result<Vec<ModuleStatus>>;

    /// Fail with `Prerequisite` naming the first required module that is
    /// not loaded
    fn check_required_support(&self) -> Result<()> {
        match self.module_status()?.into_iter().find(|m| !m.loaded) {
            Some(missing) => Err(W1ThermError::Prerequisite(format!(
                "\"{}\" kernel module is not loaded",
                missing.name
            ))),
            None => Ok(()),
        }
    }

    /// Ask the OS to load the required modules
    ///
    /// Needs root. Fails with `Prerequisite` on insufficient privilege or
    /// when a module cannot be loaded.
    fn load_required_support(&self) -> Result<()>;
}

/// Module names are reported with underscores but accepted by `modprobe`
/// either way
fn normalize(name: &str) -> String {
    name.replace('-', "_")
}

/// [`SupportProvider`] backed by procfs, sysfs and `modprobe`
///
/// Loading requires the process to run as root.
#[derive(Debug, Clone)]
pub struct KernelModules<F: SensorFamily = DefaultFamily> {
    proc_root: PathBuf,
    sys_root: PathBuf,
    modprobe: PathBuf,
    euid: fn() -> nix::Result<Uid>,
    _family: PhantomData<F>,
}

impl Default for KernelModules {
    fn default() -> Self {
        Self::new()
    }
}

impl KernelModules<DefaultFamily> {
    /// Provider for the default sensor family using the live system
    pub fn new() -> Self {
        Self::for_family()
    }
}

impl<F: SensorFamily> KernelModules<F> {
    /// Provider for a specific sensor family using the live system
    pub fn for_family() -> Self {
        Self {
            proc_root: PathBuf::from("/proc"),
            sys_root: PathBuf::from("/sys"),
            modprobe: PathBuf::from("modprobe"),
            euid: || Ok(geteuid()),
            _family: PhantomData,
        }
    }

    /// Read the module list from another procfs mount
    pub fn with_proc_root(mut self, proc_root: impl Into<PathBuf>) -> Self {
        self.proc_root = proc_root.into();
        self
    }

    /// Look for built-in modules under another sysfs mount
    pub fn with_sys_root(mut self, sys_root: impl Into<PathBuf>) -> Self {
        self.sys_root = sys_root.into();
        self
    }

    /// Program invoked to load a module
    pub fn with_modprobe(mut self, modprobe: impl Into<PathBuf>) -> Self {
        self.modprobe = modprobe.into();
        self
    }

    /// Source of the effective UID checked before loading modules
    pub fn with_euid(mut self, euid: fn() -> nix::Result<Uid>) -> Self {
        self.euid = euid;
        self
    }

    /// Names of modules currently listed in `/proc/modules`, normalized
    fn loaded_modules(&self) -> Result<Vec<String>> {
        let path = self.proc_root.join("modules");
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            // Kernels built without module support have no /proc/modules
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("{} not present", path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(content
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .map(normalize)
            .collect())
    }

    fn is_builtin(&self, module: &str) -> bool {
        self.sys_root.join("module").join(normalize(module)).is_dir()
    }

    fn is_root(&self) -> Result<bool> {
        let uid = (self.euid)().map_err(|e| {
            W1ThermError::Prerequisite(format!("cannot determine effective UID: {}", e))
        })?;
        debug!("Effective UID is {}", uid);
        Ok(uid.is_root())
    }

    fn modprobe(&self, module: &str) -> Result<()> {
        debug!("Running {} {}", self.modprobe.display(), module);

        let status = Command::new(&self.modprobe)
            .arg(module)
            .status()
            .map_err(|e| {
                W1ThermError::Prerequisite(format!(
                    "failed to run {}: {}",
                    self.modprobe.display(),
                    e
                ))
            })?;

        if !status.success() {
            warn!("{} {} exited with {}", self.modprobe.display(), module, status);
            return Err(W1ThermError::Prerequisite(format!(
                "failed to load \"{}\" kernel module",
                module
            )));
        }

        info!("Loaded kernel module {}", module);
        Ok(())
    }
}

impl<F: SensorFamily> SupportProvider for KernelModules<F> {
    fn module_status(&self) -> Result<Vec<ModuleStatus>> {
        let loaded = self.loaded_modules()?;

        Ok(F::REQUIRED_MODULES
            .iter()
            .map(|&name| ModuleStatus {
                name: name.to_string(),
                loaded: loaded.contains(&normalize(name)) || self.is_builtin(name),
            })
            .collect())
    }

    fn load_required_support(&self) -> Result<()> {
        let missing: Vec<String> = self
            .module_status()?
            .into_iter()
            .filter(|m| !m.loaded)
            .map(|m| m.name)
            .collect();

        if missing.is_empty() {
            info!("Required kernel modules already loaded");
            return Ok(());
        }

        if !self.is_root()? {
            return Err(W1ThermError::Prerequisite(
                "need root privileges to load kernel modules".to_string(),
            ));
        }

        for module in &missing {
            self.modprobe(module)?;
        }

        Ok(())
    }
}
