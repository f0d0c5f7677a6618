//! Raw text access to driver pseudo-files
//!
//! The read protocol only needs "give me the current contents of this
//! file". Keeping that behind a trait lets the protocol be exercised
//! against scripted content instead of real device nodes.

use std::io;
use std::path::Path;

/// Source of driver text
///
/// Implementations must open, read and release the file on every call; the
/// driver regenerates the contents per open.
pub trait TextSource {
    /// Read the full contents of `path` as UTF-8 text
    fn read_text(&self, path: &Path) -> io::Result<String>;
}

/// Reads straight from the filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsTextSource;

impl TextSource for FsTextSource {
    fn read_text(&self, path: &Path) -> io::Result<String> {
        // File is opened and closed inside this call.
        std::fs::read_to_string(path)
    }
}

impl<T: TextSource + ?Sized> TextSource for &T {
    fn read_text(&self, path: &Path) -> io::Result<String> {
        (**self).read_text(path)
    }
}
