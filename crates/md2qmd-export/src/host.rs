//! Host capabilities
//!
//! Everything the export workflow needs from its environment, kept narrow so
//! the workflow can be driven by an editor plugin, a CLI, or a test double.

use std::io;
use std::path::{Path, PathBuf};

/// The document the user asked to export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDocument {
    /// Title used to derive the output filename
    pub title: String,
    /// File extension without the dot (e.g. `md`)
    pub extension: String,
    /// Raw document text
    pub text: String,
}

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A construct that needs manual conversion
    Warning(String),
    /// The export finished
    Success(String),
    /// The export did not happen
    Failure(String),
}

/// Capabilities a host provides to the export workflow
pub trait Host {
    /// Read the currently active document, `Ok(None)` if there is none
    fn read_active_document(&mut self) -> io::Result<Option<ActiveDocument>>;

    /// Pick where to save, starting from a suggested filename
    ///
    /// `None` means the user cancelled.
    fn choose_save_path(&mut self, suggested_name: &str) -> Option<PathBuf>;

    /// Persist the converted document
    ///
    /// An [`io::ErrorKind::AlreadyExists`] error reports a file the host
    /// refused to replace.
    fn write(&mut self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Show a message to the user
    fn notify(&mut self, notice: Notice);
}
