//! md2qmd-export: Host integration for md2qmd
//!
//! The conversion itself lives in `md2qmd-core` and never touches the outside
//! world. This crate wires it to a host:
//!
//! - [`Host`]: the capabilities a host must provide (read the active
//!   document, choose a save path, write bytes, notify the user)
//! - [`export_active_document`]: the export workflow on top of a [`Host`]
//! - [`FileHost`]: a filesystem-backed host for a single Markdown file
//! - [`export_directory`]: parallel export of a whole directory of notes

pub mod batch;
pub mod export;
pub mod file_host;
pub mod host;

pub use batch::{BatchError, BatchOptions, BatchResult, export_directory};
pub use export::{ExportError, Exported, export_active_document};
pub use file_host::FileHost;
pub use host::{ActiveDocument, Host, Notice};
