//! Filesystem-backed host
//!
//! Treats a single Markdown file as the active document and saves next to a
//! configured output directory.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::host::{ActiveDocument, Host, Notice};

/// A [`Host`] for one file on disk
#[derive(Debug, Clone)]
pub struct FileHost {
    input: PathBuf,
    title: Option<String>,
    output_dir: PathBuf,
    overwrite: bool,
    notices: Vec<Notice>,
}

impl FileHost {
    /// Host for `input`, saving into `output_dir`
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            title: None,
            output_dir: output_dir.into(),
            overwrite: false,
            notices: Vec::new(),
        }
    }

    /// Use an explicit title instead of the file stem
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Replace existing output files instead of refusing to save
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Every notice sent so far, in order
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Title of the document: the override, or the file stem
    pub fn title(&self) -> String {
        self.title.clone().unwrap_or_else(|| {
            self.input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }
}

impl Host for FileHost {
    fn read_active_document(&mut self) -> io::Result<Option<ActiveDocument>> {
        if !self.input.is_file() {
            return Ok(None);
        }

        let text = fs::read_to_string(&self.input)?;
        let extension = self
            .input
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Some(ActiveDocument {
            title: self.title(),
            extension,
            text,
        }))
    }

    fn choose_save_path(&mut self, suggested_name: &str) -> Option<PathBuf> {
        Some(self.output_dir.join(suggested_name))
    }

    fn write(&mut self, path: &Path, contents: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if self.overwrite {
            return fs::write(path, contents);
        }
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        file.write_all(contents)
    }

    /// Failures are only logged at debug level: the caller gets the same
    /// error back and reports it.
    fn notify(&mut self, notice: Notice) {
        let input = self.input.display();
        match &notice {
            Notice::Warning(message) => tracing::warn!(%input, "{}", message),
            Notice::Success(message) => tracing::info!(%input, "{}", message),
            Notice::Failure(message) => tracing::debug!(%input, "{}", message),
        }
        self.notices.push(notice);
    }
}
