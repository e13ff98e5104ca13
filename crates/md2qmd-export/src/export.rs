//! Export workflow
//!
//! read → convert → suggest filename → choose path → write, reporting every
//! outcome through [`Host::notify`].

use chrono::NaiveDate;
use md2qmd_core::{Warning, convert, generate_filename};
use serde::Serialize;
use std::io;
use std::path::PathBuf;

use crate::host::{Host, Notice};

/// Extension a document must have to be exported
pub const MARKDOWN_EXTENSION: &str = "md";

/// Errors that stop an export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No active document to export")]
    NoActiveDocument,

    #[error("Unsupported file type {0:?}: only Markdown (.md) files can be exported")]
    UnsupportedFileType(String),

    #[error("Failed to read the active document: {0}")]
    Read(#[source] io::Error),

    #[error("Export cancelled")]
    Cancelled,

    #[error("Output file already exists: {}", .0.display())]
    OutputExists(PathBuf),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A successfully written document
#[derive(Debug, Clone, Serialize)]
pub struct Exported {
    /// Where the document was written
    pub path: PathBuf,
    /// Constructs left for manual conversion
    pub warnings: Vec<Warning>,
}

/// Export the host's active document as Quarto Markdown
///
/// Warnings are sent to the host as they are found; the final success or
/// failure notice is sent once, after which the outcome is returned.
pub fn export_active_document<H: Host + ?Sized>(
    host: &mut H,
    today: NaiveDate,
) -> Result<Exported, ExportError> {
    let outcome = run_export(host, today);

    match &outcome {
        Ok(exported) => {
            tracing::debug!(path = %exported.path.display(), "export finished");
            host.notify(Notice::Success(format!(
                "Exported to {}",
                exported.path.display()
            )));
        }
        Err(e) => host.notify(Notice::Failure(e.to_string())),
    }

    outcome
}

fn run_export<H: Host + ?Sized>(host: &mut H, today: NaiveDate) -> Result<Exported, ExportError> {
    let document = host
        .read_active_document()
        .map_err(ExportError::Read)?
        .ok_or(ExportError::NoActiveDocument)?;

    if !document.extension.eq_ignore_ascii_case(MARKDOWN_EXTENSION) {
        return Err(ExportError::UnsupportedFileType(document.extension));
    }

    let result = convert(&document.text);
    for warning in &result.warnings {
        host.notify(Notice::Warning(warning.message.clone()));
    }

    let suggested = generate_filename(&document.title, today);
    let path = host
        .choose_save_path(&suggested)
        .ok_or(ExportError::Cancelled)?;

    host.write(&path, result.document.as_bytes())
        .map_err(|source| match source.kind() {
            io::ErrorKind::AlreadyExists => ExportError::OutputExists(path.clone()),
            _ => ExportError::Write {
                path: path.clone(),
                source,
            },
        })?;

    Ok(Exported {
        path,
        warnings: result.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ActiveDocument;
    use md2qmd_core::WarningKind;
    use std::path::Path;

    /// In-memory host recording everything the workflow does
    #[derive(Default)]
    struct MemoryHost {
        document: Option<ActiveDocument>,
        read_error: bool,
        cancel: bool,
        write_error: bool,
        exists: bool,
        suggested: Option<String>,
        written: Vec<(PathBuf, String)>,
        notices: Vec<Notice>,
    }

    impl MemoryHost {
        fn with_document(title: &str, extension: &str, text: &str) -> Self {
            Self {
                document: Some(ActiveDocument {
                    title: title.to_string(),
                    extension: extension.to_string(),
                    text: text.to_string(),
                }),
                ..Default::default()
            }
        }
    }

    impl Host for MemoryHost {
        fn read_active_document(&mut self) -> io::Result<Option<ActiveDocument>> {
            if self.read_error {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked"));
            }
            Ok(self.document.clone())
        }

        fn choose_save_path(&mut self, suggested_name: &str) -> Option<PathBuf> {
            self.suggested = Some(suggested_name.to_string());
            if self.cancel {
                None
            } else {
                Some(Path::new("vault/exports").join(suggested_name))
            }
        }

        fn write(&mut self, path: &Path, contents: &[u8]) -> io::Result<()> {
            if self.write_error {
                return Err(io::Error::other("disk full"));
            }
            if self.exists {
                return Err(io::Error::from(io::ErrorKind::AlreadyExists));
            }
            self.written.push((
                path.to_path_buf(),
                String::from_utf8(contents.to_vec()).unwrap(),
            ));
            Ok(())
        }

        fn notify(&mut self, notice: Notice) {
            self.notices.push(notice);
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn test_export_success() {
        let mut host = MemoryHost::with_document(
            "Project Plan",
            "md",
            "---\ntitle: Plan\n---\n> [!todo] Next\n> Write it\n",
        );

        let exported = export_active_document(&mut host, today()).unwrap();

        assert_eq!(host.suggested.as_deref(), Some("20240305-project-plan.qmd"));
        assert_eq!(
            exported.path,
            PathBuf::from("vault/exports/20240305-project-plan.qmd")
        );
        assert!(exported.warnings.is_empty());

        let (path, contents) = &host.written[0];
        assert_eq!(path, &exported.path);
        assert_eq!(
            contents,
            "---\ntitle: Plan\n---\n\n\n::: {.callout-todo}\n## Next\nWrite it\n:::\n\n"
        );

        assert_eq!(
            host.notices,
            vec![Notice::Success(
                "Exported to vault/exports/20240305-project-plan.qmd".to_string()
            )]
        );
    }

    #[test]
    fn test_warnings_are_notified_before_success() {
        let mut host = MemoryHost::with_document(
            "Links",
            "MD",
            "[[a]] ![[b.png]]\n```dataview\nLIST\n```\n",
        );

        let exported = export_active_document(&mut host, today()).unwrap();

        let kinds: Vec<_> = exported.warnings.iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            vec![WarningKind::InternalLinks, WarningKind::DataviewBlock]
        );
        assert_eq!(host.notices.len(), 3);
        assert!(matches!(host.notices[0], Notice::Warning(_)));
        assert!(matches!(host.notices[1], Notice::Warning(_)));
        assert!(matches!(host.notices[2], Notice::Success(_)));
    }

    #[test]
    fn test_no_active_document() {
        let mut host = MemoryHost::default();
        let err = export_active_document(&mut host, today()).unwrap_err();
        assert!(matches!(err, ExportError::NoActiveDocument));
        assert_eq!(
            host.notices,
            vec![Notice::Failure("No active document to export".to_string())]
        );
    }

    #[test]
    fn test_unsupported_file_type() {
        let mut host = MemoryHost::with_document("Board", "canvas", "{}");
        let err = export_active_document(&mut host, today()).unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFileType(ref ext) if ext == "canvas"));
        assert!(host.written.is_empty());
        assert!(host.suggested.is_none());
    }

    #[test]
    fn test_read_failure() {
        let mut host = MemoryHost {
            read_error: true,
            ..Default::default()
        };
        let err = export_active_document(&mut host, today()).unwrap_err();
        assert!(matches!(err, ExportError::Read(_)));
        assert!(err.to_string().contains("locked"));
    }

    #[test]
    fn test_cancelled() {
        let mut host = MemoryHost::with_document("Note", "md", "text");
        host.cancel = true;

        let err = export_active_document(&mut host, today()).unwrap_err();
        assert!(matches!(err, ExportError::Cancelled));
        assert!(host.written.is_empty());
        assert_eq!(
            host.notices.last(),
            Some(&Notice::Failure("Export cancelled".to_string()))
        );
    }

    #[test]
    fn test_existing_output_names_the_path() {
        let mut host = MemoryHost::with_document("Note", "md", "text");
        host.exists = true;

        let err = export_active_document(&mut host, today()).unwrap_err();
        assert!(
            matches!(err, ExportError::OutputExists(ref p) if p == Path::new("vault/exports/20240305-note.qmd"))
        );
        assert_eq!(
            host.notices.last(),
            Some(&Notice::Failure(
                "Output file already exists: vault/exports/20240305-note.qmd".to_string()
            ))
        );
    }

    #[test]
    fn test_write_failure() {
        let mut host = MemoryHost::with_document("Note", "md", "text");
        host.write_error = true;

        let err = export_active_document(&mut host, today()).unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
        assert_eq!(
            err.to_string(),
            "Failed to write vault/exports/20240305-note.qmd: disk full"
        );
        assert!(matches!(host.notices.last(), Some(Notice::Failure(_))));
    }
}
