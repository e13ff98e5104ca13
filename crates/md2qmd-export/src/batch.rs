//! Directory export
//!
//! Exports every Markdown file under a directory in parallel, mirroring the
//! directory layout under the output directory.

use chrono::{Local, NaiveDate};
use md2qmd_core::generate_filename;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::export::{Exported, MARKDOWN_EXTENSION, export_active_document};
use crate::file_host::FileHost;

/// Errors that prevent a batch from starting
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
}

/// Result type for batch operations
pub type Result<T> = std::result::Result<T, BatchError>;

/// Options for directory export
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Root of the output tree
    pub output_dir: PathBuf,
    /// Descend into subdirectories
    pub recursive: bool,
    /// Replace existing output files
    pub overwrite: bool,
    /// Date used in every generated filename
    pub today: NaiveDate,
    /// Number of parallel jobs (None = use all CPUs)
    pub parallel_jobs: Option<usize>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            recursive: false,
            overwrite: false,
            today: Local::now().date_naive(),
            parallel_jobs: None,
        }
    }
}

/// A file that was exported
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub input: PathBuf,
    #[serde(flatten)]
    pub exported: Exported,
}

/// A file that could not be exported
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub input: PathBuf,
    pub error: String,
}

/// Result of a directory export
#[derive(Debug, Default, Serialize)]
pub struct BatchResult {
    /// Successfully exported files, sorted by input path
    pub exported: Vec<BatchEntry>,
    /// Files that failed, sorted by input path
    pub failed: Vec<BatchFailure>,
}

impl BatchResult {
    /// Number of exported files that produced at least one warning
    pub fn warned_count(&self) -> usize {
        self.exported
            .iter()
            .filter(|e| !e.exported.warnings.is_empty())
            .count()
    }
}

/// A file scheduled for export
struct Planned {
    input: PathBuf,
    target_dir: PathBuf,
}

/// Export every Markdown file in `input`
pub fn export_directory(input: &Path, options: &BatchOptions) -> Result<BatchResult> {
    if !input.is_dir() {
        return Err(BatchError::DirectoryNotFound(input.to_path_buf()));
    }

    // Configure thread pool if specified
    if let Some(n) = options.parallel_jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let mut files = collect_markdown_files(input, options.recursive)?;
    files.sort();
    tracing::info!(count = files.len(), dir = %input.display(), "found Markdown files");

    let (planned, mut failed) = plan(input, files, options);

    let outcomes: Vec<_> = planned
        .par_iter()
        .map(|p| {
            let mut host =
                FileHost::new(&p.input, &p.target_dir).with_overwrite(options.overwrite);
            let outcome = export_active_document(&mut host, options.today);
            (p.input.clone(), outcome)
        })
        .collect();

    let mut exported = Vec::new();
    for (input, outcome) in outcomes {
        match outcome {
            Ok(e) => exported.push(BatchEntry { input, exported: e }),
            Err(e) => failed.push(BatchFailure {
                input,
                error: e.to_string(),
            }),
        }
    }

    exported.sort_by(|a, b| a.input.cmp(&b.input));
    failed.sort_by(|a, b| a.input.cmp(&b.input));

    Ok(BatchResult { exported, failed })
}

/// Assign each file its output directory, rejecting files whose generated
/// output path is already taken by an earlier file in the batch
fn plan(
    root: &Path,
    files: Vec<PathBuf>,
    options: &BatchOptions,
) -> (Vec<Planned>, Vec<BatchFailure>) {
    let mut targets: HashMap<PathBuf, PathBuf> = HashMap::new();
    let mut planned = Vec::new();
    let mut failed = Vec::new();

    for file in files {
        let relative_dir = file
            .parent()
            .and_then(|p| p.strip_prefix(root).ok())
            .unwrap_or(Path::new(""));
        let target_dir = options.output_dir.join(relative_dir);

        let title = FileHost::new(&file, &target_dir).title();
        let target = target_dir.join(generate_filename(&title, options.today));

        if let Some(first) = targets.get(&target) {
            failed.push(BatchFailure {
                error: format!(
                    "Output {} collides with the output of {}",
                    target.display(),
                    first.display()
                ),
                input: file,
            });
            continue;
        }

        targets.insert(target, file.clone());
        planned.push(Planned {
            input: file,
            target_dir,
        });
    }

    (planned, failed)
}

/// Collect all .md files in a directory
fn collect_markdown_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() {
            if let Some(ext) = path.extension()
                && ext.eq_ignore_ascii_case(MARKDOWN_EXTENSION)
            {
                files.push(path);
            }
        } else if path.is_dir() && recursive {
            files.extend(collect_markdown_files(&path, recursive)?);
        }
    }

    Ok(files)
}
