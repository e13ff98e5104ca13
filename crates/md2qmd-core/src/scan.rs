//! Compatibility scanning
//!
//! Detects constructs that have no automatic Quarto equivalent and reports
//! them as warnings. The body is never modified.
//!
//! | Category | Detected syntax |
//! |----------|-----------------|
//! | [`WarningKind::InternalLinks`] | `[[Note]]`, `[[Note\|alias]]`, `![[image.png]]` |
//! | [`WarningKind::DataviewBlock`] | ```` ```dataview ````, ```` ```dataviewjs ````, `~~~dataview` |
//!
//! At most one warning is produced per category, however many occurrences
//! the body contains. Warnings are ordered by category as listed above.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// Category of a non-convertible construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// Wiki-style links and embeds
    InternalLinks,
    /// Dataview query blocks
    DataviewBlock,
}

impl WarningKind {
    /// All categories, in reporting order
    pub const ALL: [WarningKind; 2] = [WarningKind::InternalLinks, WarningKind::DataviewBlock];

    fn message(self) -> &'static str {
        match self {
            WarningKind::InternalLinks => {
                "Internal links or embeds ([[...]] / ![[...]]) were found and need manual conversion to standard Markdown links or images."
            }
            WarningKind::DataviewBlock => {
                "Dataview code blocks were found; they will not execute in Quarto."
            }
        }
    }

    fn regex(self) -> &'static Regex {
        match self {
            WarningKind::InternalLinks => internal_link_regex(),
            WarningKind::DataviewBlock => dataview_regex(),
        }
    }
}

/// A human-readable note about content that could not be converted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn new(kind: WarningKind) -> Self {
        Self {
            kind,
            message: kind.message().to_string(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// `[[...]]` or `![[...]]` on a single line
static INTERNAL_LINK_REGEX: OnceLock<Regex> = OnceLock::new();

fn internal_link_regex() -> &'static Regex {
    INTERNAL_LINK_REGEX.get_or_init(|| {
        Regex::new(r"!?\[\[.+?\]\]").expect("Internal link regex should compile")
    })
}

/// Fence opener whose info string is `dataview` or `dataviewjs`
static DATAVIEW_REGEX: OnceLock<Regex> = OnceLock::new();

fn dataview_regex() -> &'static Regex {
    DATAVIEW_REGEX.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*(?:`{3,}|~{3,})[ \t]*dataview(?:js)?[ \t]*\r?$")
            .expect("Dataview regex should compile")
    })
}

/// Scan a body for constructs that need manual conversion
pub fn scan(body: &str) -> Vec<Warning> {
    let warnings: Vec<Warning> = WarningKind::ALL
        .into_iter()
        .filter(|kind| kind.regex().is_match(body))
        .map(Warning::new)
        .collect();

    tracing::debug!(count = warnings.len(), "compatibility scan finished");

    warnings
}
