//! Conversion pipeline
//!
//! split → scan (original body) → rewrite (body) → reassemble

use serde::Serialize;

use crate::frontmatter::split;
use crate::rewrite::rewrite;
use crate::scan::{Warning, scan};

/// Output of a single conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionResult {
    /// The converted Quarto Markdown document
    pub document: String,
    /// Constructs that need manual attention, one per category
    pub warnings: Vec<Warning>,
}

impl ConversionResult {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Convert a Markdown document to Quarto Markdown
///
/// The frontmatter block, when present, is copied verbatim and followed by a
/// single newline before the rewritten body. Warnings are computed on the
/// body as the author wrote it, before any rewriting.
pub fn convert(document: &str) -> ConversionResult {
    let parts = split(document);
    if parts.has_frontmatter() {
        tracing::debug!(bytes = parts.frontmatter.len(), "found frontmatter");
    }

    let warnings = scan(parts.body);
    let body = rewrite(parts.body);

    let document = if parts.has_frontmatter() {
        let mut output = String::with_capacity(parts.frontmatter.len() + 1 + body.len());
        output.push_str(parts.frontmatter);
        output.push('\n');
        output.push_str(&body);
        output
    } else {
        body
    };

    ConversionResult { document, warnings }
}
