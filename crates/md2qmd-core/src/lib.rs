//! md2qmd-core: Core library for converting Markdown notes to Quarto Markdown
//!
//! This crate provides:
//! - Frontmatter splitting (the YAML block is carried through untouched)
//! - Compatibility scanning for constructs that need manual work
//! - Syntax rewriting (`%%comments%%`, `> [!type]` callouts)
//! - Output filename generation (`YYYYMMDD-slug.qmd`)
//!
//! Every operation is a pure, total text-to-text function.
//!
//! ## Example
//!
//! ```rust
//! use md2qmd_core::convert;
//!
//! let result = convert("---\ntitle: Demo\n---\n> [!tip] Try it\n> Works.\n");
//! assert!(result.document.starts_with("---\ntitle: Demo\n---\n"));
//! assert!(result.document.contains("::: {.callout-tip}"));
//! assert!(result.warnings.is_empty());
//! ```

pub mod convert;
pub mod filename;
pub mod frontmatter;
pub mod rewrite;
pub mod scan;

pub use convert::{ConversionResult, convert};
pub use filename::{generate_filename, slugify};
pub use frontmatter::{Split, split};
pub use rewrite::rewrite;
pub use scan::{Warning, WarningKind, scan};
