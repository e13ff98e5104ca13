//! YAML frontmatter splitting
//!
//! A frontmatter block is only recognized at the very start of a document:
//!
//! ```text
//! ---
//! title: Example
//! ---
//! ```
//!
//! The block is treated as opaque text. It is never parsed or reformatted, so
//! whatever the author wrote is carried to the output byte-for-byte. Anything
//! that does not match exactly (an opening `---` further down, a missing
//! closing delimiter, no line break after the closing delimiter) is left in the
//! body untouched.

use regex::Regex;
use std::sync::OnceLock;

/// Opening delimiter, any number of lines, closing delimiter, line terminator.
static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX.get_or_init(|| {
        Regex::new(r"(?s)\A---\r?\n(?:.*?\r?\n)??---\r?\n")
            .expect("Frontmatter regex should compile")
    })
}

/// A document split into its frontmatter block and body
///
/// Both halves borrow from the original document, and
/// `frontmatter + body` always equals the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    /// The full block including both `---` lines and the trailing line
    /// terminator, or an empty string when no block was found
    pub frontmatter: &'a str,
    /// Everything after the frontmatter block
    pub body: &'a str,
}

impl Split<'_> {
    /// Whether a frontmatter block was recognized
    pub fn has_frontmatter(&self) -> bool {
        !self.frontmatter.is_empty()
    }
}

/// Split a document into frontmatter and body
///
/// Never fails: when no well-formed block sits at offset 0 the frontmatter is
/// empty and the body is the whole document.
pub fn split(document: &str) -> Split<'_> {
    match frontmatter_regex().find(document) {
        Some(m) => {
            let (frontmatter, body) = document.split_at(m.end());
            Split { frontmatter, body }
        }
        None => Split {
            frontmatter: "",
            body: document,
        },
    }
}
