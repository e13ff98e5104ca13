//! Syntax rewriting
//!
//! Two rules are applied, in this order:
//!
//! 1. `%%comment%%` spans (possibly spanning several lines) are removed.
//! 2. Callout blockquotes become Quarto callout divs:
//!
//! ```text
//! > [!warning]- Careful
//! > Body text
//! ```
//!
//! becomes
//!
//! ```text
//!
//! ::: {.callout-warning collapse="true"}
//! ## Careful
//! Body text
//! :::
//!
//! ```
//!
//! Comments are stripped first because callout detection is line-anchored and
//! must see the text as it will be emitted. Everything else passes through
//! unchanged.
//!
//! ## Block boundaries
//!
//! A callout extends over every following line that starts with `>`, so a
//! plain blockquote written directly under a callout is merged into it. A line
//! that is itself a callout header always starts a new callout. Nested
//! callouts (`> > [!tip]`) are only un-indented once and are not converted.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// `%%...%%`, non-greedy, across lines
static COMMENT_REGEX: OnceLock<Regex> = OnceLock::new();

fn comment_regex() -> &'static Regex {
    COMMENT_REGEX
        .get_or_init(|| Regex::new(r"(?s)%%.*?%%").expect("Comment regex should compile"))
}

/// `> [!type]` with an optional fold marker and title, on a single line
///
/// The type is word characters and hyphens only, so it always forms a valid
/// class name in the opener.
static CALLOUT_HEADER_REGEX: OnceLock<Regex> = OnceLock::new();

fn callout_header_regex() -> &'static Regex {
    CALLOUT_HEADER_REGEX.get_or_init(|| {
        Regex::new(r"^>[ \t]*\[![ \t]*([\w-]+)[ \t]*\]([+-]?)(.*)$")
            .expect("Callout header regex should compile")
    })
}

/// Collapsible state requested by a fold marker after the type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fold {
    /// `[!type]-`
    Collapsed,
    /// `[!type]+`
    Expanded,
}

/// Parsed first line of a callout
#[derive(Debug, Clone, PartialEq, Eq)]
struct CalloutHeader<'a> {
    kind: String,
    fold: Option<Fold>,
    title: &'a str,
}

impl CalloutHeader<'_> {
    fn write_opener(&self, output: &mut String) {
        output.push_str("\n::: {.callout-");
        output.push_str(&self.kind);
        match self.fold {
            Some(Fold::Collapsed) => output.push_str(" collapse=\"true\""),
            Some(Fold::Expanded) => output.push_str(" collapse=\"false\""),
            None => {}
        }
        output.push_str("}\n");

        if !self.title.is_empty() {
            output.push_str("## ");
            output.push_str(self.title);
            output.push('\n');
        }
    }
}

/// Apply all rewrite rules to a document body
pub fn rewrite(body: &str) -> String {
    let stripped = strip_comments(body);
    convert_callouts(&stripped)
}

/// Remove every `%%...%%` comment
pub fn strip_comments(text: &str) -> Cow<'_, str> {
    comment_regex().replace_all(text, "")
}

/// Convert `> [!type]` blockquotes to `::: {.callout-type}` divs
pub fn convert_callouts(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut lines = text.split_inclusive('\n').peekable();
    let mut converted = 0usize;

    while let Some(line) = lines.next() {
        let Some(header) = parse_header(line) else {
            output.push_str(line);
            continue;
        };

        header.write_opener(&mut output);

        while let Some(quoted) =
            lines.next_if(|next| next.starts_with('>') && parse_header(next).is_none())
        {
            output.push_str(unquote(quoted));
            if !quoted.ends_with('\n') {
                output.push('\n');
            }
        }

        output.push_str(":::\n\n");
        converted += 1;
    }

    if converted > 0 {
        tracing::debug!(converted, "converted callouts");
    }

    output
}

/// Parse a callout header line; `None` for anything else
fn parse_header(line: &str) -> Option<CalloutHeader<'_>> {
    let line = strip_line_terminator(line);
    let caps = callout_header_regex().captures(line)?;

    let kind = caps.get(1)?.as_str().to_lowercase();

    let fold = match caps.get(2).map(|m| m.as_str()) {
        Some("-") => Some(Fold::Collapsed),
        Some("+") => Some(Fold::Expanded),
        _ => None,
    };

    let title = caps.get(3).map_or("", |m| m.as_str().trim());

    Some(CalloutHeader { kind, fold, title })
}

/// Remove the leading `>` and at most one following space
fn unquote(line: &str) -> &str {
    let rest = line.strip_prefix('>').unwrap_or(line);
    rest.strip_prefix(' ').unwrap_or(rest)
}

fn strip_line_terminator(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
}
