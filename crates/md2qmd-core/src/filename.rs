//! Output filename generation
//!
//! Exported files are named `<YYYYMMDD>-<slug>.qmd`, e.g. a note titled
//! `"Hello, World!!"` exported on 2024-03-05 becomes
//! `20240305-hello-world.qmd`.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// Extension of every generated filename
pub const QMD_EXTENSION: &str = "qmd";

/// Slug used when nothing usable is left of the title
pub const FALLBACK_SLUG: &str = "untitled";

static SEPARATOR_REGEX: OnceLock<Regex> = OnceLock::new();
static NON_WORD_REGEX: OnceLock<Regex> = OnceLock::new();
static HYPHEN_RUN_REGEX: OnceLock<Regex> = OnceLock::new();

fn separator_regex() -> &'static Regex {
    SEPARATOR_REGEX
        .get_or_init(|| Regex::new(r"[\s_]+").expect("Separator regex should compile"))
}

fn non_word_regex() -> &'static Regex {
    NON_WORD_REGEX.get_or_init(|| Regex::new(r"[^\w-]+").expect("Non-word regex should compile"))
}

fn hyphen_run_regex() -> &'static Regex {
    HYPHEN_RUN_REGEX.get_or_init(|| Regex::new(r"-{2,}").expect("Hyphen regex should compile"))
}

/// Normalize a free-text title into a filename-safe slug
///
/// Returns an empty string when the title has no word characters; see
/// [`generate_filename`] for the fallback.
///
/// # Example
///
/// ```
/// use md2qmd_core::slugify;
///
/// assert_eq!(slugify("  My_Great  Note! "), "my-great-note");
/// assert_eq!(slugify("###"), "");
/// ```
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let hyphenated = separator_regex().replace_all(lowered.trim(), "-");
    let cleaned = non_word_regex().replace_all(&hyphenated, "");
    let collapsed = hyphen_run_regex().replace_all(&cleaned, "-");
    collapsed.trim_matches('-').to_string()
}

/// Build the output filename for a title exported on `today`
///
/// Total: any title, including an empty one, yields a valid name. The date
/// prefix is eight digits for years 0 through 9999; callers taking dates
/// from users should keep them in that range.
pub fn generate_filename(title: &str, today: NaiveDate) -> String {
    let slug = slugify(title);
    let slug = if slug.is_empty() {
        FALLBACK_SLUG
    } else {
        slug.as_str()
    };

    format!("{}-{}.{}", today.format("%Y%m%d"), slug, QMD_EXTENSION)
}
