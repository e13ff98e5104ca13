//! End-to-end tests for the conversion pipeline

use chrono::NaiveDate;
use md2qmd_core::{WarningKind, convert, generate_filename, rewrite, split};

const NOTE: &str = "---
title: Weekly Review
tags: [review]
---
# Weekly Review

%%private: rewrite later%%
Progress was good.

> [!important] Deadline
> Ship by **Friday**.
>
> - item one

> A plain quote.

See [[Roadmap]] for details.
";

#[test]
fn test_full_note() {
    let result = convert(NOTE);

    insta::assert_snapshot!(result.document, @r"
---
title: Weekly Review
tags: [review]
---

# Weekly Review


Progress was good.


::: {.callout-important}
## Deadline
Ship by **Friday**.

- item one
:::


> A plain quote.

See [[Roadmap]] for details.
");

    let kinds: Vec<_> = result.warnings.iter().map(|w| w.kind).collect();
    assert_eq!(kinds, vec![WarningKind::InternalLinks]);
}

#[test]
fn test_frontmatter_bytes_survive() {
    let frontmatter = "---\r\ntitle:   'Spacing  kept'\r\n# a yaml comment\r\n---\r\n";
    let document = format!("{}> [!note]\r\n> body\r\n", frontmatter);

    let result = convert(&document);
    assert!(result.document.starts_with(frontmatter));
    assert_eq!(&result.document[frontmatter.len()..frontmatter.len() + 1], "\n");
}

#[test]
fn test_split_then_reassemble_matches_input() {
    for doc in [NOTE, "", "no frontmatter", "---\n---\n", "---\nopen only\n"] {
        let parts = split(doc);
        assert_eq!(format!("{}{}", parts.frontmatter, parts.body), doc);
    }
}

#[test]
fn test_all_warning_categories() {
    let result = convert(
        "```dataview\nTABLE rating\n```\n\n![[cover.png]]\n[[One]] [[Two]] [[Three]]\n",
    );
    let kinds: Vec<_> = result.warnings.iter().map(|w| w.kind).collect();
    assert_eq!(
        kinds,
        vec![WarningKind::InternalLinks, WarningKind::DataviewBlock]
    );
    // Detected constructs are left as they were
    assert!(result.document.contains("![[cover.png]]"));
    assert!(result.document.contains("```dataview\n"));
}

#[test]
fn test_rewrite_identity_on_plain_markdown() {
    let body = "## Notes\n\nParagraph with _emphasis_ and a [link](https://quarto.org).\n\n* a\n* b\n\n| a | b |\n|---|---|\n| 1 | 2 |\n";
    assert_eq!(rewrite(body), body);
}

#[test]
fn test_filename_for_note() {
    let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    assert_eq!(
        generate_filename("Weekly Review", today),
        "20240305-weekly-review.qmd"
    );
}
