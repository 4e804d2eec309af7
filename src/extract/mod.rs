//! Content extraction for problem descriptions
//!
//! Pure functions that turn the HTML `content` field of a detail payload into:
//! - a plain-text description
//! - an ordered list of example blocks
//! - an ordered list of constraint lines
//!
//! Content without recognizable labels is valid and yields empty lists.
//! Placeholder text for empty lists is a sink concern, see
//! `storage::PlaceholderSink`.

mod markup;
pub mod sections;

pub use markup::strip_markup;
pub use sections::{scan_labels, split_sections, Label, LabelKind, Section};

use regex::Regex;
use std::sync::LazyLock;

/// Constraint fragments must be longer than this many characters
const MIN_CONSTRAINT_LEN: usize = 3;

/// Line-break and list-item boundaries inside a constraints section
static CONSTRAINT_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?\s*>|<li(?:\s[^>]*)?>|</li\s*>").expect("valid regex")
});

/// Structured text extracted from one problem's content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedContent {
    pub description: String,
    pub examples: Vec<String>,
    pub constraints: Vec<String>,
}

/// Extracts description, examples and constraints from raw content
///
/// # Example
///
/// ```
/// use problem_harvest::extract::extract;
///
/// let html = "<p>Add two numbers.</p>\
///             <strong>Example 1:</strong><pre>Input: a = 1, b = 2</pre>\
///             <strong>Constraints:</strong><ul><li>-100 &lt;= a, b &lt;= 100</li></ul>";
/// let content = extract(html);
/// assert_eq!(content.examples, vec!["Input: a = 1, b = 2"]);
/// assert_eq!(content.constraints, vec!["-100 <= a, b <= 100"]);
/// ```
pub fn extract(html: &str) -> ExtractedContent {
    let labeled = sections::sections(html);

    ExtractedContent {
        description: strip_markup(html),
        examples: examples_from(&labeled),
        constraints: constraints_from(&labeled),
    }
}

/// Returns the stripped text of every `Example` section, in order
///
/// Each example runs up to the next label or the end of the content.
/// Sections that are empty after stripping are dropped.
pub fn extract_examples(html: &str) -> Vec<String> {
    examples_from(&sections::sections(html))
}

/// Returns the lines of the first `Constraints` section, in order
///
/// The section is split on `<br>` and list-item boundaries; fragments of
/// three characters or fewer after stripping are discarded.
pub fn extract_constraints(html: &str) -> Vec<String> {
    constraints_from(&sections::sections(html))
}

fn examples_from(labeled: &[Section<'_>]) -> Vec<String> {
    labeled
        .iter()
        .filter(|section| matches!(section.label.kind, LabelKind::Example(_)))
        .map(|section| strip_markup(section.body))
        .filter(|text| !text.is_empty())
        .collect()
}

fn constraints_from(labeled: &[Section<'_>]) -> Vec<String> {
    let Some(section) = labeled
        .iter()
        .find(|section| section.label.kind == LabelKind::Constraints)
    else {
        return Vec::new();
    };

    CONSTRAINT_SPLIT_RE
        .split(section.body)
        .map(strip_markup)
        .filter(|line| line.chars().count() > MIN_CONSTRAINT_LEN)
        .collect()
}
