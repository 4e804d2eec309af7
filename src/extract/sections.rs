//! Section label tokenizer
//!
//! Problem content marks its sections with bold labels such as
//! `<strong class="example">Example 1:</strong>` or
//! `<strong>Constraints:</strong>`. Extraction works in two steps:
//!
//! 1. `scan_labels` finds every label and its byte range
//! 2. `split_sections` slices the content between each label and the next
//!    label of any kind (or the end of the content)
//!
//! The nearest following label always closes a section, whatever its kind.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Matches a bold label whose entire text is one of the known section names
/// followed by a colon, either inside or directly after the closing tag.
static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        <(?:strong|b)(?:\s[^>]*)?>
        (?:\s|&nbsp;)*
        (?:
            (?P<example>example)(?:\s*(?P<number>\d+))?
          | (?P<constraints>constraints)
          | (?P<note>notes?)
          | (?P<follow>follow(?:\s|-)*up)
        )
        (?:
            (?:\s|&nbsp;)*:(?:\s|&nbsp;)*</(?:strong|b)\s*>
          | (?:\s|&nbsp;)*</(?:strong|b)\s*>(?:\s|&nbsp;)*:
        )",
    )
    .expect("valid regex")
});

/// Kind of section a label introduces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    /// `Example N:`; the number is absent for a lone `Example:`
    Example(Option<u32>),
    Constraints,
    Note,
    FollowUp,
}

/// A label found in the content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
    pub kind: LabelKind,
    /// Byte offset where the label markup starts
    pub start: usize,
    /// Byte offset just past the label markup
    pub end: usize,
}

/// A labeled slice of the content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    pub label: Label,
    /// Raw markup between this label and the next one
    pub body: &'a str,
}

/// Finds all section labels in document order
pub fn scan_labels(html: &str) -> Vec<Label> {
    LABEL_RE
        .captures_iter(html)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(Label {
                kind: label_kind(&caps)?,
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

fn label_kind(caps: &Captures<'_>) -> Option<LabelKind> {
    if caps.name("example").is_some() {
        let number = caps
            .name("number")
            .and_then(|m| m.as_str().parse::<u32>().ok());
        Some(LabelKind::Example(number))
    } else if caps.name("constraints").is_some() {
        Some(LabelKind::Constraints)
    } else if caps.name("note").is_some() {
        Some(LabelKind::Note)
    } else if caps.name("follow").is_some() {
        Some(LabelKind::FollowUp)
    } else {
        None
    }
}

/// Slices `html` into labeled sections using the given labels
///
/// `labels` must be in document order, as returned by `scan_labels`.
pub fn split_sections<'a>(html: &'a str, labels: &[Label]) -> Vec<Section<'a>> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let stop = labels
                .get(i + 1)
                .map(|next| next.start)
                .unwrap_or(html.len());
            Section {
                label: *label,
                body: &html[label.end..stop],
            }
        })
        .collect()
}

/// Scans and slices in one call
pub fn sections(html: &str) -> Vec<Section<'_>> {
    let labels = scan_labels(html);
    split_sections(html, &labels)
}
