//! Markup stripping
//!
//! Turns an HTML fragment into a single line of plain text. Only a fixed set
//! of entities is decoded; anything else is left as written.

use regex::Regex;
use std::sync::LazyLock;

/// Entities decoded by `strip_markup`, in lookup order
const ENTITIES: &[(&str, char)] = &[
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&amp;", '&'),
    ("&quot;", '"'),
    ("&#39;", '\''),
    ("&nbsp;", ' '),
];

/// A complete tag: a comment, a `<!...>`/`<?...>` declaration, or a known
/// element with `name=value` attributes only.
///
/// Bare words after the element name do not match, so decoded text such as
/// `a<b and c>d` is left alone.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<!--.*?-->|<[!?][^<>]*>|</?(?:a|abbr|b|big|blockquote|br|caption|center|cite|code|col|colgroup|dd|del|dfn|div|dl|dt|em|figcaption|figure|font|h[1-6]|hr|i|img|ins|kbd|li|mark|ol|p|pre|q|s|samp|section|small|span|strike|strong|sub|sup|table|tbody|td|tfoot|th|thead|tr|tt|u|ul|var)(?:\s+[a-z_:][-a-z0-9_:.]*\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+))*\s*/?>"#,
    )
    .expect("valid regex")
});

/// Strips tags, decodes entities and normalizes whitespace
///
/// Only complete tags are removed. A `<` that does not start one, as in
/// `1 <= n`, `i<j` or an unterminated `<div class="x`, is kept as text. A
/// stray `<` right before a tag and a stray `>` right after one are dropped
/// with it.
///
/// Passes are repeated until the text stops changing, so
/// `strip_markup(strip_markup(x)) == strip_markup(x)` always holds.
///
/// # Example
///
/// ```
/// use problem_harvest::extract::strip_markup;
///
/// let text = strip_markup("<p>Return <code>true</code> if 1 &lt;= n</p>");
/// assert_eq!(text, "Return true if 1 <= n");
/// ```
pub fn strip_markup(html: &str) -> String {
    let mut current = strip_once(html);
    // Each pass never grows the text, so this reaches a fixed point.
    loop {
        let next = strip_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// One pass: tags, then entities, then whitespace
fn strip_once(input: &str) -> String {
    let without_tags = remove_tags(input);
    let decoded = decode_entities(&without_tags);
    collapse_whitespace(&decoded)
}

fn remove_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last = 0;
    let mut after_tag = false;

    for tag in TAG_RE.find_iter(input) {
        let mut gap = &input[last..tag.start()];
        if after_tag {
            gap = gap.strip_prefix('>').unwrap_or(gap);
        }
        gap = gap.strip_suffix('<').unwrap_or(gap);

        out.push_str(gap);
        last = tag.end();
        after_tag = true;
    }

    let mut tail = &input[last..];
    if after_tag {
        tail = tail.strip_prefix('>').unwrap_or(tail);
    }
    out.push_str(tail);
    out
}

fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    'outer: while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos..];

        for (entity, replacement) in ENTITIES {
            if candidate.starts_with(entity) {
                out.push(*replacement);
                rest = &candidate[entity.len()..];
                continue 'outer;
            }
        }

        out.push('&');
        rest = &candidate[1..];
    }

    out.push_str(rest);
    out
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
