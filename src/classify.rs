use std::sync::OnceLock;

use regex::Regex;

static ORDERED_PREFIX: OnceLock<Regex> = OnceLock::new();

/// What kind of block a trimmed line starts, with the text left to format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Heading { level: u8, text: &'a str },
    UnorderedItem(&'a str),
    /// Keeps the numeric prefix in its text.
    OrderedLine(&'a str),
    Paragraph(&'a str),
}

// Longest prefix first, otherwise "# " would swallow "## " and "### ".
const HEADING_PREFIXES: [(&str, u8); 3] = [("### ", 3), ("## ", 2), ("# ", 1)];

/// Classify a line that has already been trimmed.
pub fn classify(trimmed: &str) -> LineKind<'_> {
    if trimmed.is_empty() {
        return LineKind::Blank;
    }

    for (prefix, level) in HEADING_PREFIXES {
        if let Some(text) = trimmed.strip_prefix(prefix) {
            return LineKind::Heading { level, text };
        }
    }

    if let Some(text) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        return LineKind::UnorderedItem(text);
    }

    let ordered = ORDERED_PREFIX
        .get_or_init(|| Regex::new(r"^[0-9]+\.\s").expect("Invalid ordered line regex"));
    if ordered.is_match(trimmed) {
        return LineKind::OrderedLine(trimmed);
    }

    LineKind::Paragraph(trimmed)
}
