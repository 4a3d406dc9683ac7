use crate::block::{Block, List, Span};
use crate::config::Config;

/// Document-wide settings emitted before any content.
pub fn preamble(config: &Config) -> String {
    let mut out = String::new();

    // Set up paragraph settings to prevent widows/orphans
    out.push_str("#set par(linebreaks: \"optimized\")\n");
    if config.page.numbers {
        out.push_str("#set page(numbering: \"1\")\n");
    }
    if config.font.sans {
        out.push_str("#set text(font: (\"DejaVu Sans\", \"Noto Sans CJK TC\"))\n");
    }
    out.push('\n');
    out
}

/// Convert blocks to Typst markup
pub fn blocks_to_typst(blocks: &[Block]) -> String {
    let mut out = String::new();

    let mut i = 0;
    while i < blocks.len() {
        let block = &blocks[i];

        match block {
            Block::Heading { .. } => {
                // Keep heading with following content using a block that prevents breaks
                out.push_str("#block(breakable: false)[\n");
                emit_block(block, &mut out);

                // Include the next block if it exists (to keep heading with first content)
                if i + 1 < blocks.len() {
                    i += 1;
                    emit_block(&blocks[i], &mut out);
                }
                out.push_str("]\n\n");
            }
            _ => {
                emit_block(block, &mut out);
            }
        }

        i += 1;
    }

    out
}

fn emit_block(block: &Block, out: &mut String) {
    match block {
        Block::Heading { level, content, .. } => {
            for _ in 0..*level {
                out.push('=');
            }
            out.push(' ');
            line_start_spans_to_typst(content, out);
            out.push_str("\n\n");
        }
        Block::List(list) => {
            // Wrap list to keep together when small, allow breaks when large
            if list.items.len() <= 5 {
                out.push_str("#block(breakable: false)[\n");
                list_to_typst(list, out);
                out.push_str("]\n\n");
            } else {
                list_to_typst(list, out);
                out.push('\n');
            }
        }
        Block::OrderedLine { content, .. } => {
            out.push_str("#pad(left: 1em)[#text(weight: \"medium\")[");
            line_start_spans_to_typst(content, out);
            out.push_str("]]\n\n");
        }
        Block::Paragraph { content, .. } => {
            line_start_spans_to_typst(content, out);
            out.push_str("\n\n");
        }
    }
}

fn list_to_typst(list: &List, out: &mut String) {
    for item in &list.items {
        out.push_str("- ");
        line_start_spans_to_typst(&item.content, out);
        out.push('\n');
    }
}

fn spans_to_typst(spans: &[Span], out: &mut String) {
    for span in spans {
        span_to_typst(span, out);
    }
}

/// Like [`spans_to_typst`] for content at the start of a markup line or item,
/// where a leading `=`, `-`, `+`, `/` or `1.` would otherwise turn into structure.
/// Empty bold spans render as nothing, so they do not count as the line start.
fn line_start_spans_to_typst(spans: &[Span], out: &mut String) {
    let start = spans
        .iter()
        .position(|span| !matches!(span, Span::Bold(inner) if inner.is_empty()))
        .unwrap_or(spans.len());

    match spans[start..].split_first() {
        Some((Span::Text(text), rest)) => {
            let body = text.trim_start();
            out.push_str(&text[..text.len() - body.len()]);
            let remainder = match leading_marker(body) {
                Some((marker, remainder)) => {
                    out.push_str("#\"");
                    out.push_str(marker);
                    out.push_str("\";");
                    remainder
                }
                None => body,
            };
            escape_text(remainder, out);
            spans_to_typst(rest, out);
        }
        _ => spans_to_typst(&spans[start..], out),
    }
}

fn leading_marker(text: &str) -> Option<(&str, &str)> {
    let digits = text.len() - text.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        return text[digits..]
            .starts_with('.')
            .then(|| text.split_at(digits + 1));
    }

    let first = text.chars().next()?;
    if matches!(first, '=' | '-' | '+' | '/') {
        let run = text.len() - text.trim_start_matches(first).len();
        return Some(text.split_at(run));
    }
    None
}

fn span_to_typst(span: &Span, out: &mut String) {
    match span {
        Span::Text(text) => escape_text(text, out),
        Span::Bold(inner) if inner.is_empty() => {}
        Span::Bold(inner) => {
            out.push('*');
            escape_text(inner, out);
            out.push('*');
        }
    }
}

/// Escape special Typst characters so text is rendered literally.
pub(crate) fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '/' | '~' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
}
