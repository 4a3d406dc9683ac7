use std::sync::OnceLock;

use regex::Regex;

use crate::block::Span;

static BOLD: OnceLock<Regex> = OnceLock::new();

/// Split a line into plain and bold spans.
///
/// The first `**` opens a bold run and the next `**` closes it; there is no
/// nesting and no escaping. An opener without a closer stays in the plain text.
pub fn format_inline(text: &str) -> Vec<Span> {
    let bold = BOLD.get_or_init(|| Regex::new(r"\*\*.*?\*\*").expect("Invalid bold regex"));

    let mut spans = Vec::new();
    let mut last = 0;
    for found in bold.find_iter(text) {
        push_text(&mut spans, &text[last..found.start()]);
        let inner = &found.as_str()[2..found.len() - 2];
        spans.push(Span::Bold(inner.to_string()));
        last = found.end();
    }
    push_text(&mut spans, &text[last..]);
    spans
}

fn push_text(spans: &mut Vec<Span>, text: &str) {
    if !text.is_empty() {
        spans.push(Span::Text(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Span {
        Span::Text(s.to_string())
    }

    fn bold(s: &str) -> Span {
        Span::Bold(s.to_string())
    }

    #[test]
    fn plain_line_is_one_span() {
        assert_eq!(format_inline("just words"), vec![text("just words")]);
    }

    #[test]
    fn empty_line_has_no_spans() {
        assert_eq!(format_inline(""), Vec::<Span>::new());
    }

    #[test]
    fn bold_in_the_middle() {
        assert_eq!(
            format_inline("a **b** c"),
            vec![text("a "), bold("b"), text(" c")]
        );
    }

    #[test]
    fn several_bold_runs() {
        assert_eq!(
            format_inline("**x** and **y**"),
            vec![bold("x"), text(" and "), bold("y")]
        );
    }

    #[test]
    fn non_greedy_match() {
        assert_eq!(
            format_inline("**a** b **c"),
            vec![bold("a"), text(" b **c")]
        );
    }

    #[test]
    fn dangling_opener_is_plain() {
        assert_eq!(format_inline("a **b"), vec![text("a **b")]);
        assert_eq!(format_inline("**"), vec![text("**")]);
    }

    #[test]
    fn single_asterisks_are_plain() {
        assert_eq!(format_inline("*a* b"), vec![text("*a* b")]);
    }

    #[test]
    fn multibyte_text_survives() {
        assert_eq!(
            format_inline("儲蓄率 **20%** 以上"),
            vec![text("儲蓄率 "), bold("20%"), text(" 以上")]
        );
    }
}
