use std::fmt::Write;

use html_escape::encode_text_to_string;

use crate::block::{Block, Span};

/// Convert blocks to an HTML fragment. Each element gets a stable
/// `line-N` id taken from the source line it started on; a list wrapper
/// gets `list-N` so it never collides with its first item.
pub fn blocks_to_html(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        emit_block(block, &mut out);
    }
    out
}

fn emit_block(block: &Block, out: &mut String) {
    match block {
        Block::Heading {
            level,
            content,
            line,
        } => {
            let _ = write!(out, "<h{level} id=\"line-{line}\">");
            spans_to_html(content, out);
            let _ = writeln!(out, "</h{level}>");
        }
        Block::List(list) => {
            let _ = writeln!(out, "<ul id=\"list-{}\">", list.line);
            for item in &list.items {
                let _ = write!(out, "  <li id=\"line-{}\">", item.line);
                spans_to_html(&item.content, out);
                out.push_str("</li>\n");
            }
            out.push_str("</ul>\n");
        }
        Block::OrderedLine { content, line } => {
            let _ = write!(out, "<div class=\"ordered-line\" id=\"line-{line}\">");
            spans_to_html(content, out);
            out.push_str("</div>\n");
        }
        Block::Paragraph { content, line } => {
            let _ = write!(out, "<p id=\"line-{line}\">");
            spans_to_html(content, out);
            out.push_str("</p>\n");
        }
    }
}

fn spans_to_html(spans: &[Span], out: &mut String) {
    for span in spans {
        match span {
            Span::Text(text) => {
                encode_text_to_string(text, out);
            }
            Span::Bold(text) => {
                out.push_str("<strong>");
                encode_text_to_string(text, out);
                out.push_str("</strong>");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::markdown_to_html;
    use pretty_assertions::assert_eq;

    #[test]
    fn headings() {
        assert_eq!(
            markdown_to_html("# A\n## B\n### C"),
            "<h1 id=\"line-0\">A</h1>\n<h2 id=\"line-1\">B</h2>\n<h3 id=\"line-2\">C</h3>\n"
        );
    }

    #[test]
    fn list_items_keep_order() {
        assert_eq!(
            markdown_to_html("\n- one\n- **two**"),
            "<ul id=\"list-1\">\n  <li id=\"line-1\">one</li>\n  <li id=\"line-2\"><strong>two</strong></li>\n</ul>\n"
        );
    }

    #[test]
    fn element_ids_are_unique() {
        let html = markdown_to_html("# A\n- a\n- b\n1. c\n\n- d\ntext");
        let ids: Vec<&str> = html
            .split("id=\"")
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(ids.len(), 8);
        assert_eq!(unique.len(), ids.len(), "duplicate ids in {html}");
    }

    #[test]
    fn ordered_line() {
        assert_eq!(
            markdown_to_html("2. Review"),
            "<div class=\"ordered-line\" id=\"line-0\">2. Review</div>\n"
        );
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(
            markdown_to_html("a <b> & **<c>**"),
            "<p id=\"line-0\">a &lt;b&gt; &amp; <strong>&lt;c&gt;</strong></p>\n"
        );
    }

    #[test]
    fn empty_document() {
        assert_eq!(markdown_to_html(""), "");
    }
}
