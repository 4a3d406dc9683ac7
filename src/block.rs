/// Inline text spans with formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    Bold(String),
}

impl Span {
    /// The text carried by the span, without any formatting markers.
    pub fn text(&self) -> &str {
        match self {
            Span::Text(text) | Span::Bold(text) => text,
        }
    }
}

/// A single bullet item. `line` is the 0-based source line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub content: Vec<Span>,
    pub line: usize,
}

/// A run of contiguous bullet items. `line` is the source line of the first item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub items: Vec<ListItem>,
    pub line: usize,
}

/// Block-level elements parsed from a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: u8,
        content: Vec<Span>,
        line: usize,
    },
    List(List),
    /// A numbered line such as `1. Open an account`. Each one stands alone;
    /// consecutive numbered lines are not grouped into a list.
    OrderedLine {
        content: Vec<Span>,
        line: usize,
    },
    Paragraph {
        content: Vec<Span>,
        line: usize,
    },
}

impl Block {
    /// Source line the block starts on.
    pub fn line(&self) -> usize {
        match self {
            Block::Heading { line, .. }
            | Block::OrderedLine { line, .. }
            | Block::Paragraph { line, .. } => *line,
            Block::List(list) => list.line,
        }
    }
}
