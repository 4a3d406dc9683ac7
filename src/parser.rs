use crate::block::{Block, List, ListItem};
use crate::classify::{LineKind, classify};
use crate::inline::format_inline;
use crate::lines::segment;

/// Parse report text into a list of blocks
pub fn parse(markdown: &str) -> Vec<Block> {
    let mut state = ParseState::default();

    for line in segment(markdown) {
        state.process_line(line.index, line.text.trim());
    }

    state.finish()
}

#[derive(Default)]
enum ListState {
    #[default]
    Idle,
    Accumulating {
        items: Vec<ListItem>,
        first_line: usize,
    },
}

#[derive(Default)]
struct ParseState {
    blocks: Vec<Block>,
    list: ListState,
}

impl ParseState {
    fn process_line(&mut self, index: usize, trimmed: &str) {
        match classify(trimmed) {
            LineKind::Blank => self.flush_list(),
            LineKind::Heading { level, text } => {
                self.flush_list();
                self.blocks.push(Block::Heading {
                    level,
                    content: format_inline(text),
                    line: index,
                });
            }
            LineKind::UnorderedItem(text) => {
                let item = ListItem {
                    content: format_inline(text),
                    line: index,
                };
                match &mut self.list {
                    ListState::Accumulating { items, .. } => items.push(item),
                    ListState::Idle => {
                        self.list = ListState::Accumulating {
                            items: vec![item],
                            first_line: index,
                        };
                    }
                }
            }
            LineKind::OrderedLine(text) => {
                self.flush_list();
                self.blocks.push(Block::OrderedLine {
                    content: format_inline(text),
                    line: index,
                });
            }
            LineKind::Paragraph(text) => {
                self.flush_list();
                self.blocks.push(Block::Paragraph {
                    content: format_inline(text),
                    line: index,
                });
            }
        }
    }

    /// Close any open bullet run and emit it as one list block.
    fn flush_list(&mut self) {
        if let ListState::Accumulating { items, first_line } = std::mem::take(&mut self.list) {
            self.blocks.push(Block::List(List {
                items,
                line: first_line,
            }));
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush_list();
        self.blocks
    }
}
