//! Explicit tree traversal with visitor-controlled descent.

use crate::{Block, Inline};

/// Traversal directive returned by visitor callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisitOutcome {
    /// Descend into the node's children.
    Continue,
    /// Skip this node's children, continue with its siblings.
    SkipChildren,
    /// Abort the whole traversal.
    Stop,
}

/// Read-only visitor over blocks and inlines.
pub trait Visitor {
    fn block(&mut self, _block: &Block) -> VisitOutcome {
        VisitOutcome::Continue
    }

    fn inline(&mut self, _inline: &Inline) -> VisitOutcome {
        VisitOutcome::Continue
    }
}

/// Walk `blocks` in document order. Returns [`VisitOutcome::Stop`] when a
/// callback stopped the traversal, [`VisitOutcome::Continue`] otherwise.
pub fn walk<V: Visitor>(blocks: &[Block], visitor: &mut V) -> VisitOutcome {
    for block in blocks {
        match visitor.block(block) {
            VisitOutcome::Stop => return VisitOutcome::Stop,
            VisitOutcome::SkipChildren => continue,
            VisitOutcome::Continue => {}
        }
        let descended = match block {
            Block::Heading { content, .. } | Block::Paragraph { content } => {
                walk_inlines(content, visitor)
            }
            Block::BlockQuote { blocks } => walk(blocks, visitor),
            Block::List { items, .. } => {
                let mut outcome = VisitOutcome::Continue;
                for item in items {
                    if walk(item, visitor) == VisitOutcome::Stop {
                        outcome = VisitOutcome::Stop;
                        break;
                    }
                }
                outcome
            }
            Block::Table { head, rows, .. } => {
                let mut outcome = VisitOutcome::Continue;
                'table: {
                    for cell in head {
                        if walk_inlines(cell, visitor) == VisitOutcome::Stop {
                            outcome = VisitOutcome::Stop;
                            break 'table;
                        }
                    }
                    for row in rows {
                        for cell in row {
                            if walk_inlines(cell, visitor) == VisitOutcome::Stop {
                                outcome = VisitOutcome::Stop;
                                break 'table;
                            }
                        }
                    }
                }
                outcome
            }
            Block::CodeBlock { .. } | Block::HtmlBlock { .. } | Block::Rule => {
                VisitOutcome::Continue
            }
        };
        if descended == VisitOutcome::Stop {
            return VisitOutcome::Stop;
        }
    }
    VisitOutcome::Continue
}

/// Walk inline nodes, descending into nested containers.
pub fn walk_inlines<V: Visitor>(content: &[Inline], visitor: &mut V) -> VisitOutcome {
    for inline in content {
        match visitor.inline(inline) {
            VisitOutcome::Stop => return VisitOutcome::Stop,
            VisitOutcome::SkipChildren => continue,
            VisitOutcome::Continue => {}
        }
        let children = match inline {
            Inline::Emphasis(children)
            | Inline::Strong(children)
            | Inline::Strikethrough(children) => Some(children),
            Inline::Link { content, .. } | Inline::Image { content, .. } => Some(content),
            _ => None,
        };
        if let Some(children) = children {
            if walk_inlines(children, visitor) == VisitOutcome::Stop {
                return VisitOutcome::Stop;
            }
        }
    }
    VisitOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    struct Counter {
        blocks: usize,
        inlines: usize,
        stop_on_heading: bool,
        skip_quotes: bool,
    }

    impl Visitor for Counter {
        fn block(&mut self, block: &Block) -> VisitOutcome {
            self.blocks += 1;
            if self.stop_on_heading && matches!(block, Block::Heading { .. }) {
                return VisitOutcome::Stop;
            }
            if self.skip_quotes && matches!(block, Block::BlockQuote { .. }) {
                return VisitOutcome::SkipChildren;
            }
            VisitOutcome::Continue
        }

        fn inline(&mut self, _inline: &Inline) -> VisitOutcome {
            self.inlines += 1;
            VisitOutcome::Continue
        }
    }

    #[test]
    fn stop_halts_traversal() {
        let tree = parse("first\n\n# Heading\n\nnever visited\n");
        let mut counter = Counter {
            blocks: 0,
            inlines: 0,
            stop_on_heading: true,
            skip_quotes: false,
        };
        assert_eq!(walk(&tree.blocks, &mut counter), VisitOutcome::Stop);
        assert_eq!(counter.blocks, 2);
    }

    #[test]
    fn skip_children_prunes_subtree() {
        let tree = parse("> quoted *text*\n\nplain\n");
        let mut counter = Counter {
            blocks: 0,
            inlines: 0,
            stop_on_heading: false,
            skip_quotes: true,
        };
        walk(&tree.blocks, &mut counter);
        // Quote and outer paragraph counted; the quoted paragraph and its
        // inlines are pruned.
        assert_eq!(counter.blocks, 2);
        assert_eq!(counter.inlines, 1);
    }
}
