//! Event-stream to tree conversion.

use pulldown_cmark::{Alignment, CodeBlockKind, Event, Options, Parser, Tag};

use crate::{Block, Inline, MarkdownTree, TableAlignment};

/// Parse Markdown text into a [`MarkdownTree`].
pub fn parse(input: &str) -> MarkdownTree {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut builder = TreeBuilder::new();
    for event in Parser::new_ext(input, options) {
        builder.handle(event);
    }
    MarkdownTree {
        blocks: builder.finish(),
    }
}

enum Frame {
    Blocks {
        kind: BlockScope,
        blocks: Vec<Block>,
    },
    List {
        start: Option<u64>,
        items: Vec<Vec<Block>>,
    },
    Table {
        alignments: Vec<TableAlignment>,
        head: Vec<Vec<Inline>>,
        rows: Vec<Vec<Vec<Inline>>>,
        current_row: Vec<Vec<Inline>>,
        in_head: bool,
    },
    Inlines {
        kind: InlineScope,
        content: Vec<Inline>,
    },
    Code {
        info: String,
        literal: String,
    },
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum BlockScope {
    Root,
    Quote,
    Item,
}

enum InlineScope {
    Paragraph,
    /// Bare inline content inside a tight list item; closed implicitly.
    TightItem,
    Heading(u8),
    Emphasis,
    Strong,
    Strikethrough,
    Link { destination: String, title: String },
    Image { destination: String, title: String },
    TableCell,
}

struct TreeBuilder {
    stack: Vec<Frame>,
    pending_html: String,
}

impl TreeBuilder {
    fn new() -> Self {
        TreeBuilder {
            stack: vec![Frame::Blocks {
                kind: BlockScope::Root,
                blocks: Vec::new(),
            }],
            pending_html: String::new(),
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.push_inline(Inline::Code(code.into_string())),
            Event::Html(html) => self.html(&html),
            Event::SoftBreak => self.push_inline(Inline::SoftBreak),
            Event::HardBreak => self.push_inline(Inline::HardBreak),
            Event::Rule => {
                self.close_tight_item();
                self.flush_html();
                self.push_block(Block::Rule);
            }
            Event::TaskListMarker(checked) => self.push_inline(Inline::TaskMarker(checked)),
            Event::FootnoteReference(_) => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.close_tight_item();
                self.flush_html();
                self.push_frame(InlineScope::Paragraph);
            }
            Tag::Heading(level, _, _) => {
                self.close_tight_item();
                self.flush_html();
                self.push_frame(InlineScope::Heading(level as u8));
            }
            Tag::BlockQuote => {
                self.close_tight_item();
                self.flush_html();
                self.stack.push(Frame::Blocks {
                    kind: BlockScope::Quote,
                    blocks: Vec::new(),
                });
            }
            Tag::CodeBlock(kind) => {
                self.close_tight_item();
                self.flush_html();
                let info = match kind {
                    CodeBlockKind::Fenced(info) => info.into_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.stack.push(Frame::Code {
                    info,
                    literal: String::new(),
                });
            }
            Tag::List(start) => {
                self.close_tight_item();
                self.flush_html();
                self.stack.push(Frame::List {
                    start,
                    items: Vec::new(),
                });
            }
            Tag::Item => {
                self.stack.push(Frame::Blocks {
                    kind: BlockScope::Item,
                    blocks: Vec::new(),
                });
            }
            Tag::Table(alignments) => {
                self.close_tight_item();
                self.flush_html();
                let alignments = alignments.into_iter().map(convert_alignment).collect();
                self.stack.push(Frame::Table {
                    alignments,
                    head: Vec::new(),
                    rows: Vec::new(),
                    current_row: Vec::new(),
                    in_head: false,
                });
            }
            Tag::TableHead => {
                if let Some(Frame::Table { in_head, .. }) = self.stack.last_mut() {
                    *in_head = true;
                }
            }
            Tag::TableRow => {}
            Tag::TableCell => self.push_frame(InlineScope::TableCell),
            Tag::Emphasis => self.push_frame(InlineScope::Emphasis),
            Tag::Strong => self.push_frame(InlineScope::Strong),
            Tag::Strikethrough => self.push_frame(InlineScope::Strikethrough),
            Tag::Link(_, destination, title) => self.push_frame(InlineScope::Link {
                destination: destination.into_string(),
                title: title.into_string(),
            }),
            Tag::Image(_, destination, title) => self.push_frame(InlineScope::Image {
                destination: destination.into_string(),
                title: title.into_string(),
            }),
            Tag::FootnoteDefinition(_) => {}
        }
    }

    fn end(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph | Tag::Heading(..) => {
                if let Some(Frame::Inlines { kind, content }) = self.stack.pop() {
                    let block = match kind {
                        InlineScope::Heading(level) => Block::Heading { level, content },
                        _ => Block::Paragraph { content },
                    };
                    self.push_block(block);
                }
            }
            Tag::BlockQuote => {
                if let Some(Frame::Blocks { blocks, .. }) = self.stack.pop() {
                    self.push_block(Block::BlockQuote { blocks });
                }
            }
            Tag::CodeBlock(_) => {
                if let Some(Frame::Code { info, literal }) = self.stack.pop() {
                    self.push_block(Block::CodeBlock { info, literal });
                }
            }
            Tag::Item => {
                self.close_tight_item();
                if let Some(Frame::Blocks { blocks, .. }) = self.stack.pop() {
                    if let Some(Frame::List { items, .. }) = self.stack.last_mut() {
                        items.push(blocks);
                    }
                }
            }
            Tag::List(_) => {
                if let Some(Frame::List { start, items }) = self.stack.pop() {
                    self.push_block(Block::List { start, items });
                }
            }
            Tag::TableCell => {
                if let Some(Frame::Inlines { content, .. }) = self.stack.pop() {
                    if let Some(Frame::Table { current_row, .. }) = self.stack.last_mut() {
                        current_row.push(content);
                    }
                }
            }
            Tag::TableHead => {
                if let Some(Frame::Table {
                    head,
                    current_row,
                    in_head,
                    ..
                }) = self.stack.last_mut()
                {
                    *head = std::mem::take(current_row);
                    *in_head = false;
                }
            }
            Tag::TableRow => {
                if let Some(Frame::Table {
                    rows, current_row, ..
                }) = self.stack.last_mut()
                {
                    rows.push(std::mem::take(current_row));
                }
            }
            Tag::Table(_) => {
                if let Some(Frame::Table {
                    alignments,
                    head,
                    rows,
                    ..
                }) = self.stack.pop()
                {
                    self.push_block(Block::Table {
                        alignments,
                        head,
                        rows,
                    });
                }
            }
            Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link(..) | Tag::Image(..) => {
                if let Some(Frame::Inlines { kind, content }) = self.stack.pop() {
                    let inline = match kind {
                        InlineScope::Emphasis => Inline::Emphasis(content),
                        InlineScope::Strong => Inline::Strong(content),
                        InlineScope::Strikethrough => Inline::Strikethrough(content),
                        InlineScope::Link { destination, title } => Inline::Link {
                            destination,
                            title,
                            content,
                        },
                        InlineScope::Image { destination, title } => Inline::Image {
                            destination,
                            title,
                            content,
                        },
                        _ => return,
                    };
                    self.push_inline(inline);
                }
            }
            Tag::FootnoteDefinition(_) => {}
        }
    }

    fn text(&mut self, text: &str) {
        match self.stack.last_mut() {
            Some(Frame::Code { literal, .. }) => literal.push_str(text),
            _ => self.push_inline(Inline::Text(text.to_string())),
        }
    }

    fn html(&mut self, html: &str) {
        match self.stack.last_mut() {
            Some(Frame::Inlines { content, .. }) => content.push(Inline::Html(html.to_string())),
            Some(Frame::Code { literal, .. }) => literal.push_str(html),
            _ => {
                // Keep adjacent comment blocks apart: a completed comment
                // followed by a new one starts a fresh block.
                if self.pending_html.trim_end().ends_with("-->")
                    && html.trim_start().starts_with("<!--")
                {
                    self.flush_html();
                }
                self.pending_html.push_str(html);
            }
        }
    }

    /// Block-level HTML arrives as consecutive events, one per line; buffer
    /// them so a multi-line comment becomes a single block.
    fn flush_html(&mut self) {
        if self.pending_html.is_empty() {
            return;
        }
        let literal = std::mem::take(&mut self.pending_html);
        self.push_block(Block::HtmlBlock { literal });
    }

    fn push_frame(&mut self, kind: InlineScope) {
        self.stack.push(Frame::Inlines {
            kind,
            content: Vec::new(),
        });
    }

    fn push_inline(&mut self, inline: Inline) {
        match self.stack.last_mut() {
            Some(Frame::Inlines { content, .. }) => content.push(inline),
            Some(Frame::Blocks {
                kind: BlockScope::Item,
                ..
            }) => {
                // Tight list item: inline events arrive without a paragraph
                // wrapper. Open an implicit one.
                self.stack.push(Frame::Inlines {
                    kind: InlineScope::TightItem,
                    content: vec![inline],
                });
            }
            _ => {}
        }
    }

    fn close_tight_item(&mut self) {
        if matches!(
            self.stack.last(),
            Some(Frame::Inlines {
                kind: InlineScope::TightItem,
                ..
            })
        ) {
            if let Some(Frame::Inlines { content, .. }) = self.stack.pop() {
                self.push_block(Block::Paragraph { content });
            }
        }
    }

    fn push_block(&mut self, block: Block) {
        for frame in self.stack.iter_mut().rev() {
            if let Frame::Blocks { blocks, .. } = frame {
                blocks.push(block);
                return;
            }
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.close_tight_item();
        self.flush_html();
        while let Some(frame) = self.stack.pop() {
            if let Frame::Blocks {
                kind: BlockScope::Root,
                blocks,
            } = frame
            {
                return blocks;
            }
        }
        Vec::new()
    }
}

fn convert_alignment(alignment: Alignment) -> TableAlignment {
    match alignment {
        Alignment::None => TableAlignment::None,
        Alignment::Left => TableAlignment::Left,
        Alignment::Center => TableAlignment::Center,
        Alignment::Right => TableAlignment::Right,
    }
}
