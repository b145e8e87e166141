//! Deterministic Markdown renderer.
//!
//! Output is normalised: ATX headings, fenced code blocks, `-` bullets, one
//! blank line between blocks. Rendering the parse of rendered output yields
//! the same text, which keeps the optimizer pipeline idempotent end to end.

use crate::{Block, Inline, MarkdownTree, TableAlignment};

/// Render a tree to Markdown text. The result ends with a single newline
/// unless the tree is empty.
pub fn render(tree: &MarkdownTree) -> String {
    let rendered = render_blocks(&tree.blocks);
    if rendered.is_empty() {
        rendered
    } else {
        format!("{rendered}\n")
    }
}

fn render_blocks(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Heading { level, content } => {
            let marker = "#".repeat(usize::from(*level));
            format!("{marker} {}", render_inlines(content))
        }
        Block::Paragraph { content } => render_inlines(content),
        Block::CodeBlock { info, literal } => {
            let fence = code_fence(literal);
            let mut body = literal.clone();
            if !body.is_empty() && !body.ends_with('\n') {
                body.push('\n');
            }
            format!("{fence}{info}\n{body}{fence}")
        }
        Block::BlockQuote { blocks } => prefix_lines(&render_blocks(blocks), "> "),
        Block::List { start, items } => render_list(*start, items),
        Block::Table {
            alignments,
            head,
            rows,
        } => render_table(alignments, head, rows),
        Block::HtmlBlock { literal } => literal.trim_end_matches('\n').to_string(),
        Block::Rule => "---".to_string(),
    }
}

fn render_list(start: Option<u64>, items: &[Vec<Block>]) -> String {
    // A list renders tight when every item is a single paragraph; anything
    // richer gets blank lines between items.
    let tight = items
        .iter()
        .all(|item| item.len() == 1 && matches!(item[0], Block::Paragraph { .. }));
    let item_separator = if tight { "\n" } else { "\n\n" };

    let mut rendered_items = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let marker = match start {
            Some(first) => format!("{}. ", first + index as u64),
            None => "- ".to_string(),
        };
        let indent = " ".repeat(marker.len());
        let body = render_blocks(item);
        let mut lines = body.lines();
        let mut rendered = String::new();
        match lines.next() {
            Some(first_line) => {
                rendered.push_str(&marker);
                rendered.push_str(first_line);
            }
            None => rendered.push_str(marker.trim_end()),
        }
        for line in lines {
            rendered.push('\n');
            if line.is_empty() {
                continue;
            }
            rendered.push_str(&indent);
            rendered.push_str(line);
        }
        rendered_items.push(rendered);
    }
    rendered_items.join(item_separator)
}

fn render_table(
    alignments: &[TableAlignment],
    head: &[Vec<Inline>],
    rows: &[Vec<Vec<Inline>>],
) -> String {
    let mut out = String::new();
    out.push_str(&render_table_row(head));
    out.push('\n');
    let separators: Vec<String> = alignments
        .iter()
        .map(|alignment| match alignment {
            TableAlignment::None => "---".to_string(),
            TableAlignment::Left => ":--".to_string(),
            TableAlignment::Center => ":-:".to_string(),
            TableAlignment::Right => "--:".to_string(),
        })
        .collect();
    out.push_str(&format!("| {} |", separators.join(" | ")));
    for row in rows {
        out.push('\n');
        out.push_str(&render_table_row(row));
    }
    out
}

fn render_table_row(cells: &[Vec<Inline>]) -> String {
    let rendered: Vec<String> = cells
        .iter()
        .map(|cell| render_inlines(cell).replace('|', "\\|"))
        .collect();
    format!("| {} |", rendered.join(" | "))
}

fn render_inlines(content: &[Inline]) -> String {
    let mut out = String::new();
    for inline in content {
        match inline {
            Inline::Text(text) => out.push_str(text),
            Inline::Code(code) => out.push_str(&render_code_span(code)),
            Inline::Html(html) => out.push_str(html),
            Inline::SoftBreak => out.push('\n'),
            Inline::HardBreak => out.push_str("\\\n"),
            Inline::Emphasis(children) => {
                out.push('*');
                out.push_str(&render_inlines(children));
                out.push('*');
            }
            Inline::Strong(children) => {
                out.push_str("**");
                out.push_str(&render_inlines(children));
                out.push_str("**");
            }
            Inline::Strikethrough(children) => {
                out.push_str("~~");
                out.push_str(&render_inlines(children));
                out.push_str("~~");
            }
            Inline::Link {
                destination,
                title,
                content,
            } => {
                out.push('[');
                out.push_str(&render_inlines(content));
                out.push_str("](");
                out.push_str(destination);
                if !title.is_empty() {
                    out.push_str(&format!(" \"{title}\""));
                }
                out.push(')');
            }
            Inline::Image {
                destination,
                title,
                content,
            } => {
                out.push_str("![");
                out.push_str(&render_inlines(content));
                out.push_str("](");
                out.push_str(destination);
                if !title.is_empty() {
                    out.push_str(&format!(" \"{title}\""));
                }
                out.push(')');
            }
            Inline::TaskMarker(checked) => {
                out.push_str(if *checked { "[x] " } else { "[ ] " });
            }
        }
    }
    out
}

/// Pick a backtick fence longer than any run inside the span.
fn render_code_span(code: &str) -> String {
    let longest_run = longest_backtick_run(code);
    let fence = "`".repeat(longest_run + 1);
    if code.starts_with('`') || code.ends_with('`') {
        format!("{fence} {code} {fence}")
    } else {
        format!("{fence}{code}{fence}")
    }
}

fn code_fence(literal: &str) -> String {
    let longest_run = longest_backtick_run(literal);
    "`".repeat(longest_run.max(2) + 1)
}

fn longest_backtick_run(text: &str) -> usize {
    let mut longest = 0usize;
    let mut current = 0usize;
    for ch in text.chars() {
        if ch == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

fn prefix_lines(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                prefix.trim_end().to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn renders_heading_with_atx_marker() {
        let tree = parse("Setext Title\n============\n");
        assert_eq!(render(&tree), "# Setext Title\n");
    }

    #[test]
    fn renders_tight_and_loose_lists() {
        let tight = parse("- one\n- two\n");
        assert_eq!(render(&tight), "- one\n- two\n");

        let loose = parse("- one\n\n  more\n- two\n");
        let rendered = render(&loose);
        assert!(rendered.contains("- one\n\n  more"));
    }

    #[test]
    fn code_span_with_backticks_gets_longer_fence() {
        let tree = parse("a ``b ` c`` d\n");
        let rendered = render(&tree);
        assert!(rendered.contains("``b ` c``"));
    }

    #[test]
    fn block_quote_lines_are_prefixed() {
        let tree = parse("> first\n>\n> second\n");
        let rendered = render(&tree);
        assert_eq!(rendered, "> first\n>\n> second\n");
    }

    #[test]
    fn ordered_list_preserves_start() {
        let tree = parse("3. three\n4. four\n");
        assert_eq!(render(&tree), "3. three\n4. four\n");
    }
}
