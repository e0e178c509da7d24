//! Plain-line renderer: blank-line spacing, list detection and bold runs.

use super::node::{LineSpan, RenderNode, Run};

/// Bold delimiter.
pub const BOLD_DELIMITER: &str = "**";

/// Render prose into paragraphs separated by spacers.
///
/// Consecutive non-blank lines form one [`RenderNode::Paragraph`]; every
/// blank line becomes one [`RenderNode::Spacer`]. A single trailing line
/// break does not produce a blank line.
pub fn render_lines(text: &str) -> Vec<RenderNode> {
    let mut nodes = Vec::new();
    let mut paragraph: Vec<LineSpan> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            flush_paragraph(&mut paragraph, &mut nodes);
            nodes.push(RenderNode::Spacer);
        } else {
            paragraph.push(parse_line(line));
        }
    }
    flush_paragraph(&mut paragraph, &mut nodes);

    nodes
}

fn flush_paragraph(paragraph: &mut Vec<LineSpan>, nodes: &mut Vec<RenderNode>) {
    if !paragraph.is_empty() {
        nodes.push(RenderNode::Paragraph {
            lines: std::mem::take(paragraph),
        });
    }
}

/// Parse a single non-blank line.
pub fn parse_line(line: &str) -> LineSpan {
    LineSpan {
        runs: parse_bold(line),
        is_list_item: is_list_item(line),
    }
}

/// Whether a line opens with `1.`, `*`, `-` or `•` followed by whitespace.
///
/// Leading indentation is ignored. A bare enumerator such as `3.` counts.
pub fn is_list_item(line: &str) -> bool {
    let trimmed = line.trim_start();

    let digits = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    if digits > 0 {
        return trimmed
            .get(digits..)
            .and_then(|rest| rest.strip_prefix('.'))
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace));
    }

    let mut chars = trimmed.chars();
    match chars.next() {
        Some('*' | '-' | '•') => chars.next().is_some_and(char::is_whitespace),
        _ => false,
    }
}

/// Split a line into alternating plain and bold runs.
///
/// Delimiters pair up left to right. An unmatched `**` is kept literally
/// together with the rest of the line; an empty pair yields no run.
pub fn parse_bold(line: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut rest = line;

    while let Some((before, after_open)) = rest.split_once(BOLD_DELIMITER) {
        let Some((inner, after_close)) = after_open.split_once(BOLD_DELIMITER) else {
            break;
        };
        push_run(&mut runs, before, false);
        push_run(&mut runs, inner, true);
        rest = after_close;
    }
    push_run(&mut runs, rest, false);

    runs
}

fn push_run(runs: &mut Vec<Run>, text: &str, bold: bool) {
    if text.is_empty() {
        return;
    }
    match runs.last_mut() {
        Some(last) if last.bold == bold => last.text.push_str(text),
        _ => runs.push(Run {
            text: text.to_owned(),
            bold,
        }),
    }
}
