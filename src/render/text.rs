//! Plain terminal rendering.

use crate::format::{AnalysisSection, FormattedMessage, LineSpan, RenderNode};

/// Indent applied to list lines.
pub const LIST_INDENT: &str = "  ";

/// Render a message as terminal text.
///
/// Bold runs are kept as `**…**` since the output carries no styling.
pub fn render(message: &FormattedMessage) -> String {
    let mut out = String::new();
    for node in &message.nodes {
        render_node(node, "", &mut out);
    }
    out
}

fn render_node(node: &RenderNode, indent: &str, out: &mut String) {
    match node {
        RenderNode::Paragraph { lines } => {
            for line in lines {
                out.push_str(indent);
                render_line(line, out);
                out.push('\n');
            }
        }
        RenderNode::Spacer => out.push('\n'),
        RenderNode::CopyTile { label, content } => {
            out.push_str(indent);
            out.push_str("[copy] ");
            if let Some(label) = label {
                out.push_str(label);
                out.push_str(": ");
            }
            out.push_str(content);
            out.push('\n');
        }
        RenderNode::AnalysisCard {
            insight,
            data,
            action,
        } => {
            render_section("Insight", insight, indent, out);
            render_section("Data", data, indent, out);
            render_section("Action", action, indent, out);
        }
    }
}

fn render_section(title: &str, section: &AnalysisSection, indent: &str, out: &mut String) {
    out.push_str(indent);
    out.push_str("== ");
    out.push_str(title);
    out.push('\n');
    let nested = format!("{indent}{LIST_INDENT}");
    for node in &section.nodes {
        render_node(node, &nested, out);
    }
}

fn render_line(line: &LineSpan, out: &mut String) {
    if line.is_list_item {
        out.push_str(LIST_INDENT);
    }
    for run in &line.runs {
        if run.bold {
            out.push_str("**");
            out.push_str(&run.text);
            out.push_str("**");
        } else {
            out.push_str(&run.text);
        }
    }
}
