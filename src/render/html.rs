//! HTML fragment rendering.
//!
//! Every piece of message text is escaped; only the tags written here
//! reach the output.

use crate::format::{AnalysisSection, FormattedMessage, LineSpan, RenderNode};

/// Escape special HTML characters in message text.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Class of `<strong>` runs, chosen by sender so bold reads on both bubble colours.
pub fn bold_class(is_user: bool) -> &'static str {
    if is_user {
        "bold-user"
    } else {
        "bold-assistant"
    }
}

/// Render a message as an HTML fragment.
pub fn render(message: &FormattedMessage) -> String {
    let mut out = String::from("<div class=\"message\">");
    for node in &message.nodes {
        render_node(node, message.is_user, &mut out);
    }
    out.push_str("</div>");
    out
}

fn render_node(node: &RenderNode, is_user: bool, out: &mut String) {
    match node {
        RenderNode::Paragraph { lines } => {
            out.push_str("<p>");
            for (idx, line) in lines.iter().enumerate() {
                if idx > 0 {
                    out.push_str("<br>");
                }
                render_line(line, is_user, out);
            }
            out.push_str("</p>");
        }
        RenderNode::Spacer => out.push_str("<div class=\"spacer\"></div>"),
        RenderNode::CopyTile { label, content } => {
            let content = escape_html(content);
            out.push_str(&format!("<div class=\"copy-tile\" data-copy=\"{content}\">"));
            if let Some(label) = label {
                out.push_str(&format!(
                    "<span class=\"copy-label\">{}</span>",
                    escape_html(label)
                ));
            }
            out.push_str(&format!("<span class=\"copy-content\">{content}</span></div>"));
        }
        RenderNode::AnalysisCard {
            insight,
            data,
            action,
        } => {
            out.push_str("<section class=\"analysis-card\">");
            render_section("insight", "Insight", insight, is_user, out);
            render_section("data", "Data", data, is_user, out);
            render_section("action", "Action", action, is_user, out);
            out.push_str("</section>");
        }
    }
}

fn render_section(
    class: &str,
    title: &str,
    section: &AnalysisSection,
    is_user: bool,
    out: &mut String,
) {
    out.push_str(&format!(
        "<div class=\"analysis-{class}\"><h4>{title}</h4>"
    ));
    for node in &section.nodes {
        render_node(node, is_user, out);
    }
    out.push_str("</div>");
}

fn render_line(line: &LineSpan, is_user: bool, out: &mut String) {
    if line.is_list_item {
        out.push_str("<span class=\"list-item\">");
    }
    for run in &line.runs {
        if run.bold {
            out.push_str(&format!(
                "<strong class=\"{}\">{}</strong>",
                bold_class(is_user),
                escape_html(&run.text)
            ));
        } else {
            out.push_str(&escape_html(&run.text));
        }
    }
    if line.is_list_item {
        out.push_str("</span>");
    }
}
