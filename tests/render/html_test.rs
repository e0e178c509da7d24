//! HTML adapter: escaping, sender styling and node markup.

use agencydesk::format::{format_message, RawMessage};
use agencydesk::render::html::{bold_class, escape_html, render};

#[test]
fn message_text_is_escaped() {
    let message = format_message(&RawMessage::assistant("<script>alert(\"x\")</script> & co"));
    let html = render(&message);
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; co"));
}

#[test]
fn bold_class_follows_sender() {
    let user = render(&format_message(&RawMessage::user("**wichtig**")));
    let assistant = render(&format_message(&RawMessage::assistant("**wichtig**")));
    assert!(user.contains(&format!("<strong class=\"{}\">wichtig</strong>", bold_class(true))));
    assert!(assistant.contains(&format!(
        "<strong class=\"{}\">wichtig</strong>",
        bold_class(false)
    )));
    assert_ne!(bold_class(true), bold_class(false));
}

#[test]
fn copy_tile_carries_escaped_clipboard_text() {
    let message = format_message(&RawMessage::assistant(
        "<copy_block><item>Headline: Spaß & \"Action\"</item></copy_block>",
    ));
    let html = render(&message);
    assert!(html.contains("data-copy=\"Spaß &amp; &quot;Action&quot;\""));
    assert!(html.contains("<span class=\"copy-label\">Headline</span>"));
}

#[test]
fn card_sections_appear_in_order() {
    let message = format_message(&RawMessage::assistant(
        "**Insight:** a\n**Data:** b\n**Action:** c",
    ));
    let html = render(&message);
    let insight = html.find("analysis-insight");
    let data = html.find("analysis-data");
    let action = html.find("analysis-action");
    assert!(insight.is_some() && data.is_some() && action.is_some());
    assert!(insight < data && data < action);
}

#[test]
fn paragraph_lines_use_breaks_and_lists_are_marked() {
    let html = render(&format_message(&RawMessage::assistant("Plan:\n1. Budget")));
    assert_eq!(
        html,
        "<div class=\"message\"><p>Plan:<br><span class=\"list-item\">1. Budget</span></p></div>"
    );
}

#[test]
fn escape_covers_ampersand_first() {
    assert_eq!(escape_html("&lt;"), "&amp;lt;");
}
