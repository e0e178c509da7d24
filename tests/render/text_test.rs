//! Terminal text adapter.

use agencydesk::format::{format_message, RawMessage};
use agencydesk::render::{render, text, OutputFormat};

#[test]
fn card_sections_are_headed_and_indented() {
    let message = format_message(&RawMessage::assistant(
        "**Insight:** CPA zu hoch\n**Data:**\n- €50\n**Action:** pausieren",
    ));
    assert_eq!(
        text::render(&message),
        "== Insight\n  CPA zu hoch\n== Data\n    - €50\n== Action\n  pausieren\n"
    );
}

#[test]
fn spacers_become_blank_lines() {
    let message = format_message(&RawMessage::user("a\n\nb"));
    assert_eq!(text::render(&message), "a\n\nb\n");
}

#[test]
fn bold_markers_survive_in_text_output() {
    let message = format_message(&RawMessage::user("**fett** und normal"));
    assert_eq!(text::render(&message), "**fett** und normal\n");
}

#[test]
fn output_format_parses_case_insensitively() {
    assert_eq!("HTML".parse::<OutputFormat>(), Ok(OutputFormat::Html));
    assert_eq!(" json ".parse::<OutputFormat>(), Ok(OutputFormat::Json));
    assert!("pdf".parse::<OutputFormat>().is_err());
}

#[test]
fn json_output_tags_node_types() {
    let message = format_message(&RawMessage::assistant(
        "<copy_block><item>CTA: Jetzt buchen</item></copy_block>",
    ));
    let json = render(&message, OutputFormat::Json).expect("json should render");
    let value: serde_json::Value = serde_json::from_str(&json).expect("output should be json");
    assert_eq!(value["is_user"], false);
    assert_eq!(value["nodes"][0]["type"], "copy_tile");
    assert_eq!(value["nodes"][0]["label"], "CTA");
    assert_eq!(value["nodes"][0]["content"], "Jetzt buchen");
}
