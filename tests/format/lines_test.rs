//! Plain-line rendering: paragraphs, spacers, lists and bold runs.

use agencydesk::format::lines::{is_list_item, parse_bold, render_lines};
use agencydesk::format::{parse, LineSpan, RenderNode, Run};

fn paragraph_lines(node: &RenderNode) -> &[LineSpan] {
    match node {
        RenderNode::Paragraph { lines } => lines,
        other => panic!("expected paragraph, got {other:?}"),
    }
}

#[test]
fn bold_runs_in_a_line() {
    assert_eq!(
        parse_bold("a **b** c"),
        vec![Run::plain("a "), Run::bold("b"), Run::plain(" c")]
    );
}

#[test]
fn list_markers_are_detected() {
    assert!(is_list_item("1. foo"));
    assert!(is_list_item("* foo"));
    assert!(is_list_item("- foo"));
    assert!(is_list_item("   10. foo"));
    assert!(!is_list_item("foo"));
    assert!(!is_list_item("-5% CPA"));
}

#[test]
fn list_flag_reaches_the_node() {
    let nodes = parse("Empfehlungen:\n1. Budget erhöhen\n2. Keyword pausieren", false);
    let lines = paragraph_lines(&nodes[0]);
    assert_eq!(
        lines.iter().map(|l| l.is_list_item).collect::<Vec<_>>(),
        vec![false, true, true]
    );
    assert_eq!(lines[1].text(), "1. Budget erhöhen");
}

#[test]
fn blank_lines_separate_paragraphs_with_spacers() {
    let nodes = render_lines("eins\nzwei\n\ndrei");
    assert_eq!(nodes.len(), 3);
    assert_eq!(paragraph_lines(&nodes[0]).len(), 2);
    assert!(nodes[1].is_spacer());
    assert_eq!(nodes[2].visible_text(), "drei");
}

#[test]
fn whitespace_only_message_is_only_spacers() {
    let nodes = parse(" \n\t\n", false);
    assert!(!nodes.is_empty());
    assert!(nodes.iter().all(RenderNode::is_spacer));
}

#[test]
fn odd_delimiters_render_literally() {
    let nodes = parse("**Achtung** Budget **fast leer", false);
    let lines = paragraph_lines(&nodes[0]);
    assert_eq!(
        lines[0].runs,
        vec![Run::bold("Achtung"), Run::plain(" Budget **fast leer")]
    );
}

#[test]
fn bold_does_not_span_lines() {
    let nodes = parse("**start\nend**", false);
    let lines = paragraph_lines(&nodes[0]);
    assert_eq!(lines[0].runs, vec![Run::plain("**start")]);
    assert_eq!(lines[1].runs, vec![Run::plain("end**")]);
}

#[test]
fn sender_does_not_change_nodes() {
    let text = "**Insight:** a\n**Data:** b\n**Action:** c\n- x";
    assert_eq!(parse(text, true), parse(text, false));
}
