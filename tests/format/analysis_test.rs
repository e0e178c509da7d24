//! Analysis-card detection through the public formatter.

use agencydesk::format::{
    parse, AnalysisSection, Formatter, FormatterConfig, MarkerAliases, RenderNode,
};

fn sections(node: &RenderNode) -> (&AnalysisSection, &AnalysisSection, &AnalysisSection) {
    match node {
        RenderNode::AnalysisCard {
            insight,
            data,
            action,
        } => (insight, data, action),
        other => panic!("expected analysis card, got {other:?}"),
    }
}

#[test]
fn three_markers_yield_exactly_one_card() {
    let nodes = parse(
        "**Insight:** CPA too high.\n**Data:** €50 vs target €15.\n**Action:** Pause keyword X.",
        false,
    );
    assert_eq!(nodes.len(), 1, "no stray paragraphs expected: {nodes:?}");

    let (insight, data, action) = sections(&nodes[0]);
    assert_eq!(insight.text, "CPA too high.");
    assert_eq!(data.text, "€50 vs target €15.");
    assert_eq!(action.text, "Pause keyword X.");
}

#[test]
fn insight_alone_falls_back_to_paragraph() {
    let nodes = parse("**Insight:** only this, no data or action section", false);
    assert_eq!(nodes.len(), 1);
    assert!(matches!(nodes[0], RenderNode::Paragraph { .. }));
    assert_eq!(
        nodes[0].visible_text(),
        "Insight: only this, no data or action section"
    );
}

#[test]
fn missing_action_falls_back_to_paragraph() {
    let nodes = parse("Insight: a\nData: b", false);
    assert!(nodes
        .iter()
        .all(|node| matches!(node, RenderNode::Paragraph { .. })));
}

#[test]
fn lowercase_markers_are_recognised() {
    let nodes = parse("insight: a\ndata: b\naction: c", true);
    assert_eq!(nodes.len(), 1);
    let (insight, _, action) = sections(&nodes[0]);
    assert_eq!(insight.text, "a");
    assert_eq!(action.text, "c");
}

#[test]
fn prose_around_card_keeps_order() {
    let nodes = parse(
        "Kurz zusammengefasst:\n\n**Insight:** a\n**Data:** b\n**Action:** c",
        false,
    );
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0].visible_text(), "Kurz zusammengefasst:");
    assert!(nodes[1].is_spacer());
    assert!(matches!(nodes[2], RenderNode::AnalysisCard { .. }));
}

#[test]
fn two_cards_in_one_message() {
    let text = "Insight: a\nData: b\nAction: c\n\nInsight: d\nData: e\nAction: f";
    let nodes = parse(text, false);
    assert_eq!(nodes.len(), 2);
    let (_, _, first_action) = sections(&nodes[0]);
    assert_eq!(first_action.text, "c");
    let (second_insight, _, _) = sections(&nodes[1]);
    assert_eq!(second_insight.text, "d");
}

#[test]
fn incomplete_card_before_complete_card_reverts_span() {
    let text = "Insight: draft\nno numbers yet\nInsight: a\nData: b\nAction: c";
    let nodes = parse(text, false);
    assert_eq!(nodes.len(), 1);
    assert!(matches!(nodes[0], RenderNode::Paragraph { .. }));
    assert_eq!(nodes[0].visible_text(), text);
}

#[test]
fn incomplete_card_after_complete_card_reverts_span() {
    let nodes = parse("Insight: a\nData: b\nAction: c\n\nInsight: d\nData: e", false);
    assert!(nodes
        .iter()
        .all(|node| matches!(node, RenderNode::Paragraph { .. } | RenderNode::Spacer)));
    let texts: Vec<String> = nodes.iter().map(RenderNode::visible_text).collect();
    assert_eq!(texts, vec!["Insight: a\nData: b\nAction: c", "", "Insight: d\nData: e"]);
}

#[test]
fn section_text_is_rendered_with_bold_and_lists() {
    let text = "**Insight:** a\n**Data:**\n- Cost **€466**\n- CPA €49\n**Action:** c";
    let nodes = parse(text, false);
    let (_, data, _) = sections(&nodes[0]);
    assert_eq!(data.text, "- Cost **€466**\n- CPA €49");

    let lines = match &data.nodes[..] {
        [RenderNode::Paragraph { lines }] => lines,
        other => panic!("expected one paragraph, got {other:?}"),
    };
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|line| line.is_list_item));
    assert!(lines[0].runs.iter().any(|run| run.bold && run.text == "€466"));
}

#[test]
fn custom_aliases_replace_defaults() {
    let config = FormatterConfig {
        markers: MarkerAliases {
            insight: vec!["befund".to_owned()],
            data: vec!["kennzahlen".to_owned()],
            action: vec!["empfehlung".to_owned()],
        },
        ..FormatterConfig::default()
    };
    let formatter = Formatter::new(&config).expect("aliases should compile");

    let custom = formatter.parse("Befund: a\nKennzahlen: b\nEmpfehlung: c");
    assert!(matches!(custom[..], [RenderNode::AnalysisCard { .. }]));

    let english = formatter.parse("Insight: a\nData: b\nAction: c");
    assert!(matches!(english[..], [RenderNode::Paragraph { .. }]));
}

#[test]
fn blank_alias_list_is_a_config_error() {
    let config = FormatterConfig {
        markers: MarkerAliases {
            action: Vec::new(),
            ..MarkerAliases::default()
        },
        ..FormatterConfig::default()
    };
    let err = Formatter::new(&config).expect_err("empty action aliases should be rejected");
    assert!(err.to_string().contains("action"));
}
