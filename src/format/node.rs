//! Render-node data model produced by the formatter.
//!
//! Nodes are plain data: they carry no styling and no UI handles, so any
//! presentation layer (terminal, HTML, native) can paint them.

use serde::{Deserialize, Serialize};

/// One chat message as stored in the message log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Arbitrary UTF-8 text, possibly containing copy-block and bold markup.
    pub text: String,
    /// Whether the user (rather than the assistant) sent the message.
    ///
    /// Only influences how bold runs are styled, never how text is parsed.
    pub is_user: bool,
}

impl RawMessage {
    /// A message typed by the user.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: true,
        }
    }

    /// A message produced by the assistant.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: false,
        }
    }
}

/// A styled run of text within one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    /// Text with markup delimiters removed.
    pub text: String,
    /// Whether the run was wrapped in `**`.
    pub bold: bool,
}

impl Run {
    /// An unstyled run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    /// A bold run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// One logical line of prose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpan {
    /// Ordered runs; never contains two adjacent runs with the same style.
    pub runs: Vec<Run>,
    /// Line starts with an enumerator or bullet and should be indented.
    pub is_list_item: bool,
}

impl LineSpan {
    /// Concatenated run text.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

/// One section of an analysis card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSection {
    /// Trimmed section text as captured between the markers.
    pub text: String,
    /// The same text run through the plain-line renderer.
    pub nodes: Vec<RenderNode>,
}

/// A presentation-agnostic piece of formatted chat output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderNode {
    /// Consecutive non-blank prose lines.
    Paragraph {
        /// Lines in source order.
        lines: Vec<LineSpan>,
    },
    /// Vertical space standing in for one blank source line.
    Spacer,
    /// One discrete copyable asset, e.g. an ad headline.
    CopyTile {
        /// Asset type taken from a recognised `Label:` prefix.
        label: Option<String>,
        /// The text placed on the clipboard.
        content: String,
    },
    /// Insight / Data / Action recommendation block.
    AnalysisCard {
        /// The one-sentence finding.
        insight: AnalysisSection,
        /// Supporting numbers.
        data: AnalysisSection,
        /// The instruction to carry out.
        action: AnalysisSection,
    },
}

impl RenderNode {
    /// Visible text of the node with markup removed.
    ///
    /// Paragraph lines and card sections are joined with `\n`; a labelled
    /// tile reads `Label: content`; a spacer is empty.
    pub fn visible_text(&self) -> String {
        match self {
            Self::Paragraph { lines } => lines
                .iter()
                .map(LineSpan::text)
                .collect::<Vec<_>>()
                .join("\n"),
            Self::Spacer => String::new(),
            Self::CopyTile { label, content } => match label {
                Some(label) => format!("{label}: {content}"),
                None => content.clone(),
            },
            Self::AnalysisCard {
                insight,
                data,
                action,
            } => [insight, data, action]
                .iter()
                .map(|section| section.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Whether this is a spacing marker.
    pub fn is_spacer(&self) -> bool {
        matches!(self, Self::Spacer)
    }
}

/// The formatter's output for one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedMessage {
    /// Copied from [`RawMessage::is_user`] for styling bold runs.
    pub is_user: bool,
    /// Nodes in order of appearance in the source text.
    pub nodes: Vec<RenderNode>,
}

impl FormattedMessage {
    /// Visible text of all non-spacer nodes, one node per line.
    pub fn visible_text(&self) -> String {
        self.nodes
            .iter()
            .filter(|node| !node.is_spacer())
            .map(RenderNode::visible_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Content of every copy tile, in order.
    pub fn copy_contents(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                RenderNode::CopyTile { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }
}
