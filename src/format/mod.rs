//! Chat-message formatter.
//!
//! Turns one raw message into an ordered list of [`RenderNode`]s:
//!
//! 1. [`segment`] splits the text into prose and `<copy_block>` spans.
//! 2. [`copy_block`] turns each `<item>` of a block into a copy tile.
//! 3. [`analysis`] finds Insight / Data / Action cards in prose.
//! 4. [`lines`] renders everything else as paragraphs, list lines and bold runs.
//!
//! Formatting is a total function: every detection step falls back to
//! rendering the text as prose, so no input produces an error.

pub mod analysis;
pub mod copy_block;
pub mod lines;
pub mod node;
pub mod segment;

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

pub use analysis::{AnalysisMarkers, MarkerAliases, MarkerError};
pub use copy_block::{EmptyCopyBlockPolicy, LabelVocabulary};
pub use node::{AnalysisSection, FormattedMessage, LineSpan, RawMessage, RenderNode, Run};

use analysis::AnalysisPiece;
use copy_block::BlockPiece;
use segment::SegmentKind;

/// How triple-back-tick spans in prose are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FencedBlockPolicy {
    /// Fences are ordinary text.
    #[default]
    Prose,
    /// Each complete fence becomes an unlabelled copy tile.
    Tiles,
}

/// Formatter settings, usually the `[formatter]` table of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    /// Treatment of back-tick fences outside copy blocks.
    pub fenced_blocks: FencedBlockPolicy,
    /// Treatment of copy blocks without items.
    pub empty_copy_block: EmptyCopyBlockPolicy,
    /// Replaces the built-in label keywords when set.
    pub label_keywords: Option<Vec<String>>,
    /// Added to the label keywords.
    pub extra_label_keywords: Vec<String>,
    /// Analysis-card marker aliases.
    pub markers: MarkerAliases,
}

/// Errors building a [`Formatter`] from configuration.
#[derive(Debug, Error)]
pub enum FormatterConfigError {
    /// Marker aliases could not be compiled.
    #[error(transparent)]
    Markers(#[from] MarkerError),
}

/// A configured message formatter.
///
/// Holds no per-message state; one instance can format any number of
/// messages, from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    labels: LabelVocabulary,
    markers: AnalysisMarkers,
    fenced_blocks: FencedBlockPolicy,
    empty_copy_block: EmptyCopyBlockPolicy,
}

impl Formatter {
    /// Build a formatter from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FormatterConfigError`] if the marker aliases are unusable.
    pub fn new(config: &FormatterConfig) -> Result<Self, FormatterConfigError> {
        let mut labels = match &config.label_keywords {
            Some(keywords) => LabelVocabulary::new(keywords),
            None => LabelVocabulary::default(),
        };
        labels.extend(&config.extra_label_keywords);

        Ok(Self {
            labels,
            markers: AnalysisMarkers::new(&config.markers)?,
            fenced_blocks: config.fenced_blocks,
            empty_copy_block: config.empty_copy_block,
        })
    }

    /// Format a message, keeping the sender flag for styling.
    pub fn format(&self, message: &RawMessage) -> FormattedMessage {
        FormattedMessage {
            is_user: message.is_user,
            nodes: self.parse(&message.text),
        }
    }

    /// Parse raw text into render nodes in source order.
    pub fn parse(&self, text: &str) -> Vec<RenderNode> {
        let mut nodes = Vec::new();
        let mut after_block = false;

        for segment in segment::segment(text) {
            match segment.kind {
                SegmentKind::Plain => {
                    let raw = if after_block {
                        strip_leading_break(segment.raw)
                    } else {
                        segment.raw
                    };
                    self.push_plain(raw, &mut nodes);
                }
                SegmentKind::CopyBlock => self.push_copy_block(segment.raw, &mut nodes),
                SegmentKind::Fenced => push_fenced(segment.raw, &mut nodes),
            }
            after_block = segment.kind != SegmentKind::Plain;
        }

        trace!(nodes = nodes.len(), "message formatted");
        nodes
    }

    fn push_plain(&self, text: &str, nodes: &mut Vec<RenderNode>) {
        if self.fenced_blocks == FencedBlockPolicy::Prose {
            self.push_prose(text, nodes);
            return;
        }

        let mut after_fence = false;
        for piece in segment::split_fences(text) {
            match piece.kind {
                SegmentKind::Fenced => push_fenced(piece.raw, nodes),
                _ if after_fence => self.push_prose(strip_leading_break(piece.raw), nodes),
                _ => self.push_prose(piece.raw, nodes),
            }
            after_fence = piece.kind == SegmentKind::Fenced;
        }
    }

    fn push_prose(&self, text: &str, nodes: &mut Vec<RenderNode>) {
        for piece in self.markers.scan(text) {
            match piece {
                AnalysisPiece::Text(text) => nodes.extend(lines::render_lines(text)),
                AnalysisPiece::Card {
                    insight,
                    data,
                    action,
                } => nodes.push(RenderNode::AnalysisCard {
                    insight: section(insight),
                    data: section(data),
                    action: section(action),
                }),
            }
        }
    }

    fn push_copy_block(&self, body: &str, nodes: &mut Vec<RenderNode>) {
        let pieces = copy_block::split_items(body);

        if !pieces.iter().any(|p| matches!(p, BlockPiece::Item(_))) {
            match self.empty_copy_block {
                EmptyCopyBlockPolicy::Drop => {
                    debug!(chars = body.len(), "dropping copy block without items");
                }
                EmptyCopyBlockPolicy::Literal => {
                    debug!("copy block without items, rendering body as text");
                    self.push_prose(body.trim(), nodes);
                }
            }
            return;
        }

        for piece in pieces {
            match piece {
                BlockPiece::Item(item) => {
                    let (label, content) = self.labels.split_label(item);
                    nodes.push(RenderNode::CopyTile { label, content });
                }
                BlockPiece::Stray(text) => {
                    debug!("text outside copy-block items, rendering as prose");
                    self.push_prose(text, nodes);
                }
            }
        }
    }
}

fn section(text: &str) -> AnalysisSection {
    let text = text.trim();
    AnalysisSection {
        text: text.to_owned(),
        nodes: lines::render_lines(text),
    }
}

/// A fence body becomes one tile; a leading language tag line is dropped.
fn push_fenced(body: &str, nodes: &mut Vec<RenderNode>) {
    let body = match body.split_once('\n') {
        Some((tag, rest)) if is_language_tag(tag) => rest,
        _ => body,
    };
    let content = body.trim();
    if !content.is_empty() {
        nodes.push(RenderNode::CopyTile {
            label: None,
            content: content.to_owned(),
        });
    }
}

fn is_language_tag(line: &str) -> bool {
    const TAGS: &[&str] = &["json", "text", "txt", "plaintext", "markdown", "md", "html", "csv"];
    let tag = line.trim();
    TAGS.iter().any(|known| known.eq_ignore_ascii_case(tag))
}

/// Drop the line break that directly follows a block's closing token.
fn strip_leading_break(text: &str) -> &str {
    text.strip_prefix("\r\n")
        .or_else(|| text.strip_prefix('\n'))
        .unwrap_or(text)
}

fn default_formatter() -> &'static Formatter {
    static FORMATTER: OnceLock<Formatter> = OnceLock::new();
    FORMATTER.get_or_init(Formatter::default)
}

/// Parse raw message text with the default configuration.
///
/// `is_user` only affects styling, so both senders get identical nodes;
/// use [`format_message`] to keep the flag next to them.
pub fn parse(text: &str, is_user: bool) -> Vec<RenderNode> {
    trace!(is_user, chars = text.len(), "formatting message");
    default_formatter().parse(text)
}

/// Format a message with the default configuration.
pub fn format_message(message: &RawMessage) -> FormattedMessage {
    default_formatter().format(message)
}
