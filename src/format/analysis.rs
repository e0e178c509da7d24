//! Insight / Data / Action analysis-card detection.
//!
//! A card is three line-leading markers in fixed order. Markers may be bold,
//! numbered, or prefixed with an article (`1. **The Insight**`,
//! `**Daten:**`). Anything that does not complete the triple stays prose.

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// The three card sections in their required order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// The finding.
    Insight,
    /// The numbers behind it.
    Data,
    /// What to do.
    Action,
}

impl Section {
    /// Lower-case English name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Insight => "insight",
            Self::Data => "data",
            Self::Action => "action",
        }
    }
}

/// Keyword aliases per section, matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerAliases {
    /// Aliases of the insight marker.
    pub insight: Vec<String>,
    /// Aliases of the data marker.
    pub data: Vec<String>,
    /// Aliases of the action marker.
    pub action: Vec<String>,
}

impl Default for MarkerAliases {
    fn default() -> Self {
        let owned = |words: &[&str]| -> Vec<String> { words.iter().map(|w| (*w).to_owned()).collect() };
        Self {
            insight: owned(&["insight", "erkenntnis"]),
            data: owned(&["data", "daten", "zahlen"]),
            action: owned(&["action", "aktion", "maßnahme", "massnahme"]),
        }
    }
}

/// Errors building markers from configuration.
#[derive(Debug, Error)]
pub enum MarkerError {
    /// A section has no usable alias.
    #[error("no aliases configured for the {0} marker")]
    NoAliases(&'static str),
    /// The generated pattern was rejected.
    #[error("invalid {section} marker pattern: {source}")]
    Pattern {
        /// Section whose pattern failed.
        section: &'static str,
        /// Underlying regex error.
        source: regex::Error,
    },
}

/// A piece of a plain span after card detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPiece<'a> {
    /// Prose outside any complete card.
    Text(&'a str),
    /// Untrimmed text captured after each of the three markers.
    Card {
        /// Text after the insight marker.
        insight: &'a str,
        /// Text after the data marker.
        data: &'a str,
        /// Text after the action marker up to the next card or the end.
        action: &'a str,
    },
}

#[derive(Debug, Clone, Copy)]
struct Marker {
    section: Section,
    start: usize,
    end: usize,
}

/// Compiled marker patterns.
#[derive(Debug, Clone)]
pub struct AnalysisMarkers {
    patterns: Vec<(Section, Regex)>,
}

impl Default for AnalysisMarkers {
    fn default() -> Self {
        Self::new(&MarkerAliases::default()).unwrap_or_else(|e| {
            debug!(error = %e, "default analysis markers unavailable, card detection off");
            Self {
                patterns: Vec::new(),
            }
        })
    }
}

impl AnalysisMarkers {
    /// Compile markers from aliases.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerError`] if a section has no non-blank alias or its
    /// pattern does not compile.
    pub fn new(aliases: &MarkerAliases) -> Result<Self, MarkerError> {
        let mut patterns = Vec::with_capacity(3);
        for (section, words) in [
            (Section::Insight, &aliases.insight),
            (Section::Data, &aliases.data),
            (Section::Action, &aliases.action),
        ] {
            let source = marker_pattern(words).ok_or(MarkerError::NoAliases(section.as_str()))?;
            let regex = Regex::new(&source).map_err(|source| MarkerError::Pattern {
                section: section.as_str(),
                source,
            })?;
            patterns.push((section, regex));
        }
        Ok(Self { patterns })
    }

    /// Split `text` into prose and complete cards, in source order.
    ///
    /// Each insight marker owns the region up to the next insight marker,
    /// and a data marker and then an action marker must follow inside it.
    /// If any region misses one of them, the whole span is returned as a
    /// single [`AnalysisPiece::Text`].
    pub fn scan<'a>(&self, text: &'a str) -> Vec<AnalysisPiece<'a>> {
        let markers = self.markers(text);
        let insights: Vec<&Marker> = markers
            .iter()
            .filter(|m| m.section == Section::Insight)
            .collect();
        let whole = || vec![AnalysisPiece::Text(text)];

        let mut pieces = Vec::new();
        let mut text_start = 0;

        for (idx, insight) in insights.iter().enumerate() {
            let region_end = insights
                .get(idx.saturating_add(1))
                .map_or(text.len(), |next| next.start);
            let within = |section: Section, from: usize| {
                markers
                    .iter()
                    .find(|m| m.section == section && m.start >= from && m.start < region_end)
            };
            let data = within(Section::Data, insight.end);
            let action = data.and_then(|data| within(Section::Action, data.end));

            let (Some(data), Some(action)) = (data, action) else {
                debug!(offset = insight.start, "incomplete analysis card, keeping span as text");
                return whole();
            };

            let (Some(before), Some(insight_text), Some(data_text), Some(action_text)) = (
                text.get(text_start..insight.start),
                text.get(insight.end..data.start),
                text.get(data.end..action.start),
                text.get(action.end..region_end),
            ) else {
                return whole();
            };
            if !before.is_empty() {
                pieces.push(AnalysisPiece::Text(before));
            }
            pieces.push(AnalysisPiece::Card {
                insight: insight_text,
                data: data_text,
                action: action_text,
            });
            text_start = region_end;
        }

        match text.get(text_start..) {
            Some(rest) if !rest.is_empty() || pieces.is_empty() => {
                pieces.push(AnalysisPiece::Text(rest));
            }
            _ => {}
        }

        pieces
    }

    fn markers(&self, text: &str) -> Vec<Marker> {
        let mut markers: Vec<Marker> = self
            .patterns
            .iter()
            .flat_map(|(section, regex)| {
                regex.find_iter(text).map(move |m| Marker {
                    section: *section,
                    start: m.start(),
                    end: m.end(),
                })
            })
            .collect();
        markers.sort_by_key(|m| m.start);
        markers
    }
}

/// Line-anchored pattern for one section, or `None` without aliases.
///
/// Accepted shapes: `Insight:`, `**Insight:**`, `**Insight**:`,
/// `- The Insight:` and a bold marker alone on its line (`1. **The Insight**`).
fn marker_pattern(aliases: &[String]) -> Option<String> {
    let mut escaped: Vec<String> = aliases
        .iter()
        .map(|alias| alias.trim())
        .filter(|alias| !alias.is_empty())
        .map(regex::escape)
        .collect();
    if escaped.is_empty() {
        return None;
    }
    // Longest first so a shorter alias never shadows a longer one.
    escaped.sort_by_key(|alias| std::cmp::Reverse(alias.len()));

    Some(format!(
        r"(?im)^[ \t]*(?:(?:\d+\.|[*\-•])[ \t]+)?(?:\*\*)?[ \t]*(?:(?:the|die|der|das)[ \t]+)?(?:{})[ \t]*(?::(?:\*\*)?|\*\*[ \t]*:|\*\*[ \t]*\r?$)",
        escaped.join("|")
    ))
}
