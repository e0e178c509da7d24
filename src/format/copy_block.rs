//! Copy-block item extraction and asset-type labelling.

use serde::{Deserialize, Serialize};

/// Opens one copyable item inside a copy block.
pub const ITEM_OPEN: &str = "<item>";
/// Closes one copyable item.
pub const ITEM_CLOSE: &str = "</item>";

/// Longest `Label:` prefix, in characters, still treated as a label.
pub const MAX_LABEL_CHARS: usize = 40;

/// Built-in asset-type keywords, German and English.
pub const DEFAULT_LABEL_KEYWORDS: &[&str] = &[
    "headline",
    "überschrift",
    "titel",
    "description",
    "beschreibung",
    "sitelink",
    "callout",
    "keyword",
    "suchbegriff",
    "anzeigentext",
    "ad text",
    "cta",
    "call to action",
    "snippet",
    "path",
    "pfad",
    "tagline",
    "slogan",
];

/// What to do with a copy block that holds no items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyCopyBlockPolicy {
    /// Emit nothing for the block, not even text outside `<item>` wrappers.
    #[default]
    Drop,
    /// Render the whole block body as prose.
    Literal,
}

/// A piece of a copy block's body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockPiece<'a> {
    /// Trimmed, non-empty item text.
    Item(&'a str),
    /// Trimmed, non-empty text found outside `<item>` wrappers, including
    /// an unterminated `<item>` and everything after it.
    Stray(&'a str),
}

/// Split a copy block body into items and stray text, in order.
///
/// Whitespace between items is discarded, as are items that trim to empty.
pub fn split_items(body: &str) -> Vec<BlockPiece<'_>> {
    let mut pieces = Vec::new();
    let mut rest = body;

    while let Some((before, after_open)) = rest.split_once(ITEM_OPEN) {
        let Some((inner, after_close)) = after_open.split_once(ITEM_CLOSE) else {
            break;
        };
        push_piece(&mut pieces, before, BlockPiece::Stray);
        push_piece(&mut pieces, inner, BlockPiece::Item);
        rest = after_close;
    }
    push_piece(&mut pieces, rest, BlockPiece::Stray);

    pieces
}

fn push_piece<'a>(
    pieces: &mut Vec<BlockPiece<'a>>,
    text: &'a str,
    make: fn(&'a str) -> BlockPiece<'a>,
) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        pieces.push(make(trimmed));
    }
}

/// Case-insensitive keyword list deciding which `Label:` prefixes are asset types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelVocabulary {
    keywords: Vec<String>,
}

impl Default for LabelVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL_KEYWORDS.iter().copied())
    }
}

impl LabelVocabulary {
    /// Build a vocabulary; blank keywords are ignored.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocabulary = Self {
            keywords: Vec::new(),
        };
        vocabulary.extend(keywords);
        vocabulary
    }

    /// Add keywords, skipping blanks and duplicates.
    pub fn extend<I, S>(&mut self, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for keyword in keywords {
            let normalized = keyword.as_ref().trim().to_lowercase();
            if !normalized.is_empty() && !self.keywords.contains(&normalized) {
                self.keywords.push(normalized);
            }
        }
    }

    /// Normalised keywords.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Whether `label` contains any keyword, ignoring case.
    pub fn matches(&self, label: &str) -> bool {
        let lowered = label.to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| lowered.contains(keyword.as_str()))
    }

    /// Split an item into an optional asset label and its content.
    ///
    /// The label is advisory: anything that does not look like a known
    /// `Label: content` pair comes back whole as content.
    pub fn split_label(&self, item: &str) -> (Option<String>, String) {
        let item = item.trim();
        let unlabelled = || (None, item.to_owned());

        let Some((prefix, content)) = item.split_once(':') else {
            return unlabelled();
        };
        if prefix.contains('\n') || prefix.chars().count() > MAX_LABEL_CHARS {
            return unlabelled();
        }
        let prefix = prefix.trim();
        let label = prefix.trim_matches('*').trim();
        let content = content.trim();
        // `**Headline:** text` leaves the closing delimiter on the content side.
        let content = if prefix.starts_with("**") && prefix.matches("**").count() & 1 == 1 {
            content.strip_prefix("**").unwrap_or(content).trim_start()
        } else {
            content
        };
        if label.is_empty() || content.is_empty() || !self.matches(label) {
            return unlabelled();
        }

        (Some(label.to_owned()), content.to_owned())
    }
}
