//! Top-level block segmenter.
//!
//! Splits a message into plain text and `<copy_block>` spans. The wrapper
//! tokens come from the prompt contract with the model and are never typed
//! by users, so they are matched literally.

use tracing::debug;

/// Opens a block of copyable assets.
pub const COPY_BLOCK_OPEN: &str = "<copy_block>";
/// Closes a block of copyable assets.
pub const COPY_BLOCK_CLOSE: &str = "</copy_block>";
/// Fence of the legacy code-span variant.
pub const FENCE: &str = "```";

/// What a segment contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Prose, possibly with bold markup and analysis markers.
    Plain,
    /// Inner text of a terminated `<copy_block>`.
    CopyBlock,
    /// Inner text of a terminated triple-back-tick fence.
    Fenced,
}

/// A borrowed slice of the message tagged with its kind.
///
/// For block kinds `raw` excludes the wrapper tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// Segment kind.
    pub kind: SegmentKind,
    /// Source text of the segment.
    pub raw: &'a str,
}

impl<'a> Segment<'a> {
    fn plain(raw: &'a str) -> Self {
        Self {
            kind: SegmentKind::Plain,
            raw,
        }
    }
}

/// Split `text` into plain and copy-block segments in source order.
///
/// Input without an opener yields exactly one plain segment equal to the
/// input. An opener without a closer turns everything from that opener to
/// the end into literal plain text. A stray closer is plain text.
pub fn segment(text: &str) -> Vec<Segment<'_>> {
    split_wrapped(text, COPY_BLOCK_OPEN, COPY_BLOCK_CLOSE, SegmentKind::CopyBlock)
}

/// Split a plain segment on triple-back-tick fences.
///
/// An unterminated fence is literal text.
pub fn split_fences(text: &str) -> Vec<Segment<'_>> {
    split_wrapped(text, FENCE, FENCE, SegmentKind::Fenced)
}

fn split_wrapped<'a>(text: &'a str, open: &str, close: &str, kind: SegmentKind) -> Vec<Segment<'a>> {
    let mut segments = Vec::new();
    let mut rest = text;

    while let Some((before, after_open)) = rest.split_once(open) {
        let Some((inner, after_close)) = after_open.split_once(close) else {
            debug!(token = open, "unterminated block, rendering remainder as text");
            break;
        };
        if !before.is_empty() {
            segments.push(Segment::plain(before));
        }
        segments.push(Segment { kind, raw: inner });
        rest = after_close;
    }

    if !rest.is_empty() || segments.is_empty() {
        segments.push(Segment::plain(rest));
    }

    segments
}
