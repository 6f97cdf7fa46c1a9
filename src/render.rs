//! Projection of the buffer and its tags into something displayable
//!
//! Drawing an actual chip is up to whoever implements [`TagRenderer`]; all this module does is
//! decide *where* the chips go. The result is a [`Display`]: the buffer's text, with each tag's
//! range swapped out for a single [`VisualToken`].

use smallstr::SmallString;

use crate::buffer::TextBuffer;
use crate::tags::TagRangeModel;

/// An opaque, fixed-size stand-in for a tag inside a [`Display`]
///
/// The renderer decides what a token looks like; the projector only ever moves them around. Two
/// tokens compare equal if they were rendered identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualToken {
    label: SmallString<[u8; 16]>,
    width: usize,
}

impl VisualToken {
    /// Creates a token with the given rendered form, occupying `width` display cells
    pub fn new(label: &str, width: usize) -> Self {
        VisualToken {
            label: SmallString::from(label),
            width,
        }
    }

    /// The rendered form of the token
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The number of display cells the token occupies
    pub fn width(&self) -> usize {
        self.width
    }
}

/// The rendering collaborator: turns tag text into a visual token
///
/// Implementations must be synchronous and must produce a token for any non-empty text --
/// overflowing or otherwise awkward text is for the renderer to truncate, not to refuse. For
/// projection to be idempotent, rendering the same text twice should give equal tokens.
pub trait TagRenderer {
    fn render_tag_visual(&mut self, text: &str) -> VisualToken;
}

impl<F: FnMut(&str) -> VisualToken> TagRenderer for F {
    fn render_tag_visual(&mut self, text: &str) -> VisualToken {
        self(text)
    }
}

/// A single piece of a [`Display`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplaySegment {
    /// Literal text from the buffer that isn't covered by any tag
    Text(String),
    /// A tag, replaced by its visual token
    Token {
        /// The index of the tag in the model at the time of projection
        tag_index: usize,
        token: VisualToken,
    },
}

impl DisplaySegment {
    /// The number of display units in the segment: one per character, or one for a token
    pub fn units(&self) -> usize {
        match self {
            DisplaySegment::Text(s) => s.chars().count(),
            DisplaySegment::Token { .. } => 1,
        }
    }
}

/// The buffer's text with tags substituted by tokens, plus the caret position within it
///
/// The caret is measured in display units (see [`DisplaySegment::units`]) and is always at the
/// end: the control only supports editing at the end of the text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Display {
    segments: Vec<DisplaySegment>,
    caret: usize,
}

impl Display {
    pub fn segments(&self) -> &[DisplaySegment] {
        &self.segments
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Returns the number of display units
    pub fn len(&self) -> usize {
        self.segments.iter().map(DisplaySegment::units).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Iterates over the tokens in the display, in order
    pub fn tokens(&self) -> impl Iterator<Item = (usize, &VisualToken)> {
        self.segments.iter().filter_map(|s| match s {
            DisplaySegment::Token { tag_index, token } => Some((*tag_index, token)),
            DisplaySegment::Text(_) => None,
        })
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        match self.segments.last_mut() {
            Some(DisplaySegment::Text(s)) => s.push_str(text),
            _ => self.segments.push(DisplaySegment::Text(text.to_owned())),
        }
    }
}

/// Builds [`Display`]s from a buffer and its tags
#[derive(Debug, Copy, Clone, Default)]
pub struct RenderProjector;

impl RenderProjector {
    /// Produces the display for `buffer` with every tag in `model` replaced by a token
    ///
    /// All tags are projected each time, not just new ones. Projection is a pure function of its
    /// inputs (given a deterministic renderer), so running it twice on the same buffer and model
    /// gives the same result.
    ///
    /// A stale model can hold tags whose ranges no longer fit in the buffer, or that run into the
    /// previous tag. Those are skipped with a warning -- their text stays literal -- rather than
    /// treated as an error.
    pub fn project(
        &self,
        buffer: &TextBuffer,
        model: &TagRangeModel,
        renderer: &mut dyn TagRenderer,
    ) -> Display {
        let mut display = Display::default();
        let mut pos = 0;

        for (tag_index, tag) in model.iter().enumerate() {
            if tag.from < pos || tag.is_empty() {
                log::warn!(
                    "skipping tag {:?} at {}..{}: overlaps previous substitution",
                    tag.value,
                    tag.from,
                    tag.to
                );
                continue;
            }

            let before = match (buffer.slice(pos..tag.from), buffer.slice(tag.range())) {
                (Some(before), Some(_)) => before,
                _ => {
                    log::warn!(
                        "skipping tag {:?} at {}..{}: outside buffer of length {}",
                        tag.value,
                        tag.from,
                        tag.to,
                        buffer.len()
                    );
                    continue;
                }
            };

            display.push_text(before);
            display.segments.push(DisplaySegment::Token {
                tag_index,
                token: renderer.render_tag_visual(&tag.value),
            });
            pos = tag.to;
        }

        display.push_text(buffer.tail(pos));
        display.caret = display.len();
        display
    }
}
