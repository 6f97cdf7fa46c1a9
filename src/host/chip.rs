//! A terminal rendition of tag chips
//!
//! Each chip is drawn as the tag's text between a pair of parentheses, padded or truncated so
//! that every chip occupies exactly the same number of terminal cells.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::config::MIN_CHIP_WIDTH;
use crate::render::{TagRenderer, VisualToken};

const ELLIPSIS: &str = "…";

/// Renders tags as fixed-width chips of text
#[derive(Debug, Copy, Clone)]
pub struct ChipRenderer {
    width: usize,
}

impl ChipRenderer {
    /// Creates a renderer producing chips `width` cells wide
    ///
    /// Widths below [`MIN_CHIP_WIDTH`] are bumped up to it.
    pub fn new(width: usize) -> Self {
        ChipRenderer {
            width: width.max(MIN_CHIP_WIDTH),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Produces the label for a chip: the text, fit to exactly the inner width of the chip
    ///
    /// Text is cut on grapheme boundaries. If it has to be cut at all, the last cell is given to
    /// an ellipsis. Wide characters that would straddle the edge are dropped and the gap padded.
    pub fn label(&self, text: &str) -> String {
        let inner = self.width - 2;
        let full_width = UnicodeWidthStr::width(text);

        let (body, body_width) = if full_width <= inner {
            (text.to_owned(), full_width)
        } else {
            let mut body = String::new();
            let mut used = 0;

            for g in text.graphemes(true) {
                let w = UnicodeWidthStr::width(g);
                if used + w > inner - 1 {
                    break;
                }
                body.push_str(g);
                used += w;
            }

            body.push_str(ELLIPSIS);
            (body, used + 1)
        };

        let padding = " ".repeat(inner - body_width);
        format!("({}{})", body, padding)
    }
}

impl TagRenderer for ChipRenderer {
    fn render_tag_visual(&mut self, text: &str) -> VisualToken {
        VisualToken::new(&self.label(text), self.width)
    }
}
