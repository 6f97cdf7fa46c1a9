//! Deciding when pending text becomes a tag
//!
//! There are two entry points here, one for each [`Strategy`](crate::Strategy):
//!
//!  * [`commit_pending`] runs when the commit key is released, turning the text after the last
//!    tag into a new tag, and
//!  * [`resegment`] re-derives the entire list of tags by splitting the buffer on the delimiter.
//!
//! [`commit_pending`]: TagCommitEngine::commit_pending
//! [`resegment`]: TagCommitEngine::resegment

use crate::buffer::TextBuffer;
use crate::tags::{Tag, TagRangeModel};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TagCommitEngine {
    delimiter: char,
}

impl TagCommitEngine {
    pub fn new(delimiter: char) -> Self {
        TagCommitEngine { delimiter }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Commits the text after the last tag as a new tag, returning a reference to it
    ///
    /// With no tags yet, the whole buffer is the pending text. Nothing happens if the pending
    /// text is empty, which also covers a stale model whose last tag ends past the end of the
    /// buffer.
    pub fn commit_pending<'m>(
        &self,
        buffer: &TextBuffer,
        model: &'m mut TagRangeModel,
    ) -> Option<&'m Tag> {
        let from = model.last().map(|t| t.to).unwrap_or(0);
        let pending = buffer.tail(from);

        if pending.is_empty() {
            log::trace!("nothing pending after offset {}; not committing", from);
            return None;
        }

        let to = buffer.len();
        let value = pending.to_owned();
        log::debug!("committing tag {:?} at {}..{}", value, from, to);

        if model.insert_tag(value, from, to) {
            model.last()
        } else {
            None
        }
    }

    /// Computes the full list of tags implied by the delimiters in `buffer`
    ///
    /// The buffer is split on the delimiter and the pieces are walked left to right, each one
    /// advancing the running offset by its length plus one for the delimiter that follows it.
    /// Every non-empty piece that's *followed* by a delimiter becomes a tag; the final piece is
    /// text the user is still typing, and empty pieces (e.g. from a leading or doubled delimiter)
    /// produce nothing.
    pub fn resegment(&self, buffer: &TextBuffer) -> Vec<Tag> {
        let mut pieces: Vec<&str> = buffer.as_str().split(self.delimiter).collect();
        // Whatever follows the last delimiter hasn't been committed yet
        pieces.pop();

        let mut tags = Vec::with_capacity(pieces.len());
        let mut offset = 0;

        for piece in pieces {
            let len = piece.chars().count();
            if len != 0 {
                tags.push(Tag::new(piece, offset, offset + len));
            }
            offset += len + 1;
        }

        tags
    }

    /// Replaces the contents of `model` with the result of [`resegment`](Self::resegment)
    pub fn resegment_into(&self, buffer: &TextBuffer, model: &mut TagRangeModel) {
        let tags = self.resegment(buffer);
        log::debug!("re-derived {} tags from {:?}", tags.len(), buffer);
        model.replace_all(tags);
    }
}
