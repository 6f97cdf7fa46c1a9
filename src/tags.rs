//! Wrapper module for the [`TagRangeModel`] and the [`Tag`]s inside it

use std::fmt::{self, Display, Formatter};
use std::ops::Range;

/// A committed span of text that gets rendered as a single visual unit
///
/// The range `from..to` is half-open and measured in characters of the buffer at the time it was
/// last adjusted. Immediately after creation or adjustment, `to - from` is always equal to the
/// number of characters in `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub value: String,
    pub from: usize,
    pub to: usize,
}

impl Tag {
    pub fn new(value: impl Into<String>, from: usize, to: usize) -> Tag {
        Tag {
            value: value.into(),
            from,
            to,
        }
    }

    /// Returns the length of the range covered by the tag
    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.from..self.to
    }

    /// Moves the whole range by `delta`, saturating at zero
    fn shift(&mut self, delta: isize) {
        let apply = |pos: usize| {
            if delta < 0 {
                pos.saturating_sub(delta.unsigned_abs())
            } else {
                pos.saturating_add(delta as usize)
            }
        };

        self.from = apply(self.from);
        self.to = apply(self.to);
    }
}

/// The ordered list of tags covering committed portions of the buffer
///
/// Tags are kept in insertion order, which is also left-to-right text order. Three invariants
/// are expected to hold between edits:
///
///  1. Ranges are pairwise non-overlapping and sorted by `from`,
///  2. For each adjacent pair, `tags[i].to <= tags[i + 1].from`. Any gap is uncommitted text (or,
///     with a delimiter, the delimiter itself), and
///  3. No tag is empty; zero-length tags are removed instead of stored.
///
/// Most of the methods here don't check these -- callers are trusted to shift contiguous suffixes
/// and to append in order. [`check_invariants`] is available to verify them after the fact.
///
/// [`check_invariants`]: Self::check_invariants
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRangeModel {
    tags: Vec<Tag>,
}

/// A violation of one of the [`TagRangeModel`] invariants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    /// The tag at `index` starts before the previous one ends
    Overlap { index: usize },
    /// The tag at `index` covers an empty range
    Empty { index: usize },
    /// The tag at `index` covers a range whose length isn't the length of its value
    LengthMismatch {
        index: usize,
        range_len: usize,
        value_len: usize,
    },
}

impl Display for InvariantError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        use InvariantError::*;

        match self {
            Overlap { index } => write!(f, "tag {} overlaps the tag before it", index),
            Empty { index } => write!(f, "tag {} has an empty range", index),
            LengthMismatch {
                index,
                range_len,
                value_len,
            } => write!(
                f,
                "tag {} covers {} characters but its value has {}",
                index, range_len, value_len
            ),
        }
    }
}

impl std::error::Error for InvariantError {}

impl TagRangeModel {
    pub fn new() -> Self {
        TagRangeModel::default()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.tags.get(index)
    }

    pub fn last(&self) -> Option<&Tag> {
        self.tags.last()
    }

    pub fn iter(&self) -> std::slice::Iter<Tag> {
        self.tags.iter()
    }

    /// Returns the values of all of the tags, in order
    pub fn values(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.value.as_str()).collect()
    }

    /// Appends a tag covering `from..to`
    ///
    /// The caller is responsible for making sure that the new tag comes after all of the existing
    /// ones. Empty ranges are never stored; `false` is returned if the tag was refused for that
    /// reason.
    pub fn insert_tag(&mut self, value: impl Into<String>, from: usize, to: usize) -> bool {
        if from >= to {
            log::warn!("refusing to store empty tag range {}..{}", from, to);
            return false;
        }

        self.tags.push(Tag::new(value, from, to));
        true
    }

    /// Adds `delta` to the range of the tag at `index` and every tag after it
    pub fn shift_from(&mut self, index: usize, delta: isize) {
        if delta == 0 {
            return;
        }

        for tag in self.tags.iter_mut().skip(index) {
            tag.shift(delta);
        }
    }

    /// Shifts only the single tag at `index`
    ///
    /// This is the building block that [`EditPlan`](crate::EditPlan)s are applied with; unlike
    /// [`shift_from`](Self::shift_from), it leaves the rest of the list alone.
    pub(crate) fn shift_one(&mut self, index: usize, delta: isize) {
        if let Some(tag) = self.tags.get_mut(index) {
            tag.shift(delta);
        }
    }

    /// Removes and returns the tag at `index`
    ///
    /// None of the other tags are moved; if the removed range is also gone from the buffer, it's
    /// up to the caller to shift the tags after it.
    pub fn remove_at(&mut self, index: usize) -> Option<Tag> {
        if index < self.tags.len() {
            Some(self.tags.remove(index))
        } else {
            None
        }
    }

    /// Removes the first tag with the given value, shifting all later tags left by its length
    ///
    /// Only the *first* match is ever removed. There's no way to pick out a particular one of
    /// several tags with the same value; that's a known limitation rather than something this
    /// method tries to guess at.
    pub fn remove_by_value(&mut self, value: &str) -> Option<Tag> {
        let index = self.tags.iter().position(|t| t.value == value)?;
        let removed = self.tags.remove(index);

        self.shift_from(index, -(removed.len() as isize));
        Some(removed)
    }

    /// Replaces every tag in the model at once
    pub fn replace_all(&mut self, tags: Vec<Tag>) {
        self.tags = tags;
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// Checks the model's invariants, returning the first violation found
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut prev_end = 0;

        for (index, tag) in self.tags.iter().enumerate() {
            if tag.from >= tag.to {
                return Err(InvariantError::Empty { index });
            } else if index != 0 && tag.from < prev_end {
                return Err(InvariantError::Overlap { index });
            }

            let value_len = tag.value.chars().count();
            if tag.len() != value_len {
                return Err(InvariantError::LengthMismatch {
                    index,
                    range_len: tag.len(),
                    value_len,
                });
            }

            prev_end = tag.to;
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a TagRangeModel {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}
