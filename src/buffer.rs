//! Wrapper module for the [`TextBuffer`] type

use std::fmt::{self, Formatter};
use std::ops::Range;

use crate::edit::EditError;

/// The mutable sequence of characters that the user edits
///
/// Every offset used with a `TextBuffer` is a *character* offset, not a byte offset -- tags are
/// measured in characters, so the buffer is too. Internally we keep a `String` and a cached
/// character count, converting to byte positions only at the edges.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    len: usize,
}

impl TextBuffer {
    /// Creates a new, empty `TextBuffer`
    pub fn new() -> Self {
        TextBuffer::default()
    }

    /// Returns the length of the buffer, in characters
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the text in the given character range, if it lies within the buffer
    pub fn slice(&self, range: Range<usize>) -> Option<&str> {
        if range.start > range.end || range.end > self.len {
            return None;
        }

        let start = self.byte_offset(range.start)?;
        let end = self.byte_offset(range.end)?;
        Some(&self.text[start..end])
    }

    /// Returns everything from the character offset `from` to the end of the buffer
    ///
    /// Offsets past the end produce an empty string rather than `None`; the caller is usually
    /// asking "what's left after this point?", and the answer is nothing.
    pub fn tail(&self, from: usize) -> &str {
        match self.byte_offset(from) {
            Some(idx) => &self.text[idx..],
            None => "",
        }
    }

    /// Inserts `text` so that it starts at the character offset `at`
    pub fn insert(&mut self, at: usize, text: &str) -> Result<(), EditError> {
        let idx = self
            .byte_offset(at)
            .ok_or(EditError::InsertOutOfBounds { at, len: self.len })?;

        self.text.insert_str(idx, text);
        self.len += text.chars().count();
        Ok(())
    }

    /// Removes `count` characters starting at `at`, returning the removed text
    pub fn delete(&mut self, at: usize, count: usize) -> Result<String, EditError> {
        let err = EditError::DeleteOutOfBounds {
            at,
            count,
            len: self.len,
        };

        let end = at.checked_add(count).ok_or(err)?;
        if end > self.len {
            return Err(err);
        }

        let start_idx = self.byte_offset(at).ok_or(err)?;
        let end_idx = self.byte_offset(end).ok_or(err)?;

        let removed = self.text.drain(start_idx..end_idx).collect();
        self.len -= count;
        Ok(removed)
    }

    /// Replaces the entire contents of the buffer
    pub fn replace_all(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.len = text.chars().count();
    }

    /// Converts a character offset into a byte offset, returning `None` if it's past the end
    ///
    /// An offset equal to the length of the buffer is valid, and gives the length in bytes.
    pub fn byte_offset(&self, char_idx: usize) -> Option<usize> {
        if char_idx == self.len {
            return Some(self.text.len());
        }

        self.text.char_indices().nth(char_idx).map(|(i, _)| i)
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        TextBuffer {
            text: text.to_owned(),
            len: text.chars().count(),
        }
    }
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.text.fmt(f)
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}
