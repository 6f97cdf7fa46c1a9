//! The tag-editing control itself
//!
//! [`TagEditText`] owns the buffer and the tags, and processes one edit at a time all the way
//! through: filter, translate offsets, mutate the buffer, possibly commit, then re-project the
//! display. The host only has to feed it [`EditEvent`]s and draw whatever [`Display`] comes out.
//!
//! The two halves of an edit mirror the usual "before change" / "after change" split of a text
//! widget. The tracking strategy does its work *before* the buffer changes (it needs the old
//! offsets), while the delimited strategy does its work *after* (it needs the new text).

use serde::{Deserialize, Serialize};
use std::mem;

use crate::buffer::TextBuffer;
use crate::commit::TagCommitEngine;
use crate::config::Config;
use crate::edit::{EditError, EditEvent, EditOrigin, EditPlan, EditTranslator};
use crate::filter::DelimiterFilter;
use crate::render::{Display, RenderProjector, TagRenderer};
use crate::tags::{Tag, TagRangeModel};

/// The method by which tags are derived from the text
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Explicit offset bookkeeping on every edit; tags are committed with the commit key, and the
    /// delimiter is filtered out of all input
    Tracking,
    /// Tags are re-derived from scratch by splitting on the delimiter whenever it's typed (or
    /// whenever text is deleted, or inserted anywhere but the end)
    Delimited,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Tracking
    }
}

/// A selection in the buffer, as a pair of character offsets
///
/// Only one selection is ever valid for the control: the empty one at the end of the text.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn at(pos: usize) -> Self {
        Selection {
            start: pos,
            end: pos,
        }
    }
}

/// The result of successfully handling a single [`EditEvent`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The edit was not processed: it was programmatic, or a self-triggered change
    Ignored,
    /// An insertion was rejected by the delimiter filter
    Filtered,
    /// Nothing changed (e.g. an empty insertion, or a commit with nothing pending)
    Unchanged,
    /// The buffer changed; any tags destroyed by the edit are given
    Changed { destroyed: Vec<Tag> },
    /// A new tag was committed
    Committed(Tag),
}

/// The "editable tagged text" capability, independent of any particular UI toolkit
///
/// The host layer adapts its platform's events into [`EditEvent`]s and draws the [`Display`].
pub trait EditableTaggedText {
    /// Processes a single edit to completion, re-rendering afterwards
    fn apply_edit(&mut self, origin: EditOrigin, event: EditEvent)
        -> Result<EditOutcome, EditError>;

    /// Returns the values of the current tags, in text order
    fn tags(&self) -> Vec<&str>;

    /// Re-projects the display from the current buffer and tags
    fn render(&mut self) -> &Display;
}

// What happened to the buffer, as seen by the after-change half of an edit
#[derive(Debug, Copy, Clone)]
enum Change {
    Inserted { has_delimiter: bool, at_end: bool },
    Deleted,
    Replaced,
}

/// A single-line text input that converts committed text into tags
pub struct TagEditText<R> {
    buffer: TextBuffer,
    model: TagRangeModel,
    strategy: Strategy,
    // Only present for `Strategy::Tracking`
    filter: Option<DelimiterFilter>,
    translator: EditTranslator,
    committer: TagCommitEngine,
    projector: RenderProjector,
    renderer: R,
    display: Display,
    selection: Selection,
    // One-shot guard around programmatic replacement of the buffer. Replacing the text raises a
    // change like any other; this makes sure we don't treat our own output as a user edit.
    ignore_next_change: bool,
}

impl<R: TagRenderer> TagEditText<R> {
    /// Creates a new, empty control
    pub fn new(strategy: Strategy, delimiter: char, renderer: R) -> Self {
        let filter = match strategy {
            Strategy::Tracking => Some(DelimiterFilter::new(delimiter)),
            Strategy::Delimited => None,
        };

        TagEditText {
            buffer: TextBuffer::new(),
            model: TagRangeModel::new(),
            strategy,
            filter,
            translator: EditTranslator,
            committer: TagCommitEngine::new(delimiter),
            projector: RenderProjector,
            renderer,
            display: Display::default(),
            selection: Selection::at(0),
            ignore_next_change: false,
        }
    }

    /// Creates a new control with the strategy and delimiter given by the configuration
    pub fn from_config(config: &Config, renderer: R) -> Self {
        TagEditText::new(config.strategy, config.delimiter, renderer)
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn delimiter(&self) -> char {
        self.committer.delimiter()
    }

    pub fn text(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn model(&self) -> &TagRangeModel {
        &self.model
    }

    /// The most recently projected display
    pub fn display(&self) -> &Display {
        &self.display
    }

    /// The caret position, which is always the end of the buffer
    pub fn caret(&self) -> usize {
        self.buffer.len()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Attempts to change the selection, returning the one actually in effect
    ///
    /// Editing is only supported at the end of the text, so any selection other than the empty
    /// one at the end is rejected and reset.
    pub fn set_selection(&mut self, start: usize, end: usize) -> Selection {
        let len = self.buffer.len();
        if start != len || end != len {
            log::trace!("selection {}..{} reset to end of text ({})", start, end, len);
        }

        self.selection = Selection::at(len);
        self.selection
    }

    /// Types `text` at the end of the buffer, as the user would
    pub fn type_text(&mut self, text: &str) -> Result<EditOutcome, EditError> {
        let event = EditEvent::TextInserted {
            at: self.buffer.len(),
            text: text.to_owned(),
        };
        self.apply_edit(EditOrigin::User, event)
    }

    /// Presses (and releases) the commit key
    pub fn commit(&mut self) -> Result<EditOutcome, EditError> {
        self.apply_edit(EditOrigin::User, EditEvent::CommitKeyReleased)
    }

    /// Deletes backwards from the end of the buffer
    ///
    /// A tag is shown as a single unit, so when the text ends exactly at the end of the last tag
    /// the whole tag is deleted at once. Otherwise, this removes a single character.
    pub fn backspace(&mut self) -> Result<EditOutcome, EditError> {
        let len = self.buffer.len();
        if len == 0 {
            return Ok(EditOutcome::Unchanged);
        }

        let (at, count) = match self.model.last() {
            Some(tag) if tag.to == len && tag.from < len => (tag.from, tag.len()),
            _ => (len - 1, 1),
        };

        self.apply_edit(EditOrigin::User, EditEvent::TextWillDelete { at, count })
    }

    /// Removes the first tag with the given value, along with its text
    ///
    /// If several tags have the same value, only the first is removed and there's no way to ask
    /// for any other one.
    pub fn remove_tag(&mut self, value: &str) -> Option<Tag> {
        let text = self
            .model
            .iter()
            .find(|t| t.value == value)
            .and_then(|t| self.text_without(t))?;

        let removed = self.model.remove_by_value(value)?;
        self.set_text_programmatically(&text);
        self.refresh_display();
        Some(removed)
    }

    /// Removes the tag displayed as the `n`th visual token (counting from zero)
    ///
    /// This is what clicking on a chip does. Unlike [`remove_tag`](Self::remove_tag), the exact
    /// tag that was clicked is removed even when other tags share its value. Afterwards, the
    /// selection is returned to the end of the text.
    pub fn click_token(&mut self, n: usize) -> Option<Tag> {
        let (index, _) = self.display.tokens().nth(n)?;
        let text = self.model.get(index).and_then(|t| self.text_without(t))?;

        let removed = self.model.remove_at(index)?;
        self.model.shift_from(index, -(removed.len() as isize));

        self.set_text_programmatically(&text);
        self.refresh_display();
        Some(removed)
    }

    // Produces the text with the tag's range cut out, or `None` if the range doesn't fit in the
    // buffer. This has to be checked before the model is touched.
    fn text_without(&self, tag: &Tag) -> Option<String> {
        match self.buffer.slice(0..tag.from) {
            Some(before) if tag.from < tag.to && tag.to <= self.buffer.len() => {
                Some(format!("{}{}", before, self.buffer.tail(tag.to)))
            }
            _ => {
                log::warn!(
                    "not removing tag {:?} at {}..{}: doesn't fit in buffer of length {}",
                    tag.value,
                    tag.from,
                    tag.to,
                    self.buffer.len()
                );
                None
            }
        }
    }

    fn set_text_programmatically(&mut self, text: &str) {
        self.ignore_next_change = true;
        self.buffer.replace_all(text);
        self.text_changed(Change::Replaced);
    }

    fn insert(&mut self, at: usize, text: &str) -> Result<EditOutcome, EditError> {
        let len = self.buffer.len();
        if at > len {
            return Err(EditError::InsertOutOfBounds { at, len });
        }

        let text = match self.filter.as_ref().map(|f| f.filter(text)) {
            Some(None) => return Ok(EditOutcome::Filtered),
            Some(Some(t)) => t,
            None => text,
        };

        if text.is_empty() {
            return Ok(EditOutcome::Unchanged);
        }

        let plan = self.plan(|tr, model| tr.plan_insert(model, at, text.chars().count()));
        self.buffer.insert(at, text)?;
        let destroyed = plan.apply(&mut self.model);

        let has_delimiter = text.contains(self.committer.delimiter());
        self.text_changed(Change::Inserted {
            has_delimiter,
            at_end: at == len,
        });
        Ok(EditOutcome::Changed { destroyed })
    }

    fn delete(&mut self, at: usize, count: usize) -> Result<EditOutcome, EditError> {
        if count == 0 {
            return Ok(EditOutcome::Unchanged);
        }

        // This has to be planned before the deletion happens, while the tags still line up with
        // the text being deleted.
        let plan = self.plan(|tr, model| tr.plan_delete(model, at, count));
        let removed = self.buffer.delete(at, count)?;
        log::trace!("deleted {:?} at {}", removed, at);

        let destroyed = plan.apply(&mut self.model);
        self.text_changed(Change::Deleted);
        Ok(EditOutcome::Changed { destroyed })
    }

    // Produces the plan for the current edit, which is only non-empty when we're tracking
    fn plan(&self, f: impl FnOnce(&EditTranslator, &TagRangeModel) -> EditPlan) -> EditPlan {
        match self.strategy {
            Strategy::Tracking => f(&self.translator, &self.model),
            Strategy::Delimited => EditPlan::default(),
        }
    }

    fn commit_key_released(&mut self) -> EditOutcome {
        match self.strategy {
            Strategy::Tracking => match self.committer.commit_pending(&self.buffer, &mut self.model) {
                Some(tag) => EditOutcome::Committed(tag.clone()),
                None => EditOutcome::Unchanged,
            },
            Strategy::Delimited => {
                log::trace!("commit key has no effect with delimited tags");
                EditOutcome::Unchanged
            }
        }
    }

    // The after-change half of every buffer mutation
    fn text_changed(&mut self, change: Change) {
        if mem::replace(&mut self.ignore_next_change, false) {
            log::trace!("ignoring self-triggered change ({:?})", change);
            return;
        }

        if self.strategy != Strategy::Delimited {
            return;
        }

        match change {
            // Typing plain text at the end only extends the pending piece. Anywhere else, it
            // moves (or grows) the pieces that are already tags.
            Change::Inserted {
                has_delimiter: false,
                at_end: true,
            } => (),
            Change::Inserted { .. } | Change::Deleted => {
                self.committer.resegment_into(&self.buffer, &mut self.model)
            }
            // Only raised by `set_text_programmatically`, under `ignore_next_change`. Whoever
            // replaces the text is responsible for the model matching it.
            Change::Replaced => (),
        }
    }

    fn refresh_display(&mut self) {
        self.display = (self.projector).project(&self.buffer, &self.model, &mut self.renderer);
        self.selection = Selection::at(self.buffer.len());

        if let Err(e) = self.model.check_invariants() {
            log::warn!("tags out of step with buffer {:?}: {}", self.buffer, e);
        }
    }
}

impl<R: TagRenderer> EditableTaggedText for TagEditText<R> {
    fn apply_edit(
        &mut self,
        origin: EditOrigin,
        event: EditEvent,
    ) -> Result<EditOutcome, EditError> {
        if origin == EditOrigin::Programmatic {
            log::trace!("ignoring programmatic edit {:?}", event);
            return Ok(EditOutcome::Ignored);
        }

        log::trace!("applying {:?}", event);

        let outcome = match event {
            EditEvent::TextInserted { at, text } => self.insert(at, &text)?,
            EditEvent::TextWillDelete { at, count } => self.delete(at, count)?,
            EditEvent::CommitKeyReleased => self.commit_key_released(),
        };

        self.refresh_display();
        Ok(outcome)
    }

    fn tags(&self) -> Vec<&str> {
        self.model.values()
    }

    fn render(&mut self) -> &Display {
        self.refresh_display();
        &self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DisplaySegment, VisualToken};
    use itertools::Itertools;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn chip(text: &str) -> VisualToken {
        VisualToken::new(&format!("({})", text), 10)
    }

    type Control = TagEditText<fn(&str) -> VisualToken>;

    fn tracking() -> Control {
        TagEditText::new(Strategy::Tracking, ',', chip as fn(&str) -> VisualToken)
    }

    fn delimited() -> Control {
        TagEditText::new(Strategy::Delimited, ',', chip as fn(&str) -> VisualToken)
    }

    fn ranges(control: &Control) -> Vec<(&str, usize, usize)> {
        control
            .model()
            .iter()
            .map(|t| (t.value.as_str(), t.from, t.to))
            .collect()
    }

    fn flatten(display: &Display) -> String {
        display
            .segments()
            .iter()
            .map(|s| match s {
                DisplaySegment::Text(t) => t.clone(),
                DisplaySegment::Token { token, .. } => token.label().to_owned(),
            })
            .collect()
    }

    #[test]
    fn commit_produces_single_tag() {
        let mut c = tracking();
        c.type_text("hello").unwrap();

        let outcome = c.commit().unwrap();
        assert_eq!(outcome, EditOutcome::Committed(Tag::new("hello", 0, 5)));
        assert_eq!(ranges(&c), vec![("hello", 0, 5)]);
        assert_eq!(flatten(c.display()), "(hello)");
        assert_eq!(c.display().caret(), 1);
    }

    #[test]
    fn sequential_commits_shift_correctly() {
        let mut c = tracking();
        c.type_text("a").unwrap();
        c.commit().unwrap();
        c.type_text("b").unwrap();
        c.commit().unwrap();

        assert_eq!(ranges(&c), vec![("a", 0, 1), ("b", 1, 2)]);
        assert_eq!(c.tags(), vec!["a", "b"]);
        assert_eq!(flatten(c.display()), "(a)(b)");
    }

    #[test]
    fn commit_with_nothing_pending() {
        let mut c = tracking();
        assert_eq!(c.commit().unwrap(), EditOutcome::Unchanged);

        c.type_text("x").unwrap();
        c.commit().unwrap();
        assert_eq!(c.commit().unwrap(), EditOutcome::Unchanged);
        assert_eq!(c.tags(), vec!["x"]);
    }

    #[test]
    fn whole_tag_deletion() {
        let mut c = tracking();
        c.type_text("x").unwrap();
        c.commit().unwrap();

        let outcome = c
            .apply_edit(
                EditOrigin::User,
                EditEvent::TextWillDelete { at: 0, count: 1 },
            )
            .unwrap();

        assert_eq!(
            outcome,
            EditOutcome::Changed {
                destroyed: vec![Tag::new("x", 0, 1)]
            }
        );
        assert!(c.model().is_empty());
        assert_eq!(c.text(), "");
    }

    #[test]
    fn filter_rejects_delimiter() {
        let mut c = tracking();
        c.type_text("ab").unwrap();

        assert_eq!(c.type_text(",").unwrap(), EditOutcome::Filtered);
        assert_eq!(c.type_text("c,d").unwrap(), EditOutcome::Filtered);
        assert_eq!(c.text(), "ab");

        c.type_text("c").unwrap();
        assert_eq!(c.text(), "abc");
    }

    #[test]
    fn backspace_removes_whole_tag() {
        let mut c = tracking();
        c.type_text("foo").unwrap();
        c.commit().unwrap();
        c.type_text("ba").unwrap();

        // Pending text goes a character at a time...
        c.backspace().unwrap();
        assert_eq!(c.text(), "foob");
        c.backspace().unwrap();
        assert_eq!(c.text(), "foo");
        assert_eq!(c.tags(), vec!["foo"]);

        // ...but a tag goes all at once
        c.backspace().unwrap();
        assert_eq!(c.text(), "");
        assert!(c.model().is_empty());

        assert_eq!(c.backspace().unwrap(), EditOutcome::Unchanged);
    }

    #[test]
    fn unaligned_deletion_leaves_tag_stale() {
        let mut c = tracking();
        c.type_text("hello").unwrap();
        c.commit().unwrap();

        // Deleting the final 'o' starts inside the tag, so the tag isn't touched
        c.apply_edit(
            EditOrigin::User,
            EditEvent::TextWillDelete { at: 4, count: 1 },
        )
        .unwrap();

        assert_eq!(c.text(), "hell");
        assert_eq!(ranges(&c), vec![("hello", 0, 5)]);
        // The stale tag no longer fits, so it's displayed literally
        assert_eq!(flatten(c.display()), "hell");

        // Nothing is pending after a tag that runs past the end
        assert_eq!(c.commit().unwrap(), EditOutcome::Unchanged);
    }

    #[test]
    fn out_of_bounds_edits_are_rejected() {
        let mut c = tracking();
        c.type_text("ab").unwrap();
        c.commit().unwrap();

        let res = c.apply_edit(
            EditOrigin::User,
            EditEvent::TextInserted {
                at: 5,
                text: "x".into(),
            },
        );
        assert_eq!(res, Err(EditError::InsertOutOfBounds { at: 5, len: 2 }));

        let res = c.apply_edit(
            EditOrigin::User,
            EditEvent::TextWillDelete { at: 0, count: 3 },
        );
        assert_eq!(
            res,
            Err(EditError::DeleteOutOfBounds {
                at: 0,
                count: 3,
                len: 2
            })
        );

        assert_eq!(c.text(), "ab");
        assert_eq!(ranges(&c), vec![("ab", 0, 2)]);
    }

    #[test]
    fn programmatic_edits_are_ignored() {
        let mut c = tracking();
        c.type_text("abc").unwrap();

        let outcome = c
            .apply_edit(
                EditOrigin::Programmatic,
                EditEvent::TextWillDelete { at: 0, count: 3 },
            )
            .unwrap();
        assert_eq!(outcome, EditOutcome::Ignored);
        assert_eq!(c.text(), "abc");
    }

    #[test]
    fn selection_is_pinned_to_end() {
        let mut c = tracking();
        c.type_text("abc").unwrap();

        assert_eq!(c.set_selection(0, 0), Selection::at(3));
        assert_eq!(c.set_selection(1, 3), Selection::at(3));
        assert_eq!(c.set_selection(3, 3), Selection::at(3));
        assert_eq!(c.selection(), Selection::at(3));
    }

    #[test]
    fn remove_tag_splices_text() {
        let mut c = tracking();
        for word in &["one", "two", "three"] {
            c.type_text(word).unwrap();
            c.commit().unwrap();
        }
        c.type_text("fo").unwrap();

        assert_eq!(c.remove_tag("two"), Some(Tag::new("two", 3, 6)));
        assert_eq!(c.text(), "onethreefo");
        assert_eq!(ranges(&c), vec![("one", 0, 3), ("three", 3, 8)]);
        assert_eq!(flatten(c.display()), "(one)(three)fo");
        assert_eq!(c.selection(), Selection::at(10));

        assert_eq!(c.remove_tag("two"), None);

        // The splice didn't get processed as an edit; committing still works from the new end
        c.commit().unwrap();
        assert_eq!(c.tags(), vec!["one", "three", "fo"]);
        assert_eq!(c.model().check_invariants(), Ok(()));
    }

    #[test]
    fn stale_tag_is_not_removed() {
        let mut c = tracking();
        c.type_text("ab").unwrap();
        c.commit().unwrap();
        c.type_text("cd").unwrap();
        c.commit().unwrap();

        // Starts inside "cd", so its range is left running past the end of the text
        c.apply_edit(
            EditOrigin::User,
            EditEvent::TextWillDelete { at: 3, count: 1 },
        )
        .unwrap();
        assert_eq!(c.text(), "abc");

        assert_eq!(c.remove_tag("cd"), None);
        assert_eq!(c.text(), "abc");
        assert_eq!(ranges(&c), vec![("ab", 0, 2), ("cd", 2, 4)]);

        // The stale tag isn't displayed, so it can't be clicked either
        assert_eq!(c.click_token(1), None);
        assert_eq!(ranges(&c), vec![("ab", 0, 2), ("cd", 2, 4)]);
    }

    #[test]
    fn click_removes_exact_duplicate() {
        let mut c = tracking();
        for word in &["x", "y", "x"] {
            c.type_text(word).unwrap();
            c.commit().unwrap();
        }

        // Clicking the second "x" removes that one, not the first
        assert_eq!(c.click_token(2), Some(Tag::new("x", 2, 3)));
        assert_eq!(ranges(&c), vec![("x", 0, 1), ("y", 1, 2)]);

        // By value, only the first match is ever removed
        assert_eq!(c.remove_tag("x"), Some(Tag::new("x", 0, 1)));
        assert_eq!(ranges(&c), vec![("y", 0, 1)]);
        assert_eq!(c.text(), "y");

        assert_eq!(c.click_token(4), None);
    }

    #[test]
    fn delimited_round_trip() {
        let mut c = delimited();
        for ch in "a,b,c,".chars() {
            c.type_text(&ch.to_string()).unwrap();
        }

        assert_eq!(ranges(&c), vec![("a", 0, 1), ("b", 2, 3), ("c", 4, 5)]);
        assert_eq!(flatten(c.display()), "(a),(b),(c),");
    }

    #[test]
    fn delimited_only_resegments_on_delimiter() {
        let mut c = delimited();
        c.type_text("ab,c").unwrap();
        assert_eq!(c.tags(), vec!["ab"]);

        c.type_text("d").unwrap();
        assert_eq!(c.tags(), vec!["ab"]);

        c.type_text(",").unwrap();
        assert_eq!(ranges(&c), vec![("ab", 0, 2), ("cd", 3, 5)]);

        // The commit key does nothing here
        assert_eq!(c.commit().unwrap(), EditOutcome::Unchanged);
    }

    #[test]
    fn delimited_insert_before_tags() {
        let mut c = delimited();
        c.type_text("a,b,").unwrap();

        c.apply_edit(
            EditOrigin::User,
            EditEvent::TextInserted {
                at: 0,
                text: "x".into(),
            },
        )
        .unwrap();

        assert_eq!(c.text(), "xa,b,");
        assert_eq!(ranges(&c), vec![("xa", 0, 2), ("b", 3, 4)]);
        for tag in c.model() {
            assert_eq!(c.buffer().slice(tag.range()), Some(tag.value.as_str()));
        }
        assert_eq!(flatten(c.display()), "(xa),(b),");
    }

    #[test]
    fn delimited_leading_delimiter() {
        let mut c = delimited();
        assert!(matches!(c.type_text(",").unwrap(), EditOutcome::Changed { .. }));
        assert!(c.tags().is_empty());

        c.type_text("x,").unwrap();
        assert_eq!(ranges(&c), vec![("x", 1, 2)]);
    }

    #[test]
    fn delimited_backspace() {
        let mut c = delimited();
        c.type_text("a,bc,").unwrap();

        // Removes the trailing delimiter, which un-commits "bc"
        c.backspace().unwrap();
        assert_eq!(c.text(), "a,bc");
        assert_eq!(c.tags(), vec!["a"]);

        c.backspace().unwrap();
        c.backspace().unwrap();
        assert_eq!(c.text(), "a,");
        assert_eq!(flatten(c.display()), "(a),");
    }

    #[test]
    fn delimited_remove_tag_keeps_delimiters() {
        let mut c = delimited();
        c.type_text("a,b,").unwrap();

        assert_eq!(c.remove_tag("a"), Some(Tag::new("a", 0, 1)));
        assert_eq!(c.text(), ",b,");
        assert_eq!(ranges(&c), vec![("b", 1, 2)]);
    }

    #[test]
    fn render_is_idempotent() {
        let mut c = tracking();
        c.type_text("ab").unwrap();
        c.commit().unwrap();
        c.type_text("cd").unwrap();

        let first = c.render().clone();
        let second = c.render().clone();
        assert_eq!(first, second);
        assert_eq!(flatten(&first), "(ab)cd");
    }

    // Drives both strategies with random typing, committing, and backspacing, checking that the
    // model always lines up with the buffer
    #[test]
    fn random_edits_keep_invariants() {
        let mut rng = SmallRng::seed_from_u64(0x7a9);
        let alphabet = ['a', 'b', 'é', ',', ' '];

        for &strategy in &[Strategy::Tracking, Strategy::Delimited] {
            let mut c = TagEditText::new(strategy, ',', chip as fn(&str) -> VisualToken);

            for _ in 0..500 {
                match rng.gen_range(0..10) {
                    0..=5 => {
                        let ch = alphabet[rng.gen_range(0..alphabet.len())];
                        c.type_text(&ch.to_string()).unwrap();
                    }
                    6 | 7 => {
                        c.commit().unwrap();
                    }
                    _ => {
                        c.backspace().unwrap();
                    }
                }

                assert_eq!(c.model().check_invariants(), Ok(()), "text {:?}", c.text());

                for tag in c.model() {
                    assert_eq!(c.buffer().slice(tag.range()), Some(tag.value.as_str()));
                }

                let sorted = c.model().iter().tuple_windows().all(|(a, b)| a.to <= b.from);
                assert!(sorted);
                assert_eq!(c.selection(), Selection::at(c.buffer().len()));
            }
        }
    }
}
