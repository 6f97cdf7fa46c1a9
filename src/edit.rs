//! Primitive edit events and their translation into tag offset adjustments
//!
//! The host adapts whatever its platform produces into a stream of [`EditEvent`]s. For the
//! tracking strategy, each event that changes the length of the buffer needs a matching
//! adjustment of the tags that follow it; that adjustment is computed up front by the
//! [`EditTranslator`] into an [`EditPlan`] and only then applied to the model. Computing first and
//! applying second means the model is never observed half-updated, and we never need to mutate the
//! list of tags while iterating over it.

use smallvec::SmallVec;
use std::fmt::{self, Display, Formatter};

use crate::tags::{Tag, TagRangeModel};

/// A single primitive edit, in the order the user performed it
///
/// Positions and counts are in characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditEvent {
    /// `text` is being inserted so that it starts at `at`
    TextInserted { at: usize, text: String },
    /// `count` characters starting at `at` are about to be deleted
    ///
    /// This is observed *before* the buffer changes, so offsets refer to the text as it was.
    TextWillDelete { at: usize, count: usize },
    /// The commit key (e.g. Enter) was released
    CommitKeyReleased,
}

/// Where an edit came from
///
/// Setting the displayed text programmatically produces a change notification just like a user
/// edit does. If we treated both the same, the control would process its own rendering output as
/// if the user had typed it. Tagging the origin explicitly means the core never has to guess.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EditOrigin {
    User,
    Programmatic,
}

/// An edit that couldn't be applied because it addresses text outside the buffer
///
/// Rejected edits leave both the buffer and the tags unchanged.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EditError {
    InsertOutOfBounds { at: usize, len: usize },
    DeleteOutOfBounds { at: usize, count: usize, len: usize },
}

impl Display for EditError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        use EditError::*;

        match self {
            InsertOutOfBounds { at, len } => write!(
                f,
                "cannot insert at offset {} in buffer of length {}",
                at, len
            ),
            DeleteOutOfBounds { at, count, len } => write!(
                f,
                "cannot delete {} characters at offset {} in buffer of length {}",
                count, at, len
            ),
        }
    }
}

impl std::error::Error for EditError {}

/// The full set of changes to make to a [`TagRangeModel`] for a single edit
///
/// All indexes refer to the model as it was when the plan was made. Shifts are applied first,
/// then the destroyed tags are removed (highest index first), so neither step disturbs the
/// indexes used by the other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditPlan {
    destroy: SmallVec<[usize; 2]>,
    shifts: SmallVec<[(usize, isize); 4]>,
}

impl EditPlan {
    /// Returns whether applying the plan would change nothing
    pub fn is_noop(&self) -> bool {
        self.destroy.is_empty() && self.shifts.is_empty()
    }

    /// The indexes of the tags that the plan removes
    pub fn destroyed(&self) -> &[usize] {
        &self.destroy
    }

    /// Applies the plan, returning the removed tags in their original order
    pub fn apply(self, model: &mut TagRangeModel) -> Vec<Tag> {
        for &(index, delta) in &self.shifts {
            model.shift_one(index, delta);
        }

        let mut removed: Vec<Tag> = self.destroy.iter().rev()
            .filter_map(|&index| model.remove_at(index))
            .collect();
        removed.reverse();
        removed
    }
}

/// Computes the offset adjustments required by the tracking strategy
///
/// Nothing here looks at the buffer itself; the translator only needs the positions involved in
/// the edit and the current state of the model.
#[derive(Debug, Copy, Clone, Default)]
pub struct EditTranslator;

impl EditTranslator {
    /// Plans the adjustment for a pending deletion of `count` characters starting at `at`
    ///
    /// A tag starting exactly at `at` marks this as a whole-tag deletion: it's destroyed, along
    /// with any further tags that the deletion covers entirely, and every tag after those is moved
    /// left by `count`.
    ///
    /// If no tag starts exactly at `at`, the plan is empty. In particular, a deletion that begins
    /// strictly *inside* a tag neither shrinks nor destroys it, even though the buffer changes.
    /// That leaves the model out of step with the buffer until the tag is removed some other way;
    /// this mirrors the behavior of the widget this control models and is intentionally not
    /// papered over.
    pub fn plan_delete(&self, model: &TagRangeModel, at: usize, count: usize) -> EditPlan {
        let mut plan = EditPlan::default();
        if count == 0 {
            return plan;
        }

        let end = at.saturating_add(count);
        let mut found = false;

        for (index, tag) in model.iter().enumerate() {
            if !found {
                if tag.from == at {
                    found = true;
                    plan.destroy.push(index);
                }
                continue;
            }

            if tag.to <= end {
                plan.destroy.push(index);
            } else {
                if tag.from < end {
                    // TODO-CORRECTNESS: the deletion ends part-way through this tag. Shifting it
                    // leaves its range mismatched with its value, same as a deletion starting
                    // inside a tag.
                    log::warn!(
                        "deletion {}..{} ends inside tag {:?} at {}..{}",
                        at,
                        end,
                        tag.value,
                        tag.from,
                        tag.to
                    );
                }
                plan.shifts.push((index, -(count as isize)));
            }
        }

        if !found {
            log::trace!(
                "deletion {}..{} doesn't start at a tag boundary; tags unchanged",
                at,
                end
            );
        }

        plan
    }

    /// Plans the adjustment for `inserted` characters being inserted at `at`
    ///
    /// Every tag starting at or after `at` moves right. A tag strictly containing `at` is left
    /// alone, for the same reason given in [`plan_delete`](Self::plan_delete).
    pub fn plan_insert(&self, model: &TagRangeModel, at: usize, inserted: usize) -> EditPlan {
        let mut plan = EditPlan::default();
        if inserted == 0 {
            return plan;
        }

        for (index, tag) in model.iter().enumerate() {
            if tag.from >= at {
                plan.shifts.push((index, inserted as isize));
            } else if tag.to > at {
                log::trace!(
                    "insertion at {} is inside tag {:?}; tag left unchanged",
                    at,
                    tag.value
                );
            }
        }

        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(tags: &[(&str, usize, usize)]) -> TagRangeModel {
        let mut m = TagRangeModel::new();
        for &(v, from, to) in tags {
            m.insert_tag(v, from, to);
        }
        m
    }

    #[test]
    fn whole_tag_deletion() {
        let mut m = model(&[("x", 0, 1)]);
        let plan = EditTranslator.plan_delete(&m, 0, 1);

        assert_eq!(plan.destroyed(), &[0]);
        assert_eq!(plan.apply(&mut m), vec![Tag::new("x", 0, 1)]);
        assert!(m.is_empty());
    }

    #[test]
    fn later_tags_shift_left() {
        let mut m = model(&[("ab", 0, 2), ("cd", 2, 4), ("e", 4, 5)]);
        let removed = EditTranslator.plan_delete(&m, 2, 2).apply(&mut m);

        assert_eq!(removed, vec![Tag::new("cd", 2, 4)]);
        assert_eq!(m, model(&[("ab", 0, 2), ("e", 2, 3)]));
        assert_eq!(m.check_invariants(), Ok(()));
    }

    #[test]
    fn covered_tags_destroyed_together() {
        let mut m = model(&[("a", 0, 1), ("b", 1, 2), ("c", 2, 3), ("d", 3, 4)]);
        let removed = EditTranslator.plan_delete(&m, 1, 2).apply(&mut m);

        assert_eq!(removed, vec![Tag::new("b", 1, 2), Tag::new("c", 2, 3)]);
        assert_eq!(m, model(&[("a", 0, 1), ("d", 1, 2)]));
    }

    #[test]
    fn unaligned_deletion_is_a_noop() {
        let m = model(&[("hello", 0, 5), ("x", 5, 6)]);

        // Deleting the last character of "hello" starts inside it
        let plan = EditTranslator.plan_delete(&m, 4, 1);
        assert!(plan.is_noop());

        // So does deleting in the pending text after all tags
        let plan = EditTranslator.plan_delete(&m, 6, 1);
        assert!(plan.is_noop());
    }

    #[test]
    fn insertion_shifts_following_tags() {
        let mut m = model(&[("a", 0, 1), ("b", 1, 2)]);

        EditTranslator.plan_insert(&m, 1, 3).apply(&mut m);
        assert_eq!(m, model(&[("a", 0, 1), ("b", 4, 5)]));

        // Appending at the end moves nothing
        let plan = EditTranslator.plan_insert(&m, 5, 2);
        assert!(plan.is_noop());
    }
}
