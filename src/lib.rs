//! A text-input control that turns typed text into tags
//!
//! The user types free text into a single-line buffer; completed pieces of that text get
//! "committed" as tags, which a host renders as chips in place of the literal characters. The
//! tricky part isn't drawing the chip, it's keeping the list of tag ranges in sync with a buffer
//! that keeps changing underneath it. That's what most of this crate is about.
//!
//! The pieces, leaves first:
//!
//!  * [`TextBuffer`] - the character sequence being edited. All offsets in this crate are
//!    *character* offsets into it.
//!  * [`TagRangeModel`] - the ordered, non-overlapping list of [`Tag`]s.
//!  * [`EditTranslator`] - plans the offset adjustments that a primitive edit requires.
//!  * [`TagCommitEngine`] - decides when pending text becomes a tag.
//!  * [`RenderProjector`] - substitutes a [`VisualToken`] for each tag's range.
//!  * [`TagEditText`] - the control tying all of these together.
//!
//! There are two ways of deriving tags from text, selected by [`Strategy`]. `Tracking` keeps
//! explicit per-keystroke bookkeeping and commits on a dedicated key; `Delimited` re-derives the
//! whole tag list from scratch whenever the delimiter character is typed.

// "todo" categories:
//  * TODO-CORRECTNESS: Where the code might not be correct, but works for now
//  * TODO-FEATURE: Where a feature should be added

#![warn(clippy::style, clippy::perf)]
#![deny(
    clippy::perf,
    clippy::len_zero,
    clippy::redundant_closure,
    unused_must_use
)]

pub mod buffer;
pub mod commit;
pub mod config;
pub mod control;
pub mod edit;
pub mod error;
pub mod filter;
pub mod host;
pub mod logger;
pub mod render;
pub mod tags;
mod utils;

pub use buffer::TextBuffer;
pub use commit::TagCommitEngine;
pub use config::{CommitKey, Config, ConfigBuilder, ConfigError};
pub use control::{EditOutcome, EditableTaggedText, Selection, Strategy, TagEditText};
pub use edit::{EditError, EditEvent, EditOrigin, EditPlan, EditTranslator};
pub use error::Error;
pub use filter::DelimiterFilter;
pub use render::{Display, DisplaySegment, RenderProjector, TagRenderer, VisualToken};
pub use tags::{InvariantError, Tag, TagRangeModel};
pub use utils::{XFrom, XInto};

/// The delimiter used when none is configured
pub const DEFAULT_DELIMITER: char = ',';
