//! A terminal host for the control
//!
//! This is the "platform" half of the control: it translates crossterm's key events into
//! [`EditEvent`](crate::EditEvent)s (by way of the convenience methods on [`TagEditText`]) and
//! draws the resulting [`Display`] onto a single line of the alternate screen. Chips are drawn
//! with [`ChipRenderer`] and highlighted with `ansi_term`.

use ansi_term::Colour;
use crossterm::event::{self, Event};
use crossterm::terminal::{self, ClearType};
use crossterm::{cursor, queue, style};
use std::convert::TryFrom;
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

pub mod chip;
pub mod key;
pub mod term;

use crate::config::{CommitKey, Config};
use crate::control::{EditOutcome, EditableTaggedText, TagEditText};
use crate::edit::EditError;
use crate::error::Error;
use crate::render::{Display, DisplaySegment, TagRenderer};
use chip::ChipRenderer;
use key::{Action, KeyEvent};

const PROMPT: &str = "tags> ";

/// Runs the control interactively until the user exits, returning the final list of tags
///
/// The terminal is always restored before returning, even if the event loop failed.
pub fn run(config: &Config) -> Result<Vec<String>, Error> {
    let mut control = TagEditText::from_config(config, ChipRenderer::new(config.chip_width));

    term::prepare_terminal()?;
    let res = event_loop(&mut control, config.commit_key);

    if let Err(e) = term::cleanup_terminal() {
        log::error!("failed to restore terminal: {}", e);
    }

    res?;
    Ok(control.tags().into_iter().map(String::from).collect())
}

fn event_loop<R: TagRenderer>(
    control: &mut TagEditText<R>,
    commit_key: CommitKey,
) -> Result<(), Error> {
    let mut stdout = io::stdout();
    draw(&mut stdout, control.render(), commit_key)?;

    loop {
        let key = match event::read()? {
            Event::Key(k) => KeyEvent::from(k),
            Event::Resize(_, _) => {
                draw(&mut stdout, control.display(), commit_key)?;
                continue;
            }
            Event::Mouse(_) => continue,
        };

        let action = match key.action(commit_key) {
            Some(a) => a,
            None => {
                log::trace!("unbound key {:?}", key);
                continue;
            }
        };

        match action {
            Action::Exit => return Ok(()),
            Action::Type(c) => report(control.type_text(c.encode_utf8(&mut [0; 4]))),
            Action::Backspace => report(control.backspace()),
            Action::Commit => report(control.commit()),
            Action::RemoveChip(n) => match control.click_token(n) {
                Some(tag) => log::debug!("removed chip {} ({:?})", n, tag.value),
                None => log::debug!("no chip to remove at {}", n),
            },
        }

        draw(&mut stdout, control.display(), commit_key)?;
    }
}

fn report(res: Result<EditOutcome, EditError>) {
    match res {
        Ok(outcome) => log::trace!("edit outcome: {:?}", outcome),
        Err(e) => log::error!("{}", e),
    }
}

/// Draws the display on the first line of the screen, with a short hint below it
fn draw(out: &mut impl Write, display: &Display, commit_key: CommitKey) -> crossterm::Result<()> {
    let chip_style = Colour::Black.on(Colour::Cyan);

    queue!(
        out,
        terminal::Clear(ClearType::All),
        cursor::MoveTo(0, 0),
        style::Print(PROMPT)
    )?;

    let mut col = UnicodeWidthStr::width(PROMPT);
    for seg in display.segments() {
        match seg {
            DisplaySegment::Text(text) => {
                queue!(out, style::Print(text))?;
                col += UnicodeWidthStr::width(text.as_str());
            }
            DisplaySegment::Token { token, .. } => {
                queue!(out, style::Print(chip_style.paint(token.label())))?;
                col += token.width();
            }
        }
    }

    let hint = format!(
        "{} commits, alt+1..9 removes a chip, esc exits",
        match commit_key {
            CommitKey::Enter => "enter",
            CommitKey::Tab => "tab",
        }
    );

    let caret_col = u16::try_from(col).unwrap_or(u16::MAX);
    queue!(
        out,
        cursor::MoveTo(0, 2),
        style::Print(Colour::Fixed(8).paint(hint)),
        cursor::MoveTo(caret_col, 0)
    )?;

    out.flush()?;
    Ok(())
}
