//! Utilities for interacting with the terminal

use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use std::io;
use std::sync::atomic::{AtomicU8, Ordering};

// The status of the terminal - changed only by `prepare_terminal` and `cleanup_terminal`.
// Because we can't have atomic enums, we represent the different states as values here:
//   0: Unprepared - in the default state
//   1: Partially prepared - raw mode is enabled, but not in the alternate screen
//   2: Fully prepared - raw mode enabled + in alternate screen
static TERM_STATUS: AtomicU8 = AtomicU8::new(0);

/// Prepares the terminal for use by the control
///
/// This function does a couple things: (1) Enable raw mode, and (2) switch to the alternate
/// screen. Calling it again before [`cleanup_terminal`] does nothing.
pub fn prepare_terminal() -> crossterm::Result<()> {
    if TERM_STATUS
        .compare_exchange(0, 1, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        log::warn!("tried to prepare terminal twice");
        return Ok(());
    }

    if let Err(e) = crossterm::terminal::enable_raw_mode() {
        TERM_STATUS.store(0, Ordering::SeqCst);
        return Err(e);
    }

    match io::stdout().execute(EnterAlternateScreen) {
        Ok(_) => {
            TERM_STATUS.store(2, Ordering::SeqCst);
            Ok(())
        }
        Err(e) => {
            // We already successfully enabled raw mode, so if entering the alternate screen fails,
            // we should try to undo that. We'll ignore any errors because we already have one.
            let _ = crossterm::terminal::disable_raw_mode();
            TERM_STATUS.store(0, Ordering::SeqCst);
            Err(e)
        }
    }
}

/// Undoes whatever [`prepare_terminal`] managed to do
pub fn cleanup_terminal() -> crossterm::Result<()> {
    match TERM_STATUS.swap(0, Ordering::SeqCst) {
        0 => Ok(()),
        1 => crossterm::terminal::disable_raw_mode(),
        _ => {
            io::stdout().execute(LeaveAlternateScreen)?;
            crossterm::terminal::disable_raw_mode()
        }
    }
}
