//! Wrapper module around [`KeyEvent`], and the mapping from keys to control actions
//!
//! [`KeyEvent`] is re-defined here (instead of using crossterm's directly) so that the modifiers
//! disregard shift -- typing a capital letter shouldn't look any different from typing a lowercase
//! one -- and so that the commit key can be compared against the configured [`CommitKey`].

use crossterm::event;

use crate::config::CommitKey;
use crate::utils::{XFrom, XInto};

/// A single key input received
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: Option<KeyModifiers>,
}

impl From<event::KeyEvent> for KeyEvent {
    fn from(ev: event::KeyEvent) -> Self {
        Self {
            code: ev.code.into(),
            mods: ev.modifiers.xinto(),
        }
    }
}

/// The keys we care about; everything else is `Other`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Backspace,
    Enter,
    Tab,
    Esc,
    Char(char),
    Other,
}

impl From<event::KeyCode> for KeyCode {
    fn from(code: event::KeyCode) -> KeyCode {
        use KeyCode::*;

        match code {
            event::KeyCode::Backspace => Backspace,
            event::KeyCode::Enter => Enter,
            event::KeyCode::Tab => Tab,
            event::KeyCode::Esc => Esc,
            event::KeyCode::Char(c) => Char(c),
            _ => Other,
        }
    }
}

/// The modifiers attached to a single [`KeyEvent`], disregarding shift
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum KeyModifiers {
    Alt,
    Ctrl,
}

impl XFrom<event::KeyModifiers> for Option<KeyModifiers> {
    fn xfrom(mods: event::KeyModifiers) -> Self {
        use crossterm::event::KeyModifiers as Mods;

        // alt+ctrl can't be typed as a key input on most terminals; if it shows up anyways,
        // ctrl takes precedence.
        if mods.contains(Mods::CONTROL) {
            Some(KeyModifiers::Ctrl)
        } else if mods.contains(Mods::ALT) {
            Some(KeyModifiers::Alt)
        } else {
            None
        }
    }
}

/// Something the user asked the control to do
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Type(char),
    Backspace,
    Commit,
    /// Remove the chip shown at this index, as if it were clicked
    RemoveChip(usize),
    Exit,
}

impl KeyEvent {
    fn matches_commit(&self, commit_key: CommitKey) -> bool {
        matches!(
            (commit_key, self.code),
            (CommitKey::Enter, KeyCode::Enter) | (CommitKey::Tab, KeyCode::Tab)
        )
    }

    /// Maps the key to the action it performs, if any
    ///
    /// Alt+1 through Alt+9 remove the first through ninth chips.
    pub fn action(&self, commit_key: CommitKey) -> Option<Action> {
        use KeyModifiers::{Alt, Ctrl};

        if self.mods.is_none() && self.matches_commit(commit_key) {
            return Some(Action::Commit);
        }

        match (self.mods, self.code) {
            (None, KeyCode::Esc) | (Some(Ctrl), KeyCode::Char('c')) => Some(Action::Exit),
            (None, KeyCode::Backspace) => Some(Action::Backspace),
            (None, KeyCode::Char(c)) => Some(Action::Type(c)),
            (Some(Alt), KeyCode::Char(c @ '1'..='9')) => {
                Some(Action::RemoveChip(c as usize - '1' as usize))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, mods: Option<KeyModifiers>) -> KeyEvent {
        KeyEvent { code, mods }
    }

    #[test]
    fn actions() {
        use KeyCode::*;
        use KeyModifiers::*;

        #[rustfmt::skip]
        let cases: &[(KeyEvent, CommitKey, Option<Action>)] = &[
            (key(Enter, None), CommitKey::Enter, Some(Action::Commit)),
            (key(Enter, None), CommitKey::Tab, None),
            (key(Tab, None), CommitKey::Tab, Some(Action::Commit)),
            (key(Char('x'), None), CommitKey::Enter, Some(Action::Type('x'))),
            (key(Char('c'), Some(Ctrl)), CommitKey::Enter, Some(Action::Exit)),
            (key(Esc, None), CommitKey::Enter, Some(Action::Exit)),
            (key(Backspace, None), CommitKey::Enter, Some(Action::Backspace)),
            (key(Char('1'), Some(Alt)), CommitKey::Enter, Some(Action::RemoveChip(0))),
            (key(Char('9'), Some(Alt)), CommitKey::Enter, Some(Action::RemoveChip(8))),
            (key(Char('0'), Some(Alt)), CommitKey::Enter, None),
            (key(Other, None), CommitKey::Enter, None),
        ];

        for (k, commit, expected) in cases {
            assert_eq!(k.action(*commit), *expected, "key {:?}", k);
        }
    }

    #[test]
    fn shift_is_ignored() {
        use crossterm::event::KeyModifiers as Mods;

        let ev = event::KeyEvent {
            code: event::KeyCode::Char('A'),
            modifiers: Mods::SHIFT,
        };

        assert_eq!(KeyEvent::from(ev), key(KeyCode::Char('A'), None));

        let mods: Option<KeyModifiers> = (Mods::ALT | Mods::CONTROL).xinto();
        assert_eq!(mods, Some(KeyModifiers::Ctrl));
    }
}
