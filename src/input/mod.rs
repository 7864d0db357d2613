//! Keyboard input
//!
//! Keys reach the display as discrete [`Key`] events. Printable characters
//! arrive already translated by the host; control keys that the host
//! reports as "held" go through [`KeyRepeat`], which turns a held key into a
//! first press followed by auto-repeat, the way the machine's keyboard
//! controller did.
//!
//! The line editor driven by these keys lives in [`reader`].

mod reader;

pub use reader::{EditOutcome, LineEditor, MAX_INPUT_LEN};

use serde::{Deserialize, Serialize};

/// Ticks a key must be held before it starts repeating
pub const REPEAT_DELAY: u32 = 40;
/// Ticks between repeats once repeating
pub const REPEAT_INTERVAL: u32 = 5;

/// A keystroke delivered to the display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A printable character
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Enter,
    /// Ctrl+B on the original keyboard; aborts a pending read
    Break,
}

impl Key {
    /// Whether the key inserts text into an edit buffer
    pub fn is_printable(&self) -> bool {
        matches!(self, Key::Char(c) if !c.is_control())
    }

    /// Translate a character from a text stream into a key.
    ///
    /// Newline and carriage return map to Enter, DEL and backspace to
    /// Backspace; other control characters have no key.
    pub fn from_char(c: char) -> Option<Key> {
        match c {
            '\n' | '\r' => Some(Key::Enter),
            '\u{8}' | '\u{7f}' => Some(Key::Backspace),
            '\u{2}' => Some(Key::Break),
            c if c.is_control() => None,
            c => Some(Key::Char(c)),
        }
    }
}

/// Auto-repeat for held keys
#[derive(Debug, Clone, Default)]
pub struct KeyRepeat {
    /// Keys currently held and the number of ticks they have been down
    held: Vec<(Key, u32)>,
}

impl KeyRepeat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a key held for `ticks` ticks fires on this tick
    fn fires(ticks: u32) -> bool {
        ticks == 1 || (ticks >= REPEAT_DELAY && (ticks - REPEAT_DELAY) % REPEAT_INTERVAL == 0)
    }

    /// Advance one tick given the keys held right now, appending the keys
    /// to deliver this tick to `out`. Keys no longer held are forgotten, so
    /// pressing one again fires immediately.
    pub fn tick(&mut self, held: &[Key], out: &mut Vec<Key>) {
        self.held.retain(|(key, _)| held.contains(key));
        for &key in held {
            let ticks = match self.held.iter_mut().find(|(k, _)| *k == key) {
                Some((_, ticks)) => {
                    *ticks = ticks.saturating_add(1);
                    *ticks
                }
                None => {
                    self.held.push((key, 1));
                    1
                }
            };
            if Self::fires(ticks) {
                out.push(key);
            }
        }
    }

    /// Forget every held key
    pub fn reset(&mut self) {
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(repeat: &mut KeyRepeat, held: &[Key], ticks: u32) -> usize {
        let mut out = Vec::new();
        for _ in 0..ticks {
            repeat.tick(held, &mut out);
        }
        out.len()
    }

    #[test]
    fn test_first_press_fires_immediately() {
        let mut repeat = KeyRepeat::new();
        let mut out = Vec::new();
        repeat.tick(&[Key::Left], &mut out);
        assert_eq!(out, vec![Key::Left]);
    }

    #[test]
    fn test_repeat_schedule() {
        let mut repeat = KeyRepeat::new();
        // tick 1 fires, then nothing until tick 40
        assert_eq!(run(&mut repeat, &[Key::Right], 39), 1);
        assert_eq!(run(&mut repeat, &[Key::Right], 1), 1);
        // every fifth tick afterwards
        assert_eq!(run(&mut repeat, &[Key::Right], 10), 2);
    }

    #[test]
    fn test_release_resets() {
        let mut repeat = KeyRepeat::new();
        assert_eq!(run(&mut repeat, &[Key::Backspace], 3), 1);
        assert_eq!(run(&mut repeat, &[], 1), 0);
        assert_eq!(run(&mut repeat, &[Key::Backspace], 1), 1);
    }

    #[test]
    fn test_from_char() {
        assert_eq!(Key::from_char('a'), Some(Key::Char('a')));
        assert_eq!(Key::from_char('\n'), Some(Key::Enter));
        assert_eq!(Key::from_char('\u{7f}'), Some(Key::Backspace));
        assert_eq!(Key::from_char('\u{1}'), None);
        assert!(Key::Char('x').is_printable());
        assert!(!Key::Char('\t').is_printable());
        assert!(!Key::Enter.is_printable());
    }
}
