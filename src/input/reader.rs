//! Line editor state machine
//!
//! A read moves through `Idle -> Reading -> Completed`. While reading, each
//! key event is applied to the edit buffer one at a time and the editor
//! reports which part of the line needs to be drawn again; the screen does
//! the drawing. An explicit Break abandons the read.
//!
//! The editor remembers where on the character grid its buffer starts so
//! a line that wraps across rows (or scrolls the screen) can be redrawn in
//! place.

use super::Key;

/// Longest line a read accepts; further characters are ignored
pub const MAX_INPUT_LEN: usize = 256;

/// Result of feeding one key to the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Still reading. `redraw_from` is the first buffer index whose
    /// character changed, or None when only the edit cursor moved.
    Pending { redraw_from: Option<usize> },
    /// Enter was pressed; the finished line
    Completed(String),
    /// The read was abandoned
    Aborted,
}

/// State of a read in progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEditor {
    /// Identifies this read among successive ones
    id: u64,
    prompt: String,
    buffer: Vec<char>,
    /// Insertion point, `0..=buffer.len()`
    cursor: usize,
    /// Grid cell of the first buffer character; the row goes negative if
    /// the start has scrolled off the top
    start_col: usize,
    start_row: isize,
    /// Characters per screen row
    line_width: usize,
    max_len: usize,
}

impl LineEditor {
    /// Start a read with `prefill` already in the buffer and the edit
    /// cursor after it
    pub fn new(id: u64, prompt: &str, prefill: &str, line_width: usize, max_len: usize) -> Self {
        let buffer: Vec<char> = prefill
            .chars()
            .filter(|c| !c.is_control())
            .take(max_len)
            .collect();
        Self {
            id,
            prompt: prompt.to_string(),
            cursor: buffer.len(),
            buffer,
            start_col: 0,
            start_row: 0,
            line_width: line_width.max(1),
            max_len,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn buffer(&self) -> &[char] {
        &self.buffer
    }

    pub fn text(&self) -> String {
        self.buffer.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Edit cursor position within the buffer
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Record the grid cell where the buffer starts
    pub fn set_anchor(&mut self, col: usize, row: usize) {
        self.start_col = col;
        self.start_row = row as isize;
    }

    /// The screen scrolled up by `lines` rows under the buffer
    pub fn scrolled(&mut self, lines: u64) {
        self.start_row -= lines as isize;
    }

    /// Grid cell holding buffer index `index`
    pub fn position_of(&self, index: usize) -> (usize, isize) {
        let linear = self.start_col + index;
        (
            linear % self.line_width,
            self.start_row + (linear / self.line_width) as isize,
        )
    }

    /// Apply one key
    pub fn handle(&mut self, key: Key) -> EditOutcome {
        let len = self.buffer.len();
        match key {
            Key::Char(c) if !c.is_control() => {
                if len >= self.max_len {
                    return EditOutcome::Pending { redraw_from: None };
                }
                self.buffer.insert(self.cursor, c);
                self.cursor += 1;
                EditOutcome::Pending {
                    redraw_from: Some(self.cursor - 1),
                }
            }
            Key::Char(_) => EditOutcome::Pending { redraw_from: None },
            Key::Backspace => {
                if self.cursor == 0 {
                    return EditOutcome::Pending { redraw_from: None };
                }
                self.cursor -= 1;
                self.buffer.remove(self.cursor);
                EditOutcome::Pending {
                    redraw_from: Some(self.cursor),
                }
            }
            Key::Delete => {
                if self.cursor >= len {
                    return EditOutcome::Pending { redraw_from: None };
                }
                self.buffer.remove(self.cursor);
                EditOutcome::Pending {
                    redraw_from: Some(self.cursor),
                }
            }
            Key::Left => self.move_to(self.cursor.saturating_sub(1)),
            Key::Right => self.move_to(self.cursor + 1),
            Key::Up => self.move_to(self.cursor.saturating_sub(self.line_width)),
            Key::Down => self.move_to(self.cursor + self.line_width),
            Key::Home => self.move_to(0),
            Key::End => self.move_to(len),
            Key::Enter => EditOutcome::Completed(self.text()),
            Key::Break => EditOutcome::Aborted,
        }
    }

    fn move_to(&mut self, index: usize) -> EditOutcome {
        self.cursor = index.min(self.buffer.len());
        EditOutcome::Pending { redraw_from: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(editor: &mut LineEditor, keys: &[Key]) -> EditOutcome {
        let mut last = EditOutcome::Pending { redraw_from: None };
        for &key in keys {
            last = editor.handle(key);
        }
        last
    }

    #[test]
    fn test_insert_in_middle() {
        let mut editor = LineEditor::new(1, "", "abc", 80, MAX_INPUT_LEN);
        let out = feed(
            &mut editor,
            &[Key::Left, Key::Left, Key::Char('X'), Key::Enter],
        );
        assert_eq!(out, EditOutcome::Completed("aXbc".to_string()));
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut editor = LineEditor::new(1, "", "hello", 80, MAX_INPUT_LEN);
        assert_eq!(
            editor.handle(Key::Backspace),
            EditOutcome::Pending {
                redraw_from: Some(4)
            }
        );
        assert_eq!(editor.text(), "hell");
        editor.handle(Key::Home);
        editor.handle(Key::Delete);
        assert_eq!(editor.text(), "ell");
        // nothing before the cursor
        assert_eq!(
            editor.handle(Key::Backspace),
            EditOutcome::Pending { redraw_from: None }
        );
        editor.handle(Key::End);
        assert_eq!(
            editor.handle(Key::Delete),
            EditOutcome::Pending { redraw_from: None }
        );
        assert_eq!(editor.text(), "ell");
    }

    #[test]
    fn test_cursor_clamped() {
        let mut editor = LineEditor::new(1, "", "ab", 80, MAX_INPUT_LEN);
        feed(&mut editor, &[Key::Right, Key::Right]);
        assert_eq!(editor.cursor(), 2);
        feed(&mut editor, &[Key::Left, Key::Left, Key::Left]);
        assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn test_up_down_move_by_line() {
        let prefill = "x".repeat(25);
        let mut editor = LineEditor::new(1, "", &prefill, 10, MAX_INPUT_LEN);
        editor.handle(Key::Up);
        assert_eq!(editor.cursor(), 15);
        editor.handle(Key::Up);
        editor.handle(Key::Up);
        assert_eq!(editor.cursor(), 0);
        editor.handle(Key::Down);
        assert_eq!(editor.cursor(), 10);
        editor.handle(Key::Down);
        editor.handle(Key::Down);
        assert_eq!(editor.cursor(), 25);
    }

    #[test]
    fn test_length_limit() {
        let mut editor = LineEditor::new(1, "", "abc", 80, 4);
        editor.handle(Key::Char('d'));
        editor.handle(Key::Char('e'));
        assert_eq!(editor.text(), "abcd");
        let long = LineEditor::new(2, "", "abcdefgh", 80, 4);
        assert_eq!(long.text(), "abcd");
        assert_eq!(long.cursor(), 4);
    }

    #[test]
    fn test_break_aborts() {
        let mut editor = LineEditor::new(1, "? ", "abc", 80, MAX_INPUT_LEN);
        assert_eq!(editor.handle(Key::Break), EditOutcome::Aborted);
        assert_eq!(editor.prompt(), "? ");
    }

    #[test]
    fn test_position_wraps_and_scrolls() {
        let mut editor = LineEditor::new(1, "", "", 40, MAX_INPUT_LEN);
        editor.set_anchor(38, 24);
        assert_eq!(editor.position_of(0), (38, 24));
        assert_eq!(editor.position_of(2), (0, 25));
        editor.scrolled(1);
        assert_eq!(editor.position_of(2), (0, 24));
    }
}
