//! Text console
//!
//! Character-grid output on top of the framebuffer. Each character is an
//! opaque 8x10 cell drawn in pen on paper. Output goes into the selected
//! text box, and cursor positions are relative to that box. The cursor
//! advances eagerly: it wraps to the next row as soon as a row of the box is
//! full, and a wrap past its last row scrolls the box up one text row.
//!
//! Line reads are also driven from here: the editor in
//! [`crate::input::LineEditor`] decides what changed and the console
//! redraws that part of the line.

use tracing::debug;

use super::mode::{CELL_HEIGHT, CELL_WIDTH};
use super::screen::Screen;
use crate::input::{EditOutcome, Key, LineEditor};
use crate::raster::{self, glyph};

impl Screen {
    /// Write one character at the cursor and advance it.
    ///
    /// `'\n'` and `'\r'` start a new line instead of drawing.
    pub fn put(&mut self, c: char) {
        if c == '\n' || c == '\r' {
            self.newline();
            return;
        }
        let g = glyph(c, self.charset());
        let (col, row) = (self.cursor().col, self.cursor().row);
        let (pen, paper) = (self.pen(), self.paper());
        raster::cell(
            self.framebuffer_mut(),
            &g,
            col * CELL_WIDTH,
            row * CELL_HEIGHT,
            pen,
            paper,
        );
        let right = self.text_box().right;
        let cursor = self.cursor_mut();
        cursor.col += 1;
        if cursor.col > right {
            self.newline();
        }
    }

    /// Write a string at the cursor. No newline is added; `"\r\n"` counts
    /// as a single line break.
    pub fn print(&mut self, text: &str) {
        let mut after_cr = false;
        for c in text.chars() {
            if c == '\n' && after_cr {
                after_cr = false;
                continue;
            }
            after_cr = c == '\r';
            self.put(c);
        }
    }

    /// Move to the start of the next row, scrolling at the bottom of the box
    pub fn newline(&mut self) {
        let text_box = self.text_box();
        let cursor = self.cursor_mut();
        cursor.col = text_box.left;
        cursor.row += 1;
        if cursor.row > text_box.bottom {
            cursor.row = text_box.bottom;
            self.scroll();
        }
    }

    /// Scroll the selected box up one text row; the new bottom row is paper
    fn scroll(&mut self) {
        let paper = self.paper();
        let (left, top, width, height) = self.text_box().pixel_rect();
        self.framebuffer_mut()
            .scroll_up(left, top, width, height, CELL_HEIGHT, paper);
        self.count_scroll();
    }

    /// Clear the selected box to paper and home the cursor
    pub fn cls(&mut self) {
        let paper = self.paper();
        let (left, top, width, height) = self.text_box().pixel_rect();
        self.framebuffer_mut()
            .fill_raster_rect(left, top, width, height, paper);
        self.set_curpos(0, 0);
    }

    /// Move the text cursor within the selected box; out-of-range positions
    /// are clamped
    pub fn set_curpos(&mut self, col: usize, row: usize) {
        let text_box = self.text_box();
        let cursor = self.cursor_mut();
        cursor.move_to(col, row, text_box.width(), text_box.height());
        cursor.col += text_box.left;
        cursor.row += text_box.top;
    }

    /// Current text cursor position as `(column, row)` within the selected
    /// box
    pub fn curpos(&self) -> (usize, usize) {
        let text_box = self.text_box();
        (
            self.cursor().col.saturating_sub(text_box.left),
            self.cursor().row.saturating_sub(text_box.top),
        )
    }

    /// Start a line read: print the prompt, show the prefill and put the
    /// edit cursor after it. Replaces any unfinished read. Returns the id
    /// that later keys must be fed with.
    pub fn begin_input(&mut self, prompt: &str, prefill: &str, max_len: usize) -> u64 {
        if let Some(old) = self.input.take() {
            debug!(id = old.id(), "unfinished read replaced");
        }
        let id = self.next_input_id();
        self.print(prompt);
        let width = self.text_box().width();
        let mut editor = LineEditor::new(id, prompt, prefill, width, max_len);
        let (col, row) = self.curpos();
        editor.set_anchor(col, row);
        self.redraw_input(&mut editor, 0);
        self.input = Some(editor);
        debug!(id, "read started");
        id
    }

    /// Feed one key to read `id`.
    ///
    /// Returns None when that read is no longer active (finished, replaced
    /// or discarded by a mode change).
    pub fn input_key(&mut self, id: u64, key: Key) -> Option<EditOutcome> {
        let mut editor = match self.input.take() {
            Some(editor) if editor.id() == id => editor,
            other => {
                self.input = other;
                return None;
            }
        };
        let outcome = editor.handle(key);
        match &outcome {
            EditOutcome::Pending {
                redraw_from: Some(from),
            } => {
                self.redraw_input(&mut editor, *from);
                self.input = Some(editor);
            }
            EditOutcome::Pending { redraw_from: None } => {
                self.place_edit_cursor(&editor);
                self.input = Some(editor);
            }
            EditOutcome::Completed(_) | EditOutcome::Aborted => {
                let (col, row) = editor.position_of(editor.len());
                self.set_curpos(col, row.max(0) as usize);
                self.newline();
                let completed = matches!(outcome, EditOutcome::Completed(_));
                debug!(id, completed, "read finished");
            }
        }
        Some(outcome)
    }

    /// Drop the read in progress without touching the screen
    pub fn discard_input(&mut self) -> bool {
        self.input.take().is_some()
    }

    /// Redraw buffer characters from `from` to the end, plus one blank
    /// cell to erase a character removed from the end
    fn redraw_input(&mut self, editor: &mut LineEditor, from: usize) {
        for i in from..=editor.len() {
            let (col, row) = editor.position_of(i);
            if row < 0 {
                continue;
            }
            let c = editor.buffer().get(i).copied().unwrap_or(' ');
            self.set_curpos(col, row as usize);
            let before = self.scrolls();
            self.put(c);
            editor.scrolled(self.scrolls() - before);
        }
        self.place_edit_cursor(editor);
    }

    fn place_edit_cursor(&mut self, editor: &LineEditor) {
        let (col, row) = editor.position_of(editor.cursor());
        self.set_curpos(col, row.max(0) as usize);
    }
}
