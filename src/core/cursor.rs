//! Text cursor state
//!
//! The cursor tracks the character-grid position used by the console and how
//! the cursor glyph is shown. The blink phase advances once per published
//! frame, so the on/off cadence does not depend on logic-thread speed.

use serde::{Deserialize, Serialize};

use crate::raster::Charset;

/// How the cursor is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CursorMode {
    Hidden,
    /// Shown on alternate blink periods
    #[default]
    Flashing,
    /// Always shown
    Steady,
}

/// Cursor position and appearance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Column position (0-indexed)
    pub col: usize,
    /// Row position (0-indexed, from the top)
    pub row: usize,
    /// Whether the cursor is drawn at all
    pub visible: bool,
    /// Whether the cursor blinks when visible
    pub flashing: bool,
    /// Current half of the blink cycle (true = drawn)
    pub blink_phase: bool,
    /// Character drawn as the cursor
    pub glyph: char,
    /// Character set of the cursor glyph
    pub charset: Charset,
    /// Frames published since the last phase change
    frames: u32,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            col: 0,
            row: 0,
            visible: true,
            flashing: true,
            blink_phase: false,
            glyph: '_',
            charset: Charset::Standard,
            frames: 0,
        }
    }
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to a position, clamping to the grid
    pub fn move_to(&mut self, col: usize, row: usize, cols: usize, rows: usize) {
        self.col = col.min(cols.saturating_sub(1));
        self.row = row.min(rows.saturating_sub(1));
    }

    /// Restart the blink cycle in its off half
    pub fn reset_blink(&mut self) {
        self.frames = 0;
        self.blink_phase = false;
    }

    /// Back to the top-left cell
    pub fn home(&mut self) {
        self.col = 0;
        self.row = 0;
    }

    pub fn mode(&self) -> CursorMode {
        match (self.visible, self.flashing) {
            (false, _) => CursorMode::Hidden,
            (true, true) => CursorMode::Flashing,
            (true, false) => CursorMode::Steady,
        }
    }

    pub fn set_mode(&mut self, mode: CursorMode) {
        match mode {
            CursorMode::Hidden => self.visible = false,
            CursorMode::Flashing => {
                self.visible = true;
                self.flashing = true;
            }
            CursorMode::Steady => {
                self.visible = true;
                self.flashing = false;
            }
        }
    }

    /// Advance one published frame; flips the phase every `period` frames
    pub fn tick(&mut self, period: u32) {
        self.frames += 1;
        if self.frames >= period.max(1) {
            self.frames = 0;
            self.blink_phase = !self.blink_phase;
        }
    }

    /// Whether the publisher should draw the cursor this frame
    pub fn is_shown(&self) -> bool {
        self.visible && (!self.flashing || self.blink_phase)
    }
}
