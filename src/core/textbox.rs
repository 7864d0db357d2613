//! Text boxes
//!
//! The console writes into one of ten rectangular windows of text cells.
//! Box 0 always covers the whole screen; boxes 1 to 9 can be redefined.
//! Printing wraps and scrolls inside the selected box only.

use serde::{Deserialize, Serialize};

use super::mode::{Mode, CELL_HEIGHT, CELL_WIDTH};

/// Number of text boxes per screen
pub const TEXT_BOXES: usize = 10;

/// A rectangle of text cells, bounds inclusive, in screen columns and rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBox {
    pub left: usize,
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
}

impl TextBox {
    /// Box spanning two corner cells in any order
    pub fn new(col1: usize, row1: usize, col2: usize, row2: usize) -> Self {
        Self {
            left: col1.min(col2),
            top: row1.min(row2),
            right: col1.max(col2),
            bottom: row1.max(row2),
        }
    }

    /// The whole text grid of a mode
    pub fn full(mode: Mode) -> Self {
        Self::new(0, 0, mode.char_columns() - 1, mode.char_rows() - 1)
    }

    /// Width in columns
    pub fn width(&self) -> usize {
        self.right - self.left + 1
    }

    /// Height in rows
    pub fn height(&self) -> usize {
        self.bottom - self.top + 1
    }

    /// Raster rectangle covered by the box as `(left, top, width, height)`
    pub fn pixel_rect(&self) -> (usize, usize, usize, usize) {
        (
            self.left * CELL_WIDTH,
            self.top * CELL_HEIGHT,
            self.width() * CELL_WIDTH,
            self.height() * CELL_HEIGHT,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_box_matches_mode() {
        let low = TextBox::full(Mode::Low);
        assert_eq!((low.width(), low.height()), (40, 25));
        assert_eq!(low.pixel_rect(), (0, 0, 320, 250));
        assert_eq!(TextBox::full(Mode::High).width(), 80);
    }

    #[test]
    fn test_corners_in_any_order() {
        let b = TextBox::new(30, 20, 10, 5);
        assert_eq!(b, TextBox::new(10, 5, 30, 20));
        assert_eq!((b.width(), b.height()), (21, 16));
        assert_eq!(b.pixel_rect(), (80, 50, 168, 160));
    }
}
