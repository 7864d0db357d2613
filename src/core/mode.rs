//! Display modes
//!
//! The machine offers two screen modes, named after their text width:
//! a low-resolution, 16-colour mode (40 columns) and a high-resolution,
//! 4-colour mode (80 columns). Both are 25 text rows of 10-pixel cells.

use serde::{Deserialize, Serialize};

use crate::error::{DisplayError, Result};

/// Width of a character cell in pixels
pub const CELL_WIDTH: usize = 8;
/// Height of a character cell in pixels
pub const CELL_HEIGHT: usize = 10;

/// Supported screen modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    /// 320x250, 40x25 characters, 16 colours
    Low,
    /// 640x250, 80x25 characters, 4 colours
    #[default]
    High,
}

impl Mode {
    /// All supported modes
    pub const ALL: [Mode; 2] = [Mode::Low, Mode::High];

    /// Look up a mode by its id (40 or 80)
    pub fn from_id(id: u16) -> Result<Self> {
        match id {
            40 => Ok(Mode::Low),
            80 => Ok(Mode::High),
            other => Err(DisplayError::InvalidMode(other)),
        }
    }

    /// Mode id as used by `SET MODE`
    pub fn id(self) -> u16 {
        match self {
            Mode::Low => 40,
            Mode::High => 80,
        }
    }

    pub fn pixel_width(self) -> usize {
        self.char_columns() * CELL_WIDTH
    }

    pub fn pixel_height(self) -> usize {
        self.char_rows() * CELL_HEIGHT
    }

    pub fn char_columns(self) -> usize {
        match self {
            Mode::Low => 40,
            Mode::High => 80,
        }
    }

    pub fn char_rows(self) -> usize {
        25
    }

    /// Number of logical colours; valid indices are `0..colour_depth`
    pub fn colour_depth(self) -> usize {
        match self {
            Mode::Low => 16,
            Mode::High => 4,
        }
    }

    /// Validate a logical colour index against this mode
    pub fn check_colour(self, index: u8) -> Result<u8> {
        let limit = self.colour_depth();
        if (index as usize) < limit {
            Ok(index)
        } else {
            Err(DisplayError::IndexOutOfRange {
                index: index as usize,
                limit,
            })
        }
    }

    /// Reduce an arbitrary index to a valid one by dropping the high bits
    pub fn wrap_colour(self, index: u8) -> u8 {
        (index as usize % self.colour_depth()) as u8
    }

    /// Highest valid colour index (default pen)
    pub fn max_colour(self) -> u8 {
        (self.colour_depth() - 1) as u8
    }
}
