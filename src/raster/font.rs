//! Built-in glyph fonts
//!
//! Characters are drawn in 8x10 cells. The glyph shapes come from the
//! `font8x8` tables and sit one pixel below the top of the cell, leaving a
//! blank row above and below. Both character sets are built once on first
//! use and shared by every draw call.

use std::sync::OnceLock;

use font8x8::{UnicodeFonts, BASIC_FONTS, BLOCK_FONTS, BOX_FONTS, LATIN_FONTS};
use serde::{Deserialize, Serialize};

use crate::core::{CELL_HEIGHT, CELL_WIDTH};

/// Character set selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Charset {
    /// ASCII and Latin-1
    #[default]
    Standard,
    /// ASCII plus box-drawing and block graphics in codes 0x80-0xFF
    Alternate,
}

impl Charset {
    /// Charset number as used by the BASIC commands
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Charset::Standard),
            1 => Some(Charset::Alternate),
            _ => None,
        }
    }
}

/// One character cell bitmap; bit 0 of each row is the leftmost pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    rows: [u8; CELL_HEIGHT],
}

impl Glyph {
    pub const BLANK: Glyph = Glyph {
        rows: [0; CELL_HEIGHT],
    };

    /// Hollow box shown for characters without a glyph
    pub const PLACEHOLDER: Glyph = Glyph {
        rows: [0x00, 0x7e, 0x42, 0x42, 0x42, 0x42, 0x42, 0x42, 0x7e, 0x00],
    };

    fn from_8x8(bitmap: [u8; 8]) -> Self {
        let mut rows = [0; CELL_HEIGHT];
        rows[1..9].copy_from_slice(&bitmap);
        Self { rows }
    }

    /// Whether the pixel at `col` (from the left) and `row` (from the top)
    /// is set
    #[inline]
    pub fn is_set(&self, col: usize, row: usize) -> bool {
        col < CELL_WIDTH && row < CELL_HEIGHT && (self.rows[row] >> col) & 1 == 1
    }

    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(|&r| r == 0)
    }
}

/// Glyphs for codes 0-255 of both character sets
struct FontTable {
    standard: [Glyph; 256],
    alternate: [Glyph; 256],
}

static FONTS: OnceLock<FontTable> = OnceLock::new();

fn fonts() -> &'static FontTable {
    FONTS.get_or_init(|| {
        let mut standard = [Glyph::BLANK; 256];
        let mut alternate = [Glyph::BLANK; 256];
        for code in 0..=255u8 {
            let c = char::from(code);
            standard[code as usize] = lookup_standard(c);
            alternate[code as usize] = lookup_alternate(c);
        }
        FontTable {
            standard,
            alternate,
        }
    })
}

fn lookup_standard(c: char) -> Glyph {
    if c.is_control() {
        return Glyph::BLANK;
    }
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BOX_FONTS.get(c))
        .or_else(|| BLOCK_FONTS.get(c))
        .map(Glyph::from_8x8)
        .unwrap_or(Glyph::PLACEHOLDER)
}

fn lookup_alternate(c: char) -> Glyph {
    let code = c as u32;
    if !(0x80..=0xff).contains(&code) {
        return lookup_standard(c);
    }
    let offset = code - 0x80;
    let graphic = if offset < 0x60 {
        char::from_u32(0x2500 + offset).and_then(|g| BOX_FONTS.get(g))
    } else {
        char::from_u32(0x2580 + offset - 0x60).and_then(|g| BLOCK_FONTS.get(g))
    };
    graphic.map(Glyph::from_8x8).unwrap_or(Glyph::BLANK)
}

/// Glyph for a character. Never fails: control characters are blank and
/// characters without a shape get the placeholder box.
pub fn glyph(c: char, charset: Charset) -> Glyph {
    let table = fonts();
    match u8::try_from(c as u32) {
        Ok(code) => match charset {
            Charset::Standard => table.standard[code as usize],
            Charset::Alternate => table.alternate[code as usize],
        },
        Err(_) => lookup_standard(c),
    }
}
