//! Palette table
//!
//! The hardware can show 16 fixed "basic colours". Each mode exposes a
//! palette of logical slots (16 or 4) mapped onto displayable colours. The
//! framebuffer only stores slot numbers, so changing a slot recolours every
//! pixel that references it at the next publish.

use serde::{Deserialize, Serialize};

use super::mode::Mode;
use crate::error::{DisplayError, Result};

/// 24-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// RGBA bytes with full opacity
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 0xff]
    }
}

/// The 16 built-in colours
pub const BASIC_COLOURS: [Rgb; 16] = [
    Rgb::new(0x00, 0x00, 0x00), // black
    Rgb::new(0x00, 0x00, 0xaa), // dark blue
    Rgb::new(0xaa, 0x00, 0x00), // dark red
    Rgb::new(0xaa, 0x00, 0xaa), // purple
    Rgb::new(0x00, 0xaa, 0x00), // dark green
    Rgb::new(0x00, 0xaa, 0xaa), // dark cyan
    Rgb::new(0xaa, 0x54, 0x00), // brown
    Rgb::new(0xaa, 0xaa, 0xaa), // light grey
    Rgb::new(0x54, 0x54, 0x54), // dark grey
    Rgb::new(0x54, 0x54, 0xff), // light blue
    Rgb::new(0xff, 0x54, 0x54), // light red
    Rgb::new(0xff, 0x54, 0xff), // light purple
    Rgb::new(0x54, 0xff, 0x54), // light green
    Rgb::new(0x54, 0xff, 0xff), // light cyan
    Rgb::new(0xff, 0xff, 0x54), // yellow
    Rgb::new(0xff, 0xff, 0xff), // white
];

/// Default slot assignments for the 4-colour mode
const HIGH_RES_DEFAULTS: [u8; 4] = [
    1,  // dark blue
    4,  // dark green
    10, // light red
    15, // white
];

/// Value assigned to a palette slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColourValue {
    /// One of the 16 basic colours (0-15)
    Basic(u8),
    /// Arbitrary RGB colour
    Rgb(Rgb),
}

impl ColourValue {
    /// Resolve to RGB, failing for basic colours beyond the table
    pub fn resolve(self) -> Result<Rgb> {
        match self {
            ColourValue::Basic(n) => BASIC_COLOURS.get(n as usize).copied().ok_or(
                DisplayError::IndexOutOfRange {
                    index: n as usize,
                    limit: BASIC_COLOURS.len(),
                },
            ),
            ColourValue::Rgb(rgb) => Ok(rgb),
        }
    }
}

impl From<Rgb> for ColourValue {
    fn from(rgb: Rgb) -> Self {
        ColourValue::Rgb(rgb)
    }
}

/// How fast a slot alternates with its flash colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlashSpeed {
    #[default]
    None,
    /// Toggle every second blink period
    Slow,
    /// Toggle every blink period
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Flash {
    speed: FlashSpeed,
    alternate: Rgb,
}

/// Active palette: one entry per logical colour of the current mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    entries: Vec<Rgb>,
    flash: Vec<Flash>,
}

impl Palette {
    /// Default palette for a mode
    pub fn for_mode(mode: Mode) -> Self {
        let entries: Vec<Rgb> = match mode {
            Mode::Low => BASIC_COLOURS.to_vec(),
            Mode::High => HIGH_RES_DEFAULTS
                .iter()
                .map(|&n| BASIC_COLOURS[n as usize])
                .collect(),
        };
        let flash = entries
            .iter()
            .map(|&rgb| Flash {
                speed: FlashSpeed::None,
                alternate: rgb,
            })
            .collect();
        Self { entries, flash }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Steady colour of a slot
    pub fn get(&self, index: u8) -> Option<Rgb> {
        self.entries.get(index as usize).copied()
    }

    pub fn entries(&self) -> &[Rgb] {
        &self.entries
    }

    fn check(&self, index: u8) -> Result<usize> {
        let i = index as usize;
        if i < self.entries.len() {
            Ok(i)
        } else {
            Err(DisplayError::IndexOutOfRange {
                index: i,
                limit: self.entries.len(),
            })
        }
    }

    /// Overwrite a slot. Leaves the palette untouched on failure.
    pub fn set(&mut self, index: u8, value: ColourValue) -> Result<()> {
        let i = self.check(index)?;
        let rgb = value.resolve()?;
        self.entries[i] = rgb;
        Ok(())
    }

    /// Configure colour flashing for a slot
    pub fn set_flash(&mut self, index: u8, speed: FlashSpeed, alternate: ColourValue) -> Result<()> {
        let i = self.check(index)?;
        let alternate = alternate.resolve()?;
        self.flash[i] = Flash { speed, alternate };
        Ok(())
    }

    /// Colour of a slot at the given blink period count.
    ///
    /// Never fails: an index past the end wraps around, an empty palette
    /// yields black.
    pub fn resolve(&self, index: u8, period: u64) -> Rgb {
        if self.entries.is_empty() {
            return Rgb::default();
        }
        let i = index as usize % self.entries.len();
        let flash = self.flash[i];
        let alternate = match flash.speed {
            FlashSpeed::None => false,
            FlashSpeed::Fast => period % 2 == 1,
            FlashSpeed::Slow => (period / 2) % 2 == 1,
        };
        if alternate {
            flash.alternate
        } else {
            self.entries[i]
        }
    }

    /// Resolve every slot at once for a frame
    pub fn resolve_all(&self, period: u64, out: &mut Vec<Rgb>) {
        out.clear();
        out.extend((0..self.entries.len()).map(|i| self.resolve(i as u8, period)));
    }
}
