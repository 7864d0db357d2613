//! Deterministic snapshot generation
//!
//! Snapshots capture the display state in a serializable format for testing
//! and tooling. Given the same sequence of display calls, the screen must
//! produce identical snapshots. Framebuffer rows are stored top to bottom as
//! strings of hex digits, one digit per pixel.

use serde::{Deserialize, Serialize};

use super::cursor::{Cursor, CursorMode};
use super::screen::Screen;

/// A complete snapshot of the display state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Mode id (40 or 80)
    pub mode: u16,
    /// Framebuffer dimensions
    pub width: usize,
    pub height: usize,
    /// Palette as `#rrggbb` strings
    pub palette: Vec<String>,
    pub pen: u8,
    pub paper: u8,
    pub border: u8,
    pub brush: u8,
    /// Console character set number
    pub charset: u8,
    pub cursor: CursorSnapshot,
    /// Selected text box
    #[serde(default)]
    pub writing: usize,
    /// Whether a line read is in progress
    #[serde(default, skip_serializing_if = "is_false")]
    pub reading: bool,
    /// Pixel rows, top first
    pub rows: Vec<String>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Snapshot of cursor state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorSnapshot {
    pub col: usize,
    pub row: usize,
    pub mode: String,
    pub glyph: char,
}

impl From<&Cursor> for CursorSnapshot {
    fn from(cursor: &Cursor) -> Self {
        CursorSnapshot {
            col: cursor.col,
            row: cursor.row,
            mode: match cursor.mode() {
                CursorMode::Hidden => "hidden".to_string(),
                CursorMode::Flashing => "flashing".to_string(),
                CursorMode::Steady => "steady".to_string(),
            },
            glyph: cursor.glyph,
        }
    }
}

fn hex_digit(index: u8) -> char {
    char::from_digit((index & 0x0f) as u32, 16).unwrap_or('0')
}

impl Snapshot {
    /// Create a snapshot from the current screen state
    pub fn from_screen(screen: &Screen) -> Self {
        let fb = screen.framebuffer();
        let rows = if fb.width() == 0 {
            Vec::new()
        } else {
            fb.as_slice()
                .chunks(fb.width())
                .map(|row| row.iter().map(|&p| hex_digit(p)).collect())
                .collect()
        };

        Snapshot {
            mode: screen.mode().id(),
            width: fb.width(),
            height: fb.height(),
            palette: screen
                .palette()
                .entries()
                .iter()
                .map(|c| format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b))
                .collect(),
            pen: screen.pen(),
            paper: screen.paper(),
            border: screen.border(),
            brush: screen.brush(),
            charset: match screen.charset() {
                crate::raster::Charset::Standard => 0,
                crate::raster::Charset::Alternate => 1,
            },
            cursor: CursorSnapshot::from(screen.cursor()),
            writing: screen.writing(),
            reading: screen.input().is_some(),
            rows,
        }
    }

    /// Convert snapshot to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse snapshot from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Logical colour at a graphics coordinate (origin bottom-left)
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if y >= self.rows.len() {
            return None;
        }
        let row = &self.rows[self.rows.len() - 1 - y];
        row.chars()
            .nth(x)
            .and_then(|c| c.to_digit(16))
            .map(|d| d as u8)
    }

    /// Compare two snapshots for equality of what is on screen
    pub fn content_equals(&self, other: &Snapshot) -> bool {
        self.mode == other.mode
            && self.palette == other.palette
            && self.border == other.border
            && self.rows == other.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DrawOptions, PlotOptions};
    use crate::raster::Point;

    #[test]
    fn test_snapshot_from_screen() {
        let mut screen = Screen::default();
        screen.print("Hi");

        let snapshot = Snapshot::from_screen(&screen);

        assert_eq!(snapshot.mode, 80);
        assert_eq!(snapshot.width, 640);
        assert_eq!(snapshot.rows.len(), 250);
        assert_eq!(snapshot.rows[0].len(), 640);
        assert_eq!(snapshot.palette.len(), 4);
        assert_eq!(snapshot.palette[3], "#ffffff");
        assert_eq!(snapshot.cursor.col, 2);
        assert_eq!(snapshot.cursor.row, 0);
        assert_eq!(snapshot.cursor.mode, "flashing");
        assert!(!snapshot.reading);
    }

    #[test]
    fn test_snapshot_pixel_is_bottom_up() {
        let mut screen = Screen::default();
        screen.line(
            &DrawOptions::brush(2),
            &[Point::new(3, 0), Point::new(3, 0)],
        );
        let snapshot = Snapshot::from_screen(&screen);
        assert_eq!(snapshot.pixel(3, 0), Some(2));
        assert_eq!(snapshot.pixel(3, 1), Some(0));
        assert_eq!(snapshot.pixel(3, 250), None);
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let mut screen = Screen::default();
        screen.plot(&PlotOptions::default(), "XY", 20, 20);

        let snapshot = Snapshot::from_screen(&screen);
        let json = snapshot.to_json().unwrap();
        let restored = Snapshot::from_json(&json).unwrap();

        assert!(snapshot.content_equals(&restored));
        assert_eq!(snapshot.cursor, restored.cursor);
    }

    #[test]
    fn test_snapshots_are_deterministic() {
        let draw = || {
            let mut screen = Screen::default();
            screen.print("same input");
            screen.area(
                &DrawOptions::default(),
                &[Point::new(0, 0), Point::new(50, 0), Point::new(25, 40)],
            );
            Snapshot::from_screen(&screen)
        };
        assert!(draw().content_equals(&draw()));
    }
}
