//! Indexed bitmaps and the built-in boot logo

use std::sync::OnceLock;

/// Pixel value treated as see-through by [`super::blit`]
pub const TRANSPARENT: u8 = 0xff;

/// Fixed-size bitmap of logical colour indices, row-major from the top
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Image {
    /// Build from raw rows; short rows are padded with transparency
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> Self {
        let mut pixels = pixels;
        pixels.resize(width * height, TRANSPARENT);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Parse text art: `.` is transparent, digits are colour indices
    pub fn from_art(rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut pixels = Vec::with_capacity(width * rows.len());
        for row in rows {
            let mut line: Vec<u8> = row
                .chars()
                .map(|c| c.to_digit(16).map(|d| d as u8).unwrap_or(TRANSPARENT))
                .collect();
            line.resize(width, TRANSPARENT);
            pixels.extend(line);
        }
        Self::new(width, rows.len(), pixels)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at `col` from the left and `row` from the top
    pub fn get(&self, col: usize, row: usize) -> Option<u8> {
        if col < self.width && row < self.height {
            Some(self.pixels[row * self.width + col])
        } else {
            None
        }
    }
}

const LOGO_ART: [&str; 12] = [
    ".111111111111111111111111111111111111111111111111111.",
    "11111111111111111111111111111111111111111111111111111",
    "11333311311131111311131333131113133331131113113333111",
    "11311131331331111331131131133133131113131113131111111",
    "11311131313131111313131131131313131113131113131111111",
    "11333311313131111311331131131313133331131113113331111",
    "11313111311131111311131131131113131113131113111113111",
    "11311311311131111311131131131113131113131113111113111",
    "11311131311131111311131333131113133331113331133331111",
    "11111111111111111111111111111111111111111111111111111",
    "22222222222222222222222222222222222222222222222222222",
    ".222222222222222222222222222222222222222222222222222.",
];

static LOGO: OnceLock<Image> = OnceLock::new();

/// The machine's boot logo (53x12, colours 1-3, transparent corners)
pub fn logo() -> &'static Image {
    LOGO.get_or_init(|| Image::from_art(&LOGO_ART))
}
