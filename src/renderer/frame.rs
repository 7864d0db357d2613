//! Published frames and PNG export

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Errors that can occur while exporting a frame
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("PNG encoding error: {0}")]
    Png(#[from] png::EncodingError),
}

/// A displayable RGBA image: the drawable area surrounded by the border
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    border: usize,
    pixels: Vec<u8>,
}

impl Frame {
    /// Resize for a drawable area of `width` x `height` with `border`
    /// pixels on each side, reusing the allocation
    pub(super) fn reshape(&mut self, width: usize, height: usize, border: usize) {
        self.width = width + 2 * border;
        self.height = height + 2 * border;
        self.border = border;
        self.pixels.resize(self.width * self.height * 4, 0);
    }

    pub(super) fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Total width including the border
    pub fn width(&self) -> usize {
        self.width
    }

    /// Total height including the border
    pub fn height(&self) -> usize {
        self.height
    }

    /// Border thickness on each side
    pub fn border(&self) -> usize {
        self.border
    }

    /// Width of the drawable area; equals the mode's pixel width
    pub fn drawable_width(&self) -> usize {
        self.width - 2 * self.border
    }

    /// Height of the drawable area; equals the mode's pixel height
    pub fn drawable_height(&self) -> usize {
        self.height - 2 * self.border
    }

    /// RGBA bytes, row-major from the top
    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel in frame coordinates (top-left origin, border included)
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        let mut out = [0; 4];
        out.copy_from_slice(&self.pixels[i..i + 4]);
        Some(out)
    }

    /// Pixel of the drawable area in graphics coordinates (origin
    /// bottom-left, y upwards)
    pub fn drawable_pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.drawable_width() || y >= self.drawable_height() {
            return None;
        }
        let row = self.border + self.drawable_height() - 1 - y;
        self.pixel(self.border + x, row)
    }

    /// Encode the frame as PNG
    pub fn write_png<W: Write>(&self, w: W) -> Result<(), ExportError> {
        let mut encoder = png::Encoder::new(w, self.width as u32, self.height as u32);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.pixels)?;
        Ok(())
    }

    /// Save the frame as a PNG file
    pub fn save_png(&self, path: &Path) -> Result<(), ExportError> {
        let file = fs::File::create(path)?;
        self.write_png(io::BufWriter::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: usize, height: usize, border: usize) -> Frame {
        let mut frame = Frame::default();
        frame.reshape(width, height, border);
        frame.pixels_mut().fill(0xff);
        frame
    }

    #[test]
    fn test_dimensions() {
        let frame = solid(4, 3, 2);
        assert_eq!((frame.width(), frame.height()), (8, 7));
        assert_eq!((frame.drawable_width(), frame.drawable_height()), (4, 3));
        assert_eq!(frame.as_rgba().len(), 8 * 7 * 4);
        assert_eq!(frame.pixel(8, 0), None);
        assert_eq!(frame.drawable_pixel(4, 0), None);
        assert_eq!(frame.drawable_pixel(3, 2), Some([0xff; 4]));
    }

    #[test]
    fn test_png_export() {
        let frame = solid(3, 2, 1);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        frame.save_png(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");

        let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (5, 4));
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let frame = solid(1, 1, 0);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("frame.png");
        assert!(matches!(frame.save_png(&path), Err(ExportError::Io(_))));
    }
}
