//! Framebuffer
//!
//! A grid of logical colour indices, one byte per pixel, stored row-major
//! from the top of the screen. Drawing code addresses pixels in graphics
//! coordinates (origin bottom-left, y upwards); the conversion lives here and
//! nowhere else. Every write is clipped: out-of-range pixels are dropped.

use serde::{Deserialize, Serialize};

/// Pixel buffer of logical colour indices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Framebuffer {
    /// Create a framebuffer filled with one index
    pub fn new(width: usize, height: usize, fill: u8) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw indices, row-major from the top row
    pub fn as_slice(&self) -> &[u8] {
        &self.pixels
    }

    /// Fill the whole buffer with one index
    pub fn clear(&mut self, index: u8) {
        self.pixels.fill(index);
    }

    /// Offset of a graphics coordinate, or None when clipped
    #[inline]
    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        let row = self.height - 1 - y;
        Some(row * self.width + x)
    }

    /// Read a pixel in graphics coordinates
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        self.offset(x, y).map(|i| self.pixels[i])
    }

    /// Write a pixel in graphics coordinates.
    ///
    /// With `over` set the index replaces the pixel, otherwise the two are
    /// combined by exclusive-or.
    #[inline]
    pub fn plot(&mut self, x: i32, y: i32, index: u8, over: bool) {
        if let Some(i) = self.offset(x, y) {
            if over {
                self.pixels[i] = index;
            } else {
                self.pixels[i] ^= index;
            }
        }
    }

    /// Horizontal run from `x0` to `x1` inclusive on graphics row `y`
    pub fn hline(&mut self, x0: i32, x1: i32, y: i32, index: u8, over: bool) {
        if y < 0 || y as usize >= self.height || self.width == 0 {
            return;
        }
        let (lo, hi) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        if hi < 0 || lo as i64 >= self.width as i64 {
            return;
        }
        let lo = lo.max(0) as usize;
        let hi = (hi as usize).min(self.width - 1);
        let start = (self.height - 1 - y as usize) * self.width;
        let run = &mut self.pixels[start + lo..=start + hi];
        if over {
            run.fill(index);
        } else {
            run.iter_mut().for_each(|p| *p ^= index);
        }
    }

    /// Fill a rectangle given in raster coordinates (top-left origin)
    pub fn fill_raster_rect(&mut self, left: usize, top: usize, width: usize, height: usize, index: u8) {
        let right = (left + width).min(self.width);
        let bottom = (top + height).min(self.height);
        if left >= right {
            return;
        }
        for row in top..bottom {
            let start = row * self.width;
            self.pixels[start + left..start + right].fill(index);
        }
    }

    /// Move the raster rectangle at (`left`, `top`) of `width` x `height`
    /// pixels up by `lines` rows, filling the vacated rows at the bottom of
    /// the rectangle with `fill`
    pub fn scroll_up(
        &mut self,
        left: usize,
        top: usize,
        width: usize,
        height: usize,
        lines: usize,
        fill: u8,
    ) {
        let right = left.saturating_add(width).min(self.width);
        let bottom = top.saturating_add(height).min(self.height);
        if left >= right || top >= bottom {
            return;
        }
        let lines = lines.min(bottom - top);
        let w = self.width;
        for row in top..bottom - lines {
            let src = (row + lines) * w;
            self.pixels.copy_within(src + left..src + right, row * w + left);
        }
        for row in bottom - lines..bottom {
            self.pixels[row * w + left..row * w + right].fill(fill);
        }
    }

    /// Number of pixels holding an index
    pub fn count(&self, index: u8) -> usize {
        self.pixels.iter().filter(|&&p| p == index).count()
    }
}
