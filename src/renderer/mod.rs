//! Frame Publisher
//!
//! Turns the framebuffer into a displayable RGBA [`Frame`] once per render
//! tick. Publishing is split in two steps so the shared screen is only held
//! for a plain copy: [`Publisher::capture`] copies indices, resolved colours
//! and the cursor overlay out of the [`Screen`], then
//! [`Publisher::composite`] builds the image without touching it. All
//! buffers are reused between frames, so steady-state publishing does not
//! allocate.

mod frame;

pub use frame::{ExportError, Frame};

use crate::core::{Rgb, Screen, CELL_HEIGHT, CELL_WIDTH};
use crate::raster::{glyph, Glyph};

/// Cursor glyph to overlay on the captured indices
#[derive(Debug, Clone, Copy)]
struct Overlay {
    left: usize,
    top: usize,
    glyph: Glyph,
    pen: u8,
}

/// Reusable publishing state
#[derive(Debug, Clone, Default)]
pub struct Publisher {
    border_width: usize,
    width: usize,
    height: usize,
    indices: Vec<u8>,
    colours: Vec<Rgb>,
    border: Rgb,
    overlay: Option<Overlay>,
    frame: Frame,
}

impl Publisher {
    /// Create a publisher drawing `border_width` pixels of border per side
    pub fn new(border_width: usize) -> Self {
        Self {
            border_width,
            ..Self::default()
        }
    }

    /// Copy what is needed to draw the screen, then advance it one frame.
    ///
    /// The first frame after a mode switch always shows the blink phase the
    /// switch left behind.
    pub fn capture(&mut self, screen: &mut Screen) {
        let fb = screen.framebuffer();
        self.width = fb.width();
        self.height = fb.height();
        self.indices.clear();
        self.indices.extend_from_slice(fb.as_slice());

        let period = screen.blink_count();
        screen.palette().resolve_all(period, &mut self.colours);
        self.border = screen.palette().resolve(screen.border(), period);

        let cursor = screen.cursor();
        self.overlay = cursor.is_shown().then(|| Overlay {
            left: cursor.col * CELL_WIDTH,
            top: cursor.row * CELL_HEIGHT,
            glyph: glyph(cursor.glyph, cursor.charset),
            pen: screen.pen(),
        });
        screen.tick_frame();
    }

    /// Build the frame from the last capture
    pub fn composite(&mut self) -> &Frame {
        if let Some(overlay) = self.overlay {
            self.apply_overlay(overlay);
        }

        let border = self.border.to_rgba();
        let (width, height, bw) = (self.width, self.height, self.border_width);
        self.frame.reshape(width, height, bw);
        let frame_width = self.frame.width();
        let pixels = self.frame.pixels_mut();
        for px in pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&border);
        }

        if !self.colours.is_empty() {
            for y in 0..height {
                let src = &self.indices[y * width..(y + 1) * width];
                let start = ((y + bw) * frame_width + bw) * 4;
                let dst = &mut pixels[start..start + width * 4];
                for (px, &index) in dst.chunks_exact_mut(4).zip(src) {
                    let rgb = self.colours[index as usize % self.colours.len()];
                    px.copy_from_slice(&rgb.to_rgba());
                }
            }
        }
        &self.frame
    }

    /// XOR the cursor glyph into the captured indices
    fn apply_overlay(&mut self, overlay: Overlay) {
        for gy in 0..CELL_HEIGHT {
            let row = overlay.top + gy;
            if row >= self.height {
                break;
            }
            for gx in 0..CELL_WIDTH {
                let col = overlay.left + gx;
                if col < self.width && overlay.glyph.is_set(gx, gy) {
                    self.indices[row * self.width + col] ^= overlay.pen;
                }
            }
        }
    }

    /// The most recently composited frame
    pub fn frame(&self) -> &Frame {
        &self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ColourValue, CursorMode, Mode, BASIC_COLOURS};

    fn publish(publisher: &mut Publisher, screen: &mut Screen) -> Frame {
        publisher.capture(screen);
        publisher.composite().clone()
    }

    #[test]
    fn test_frame_size_matches_mode() {
        let mut publisher = Publisher::new(50);
        let mut screen = Screen::new(Mode::Low, 25);
        let frame = publish(&mut publisher, &mut screen);
        assert_eq!((frame.drawable_width(), frame.drawable_height()), (320, 250));
        assert_eq!((frame.width(), frame.height()), (420, 350));
    }

    #[test]
    fn test_border_and_background() {
        let mut publisher = Publisher::new(4);
        let mut screen = Screen::default();
        screen.set_border(2).unwrap();
        let frame = publish(&mut publisher, &mut screen);
        let border = screen.palette().get(2).unwrap().to_rgba();
        let paper = screen.palette().get(0).unwrap().to_rgba();
        assert_eq!(frame.pixel(0, 0), Some(border));
        assert_eq!(frame.pixel(3, 100), Some(border));
        assert_eq!(frame.pixel(4, 4), Some(paper));
        assert_eq!(frame.drawable_pixel(639, 249), Some(paper));
    }

    #[test]
    fn test_palette_change_recolours_existing_pixels() {
        let mut publisher = Publisher::new(0);
        let mut screen = Screen::default();
        screen.cls();
        let before = publish(&mut publisher, &mut screen);
        assert_eq!(before.drawable_pixel(0, 0), Some(BASIC_COLOURS[1].to_rgba()));
        screen.set_colour(0, ColourValue::Basic(14)).unwrap();
        let after = publish(&mut publisher, &mut screen);
        assert_eq!(after.drawable_pixel(0, 0), Some(BASIC_COLOURS[14].to_rgba()));
    }

    #[test]
    fn test_cursor_overlay_blinks() {
        let mut publisher = Publisher::new(0);
        let mut screen = Screen::new(Mode::High, 2);
        let mut lit = Vec::new();
        for _ in 0..4 {
            let frame = publish(&mut publisher, &mut screen);
            let paper = screen.palette().get(0).unwrap().to_rgba();
            let cell_lit = (0..10).any(|row| {
                (0..8).any(|col| frame.pixel(col, row) != Some(paper))
            });
            lit.push(cell_lit);
        }
        assert_eq!(lit, vec![false, false, true, true]);
        // the overlay never reaches the framebuffer
        assert_eq!(screen.framebuffer().count(0), 640 * 250);
    }

    #[test]
    fn test_first_frame_after_mode_switch_is_blank() {
        let mut publisher = Publisher::new(0);
        let mut screen = Screen::new(Mode::High, 1);
        publish(&mut publisher, &mut screen);
        screen.set_mode(40).unwrap();
        let frame = publish(&mut publisher, &mut screen);
        let paper = screen.palette().get(0).unwrap().to_rgba();
        assert!(frame.as_rgba().chunks(4).all(|px| px == paper));
        // the cursor shows up on the next frame
        let frame = publish(&mut publisher, &mut screen);
        assert!(frame.as_rgba().chunks(4).any(|px| px != paper));
    }

    #[test]
    fn test_hidden_cursor_not_drawn() {
        let mut publisher = Publisher::new(0);
        let mut screen = Screen::new(Mode::High, 1);
        screen.set_cursor_mode(CursorMode::Hidden);
        for _ in 0..3 {
            let frame = publish(&mut publisher, &mut screen);
            let paper = screen.palette().get(0).unwrap().to_rgba();
            assert!(frame.as_rgba().chunks(4).all(|px| px == paper));
        }
    }
}
