//! Screen model implementation
//!
//! The screen is the single display context: active mode, palette,
//! framebuffer, text cursor, the current drawing colours and the state of a
//! pending line read. Every public display operation is a method here; the
//! threading layer in [`crate::display`] only adds locking around them.

use tracing::{debug, warn};

use super::cursor::{Cursor, CursorMode};
use super::framebuffer::Framebuffer;
use super::mode::Mode;
use super::palette::{ColourValue, FlashSpeed, Palette};
use super::textbox::{TextBox, TEXT_BOXES};
use crate::error::{DisplayError, Result};
use crate::input::LineEditor;
use crate::raster::{self, Charset, Direction, Point, TextStyle, MAX_SCALE};

/// Default number of published frames per blink period (500 ms at 50 Hz)
pub const DEFAULT_BLINK_PERIOD: u32 = 25;

/// Per-call overrides for text plotting; unset fields use the screen's
/// current defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlotOptions {
    pub brush: Option<u8>,
    pub font: Option<Charset>,
    pub direction: Option<Direction>,
    pub size_x: Option<u32>,
    pub size_y: Option<u32>,
    /// Overwrite (true) or exclusive-or (false)
    pub over: Option<bool>,
}

/// Per-call overrides for lines and filled areas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawOptions {
    pub brush: Option<u8>,
    /// Overwrite (true) or exclusive-or (false)
    pub over: Option<bool>,
}

impl DrawOptions {
    pub fn brush(brush: u8) -> Self {
        Self {
            brush: Some(brush),
            over: None,
        }
    }
}

/// The display context
#[derive(Debug, Clone)]
pub struct Screen {
    /// Active mode
    mode: Mode,
    /// Palette of the active mode
    palette: Palette,
    /// Logical colour indices of every pixel
    framebuffer: Framebuffer,
    /// Text cursor
    cursor: Cursor,
    /// Text foreground
    pen: u8,
    /// Text background and clear colour
    paper: u8,
    /// Colour outside the drawable area
    border: u8,
    /// Default colour for graphics
    brush: u8,
    /// Character set used by the console
    charset: Charset,
    /// Default graphics writing mode
    over: bool,
    /// Default text scale for plotting
    plot_size: (u32, u32),
    /// Default text direction for plotting
    plot_direction: Direction,
    /// Default character set for plotting
    plot_font: Charset,
    /// Console windows; box 0 is the whole screen
    text_boxes: [TextBox; TEXT_BOXES],
    /// Selected console window
    writing: usize,
    /// Text rows scrolled off the top since creation
    scrolls: u64,
    /// Frames published since creation
    frames: u64,
    /// Frames per cursor/flash blink period
    blink_period: u32,
    /// Read in progress
    pub(super) input: Option<LineEditor>,
    /// Id handed to the next read
    next_input_id: u64,
}

impl Screen {
    /// Create a screen in the given mode
    pub fn new(mode: Mode, blink_period: u32) -> Self {
        let mut screen = Self {
            mode,
            palette: Palette::for_mode(mode),
            framebuffer: Framebuffer::new(mode.pixel_width(), mode.pixel_height(), 0),
            cursor: Cursor::new(),
            pen: mode.max_colour(),
            paper: 0,
            border: 0,
            brush: mode.max_colour(),
            charset: Charset::Standard,
            over: true,
            plot_size: (1, 1),
            plot_direction: Direction::Right,
            plot_font: Charset::Standard,
            text_boxes: [TextBox::full(mode); TEXT_BOXES],
            writing: 0,
            scrolls: 0,
            frames: 0,
            blink_period: blink_period.max(1),
            input: None,
            next_input_id: 0,
        };
        screen.reset(mode);
        screen
    }

    /// Reinitialise everything that depends on the mode
    fn reset(&mut self, mode: Mode) {
        self.mode = mode;
        self.palette = Palette::for_mode(mode);
        self.paper = 0;
        self.border = 0;
        self.pen = mode.max_colour();
        self.brush = mode.max_colour();
        self.charset = Charset::Standard;
        self.over = true;
        self.plot_size = (1, 1);
        self.plot_direction = Direction::Right;
        self.plot_font = Charset::Standard;
        self.text_boxes = [TextBox::full(mode); TEXT_BOXES];
        self.writing = 0;
        self.framebuffer = Framebuffer::new(mode.pixel_width(), mode.pixel_height(), self.paper);
        self.cursor.home();
        self.cursor.reset_blink();
        if let Some(editor) = self.input.take() {
            warn!(id = editor.id(), "mode change discarded a pending read");
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub(super) fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.framebuffer
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub(super) fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    pub fn pen(&self) -> u8 {
        self.pen
    }

    pub fn paper(&self) -> u8 {
        self.paper
    }

    pub fn border(&self) -> u8 {
        self.border
    }

    pub fn brush(&self) -> u8 {
        self.brush
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn over(&self) -> bool {
        self.over
    }

    pub fn plot_size(&self) -> (u32, u32) {
        self.plot_size
    }

    pub fn plot_direction(&self) -> Direction {
        self.plot_direction
    }

    pub fn plot_font(&self) -> Charset {
        self.plot_font
    }

    /// Index of the selected text box
    pub fn writing(&self) -> usize {
        self.writing
    }

    /// The selected text box
    pub fn text_box(&self) -> TextBox {
        self.text_boxes[self.writing]
    }

    /// Any text box by index
    pub fn text_box_at(&self, index: usize) -> Option<TextBox> {
        self.text_boxes.get(index).copied()
    }

    pub fn scrolls(&self) -> u64 {
        self.scrolls
    }

    pub(super) fn count_scroll(&mut self) {
        self.scrolls += 1;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn blink_period(&self) -> u32 {
        self.blink_period
    }

    /// Number of whole blink periods elapsed; drives colour flashing
    pub fn blink_count(&self) -> u64 {
        self.frames / self.blink_period as u64
    }

    /// The read in progress, if any
    pub fn input(&self) -> Option<&LineEditor> {
        self.input.as_ref()
    }

    pub(super) fn next_input_id(&mut self) -> u64 {
        self.next_input_id += 1;
        self.next_input_id
    }

    /// Switch mode by id (40 or 80).
    ///
    /// Switching always clears the screen, even when the mode is unchanged.
    pub fn set_mode(&mut self, id: u16) -> Result<()> {
        let mode = Mode::from_id(id)?;
        debug!(id, "set mode");
        self.reset(mode);
        Ok(())
    }

    /// Change a palette slot
    pub fn set_colour(&mut self, index: u8, value: ColourValue) -> Result<()> {
        self.mode.check_colour(index)?;
        self.palette.set(index, value)?;
        debug!(index, ?value, "set colour");
        Ok(())
    }

    /// Make a palette slot alternate with another colour
    pub fn set_colour_flash(&mut self, index: u8, speed: FlashSpeed, alternate: ColourValue) -> Result<()> {
        self.mode.check_colour(index)?;
        self.palette.set_flash(index, speed, alternate)?;
        debug!(index, ?speed, "set colour flash");
        Ok(())
    }

    pub fn set_pen(&mut self, index: u8) -> Result<()> {
        self.pen = self.mode.check_colour(index)?;
        Ok(())
    }

    pub fn set_paper(&mut self, index: u8) -> Result<()> {
        self.paper = self.mode.check_colour(index)?;
        Ok(())
    }

    pub fn set_border(&mut self, index: u8) -> Result<()> {
        self.border = self.mode.check_colour(index)?;
        Ok(())
    }

    pub fn set_brush(&mut self, index: u8) -> Result<()> {
        self.brush = self.mode.check_colour(index)?;
        Ok(())
    }

    /// Select the console character set (0 or 1)
    pub fn set_charset(&mut self, index: u8) -> Result<()> {
        self.charset = Charset::from_index(index).ok_or(DisplayError::IndexOutOfRange {
            index: index as usize,
            limit: 2,
        })?;
        Ok(())
    }

    /// Default scale for plotted text; each factor is clamped to 1..=64
    pub fn set_plot_size(&mut self, size_x: u32, size_y: u32) {
        self.plot_size = (size_x.clamp(1, MAX_SCALE), size_y.clamp(1, MAX_SCALE));
    }

    pub fn set_plot_direction(&mut self, direction: Direction) {
        self.plot_direction = direction;
    }

    pub fn set_plot_font(&mut self, font: Charset) {
        self.plot_font = font;
    }

    /// Default writing mode for graphics: overwrite or exclusive-or
    pub fn set_over(&mut self, over: bool) {
        self.over = over;
    }

    /// Select the text box the console writes into.
    ///
    /// The cursor keeps its position relative to the box, clamped to the
    /// new box's size.
    pub fn set_writing(&mut self, index: u8) -> Result<()> {
        let index = index as usize;
        if index >= TEXT_BOXES {
            return Err(DisplayError::IndexOutOfRange {
                index,
                limit: TEXT_BOXES,
            });
        }
        let (col, row) = self.curpos();
        self.writing = index;
        self.set_curpos(col, row);
        debug!(index, "set writing");
        Ok(())
    }

    /// Define text box `index` (1 to 9) by two corner cells, inclusive.
    ///
    /// Box 0 is the whole screen and cannot be redefined. Corners outside
    /// the text grid fail with `IndexOutOfRange`.
    pub fn define_writing(
        &mut self,
        index: u8,
        col1: usize,
        row1: usize,
        col2: usize,
        row2: usize,
    ) -> Result<()> {
        let index = index as usize;
        if index == 0 || index >= TEXT_BOXES {
            return Err(DisplayError::IndexOutOfRange {
                index,
                limit: TEXT_BOXES,
            });
        }
        let (cols, rows) = (self.mode.char_columns(), self.mode.char_rows());
        for col in [col1, col2] {
            if col >= cols {
                return Err(DisplayError::IndexOutOfRange { index: col, limit: cols });
            }
        }
        for row in [row1, row2] {
            if row >= rows {
                return Err(DisplayError::IndexOutOfRange { index: row, limit: rows });
            }
        }
        let (col, row) = self.curpos();
        self.text_boxes[index] = TextBox::new(col1, row1, col2, row2);
        if index == self.writing {
            self.set_curpos(col, row);
        }
        debug!(index, col1, row1, col2, row2, "define writing");
        Ok(())
    }

    /// Show or hide the cursor
    pub fn set_cursor(&mut self, visible: bool) {
        self.cursor.visible = visible;
    }

    pub fn set_cursor_mode(&mut self, mode: CursorMode) {
        self.cursor.set_mode(mode);
    }

    /// Character drawn as the cursor
    pub fn set_cursor_char(&mut self, glyph: char, charset: Charset) {
        self.cursor.glyph = glyph;
        self.cursor.charset = charset;
    }

    fn resolve_brush(&self, brush: Option<u8>) -> u8 {
        brush.map(|b| self.mode.wrap_colour(b)).unwrap_or(self.brush)
    }

    /// Polyline through two or more points
    pub fn line(&mut self, opts: &DrawOptions, points: &[Point]) {
        let brush = self.resolve_brush(opts.brush);
        let over = opts.over.unwrap_or(self.over);
        raster::polyline(&mut self.framebuffer, points, brush, over);
    }

    /// Filled polygon
    pub fn area(&mut self, opts: &DrawOptions, points: &[Point]) {
        let brush = self.resolve_brush(opts.brush);
        let over = opts.over.unwrap_or(self.over);
        raster::area(&mut self.framebuffer, points, brush, over);
    }

    /// Text at a graphics position
    pub fn plot(&mut self, opts: &PlotOptions, text: &str, x: i32, y: i32) {
        let style = TextStyle {
            brush: self.resolve_brush(opts.brush),
            charset: opts.font.unwrap_or(self.plot_font),
            direction: opts.direction.unwrap_or(self.plot_direction),
            size_x: opts.size_x.unwrap_or(self.plot_size.0),
            size_y: opts.size_y.unwrap_or(self.plot_size.1),
            over: opts.over.unwrap_or(self.over),
        };
        raster::text(&mut self.framebuffer, text, Point::new(x, y), &style);
    }

    /// Draw the boot logo with its bottom-left corner at `(x, y)`
    pub fn plonk_logo(&mut self, x: i32, y: i32) {
        let depth = self.mode.colour_depth();
        raster::blit(&mut self.framebuffer, raster::logo(), Point::new(x, y), depth, true);
    }

    /// Logical colour of a pixel, None off screen
    pub fn pixel(&self, x: i32, y: i32) -> Option<u8> {
        self.framebuffer.get(x, y)
    }

    /// Advance one published frame
    pub fn tick_frame(&mut self) {
        self.frames += 1;
        self.cursor.tick(self.blink_period);
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new(Mode::default(), DEFAULT_BLINK_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_screen_defaults() {
        let screen = Screen::default();
        assert_eq!(screen.mode(), Mode::High);
        assert_eq!(screen.framebuffer().width(), 640);
        assert_eq!(screen.framebuffer().height(), 250);
        assert_eq!(screen.pen(), 3);
        assert_eq!(screen.paper(), 0);
        assert_eq!(screen.framebuffer().count(0), 640 * 250);
    }

    #[test]
    fn test_set_mode_resets_state() {
        let mut screen = Screen::default();
        screen.set_paper(2).unwrap();
        screen.cursor_mut().move_to(10, 10, 80, 25);
        screen.line(
            &DrawOptions::brush(1),
            &[Point::new(0, 0), Point::new(100, 100)],
        );

        screen.set_mode(40).unwrap();
        assert_eq!(screen.mode(), Mode::Low);
        assert_eq!(screen.palette().len(), 16);
        assert_eq!(screen.framebuffer().width(), 320);
        assert_eq!(screen.framebuffer().count(0), 320 * 250);
        assert_eq!((screen.cursor().col, screen.cursor().row), (0, 0));
        assert_eq!(screen.pen(), 15);
        assert_eq!(screen.paper(), 0);
    }

    #[test]
    fn test_same_mode_clears() {
        let mut screen = Screen::default();
        screen.plot(&PlotOptions::default(), "HELLO", 10, 10);
        assert!(screen.framebuffer().count(0) < 640 * 250);
        screen.set_mode(80).unwrap();
        assert_eq!(screen.framebuffer().count(0), 640 * 250);
    }

    #[test]
    fn test_invalid_mode_is_noop() {
        let mut screen = Screen::default();
        screen.set_pen(1).unwrap();
        assert_eq!(screen.set_mode(20), Err(DisplayError::InvalidMode(20)));
        assert_eq!(screen.mode(), Mode::High);
        assert_eq!(screen.pen(), 1);
    }

    #[test]
    fn test_plot_uses_screen_defaults() {
        let mut plain = Screen::default();
        plain.plot(&PlotOptions::default(), "H", 0, 0);
        let single = plain.framebuffer().count(3);

        let mut scaled = Screen::default();
        scaled.set_plot_size(2, 3);
        scaled.set_plot_direction(Direction::Up);
        scaled.plot(&PlotOptions::default(), "H", 0, 0);
        assert_eq!(scaled.framebuffer().count(3), single * 6);
        // per-call options still win over the defaults
        let mut overridden = scaled.clone();
        overridden.cls();
        overridden.plot(
            &PlotOptions {
                size_x: Some(1),
                size_y: Some(1),
                ..PlotOptions::default()
            },
            "H",
            0,
            0,
        );
        assert_eq!(overridden.framebuffer().count(3), single);

        scaled.set_mode(80).unwrap();
        assert_eq!(scaled.plot_size(), (1, 1));
        assert_eq!(scaled.plot_direction(), Direction::Right);
        assert_eq!(scaled.plot_font(), Charset::Standard);
    }

    #[test]
    fn test_text_box_validation() {
        let mut screen = Screen::new(Mode::Low, 25);
        assert!(screen.define_writing(1, 5, 5, 39, 24).is_ok());
        assert_eq!(
            screen.define_writing(0, 0, 0, 1, 1),
            Err(DisplayError::IndexOutOfRange { index: 0, limit: 10 })
        );
        assert_eq!(
            screen.define_writing(2, 0, 0, 40, 1),
            Err(DisplayError::IndexOutOfRange { index: 40, limit: 40 })
        );
        assert_eq!(
            screen.define_writing(2, 0, 25, 1, 1),
            Err(DisplayError::IndexOutOfRange { index: 25, limit: 25 })
        );
        assert_eq!(
            screen.set_writing(10),
            Err(DisplayError::IndexOutOfRange { index: 10, limit: 10 })
        );
        assert_eq!(screen.text_box_at(2), Some(TextBox::full(Mode::Low)));

        screen.set_writing(1).unwrap();
        assert_eq!(screen.writing(), 1);
        screen.set_mode(40).unwrap();
        assert_eq!(screen.writing(), 0);
        assert_eq!(screen.text_box_at(1), Some(TextBox::full(Mode::Low)));
    }

    #[test]
    fn test_colour_validation() {
        let mut screen = Screen::default();
        assert!(screen.set_colour(3, ColourValue::Basic(2)).is_ok());
        assert_eq!(
            screen.set_colour(4, ColourValue::Basic(2)),
            Err(DisplayError::IndexOutOfRange { index: 4, limit: 4 })
        );
        assert!(screen.set_pen(4).is_err());
        assert!(screen.set_paper(200).is_err());
        assert!(screen.set_border(3).is_ok());
        assert!(screen.set_charset(1).is_ok());
        assert_eq!(
            screen.set_charset(2),
            Err(DisplayError::IndexOutOfRange { index: 2, limit: 2 })
        );
    }

    #[test]
    fn test_brush_wraps_in_draw_calls() {
        let mut screen = Screen::default();
        screen.line(
            &DrawOptions::brush(6),
            &[Point::new(0, 0), Point::new(0, 0)],
        );
        assert_eq!(screen.pixel(0, 0), Some(2));
    }

    #[test]
    fn test_xor_default() {
        let mut screen = Screen::default();
        screen.set_over(false);
        let pts = [Point::new(5, 5), Point::new(5, 5)];
        screen.line(&DrawOptions::brush(3), &pts);
        assert_eq!(screen.pixel(5, 5), Some(3));
        screen.line(&DrawOptions::brush(3), &pts);
        assert_eq!(screen.pixel(5, 5), Some(0));
    }

    #[test]
    fn test_plonk_logo() {
        let mut screen = Screen::default();
        screen.plonk_logo(100, 100);
        // bottom-left corner of the logo is transparent
        assert_eq!(screen.pixel(100, 100), Some(0));
        assert_eq!(screen.pixel(101, 100), Some(2));
        assert_eq!(screen.pixel(101, 111), Some(1));
    }

    #[test]
    fn test_blink_count() {
        let mut screen = Screen::new(Mode::High, 10);
        for _ in 0..25 {
            screen.tick_frame();
        }
        assert_eq!(screen.frames(), 25);
        assert_eq!(screen.blink_count(), 2);
    }
}
