//! Rasterizer
//!
//! Stateless drawing algorithms over a [`Framebuffer`]: Bresenham lines,
//! even-odd scanline polygon fill, scaled bitmap text and image blits.
//!
//! All primitives are tolerant by design, mirroring the forgiving legacy
//! drawing commands: coordinates are clamped to the machine's 16-bit range,
//! pixels off the screen are clipped, degenerate polygons draw nothing and
//! unknown characters get a substitute glyph. Nothing here can fail.

mod font;
mod image;

use serde::{Deserialize, Serialize};

pub use font::{glyph, Charset, Glyph};
pub use image::{logo, Image, TRANSPARENT};

use crate::core::{Framebuffer, CELL_HEIGHT, CELL_WIDTH};

/// Smallest coordinate accepted by the primitives
pub const COORD_MIN: i32 = i16::MIN as i32;
/// Largest coordinate accepted by the primitives
pub const COORD_MAX: i32 = i16::MAX as i32;
/// Largest text scale factor
pub const MAX_SCALE: u32 = 64;

/// A point in graphics coordinates (origin bottom-left, y upwards)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(COORD_MIN, COORD_MAX),
            y: self.y.clamp(COORD_MIN, COORD_MAX),
        }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Walk the pixels of a line from `a` to `b` inclusive
fn bresenham(a: Point, b: Point, mut visit: impl FnMut(i32, i32)) {
    let dx = (b.x - a.x).abs();
    let dy = -(b.y - a.y).abs();
    let sx = if a.x < b.x { 1 } else { -1 };
    let sy = if a.y < b.y { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (a.x, a.y);
    loop {
        visit(x, y);
        if x == b.x && y == b.y {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Endpoints in a canonical order so both directions visit the same pixels
fn canonical(a: Point, b: Point) -> (Point, Point) {
    if (b.x, b.y) < (a.x, a.y) {
        (b, a)
    } else {
        (a, b)
    }
}

/// Draw a single line segment, both endpoints included
pub fn line(fb: &mut Framebuffer, a: Point, b: Point, brush: u8, over: bool) {
    let (a, b) = canonical(a.clamped(), b.clamped());
    bresenham(a, b, |x, y| fb.plot(x, y, brush, over));
}

/// Draw connected segments through `points`.
///
/// Shared vertices are plotted once, so exclusive-or drawing does not cancel
/// them out. Fewer than two points draws nothing.
pub fn polyline(fb: &mut Framebuffer, points: &[Point], brush: u8, over: bool) {
    if points.len() < 2 {
        return;
    }
    for (i, pair) in points.windows(2).enumerate() {
        let skip = if i > 0 && !over {
            Some(pair[0].clamped())
        } else {
            None
        };
        let (a, b) = canonical(pair[0].clamped(), pair[1].clamped());
        bresenham(a, b, |x, y| {
            if skip != Some(Point::new(x, y)) {
                fb.plot(x, y, brush, over);
            }
        });
    }
}

/// Coverage mask over the visible part of a bounding box
struct Mask {
    left: i32,
    bottom: i32,
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl Mask {
    fn new(left: i32, bottom: i32, right: i32, top: i32) -> Self {
        let width = (right - left + 1).max(0) as usize;
        let height = (top - bottom + 1).max(0) as usize;
        Self {
            left,
            bottom,
            width,
            height,
            bits: vec![false; width * height],
        }
    }

    fn set(&mut self, x: i32, y: i32) {
        let (cx, cy) = (x - self.left, y - self.bottom);
        if cx >= 0 && cy >= 0 && (cx as usize) < self.width && (cy as usize) < self.height {
            self.bits[cy as usize * self.width + cx as usize] = true;
        }
    }

    fn span(&mut self, x0: i32, x1: i32, y: i32) {
        let cy = y - self.bottom;
        if cy < 0 || cy as usize >= self.height || self.width == 0 {
            return;
        }
        let lo = (x0 - self.left).max(0);
        let hi = (x1 - self.left).min(self.width as i32 - 1);
        if lo > hi {
            return;
        }
        let row = cy as usize * self.width;
        self.bits[row + lo as usize..=row + hi as usize].fill(true);
    }

    fn apply(&self, fb: &mut Framebuffer, brush: u8, over: bool) {
        for cy in 0..self.height {
            let row = &self.bits[cy * self.width..(cy + 1) * self.width];
            let y = self.bottom + cy as i32;
            let mut cx = 0;
            while cx < row.len() {
                if !row[cx] {
                    cx += 1;
                    continue;
                }
                let start = cx;
                while cx < row.len() && row[cx] {
                    cx += 1;
                }
                fb.hline(self.left + start as i32, self.left + cx as i32 - 1, y, brush, over);
            }
        }
    }
}

/// Fill the polygon described by `vertices` using the even-odd rule.
///
/// The path is closed automatically; repeating the first vertex at the end
/// is allowed. The boundary is part of the shape, so an axis-aligned
/// rectangle fills exactly the pixels between its corners inclusive.
/// Fewer than three distinct vertices draws nothing.
pub fn area(fb: &mut Framebuffer, vertices: &[Point], brush: u8, over: bool) {
    let mut path: Vec<Point> = vertices.iter().map(|p| p.clamped()).collect();
    if path.len() > 1 && path.first() == path.last() {
        path.pop();
    }
    let mut distinct = path.clone();
    distinct.sort_by_key(|p| (p.x, p.y));
    distinct.dedup();
    if distinct.len() < 3 {
        return;
    }

    let min_x = path.iter().map(|p| p.x).min().unwrap_or(0).max(0);
    let max_x = path
        .iter()
        .map(|p| p.x)
        .max()
        .unwrap_or(-1)
        .min(fb.width() as i32 - 1);
    let min_y = path.iter().map(|p| p.y).min().unwrap_or(0).max(0);
    let max_y = path
        .iter()
        .map(|p| p.y)
        .max()
        .unwrap_or(-1)
        .min(fb.height() as i32 - 1);
    if min_x > max_x || min_y > max_y {
        return;
    }
    let mut mask = Mask::new(min_x, min_y, max_x, max_y);

    let edges: Vec<(Point, Point)> = path
        .iter()
        .zip(path.iter().cycle().skip(1))
        .map(|(&a, &b)| (a, b))
        .collect();

    let mut crossings = Vec::with_capacity(edges.len());
    for y in min_y..=max_y {
        crossings.clear();
        for &(a, b) in &edges {
            if a.y == b.y {
                continue;
            }
            let (lo, hi) = if a.y < b.y { (a, b) } else { (b, a) };
            // half-open so a vertex shared by two edges counts once
            if y >= lo.y && y < hi.y {
                let t = (y - lo.y) as f64 / (hi.y - lo.y) as f64;
                crossings.push(lo.x as f64 + t * (hi.x - lo.x) as f64);
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));
        for pair in crossings.chunks_exact(2) {
            let x0 = pair[0].ceil() as i32;
            let x1 = pair[1].floor() as i32;
            mask.span(x0, x1, y);
        }
    }

    for &(a, b) in &edges {
        let (a, b) = canonical(a, b);
        bresenham(a, b, |x, y| mask.set(x, y));
    }

    mask.apply(fb, brush, over);
}

/// Reading direction of plotted text, in quarter turns anticlockwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Left to right
    #[default]
    Right,
    /// Bottom to top
    Up,
    /// Right to left, upside down
    Left,
    /// Top to bottom
    Down,
}

impl Direction {
    /// Direction from its BASIC number; values wrap every four
    pub fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Direction::Right,
            1 => Direction::Up,
            2 => Direction::Left,
            _ => Direction::Down,
        }
    }

    /// Map a point of the unrotated `w` x `h` block (u right, v up) to an
    /// offset from the anchor so the rotated block keeps its bottom-left
    /// corner at the anchor
    #[inline]
    fn map(self, u: i64, v: i64, w: i64, h: i64) -> (i64, i64) {
        match self {
            Direction::Right => (u, v),
            Direction::Up => (h - 1 - v, u),
            Direction::Left => (w - 1 - u, h - 1 - v),
            Direction::Down => (v, w - 1 - u),
        }
    }
}

/// Fully resolved text rendering parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub brush: u8,
    pub charset: Charset,
    pub direction: Direction,
    pub size_x: u32,
    pub size_y: u32,
    pub over: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            brush: 1,
            charset: Charset::Standard,
            direction: Direction::Right,
            size_x: 1,
            size_y: 1,
            over: true,
        }
    }
}

/// Render `text` with its bottom-left corner at `anchor`.
///
/// Each character takes one 8x10 cell scaled by `size_x`/`size_y`; there
/// is no kerning. Only glyph pixels are drawn, the cell background is left
/// untouched.
pub fn text(fb: &mut Framebuffer, text: &str, anchor: Point, style: &TextStyle) {
    let anchor = anchor.clamped();
    let (ox, oy) = (anchor.x as i64, anchor.y as i64);
    let sx = style.size_x.clamp(1, MAX_SCALE) as i64;
    let sy = style.size_y.clamp(1, MAX_SCALE) as i64;
    let cell_w = CELL_WIDTH as i64 * sx;
    let cell_h = CELL_HEIGHT as i64 * sy;
    let block_w = cell_w * text.chars().count() as i64;
    let fb_w = fb.width() as i64;
    let fb_h = fb.height() as i64;

    for (i, c) in text.chars().enumerate() {
        let u0 = i as i64 * cell_w;
        let (ax, ay) = style.direction.map(u0, 0, block_w, cell_h);
        let (bx, by) = style.direction.map(u0 + cell_w - 1, cell_h - 1, block_w, cell_h);
        let (x_lo, x_hi) = (ox + ax.min(bx), ox + ax.max(bx));
        let (y_lo, y_hi) = (oy + ay.min(by), oy + ay.max(by));

        // once a cell is past the screen in the reading direction, so is
        // every cell after it
        let past_end = match style.direction {
            Direction::Right => x_lo >= fb_w,
            Direction::Up => y_lo >= fb_h,
            Direction::Left => x_hi < 0,
            Direction::Down => y_hi < 0,
        };
        if past_end {
            break;
        }
        if x_hi < 0 || y_hi < 0 || x_lo >= fb_w || y_lo >= fb_h {
            continue;
        }

        let g = glyph(c, style.charset);
        for gy in 0..CELL_HEIGHT {
            for gx in 0..CELL_WIDTH {
                if !g.is_set(gx, gy) {
                    continue;
                }
                for dy in 0..sy {
                    let v = cell_h - 1 - (gy as i64 * sy + dy);
                    for dx in 0..sx {
                        let u = u0 + gx as i64 * sx + dx;
                        let (px, py) = style.direction.map(u, v, block_w, cell_h);
                        let (x, y) = (ox + px, oy + py);
                        if (0..fb_w).contains(&x) && (0..fb_h).contains(&y) {
                            fb.plot(x as i32, y as i32, style.brush, style.over);
                        }
                    }
                }
            }
        }
    }
}

/// Copy an image with its bottom-left corner at `anchor`.
///
/// [`TRANSPARENT`] pixels are skipped; other indices are reduced modulo
/// `depth` to stay within the active palette.
pub fn blit(fb: &mut Framebuffer, image: &Image, anchor: Point, depth: usize, over: bool) {
    let anchor = anchor.clamped();
    let depth = depth.max(1);
    let h = image.height() as i32;
    for row in 0..image.height() {
        for col in 0..image.width() {
            match image.get(col, row) {
                Some(TRANSPARENT) | None => {}
                Some(index) => {
                    let index = (index as usize % depth) as u8;
                    fb.plot(
                        anchor.x + col as i32,
                        anchor.y + (h - 1 - row as i32),
                        index,
                        over,
                    );
                }
            }
        }
    }
}

/// Draw an opaque character cell at a raster position (top-left origin)
pub fn cell(fb: &mut Framebuffer, g: &Glyph, left: usize, top: usize, pen: u8, paper: u8) {
    fb.fill_raster_rect(left, top, CELL_WIDTH, CELL_HEIGHT, paper);
    let height = fb.height() as i32;
    for gy in 0..CELL_HEIGHT {
        for gx in 0..CELL_WIDTH {
            if g.is_set(gx, gy) {
                let y = height - 1 - (top + gy) as i32;
                fb.plot((left + gx) as i32, y, pen, true);
            }
        }
    }
}
