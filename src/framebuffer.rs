//! Packed framebuffer storage and the foreground drawing surface.
//!
//! A [`PackedBuffer`] holds `HALF_ROWS × COLS` bytes. Each byte carries
//! the colours of two pixels in the same column: one in the top half of
//! the panel and its partner `HALF_ROWS` rows below (see
//! [`Half`](crate::color::Half)). A 32×16 panel therefore fits in 128
//! bytes per buffer instead of 512.
//!
//! [`Canvas`] is the draw side of the double buffer. It owns one
//! `PackedBuffer`, applies the coordinate [`Translator`] and bounds checks,
//! and implements `embedded-graphics`' [`DrawTarget`] so lines, shapes and
//! text from that crate land on the panel through the same checked path.

use core::convert::Infallible;

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    primitives::{PointsIter, Rectangle},
    Pixel,
};

use crate::color::{Color, Half};
use crate::translate::{self, Coord, Translator};

// ── Geometry ─────────────────────────────────────────────────────────────

/// Physical columns on the panel.
pub const COLS: usize = 32;

/// Physical rows on the panel.
pub const ROWS: usize = 16;

/// Rows per electrical half; also the number of row-select cycles per
/// scan pass.
pub const HALF_ROWS: usize = ROWS / 2;

const _: () = assert!(ROWS % 2 == 0, "panel must split into two equal halves");

/// Returns `true` if `(x, y)` lies on the panel.
pub fn in_bounds(x: Coord, y: Coord) -> bool {
    x >= 0 && (x as usize) < COLS && y >= 0 && (y as usize) < ROWS
}

/// Storage position `(row, col, half)` of an untranslated coordinate.
fn locate(x: Coord, y: Coord) -> Option<(usize, usize, Half)> {
    if !in_bounds(x, y) {
        return None;
    }
    let (col, y) = (x as usize, y as usize);
    if y < HALF_ROWS {
        Some((y, col, Half::Top))
    } else {
        Some((y - HALF_ROWS, col, Half::Bottom))
    }
}

// ── PackedBuffer ─────────────────────────────────────────────────────────

/// One packed colour grid, indexed `[scan_row][column]`.
#[derive(Clone, PartialEq, Eq)]
pub struct PackedBuffer {
    cells: [[u8; COLS]; HALF_ROWS],
}

impl Default for PackedBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PackedBuffer {
    /// An all-black buffer.
    pub const fn new() -> Self {
        Self {
            cells: [[0; COLS]; HALF_ROWS],
        }
    }

    /// Set every pixel in both halves to `color`.
    pub fn fill(&mut self, color: Color) {
        let packed = color.packed_pair();
        for row in self.cells.iter_mut() {
            row.fill(packed);
        }
    }

    /// Overwrite this buffer with the contents of `src`.
    pub fn copy_from(&mut self, src: &PackedBuffer) {
        self.cells = src.cells;
    }

    /// Packed cells of one scan row (top-half row `row` paired with
    /// bottom-half row `row + HALF_ROWS`).
    ///
    /// # Panics
    ///
    /// Panics if `row >= HALF_ROWS`.
    pub fn row(&self, row: usize) -> &[u8; COLS] {
        &self.cells[row]
    }

    /// Write one pixel at a physical coordinate. Out-of-range writes are
    /// dropped.
    pub fn set_pixel(&mut self, x: Coord, y: Coord, color: Color) {
        if let Some((row, col, half)) = locate(x, y) {
            let cell = &mut self.cells[row][col];
            *cell = half.insert(*cell, color);
        }
    }

    /// Read one pixel at a physical coordinate. Out of range reads black.
    pub fn pixel(&self, x: Coord, y: Coord) -> Color {
        match locate(x, y) {
            Some((row, col, half)) => half.extract(self.cells[row][col]),
            None => Color::Black,
        }
    }
}

impl core::fmt::Debug for PackedBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.cells.iter()).finish()
    }
}

// ── Canvas ───────────────────────────────────────────────────────────────

/// The foreground drawing surface (draw buffer plus translator).
///
/// All pixel access is bounds checked against the *logical* coordinate
/// before translation, and again after translation.
pub struct Canvas {
    buffer: PackedBuffer,
    translator: Option<Translator>,
}

impl Canvas {
    /// An all-black canvas using `translator` for pixel access.
    pub const fn new(translator: Option<Translator>) -> Self {
        Self {
            buffer: PackedBuffer::new(),
            translator,
        }
    }

    /// Set the pixel at logical `(x, y)`. No-op when off the panel.
    pub fn set(&mut self, x: Coord, y: Coord, color: Color) {
        if !in_bounds(x, y) {
            return;
        }
        let (x, y) = translate::apply(self.translator, x, y);
        self.buffer.set_pixel(x, y, color);
    }

    /// Colour of the pixel at logical `(x, y)`, black when off the panel.
    pub fn get(&self, x: Coord, y: Coord) -> Color {
        if !in_bounds(x, y) {
            return Color::Black;
        }
        let (x, y) = translate::apply(self.translator, x, y);
        self.buffer.pixel(x, y)
    }

    /// Copy the colour of logical `(x1, y1)` to logical `(x2, y2)`.
    pub fn copy_pixel(&mut self, x1: Coord, y1: Coord, x2: Coord, y2: Coord) {
        self.set(x2, y2, self.get(x1, y1));
    }

    /// Copy the pixels of `src` so its top-left corner lands on `dst`,
    /// one [`copy_pixel()`](Self::copy_pixel) at a time from top-left to
    /// bottom-right.
    ///
    /// Source pixels off the panel read as black and destination pixels
    /// off the panel are dropped. A destination that overlaps the source
    /// further right or down reads pixels this call has already written.
    pub fn copy_region(&mut self, src: Rectangle, dst: Point) {
        let offset = dst - src.top_left;
        for from in src.points() {
            let color = point_coords(from).map_or(Color::Black, |(x, y)| self.get(x, y));
            if let Some((x, y)) = point_coords(from + offset) {
                self.set(x, y, color);
            }
        }
    }

    /// Fill the whole draw buffer with one colour. Not translated.
    pub fn fill(&mut self, color: Color) {
        self.buffer.fill(color);
    }

    /// The packed draw buffer.
    pub fn buffer(&self) -> &PackedBuffer {
        &self.buffer
    }

    pub fn translator(&self) -> Option<Translator> {
        self.translator
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(COLS as u32, ROWS as u32)
    }
}

impl DrawTarget for Canvas {
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some((x, y)) = point_coords(point) {
                self.set(x, y, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

/// `None` for points that don't fit a [`Coord`]; those are far off the
/// panel anyway.
fn point_coords(point: Point) -> Option<(Coord, Coord)> {
    Some((Coord::try_from(point.x).ok()?, Coord::try_from(point.y).ok()?))
}

// ── Tests ────────────────────────────────────────────────────────────────
