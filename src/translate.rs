//! Logical-to-physical coordinate translation.
//!
//! A [`Translator`] is handed to [`Panel::begin`](crate::Panel::begin) and
//! is applied to every individually addressed pixel before it touches the
//! buffer. It lets drawing code keep a convenient origin while the panel
//! is mounted rotated, mirrored, or wired in an unusual order. Whole-buffer
//! fills bypass it.
//!
//! A translator may map an in-range coordinate to an out-of-range one
//! (e.g. [`swap_xy`] on a non-square panel); such accesses are dropped on
//! write and read as black.

use crate::framebuffer::{COLS, ROWS};

/// Signed pixel coordinate. Negative values are legal input and simply
/// fall outside the panel.
pub type Coord = i16;

/// Maps a logical `(x, y)` to the storage `(x', y')`.
pub type Translator = fn(Coord, Coord) -> (Coord, Coord);

/// Apply `translator`, or pass the coordinate through if there is none.
#[inline]
pub(crate) fn apply(translator: Option<Translator>, x: Coord, y: Coord) -> (Coord, Coord) {
    match translator {
        Some(f) => f(x, y),
        None => (x, y),
    }
}

// ── Stock translators ────────────────────────────────────────────────────

/// Exchange the axes.
pub fn swap_xy(x: Coord, y: Coord) -> (Coord, Coord) {
    (y, x)
}

/// Panel mounted upside down.
pub fn rotate_180(x: Coord, y: Coord) -> (Coord, Coord) {
    (COLS as Coord - 1 - x, ROWS as Coord - 1 - y)
}

/// Flip left/right.
pub fn mirror_x(x: Coord, y: Coord) -> (Coord, Coord) {
    (COLS as Coord - 1 - x, y)
}

/// Flip top/bottom.
pub fn mirror_y(x: Coord, y: Coord) -> (Coord, Coord) {
    (x, ROWS as Coord - 1 - y)
}
