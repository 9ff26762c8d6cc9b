//! Panel colours and their packed bit representation.
//!
//! The panel shows eight colours, one bit per LED channel. A [`Color`]'s
//! numeric value *is* its wire format: bit 0 drives the red line, bit 1
//! green and bit 2 blue. The scan driver clocks these bits straight onto
//! the R/G/B shift-register inputs, so the discriminants below must not
//! change.
//!
//! Two colours share one framebuffer cell (see [`Half`]):
//!
//! ```text
//!   bit:   7   6   5   4   3   2   1   0
//!        ┌───┬───┬───┬───┬───┬───┬───┬───┐
//!        │ B2│ G2│ R2│ B1│ G1│ R1│ - │ - │
//!        └───┴───┴───┴───┴───┴───┴───┴───┘
//!          bottom half  top half   reserved
//! ```
//!
//! Bits 0 and 1 are never set by the framebuffer; on the reference board
//! they are the UART lines sharing the colour-data port.

use embedded_graphics::pixelcolor::{BinaryColor, PixelColor, Rgb888, RgbColor};

// ── Bit layout ───────────────────────────────────────────────────────────

/// Mask covering one 3-bit colour value.
pub const COLOR_MASK: u8 = 0x07;

/// Bit offset of the top-half colour inside a framebuffer cell.
pub const TOP_SHIFT: u8 = 2;

/// Bit offset of the bottom-half colour inside a framebuffer cell.
pub const BOTTOM_SHIFT: u8 = 5;

/// Cell bits owned by the top-half colour (`0x1C`).
pub const TOP_MASK: u8 = COLOR_MASK << TOP_SHIFT;

/// Cell bits owned by the bottom-half colour (`0xE0`).
pub const BOTTOM_MASK: u8 = COLOR_MASK << BOTTOM_SHIFT;

/// All cell bits that carry colour data (`0xFC`).
pub const DATA_MASK: u8 = TOP_MASK | BOTTOM_MASK;

// ── Color ────────────────────────────────────────────────────────────────

/// One of the eight colours a 3-bit HUB75 panel can show.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    #[default]
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
}

impl Color {
    /// Every colour, in discriminant order.
    pub const ALL: [Color; 8] = [
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::White,
    ];

    /// The colour's 3-bit value.
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode the low three bits of `bits`; higher bits are ignored.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & COLOR_MASK {
            0 => Color::Black,
            1 => Color::Red,
            2 => Color::Green,
            3 => Color::Yellow,
            4 => Color::Blue,
            5 => Color::Magenta,
            6 => Color::Cyan,
            _ => Color::White,
        }
    }

    /// Build a colour from its three channel states.
    pub const fn from_channels(red: bool, green: bool, blue: bool) -> Self {
        Self::from_bits((red as u8) | (green as u8) << 1 | (blue as u8) << 2)
    }

    pub const fn red(self) -> bool {
        self.bits() & 0x01 != 0
    }

    pub const fn green(self) -> bool {
        self.bits() & 0x02 != 0
    }

    pub const fn blue(self) -> bool {
        self.bits() & 0x04 != 0
    }

    /// A cell value with both halves set to this colour.
    ///
    /// Used by whole-buffer fills, which bypass per-pixel packing.
    pub const fn packed_pair(self) -> u8 {
        self.bits() << TOP_SHIFT | self.bits() << BOTTOM_SHIFT
    }
}

impl PixelColor for Color {
    type Raw = ();
}

/// Each channel is lit when its 8-bit intensity is at least half scale.
impl From<Rgb888> for Color {
    fn from(c: Rgb888) -> Self {
        Color::from_channels(c.r() >= 0x80, c.g() >= 0x80, c.b() >= 0x80)
    }
}

impl From<Color> for Rgb888 {
    fn from(c: Color) -> Self {
        let level = |on: bool| if on { u8::MAX } else { 0 };
        Rgb888::new(level(c.red()), level(c.green()), level(c.blue()))
    }
}

impl From<BinaryColor> for Color {
    fn from(c: BinaryColor) -> Self {
        match c {
            BinaryColor::On => Color::White,
            BinaryColor::Off => Color::Black,
        }
    }
}

// ── Half ─────────────────────────────────────────────────────────────────

/// Which electrical half of the panel a pixel belongs to.
///
/// The top half (`y < HALF_ROWS`) and bottom half are clocked out on the
/// same edge, so their colours share one cell byte in disjoint bit fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Half {
    Top,
    Bottom,
}

impl Half {
    /// Bit offset of this half's colour field.
    pub const fn shift(self) -> u8 {
        match self {
            Half::Top => TOP_SHIFT,
            Half::Bottom => BOTTOM_SHIFT,
        }
    }

    /// Cell bits owned by this half.
    pub const fn mask(self) -> u8 {
        COLOR_MASK << self.shift()
    }

    /// Return `cell` with this half's field replaced by `color`.
    ///
    /// The other half's bits are preserved.
    pub const fn insert(self, cell: u8, color: Color) -> u8 {
        (cell & !self.mask()) | (color.bits() << self.shift())
    }

    /// Read this half's colour out of `cell`.
    pub const fn extract(self, cell: u8) -> Color {
        Color::from_bits(cell >> self.shift())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
