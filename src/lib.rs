//! Double-buffered driver for 3-bit (8-colour) 32×16 HUB75 LED panels.
//!
//! Built for parts with a couple of kilobytes of RAM and no FPU: two
//! pixels share every framebuffer byte, so each 32×16 buffer is only 128
//! bytes, and the scan-out is a plain bit-banged state machine over a
//! [`DigitalBus`].
//!
//! # Pieces
//!
//! - [`Color`] — the eight panel colours; the discriminant is the RGB bits.
//! - [`Canvas`] — the draw buffer. Bounds checked, translated, and an
//!   `embedded-graphics` [`DrawTarget`](embedded_graphics::draw_target::DrawTarget).
//! - [`ScanDriver`] — owns the scan buffer and streams it to the panel.
//! - [`Panel`] — ties them together: `begin`, `set`/`get`, `present`.
//! - [`Cooperative`] / [`Interrupt`] — who triggers the scan passes.
//!
//! # Interrupt-driven refresh
//!
//! ```ignore
//! use hub75_lite::{scan, Color, Interrupt, Panel, ScanConfig, ScanDriver, SharedScan};
//! use static_cell::StaticCell;
//!
//! static SCAN: StaticCell<SharedScan<MyBus, MyDelay>> = StaticCell::new();
//!
//! let scan: &'static SharedScan<_, _> =
//!     SCAN.init(ScanDriver::new(bus, delay, ScanConfig::default()).into_shared());
//! let mut panel = Panel::begin(scan, Interrupt::new(my_timer), None)?;
//!
//! panel.fill_all(Color::Blue);
//! panel.present();
//!
//! // The timer interrupt handler, with `scan` stashed where it can reach it:
//! if let Err(e) = scan::service(scan) {
//!     defmt::error!("HUB75 scan pass failed: {}", e);
//! }
//! ```
//!
//! # Crate Features
//!
//! - **`defmt`** — structured logging via [`defmt`] and `defmt::Format`
//!   on public types.
//! - **`task`** — [`refresh_task`], an Embassy refresh loop.

#![no_std]

pub mod bus;
pub mod color;
pub mod error;
pub mod framebuffer;
pub mod panel;
#[cfg(feature = "task")]
pub mod refresh_task;
pub mod scan;
pub mod scheduler;
pub mod translate;

#[cfg(test)]
mod mock;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use bus::{DigitalBus, Line, PinBus, Port};
pub use color::Color;
pub use error::PanelError;
pub use framebuffer::{Canvas, PackedBuffer, COLS, HALF_ROWS, ROWS};
pub use panel::Panel;
#[cfg(feature = "task")]
pub use refresh_task::refresh_task;
pub use scan::{ScanConfig, ScanDriver, SharedScan};
pub use scheduler::{Cooperative, Interrupt, RefreshScheduler, RefreshTimer};
pub use translate::{Coord, Translator};
