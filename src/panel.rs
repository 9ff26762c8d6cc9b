//! The panel driver instance.
//!
//! [`Panel`] owns the draw side of the double buffer and borrows the
//! shared [`ScanDriver`](crate::scan::ScanDriver), which owns the scan side.
//! Pixel edits land in the draw buffer only; [`Panel::present()`] is the
//! single path by which they reach the scan buffer and so the LEDs.
//!
//! # Lifecycle
//!
//! 1. [`ScanDriver::new()`](crate::scan::ScanDriver::new) +
//!    [`into_shared()`](crate::scan::ScanDriver::into_shared) — no I/O.
//! 2. [`Panel::begin()`] — idles the lines, clears both buffers, starts
//!    the refresh timer (interrupt mode).
//! 3. Draw with [`set()`](Panel::set), [`fill_all()`](Panel::fill_all)
//!    or `embedded-graphics` via [`canvas_mut()`](Panel::canvas_mut).
//! 4. [`present()`](Panel::present) to show the frame.

use embedded_graphics::{geometry::Point, primitives::Rectangle};
use embedded_hal::delay::DelayNs;

use crate::bus::DigitalBus;
use crate::color::Color;
use crate::error::PanelError;
use crate::framebuffer::{in_bounds, Canvas};
use crate::scan::{self, SharedScan};
use crate::scheduler::{Cooperative, RefreshScheduler};
use crate::translate::{self, Coord, Translator};

/// A double-buffered 3-bit HUB75 panel.
///
/// The refresh mode is part of the type: only a
/// `Panel<_, _, _, Cooperative>` has [`run_scan_pass()`](Panel::run_scan_pass).
///
/// # Example
///
/// ```ignore
/// use hub75_lite::{Color, Cooperative, Panel, PinBus, ScanConfig, ScanDriver};
///
/// let bus = PinBus::new(color_pins, address_pins, clk, lat, oe);
/// let scan = ScanDriver::new(bus, delay, ScanConfig::default()).into_shared();
/// let mut panel = Panel::begin(&scan, Cooperative, None)?;
///
/// panel.set(0, 0, Color::Red);
/// panel.present();
/// loop {
///     panel.run_scan_pass()?;
///     // ~2 ms of other work
/// }
/// ```
pub struct Panel<'a, BUS, D, S> {
    canvas: Canvas,
    scan: &'a SharedScan<BUS, D>,
    scheduler: S,
}

impl<'a, BUS, D, S> Panel<'a, BUS, D, S>
where
    BUS: DigitalBus,
    D: DelayNs,
    S: RefreshScheduler,
{
    /// Bring the panel up.
    ///
    /// Drives the control lines to their idle state (output disabled, clock
    /// and latch low, row address and colour data low), clears the draw and
    /// scan buffers to black, stores `translator` and finally starts the
    /// scheduler at the driver's configured refresh period.
    ///
    /// # Arguments
    /// * `scan` — the shared scan driver; in interrupt mode the timer
    ///   handler must service the same instance.
    /// * `scheduler` — [`Cooperative`] or [`Interrupt`](crate::Interrupt).
    /// * `translator` — optional logical→physical coordinate mapping.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Bus`] if the lines cannot be driven. The
    /// scheduler is not started in that case.
    pub fn begin(
        scan: &'a SharedScan<BUS, D>,
        mut scheduler: S,
        translator: Option<Translator>,
    ) -> Result<Self, PanelError<BUS::Error>> {
        let period_us = scan.lock(|driver| {
            let mut driver = driver.borrow_mut();
            driver.reset()?;
            Ok::<_, PanelError<BUS::Error>>(driver.config().refresh_period_us())
        })?;

        scheduler.start(period_us);

        #[cfg(feature = "defmt")]
        defmt::info!("HUB75 panel started, refresh period {} us", period_us);

        Ok(Self {
            canvas: Canvas::new(translator),
            scan,
            scheduler,
        })
    }

    // ── Drawing ──────────────────────────────────────────────────────

    /// Make the whole draw buffer black.
    pub fn clear(&mut self) {
        self.fill_all(Color::Black);
    }

    /// Make the whole draw buffer one colour.
    pub fn fill_all(&mut self, color: Color) {
        self.canvas.fill(color);
    }

    /// Set one pixel in the draw buffer. Ignored when off the panel.
    pub fn set(&mut self, x: Coord, y: Coord, color: Color) {
        self.canvas.set(x, y, color);
    }

    /// Read one pixel from the draw buffer. Black when off the panel.
    pub fn get(&self, x: Coord, y: Coord) -> Color {
        self.canvas.get(x, y)
    }

    /// Copy the `src` block of the draw buffer so its top-left corner lands
    /// on `dst`. See [`Canvas::copy_region()`].
    pub fn copy_region(&mut self, src: Rectangle, dst: Point) {
        self.canvas.copy_region(src, dst);
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// The draw surface, for `embedded-graphics` drawing.
    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    // ── Presentation ─────────────────────────────────────────────────

    /// Publish the draw buffer.
    ///
    /// Copies the whole draw buffer into the scan buffer. In interrupt mode
    /// the refresh timer is paused for the duration of the copy; in both
    /// modes the copy runs inside the scan mutex, so a pass never sees a
    /// partial frame. Everything drawn before this call is visible from
    /// the next pass on.
    pub fn present(&mut self) {
        self.scheduler.before_present();
        let canvas = &self.canvas;
        self.scan
            .lock(|driver| driver.borrow_mut().load(canvas.buffer()));
        self.scheduler.after_present();

        #[cfg(feature = "defmt")]
        defmt::trace!("frame presented");
    }

    /// What the panel is currently showing at logical `(x, y)`, using the
    /// same translation as [`get()`](Self::get). Black when off the panel.
    pub fn scan_pixel(&self, x: Coord, y: Coord) -> Color {
        if !in_bounds(x, y) {
            return Color::Black;
        }
        let (x, y) = translate::apply(self.canvas.translator(), x, y);
        self.scan.lock(|driver| driver.borrow().buffer().pixel(x, y))
    }

    /// Stop the scheduler and hand it back. The scan driver stays with its
    /// owner.
    pub fn release(mut self) -> S {
        self.scheduler.stop();

        #[cfg(feature = "defmt")]
        defmt::info!("HUB75 panel released");

        self.scheduler
    }
}

impl<BUS, D> Panel<'_, BUS, D, Cooperative>
where
    BUS: DigitalBus,
    D: DelayNs,
{
    /// Run one refresh pass now. Call every 1–2 ms.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Bus`] if the pass was cut short.
    pub fn run_scan_pass(&mut self) -> Result<(), PanelError<BUS::Error>> {
        scan::service(self.scan)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
