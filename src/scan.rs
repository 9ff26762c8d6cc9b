//! HUB75 scan-out protocol.
//!
//! [`ScanDriver`] owns the scan buffer and the panel's I/O and emits one
//! full refresh pass per [`scan_pass()`](ScanDriver::scan_pass) call.
//! The panel only shows one pair of rows at a time, so the pass has to be
//! repeated every couple of milliseconds for persistence of vision to
//! produce a steady image.
//!
//! # Row cycle
//!
//! ```text
//!  OE  ‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾\____dwell____/‾
//!  CLK ____/‾\_/‾\_ ... _/‾\______________________________
//!  RGB  ==c0==c1== ... ==c31==                             (6 bits per column)
//!  LAT ___________________________/‾\______________________
//!  ABC =============0=================X=====row============
//! ```
//!
//! Output is blanked while shifting, so what a row shows is decided
//! entirely by the latch that follows.
//!
//! The driver is shared between the foreground and the refresh context
//! through [`SharedScan`]; [`service()`] is the entry point for an
//! interrupt handler or refresh loop.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};
use embedded_hal::delay::DelayNs;

use crate::bus::{DigitalBus, Line, Port, ROW_ADDRESS_MASK};
use crate::color::DATA_MASK;
use crate::error::PanelError;
use crate::framebuffer::{PackedBuffer, HALF_ROWS};

// ── ScanConfig ───────────────────────────────────────────────────────────

/// Refresh timing.
///
/// [`ScanConfig::default()`] matches the reference 16 MHz board: a pass
/// every 2 ms and a short per-row dwell, which measured at under a quarter
/// of the CPU. Slower parts need a shorter dwell (or a lower refresh rate)
/// to keep the pass inside the period; a dwell that is too short starves
/// brightness, one that is too long causes visible flicker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanConfig {
    /// Full passes per second. Default: 500.
    pub refresh_frequency_hz: u32,
    /// How long each row stays lit, in microseconds. Default: 15.
    pub row_dwell_us: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            refresh_frequency_hz: 500,
            row_dwell_us: 15,
        }
    }
}

impl ScanConfig {
    /// Convert the configured frequency to a timer period in microseconds.
    ///
    /// Formula: `1_000_000 / refresh_frequency_hz`. A frequency of zero is
    /// treated as 1 Hz, and the period never drops below 1 µs.
    pub fn refresh_period_us(&self) -> u32 {
        (1_000_000 / self.refresh_frequency_hz.max(1)).max(1)
    }
}

// ── ScanDriver ───────────────────────────────────────────────────────────

/// Streams the scan buffer to the panel.
pub struct ScanDriver<BUS, D> {
    bus: BUS,
    delay: D,
    buffer: PackedBuffer,
    config: ScanConfig,
}

/// A [`ScanDriver`] behind a critical-section mutex, reachable from both
/// the foreground and the refresh context.
pub type SharedScan<BUS, D> = Mutex<CriticalSectionRawMutex, RefCell<ScanDriver<BUS, D>>>;

impl<BUS, D> ScanDriver<BUS, D>
where
    BUS: DigitalBus,
    D: DelayNs,
{
    /// Construct the driver with an all-black scan buffer.
    ///
    /// No I/O happens until [`Panel::begin()`](crate::Panel::begin).
    pub fn new(bus: BUS, delay: D, config: ScanConfig) -> Self {
        Self {
            bus,
            delay,
            buffer: PackedBuffer::new(),
            config,
        }
    }

    /// Wrap the driver for sharing with a refresh context.
    pub fn into_shared(self) -> SharedScan<BUS, D> {
        Mutex::new(RefCell::new(self))
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// The buffer currently being scanned out.
    pub fn buffer(&self) -> &PackedBuffer {
        &self.buffer
    }

    /// Blank the panel, drive every line low and clear the scan buffer.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Bus`] if any line cannot be driven.
    pub fn reset(&mut self) -> Result<(), PanelError<BUS::Error>> {
        self.buffer.fill(crate::color::Color::Black);
        self.idle()?;
        self.bus.write_masked(Port::ColorData, DATA_MASK, 0)?;
        Ok(())
    }

    /// Replace the scan buffer with `src`.
    pub fn load(&mut self, src: &PackedBuffer) {
        self.buffer.copy_from(src);
    }

    /// Emit one full refresh pass: every scan row shifted, latched and
    /// shown for the configured dwell. Output is left disabled.
    ///
    /// # Errors
    ///
    /// Returns the first bus error; the rest of the pass is skipped.
    pub fn scan_pass(&mut self) -> Result<(), PanelError<BUS::Error>> {
        for row in 0..HALF_ROWS {
            self.idle()?;
            self.shift_row(row)?;
            self.latch()?;
            self.show_row(row)?;
            self.delay.delay_us(self.config.row_dwell_us);
        }
        self.bus.set_line(Line::OutputEnable)?;
        Ok(())
    }

    /// Hand back the bus and delay.
    pub fn release(self) -> (BUS, D) {
        (self.bus, self.delay)
    }

    // ── Protocol steps ───────────────────────────────────────────────

    /// Output disabled, clock and latch low, row address zero.
    fn idle(&mut self) -> Result<(), BUS::Error> {
        self.bus.set_line(Line::OutputEnable)?;
        self.bus.clear_line(Line::Clock)?;
        self.bus.clear_line(Line::Latch)?;
        self.bus.write_masked(Port::RowAddress, ROW_ADDRESS_MASK, 0)
    }

    /// Clock one column per rising edge, top and bottom halves together.
    fn shift_row(&mut self, row: usize) -> Result<(), BUS::Error> {
        for &cell in self.buffer.row(row) {
            self.bus.clear_line(Line::Clock)?;
            self.bus.write_masked(Port::ColorData, DATA_MASK, cell & DATA_MASK)?;
            self.bus.set_line(Line::Clock)?;
        }
        Ok(())
    }

    fn latch(&mut self) -> Result<(), BUS::Error> {
        self.bus.set_line(Line::Latch)?;
        self.bus.clear_line(Line::Latch)
    }

    fn show_row(&mut self, row: usize) -> Result<(), BUS::Error> {
        self.bus.set_line(Line::OutputEnable)?;
        self.bus.write_masked(Port::RowAddress, ROW_ADDRESS_MASK, row as u8)?;
        self.bus.clear_line(Line::OutputEnable)
    }
}

/// Run one refresh pass on a shared driver.
///
/// Call this from the periodic timer interrupt (interrupt-driven mode) or
/// from the application's own loop (cooperative mode). The pass runs inside
/// the mutex's critical section, so it can never observe a half-finished
/// [`Panel::present()`](crate::Panel::present).
///
/// # Errors
///
/// Returns [`PanelError::Bus`] if the pass was cut short by an I/O error.
pub fn service<BUS, D>(scan: &SharedScan<BUS, D>) -> Result<(), PanelError<BUS::Error>>
where
    BUS: DigitalBus,
    D: DelayNs,
{
    scan.lock(|driver| driver.borrow_mut().scan_pass())
}

// ── Tests ────────────────────────────────────────────────────────────────
