//! Refresh scheduling policy.
//!
//! How scan passes get triggered is chosen once, by the type handed to
//! [`Panel::begin()`](crate::Panel::begin):
//!
//! - [`Interrupt`] — a periodic hardware timer fires the scan pass. The
//!   application's timer interrupt handler calls
//!   [`scan::service()`](crate::scan::service); the foreground never does.
//! - [`Cooperative`] — no timer. The application calls
//!   [`Panel::run_scan_pass()`](crate::Panel::run_scan_pass) (or runs
//!   `refresh_task` with the `task` feature) every 1–2 ms.
//!
//! The scheduler also brackets [`Panel::present()`](crate::Panel::present)
//! so the interrupt stays quiet for exactly the length of the buffer copy.

/// A periodic, preemptive timer that invokes the refresh handler.
///
/// Implementations typically program a compare-match timer and toggle its
/// interrupt-enable bit in `pause`/`resume`.
pub trait RefreshTimer {
    /// Begin firing every `period_us` microseconds.
    fn start(&mut self, period_us: u32);

    /// Temporarily stop firing. Must not lose the programmed period.
    fn pause(&mut self);

    /// Undo [`pause()`](Self::pause).
    fn resume(&mut self);

    /// Stop firing for good.
    fn stop(&mut self);
}

/// Hooks the panel calls at its scheduling points.
pub trait RefreshScheduler {
    /// Called once from `begin`, after the hardware is in its idle state.
    fn start(&mut self, period_us: u32);

    /// Called immediately before the draw buffer is copied to the scan
    /// buffer.
    fn before_present(&mut self);

    /// Called immediately after the copy.
    fn after_present(&mut self);

    /// Called when the panel is released.
    fn stop(&mut self);
}

// ── Cooperative ──────────────────────────────────────────────────────────

/// The caller drives refresh from its own loop. No background work.
#[derive(Debug, Default, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cooperative;

impl RefreshScheduler for Cooperative {
    fn start(&mut self, _period_us: u32) {}

    fn before_present(&mut self) {}

    fn after_present(&mut self) {}

    fn stop(&mut self) {}
}

// ── Interrupt ────────────────────────────────────────────────────────────

/// Refresh is driven by a periodic timer interrupt.
pub struct Interrupt<T> {
    timer: T,
}

impl<T> Interrupt<T>
where
    T: RefreshTimer,
{
    pub fn new(timer: T) -> Self {
        Self { timer }
    }

    /// Give the timer back.
    pub fn into_inner(self) -> T {
        self.timer
    }
}

impl<T> RefreshScheduler for Interrupt<T>
where
    T: RefreshTimer,
{
    fn start(&mut self, period_us: u32) {
        self.timer.start(period_us);
    }

    fn before_present(&mut self) {
        self.timer.pause();
    }

    fn after_present(&mut self) {
        self.timer.resume();
    }

    fn stop(&mut self) {
        self.timer.stop();
    }
}
