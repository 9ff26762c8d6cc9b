//! Async refresh loop for Embassy applications.
//!
//! [`refresh_task`] is cooperative refresh without a hand-written loop:
//! an `embassy_time::Ticker` wakes it once per refresh period and it runs
//! one scan pass. Pair it with a `Panel<_, _, _, Cooperative>` that does
//! the drawing and presenting from another task.

use embassy_time::{Duration, Ticker};
use embedded_hal::delay::DelayNs;

use crate::bus::DigitalBus;
use crate::scan::{self, SharedScan};

/// Periodic scan loop. Never returns.
///
/// This is a regular `async fn`, **not** an Embassy `#[task]`. Callers
/// should create a thin, concrete task wrapper, since Embassy tasks cannot
/// be generic:
///
/// ```ignore
/// #[embassy_executor::task]
/// async fn panel_refresh(scan: &'static SharedScan<MyBus, MyDelay>) {
///     refresh_task(scan).await;
/// }
/// ```
///
/// The period comes from the driver's
/// [`ScanConfig`](crate::scan::ScanConfig). A failed pass is logged and
/// the loop carries on with the next tick.
pub async fn refresh_task<BUS, D>(scan: &'static SharedScan<BUS, D>)
where
    BUS: DigitalBus,
    D: DelayNs,
{
    let period_us = scan.lock(|driver| driver.borrow().config().refresh_period_us());
    let mut ticker = Ticker::every(Duration::from_micros(u64::from(period_us)));

    #[cfg(feature = "defmt")]
    defmt::info!("HUB75 refresh task running every {} us", period_us);

    loop {
        if let Err(_e) = scan::service(scan) {
            #[cfg(feature = "defmt")]
            defmt::error!("Scan pass failed");
        }
        ticker.next().await;
    }
}
