//! Error types for the panel driver.

use core::fmt;

/// Errors that can occur while driving the panel.
///
/// Pixel access never fails; only operations that touch the hardware
/// return this type.
#[derive(Debug, PartialEq, Eq)]
pub enum PanelError<E> {
    /// Underlying digital I/O error.
    Bus(E),
}

// Allow ergonomic `?` propagation from raw bus errors.
impl<E> From<E> for PanelError<E> {
    fn from(error: E) -> Self {
        PanelError::Bus(error)
    }
}

impl<E: fmt::Debug> fmt::Display for PanelError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PanelError::Bus(e) => write!(f, "Bus error: {:?}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for PanelError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            PanelError::Bus(e) => defmt::write!(f, "Bus error: {}", e),
        }
    }
}
