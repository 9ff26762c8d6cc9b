//! Digital I/O capability used by the scan driver.
//!
//! The scan protocol is written purely in terms of [`DigitalBus`]: raise or
//! drop a control [`Line`], or drive a masked byte onto a [`Port`]. Boards
//! that expose whole GPIO port registers can implement the trait with a
//! couple of register writes; [`PinBus`] is the portable implementation
//! over individual `embedded-hal` output pins.

use embedded_hal::digital::{OutputPin, PinState};

use crate::color::TOP_SHIFT;
use crate::framebuffer::HALF_ROWS;

/// Row-address bits used on the [`Port::RowAddress`] port (lines A, B, C).
pub const ROW_ADDRESS_MASK: u8 = 0x07;

const _: () = assert!(HALF_ROWS <= ROW_ADDRESS_MASK as usize + 1);

/// Single-bit control lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// Shift-register clock. Data is sampled on the rising edge.
    Clock,
    /// Latch (a.k.a. strobe): copies shift registers to the output stage.
    Latch,
    /// Output enable, **active low**: setting the line blanks the panel.
    OutputEnable,
}

/// Multi-bit groups of lines written as a masked byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    /// R1 G1 B1 R2 G2 B2 on bits 2..=7, laid out exactly like a
    /// framebuffer cell. Bits 0..=1 may belong to unrelated I/O.
    ColorData,
    /// Row-select lines A B C on bits 0..=2.
    RowAddress,
}

/// Digital outputs wired to a HUB75 connector.
pub trait DigitalBus {
    type Error: core::fmt::Debug;

    /// Drive `line` high.
    fn set_line(&mut self, line: Line) -> Result<(), Self::Error>;

    /// Drive `line` low.
    fn clear_line(&mut self, line: Line) -> Result<(), Self::Error>;

    /// Drive the bits of `port` selected by `mask` to the matching bits of
    /// `value`. Bits outside `mask` must keep their current level.
    fn write_masked(&mut self, port: Port, mask: u8, value: u8) -> Result<(), Self::Error>;
}

// ── PinBus ───────────────────────────────────────────────────────────────

/// [`DigitalBus`] over eleven discrete output pins.
///
/// All pins share one type, which suits HALs with type-erased outputs
/// (e.g. `Output<'static>`).
pub struct PinBus<P> {
    /// R1, G1, B1, R2, G2, B2.
    color: [P; 6],
    /// A, B, C.
    address: [P; 3],
    clock: P,
    latch: P,
    output_enable: P,
}

impl<P> PinBus<P>
where
    P: OutputPin,
{
    /// # Arguments
    /// * `color` — `[R1, G1, B1, R2, G2, B2]`
    /// * `address` — `[A, B, C]`
    /// * `clock`, `latch`, `output_enable` — control pins
    pub fn new(color: [P; 6], address: [P; 3], clock: P, latch: P, output_enable: P) -> Self {
        Self {
            color,
            address,
            clock,
            latch,
            output_enable,
        }
    }

    fn line_pin(&mut self, line: Line) -> &mut P {
        match line {
            Line::Clock => &mut self.clock,
            Line::Latch => &mut self.latch,
            Line::OutputEnable => &mut self.output_enable,
        }
    }
}

impl<P> DigitalBus for PinBus<P>
where
    P: OutputPin,
{
    type Error = P::Error;

    fn set_line(&mut self, line: Line) -> Result<(), Self::Error> {
        self.line_pin(line).set_high()
    }

    fn clear_line(&mut self, line: Line) -> Result<(), Self::Error> {
        self.line_pin(line).set_low()
    }

    fn write_masked(&mut self, port: Port, mask: u8, value: u8) -> Result<(), Self::Error> {
        let (pins, first_bit): (&mut [P], u8) = match port {
            Port::ColorData => (&mut self.color[..], TOP_SHIFT),
            Port::RowAddress => (&mut self.address[..], 0),
        };
        for (i, pin) in pins.iter_mut().enumerate() {
            let bit = 1u8 << (first_bit + i as u8);
            if mask & bit != 0 {
                pin.set_state(PinState::from(value & bit != 0))?;
            }
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    #[derive(Debug)]
    struct PinFault;

    impl embedded_hal::digital::Error for PinFault {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    struct TestPin<'a> {
        level: &'a Cell<bool>,
        broken: bool,
    }

    impl ErrorType for TestPin<'_> {
        type Error = PinFault;
    }

    impl OutputPin for TestPin<'_> {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            if self.broken {
                return Err(PinFault);
            }
            self.level.set(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            if self.broken {
                return Err(PinFault);
            }
            self.level.set(true);
            Ok(())
        }
    }

    fn bus(levels: &[Cell<bool>; 11]) -> PinBus<TestPin<'_>> {
        let pin = move |i: usize| TestPin {
            level: &levels[i],
            broken: false,
        };
        PinBus::new(
            [pin(0), pin(1), pin(2), pin(3), pin(4), pin(5)],
            [pin(6), pin(7), pin(8)],
            pin(9),
            pin(10),
            TestPin {
                level: &levels[10],
                broken: true,
            },
        )
    }

    fn levels() -> [Cell<bool>; 11] {
        core::array::from_fn(|_| Cell::new(false))
    }

    #[test]
    fn color_bits_map_to_r1_through_b2() {
        let levels = levels();
        let mut bus = bus(&levels);
        // R1, B1, G2 set.
        bus.write_masked(Port::ColorData, 0xFC, 0b0101_0100).unwrap();
        let got: [bool; 6] = core::array::from_fn(|i| levels[i].get());
        assert_eq!(got, [true, false, true, false, true, false]);
    }

    #[test]
    fn masked_write_leaves_unmasked_pins() {
        let levels = levels();
        let mut bus = bus(&levels);
        bus.write_masked(Port::ColorData, 0xFC, 0xFC).unwrap();
        // Only touch the top-half field.
        bus.write_masked(Port::ColorData, 0x1C, 0x00).unwrap();
        let got: [bool; 6] = core::array::from_fn(|i| levels[i].get());
        assert_eq!(got, [false, false, false, true, true, true]);
    }

    #[test]
    fn row_address_is_binary() {
        let levels = levels();
        let mut bus = bus(&levels);
        bus.write_masked(Port::RowAddress, ROW_ADDRESS_MASK, 5).unwrap();
        assert!(levels[6].get());
        assert!(!levels[7].get());
        assert!(levels[8].get());
    }

    #[test]
    fn control_lines_toggle() {
        let levels = levels();
        let mut bus = bus(&levels);
        bus.set_line(Line::Clock).unwrap();
        assert!(levels[9].get());
        bus.clear_line(Line::Clock).unwrap();
        assert!(!levels[9].get());
    }

    #[test]
    fn pin_errors_propagate() {
        let levels = levels();
        let mut bus = bus(&levels);
        assert!(matches!(bus.set_line(Line::OutputEnable), Err(PinFault)));
    }
}
