//! # BeagleBone GPIO
//!
//! Pin access for the AM335x SoC, which splits its GPIO lines across four
//! controllers at fixed physical addresses. Each bank maps its own register
//! window; direction is a single bit in the output-enable register (set for
//! input, cleared for output), and levels are driven through the atomic
//! `SETDATAOUT`/`CLEARDATAOUT` registers and read from `DATAIN`.
//!
//! Register layout per the AM335x Technical Reference Manual. Lines are
//! addressed either as a `(bank, line)` pair or by their `P8_xx`/`P9_xx`
//! expansion-header name.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::error::MmioError;
use crate::page::{self, RegisterPage};

/// Physical base addresses of the four AM335x GPIO banks.
pub const GPIO_BANK_BASES: [u64; 4] = [0x44E0_7000, 0x4804_C000, 0x481A_C000, 0x481A_E000];

// Word offsets of the GPIO registers within a mapped bank window.
const GPIO_OE: usize = 0x134 / 4;
const GPIO_DATAIN: usize = 0x138 / 4;
const GPIO_CLEARDATAOUT: usize = 0x190 / 4;
const GPIO_SETDATAOUT: usize = 0x194 / 4;

const MAX_BANK: u8 = 3;
const MAX_PIN: u8 = 31;

/// Expansion-header pin names and the `(bank, line)` they route to.
///
/// Covers the GPIO-capable pins of the P8 and P9 headers in their default
/// mux mode.
const HEADER_PINS: &[(&str, (u8, u8))] = &[
    ("P8_3", (1, 6)),
    ("P8_4", (1, 7)),
    ("P8_5", (1, 2)),
    ("P8_6", (1, 3)),
    ("P8_7", (2, 2)),
    ("P8_8", (2, 3)),
    ("P8_9", (2, 5)),
    ("P8_10", (2, 4)),
    ("P8_11", (1, 13)),
    ("P8_12", (1, 12)),
    ("P8_13", (0, 23)),
    ("P8_14", (0, 26)),
    ("P8_15", (1, 15)),
    ("P8_16", (1, 14)),
    ("P8_17", (0, 27)),
    ("P8_18", (2, 1)),
    ("P8_19", (0, 22)),
    ("P8_20", (1, 31)),
    ("P8_21", (1, 30)),
    ("P8_22", (1, 5)),
    ("P8_23", (1, 4)),
    ("P8_24", (1, 1)),
    ("P8_25", (1, 0)),
    ("P8_26", (1, 29)),
    ("P8_27", (2, 22)),
    ("P8_28", (2, 24)),
    ("P8_29", (2, 23)),
    ("P8_30", (2, 25)),
    ("P8_31", (0, 10)),
    ("P8_32", (0, 11)),
    ("P8_33", (0, 9)),
    ("P8_34", (2, 17)),
    ("P8_35", (0, 8)),
    ("P8_36", (2, 16)),
    ("P8_37", (2, 14)),
    ("P8_38", (2, 15)),
    ("P8_39", (2, 12)),
    ("P8_40", (2, 13)),
    ("P9_11", (0, 30)),
    ("P9_12", (1, 28)),
    ("P9_13", (0, 31)),
    ("P9_14", (1, 18)),
    ("P9_15", (1, 16)),
    ("P9_16", (1, 19)),
    ("P9_17", (0, 5)),
    ("P9_18", (0, 4)),
    ("P9_19", (0, 13)),
    ("P9_20", (0, 12)),
    ("P9_21", (0, 3)),
    ("P9_22", (0, 2)),
    ("P9_23", (1, 17)),
    ("P9_24", (0, 15)),
    ("P9_25", (3, 21)),
    ("P9_26", (0, 14)),
    ("P9_27", (3, 19)),
    ("P9_28", (3, 17)),
    ("P9_29", (3, 15)),
    ("P9_30", (3, 16)),
    ("P9_31", (3, 14)),
    ("P9_41", (0, 20)),
    ("P9_42", (0, 7)),
];

/// Looks up an expansion-header pin name like `"P8_11"`.
#[must_use]
pub fn header_pin(name: &str) -> Option<(u8, u8)> {
    HEADER_PINS
        .iter()
        .find(|(header, _)| *header == name)
        .map(|(_, line)| *line)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Input,
    Output,
}

/// One GPIO line on an AM335x GPIO bank.
///
/// Direction is switched lazily: level writes configure the line as a driven
/// output first, level reads release it to a high-impedance input first.
/// Lines on the same bank share one register window mapped on first use.
#[derive(Debug)]
pub struct Pin {
    page: RegisterPage,
    mask: u32,
    direction: Option<Direction>,
}

impl Pin {
    /// Opens line `index` on GPIO bank `bank`.
    ///
    /// Bank and line indices are validated before any hardware access.
    ///
    /// # Errors
    ///
    /// Returns an error if the bank is outside `0..=3`, the line is outside
    /// `0..=31`, or the bank's register window cannot be mapped.
    pub fn new(bank: u8, index: u8) -> Result<Self, MmioError> {
        if bank > MAX_BANK {
            return Err(MmioError::InvalidBank { bank });
        }
        if index > MAX_PIN {
            return Err(MmioError::InvalidPin { pin: index });
        }
        let page = page::acquire(GPIO_BANK_BASES[bank as usize])?;
        Ok(Self {
            page,
            mask: 1 << index,
            direction: None,
        })
    }

    /// Opens the line named by its expansion-header label, e.g. `"P8_11"`.
    ///
    /// # Errors
    ///
    /// Returns [`MmioError::UnknownPin`] for names not on the P8/P9 headers,
    /// otherwise as [`Pin::new`].
    pub fn by_name(name: &str) -> Result<Self, MmioError> {
        let (bank, index) = header_pin(name).ok_or_else(|| MmioError::UnknownPin {
            name: name.to_owned(),
        })?;
        Self::new(bank, index)
    }

    /// Releases the line to a high-impedance input.
    pub fn set_input(&mut self) {
        // A set output-enable bit disables the driver.
        self.page.update(GPIO_OE, |v| v | self.mask);
        self.direction = Some(Direction::Input);
        // The line needs a moment to settle before the first level read.
        page::settle_spin();
    }

    /// Configures the line as a driven output.
    pub fn set_output(&mut self) {
        self.page.update(GPIO_OE, |v| v & !self.mask);
        self.direction = Some(Direction::Output);
    }

    /// Drives the line high through the atomic set register.
    pub fn drive_high(&self) {
        self.page.write(GPIO_SETDATAOUT, self.mask);
    }

    /// Drives the line low through the atomic clear register.
    pub fn drive_low(&self) {
        self.page.write(GPIO_CLEARDATAOUT, self.mask);
    }

    /// Reads the current line level.
    #[must_use]
    pub fn level(&self) -> bool {
        self.page.read(GPIO_DATAIN) & self.mask != 0
    }

    fn ensure(&mut self, direction: Direction) {
        if self.direction != Some(direction) {
            match direction {
                Direction::Input => self.set_input(),
                Direction::Output => self.set_output(),
            }
        }
    }
}

impl ErrorType for Pin {
    type Error = Infallible;
}

impl OutputPin for Pin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.ensure(Direction::Output);
        self.drive_low();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.ensure(Direction::Output);
        self.drive_high();
        Ok(())
    }
}

impl InputPin for Pin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.ensure(Direction::Input);
        Ok(self.level())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.is_high()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_pin(index: u8) -> Pin {
        Pin {
            page: RegisterPage::for_test(),
            mask: 1 << index,
            direction: None,
        }
    }

    #[test]
    fn rejects_out_of_range_banks_and_pins_before_any_mapping() {
        // Runs without privilege: validation fails before /dev/mem is touched.
        assert!(matches!(Pin::new(4, 0), Err(MmioError::InvalidBank { bank: 4 })));
        assert!(matches!(Pin::new(0, 32), Err(MmioError::InvalidPin { pin: 32 })));
    }

    #[test]
    fn unknown_header_names_are_rejected() {
        assert!(matches!(
            Pin::by_name("P8_99"),
            Err(MmioError::UnknownPin { .. })
        ));
    }

    #[test]
    fn header_names_route_to_bank_and_line() {
        assert_eq!(header_pin("P8_11"), Some((1, 13)));
        assert_eq!(header_pin("P9_12"), Some((1, 28)));
        assert_eq!(header_pin("P9_99"), None);
    }

    #[test]
    fn direction_toggles_the_output_enable_bit() {
        let mut pin = test_pin(13);

        pin.set_input();
        assert_eq!(pin.page.read(GPIO_OE), 1 << 13);

        pin.set_output();
        assert_eq!(pin.page.read(GPIO_OE), 0);
    }

    #[test]
    fn levels_go_through_the_atomic_registers() {
        let mut pin = test_pin(13);

        pin.set_high().unwrap();
        assert_eq!(pin.page.read(GPIO_SETDATAOUT), 1 << 13);

        pin.set_low().unwrap();
        assert_eq!(pin.page.read(GPIO_CLEARDATAOUT), 1 << 13);
    }

    #[test]
    fn level_reads_the_input_register() {
        let mut pin = test_pin(5);

        assert!(!pin.is_high().unwrap());
        pin.page.write(GPIO_DATAIN, 1 << 5);
        assert!(pin.is_high().unwrap());
        assert!(!pin.is_low().unwrap());
    }
}
