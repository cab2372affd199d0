//! # Raspberry Pi GPIO
//!
//! Pin access for the BCM283x/BCM2711 SoC family through the memory-mapped
//! GPIO block.
//!
//! The physical address of the peripheral window moved across board
//! generations, so it is resolved at runtime from the device tree by default;
//! the known per-generation constants are also exported for builds pinned to
//! one board. Within the window, pin direction lives in the 3-bit
//! function-select fields of the `GPFSEL` registers, while levels are driven
//! through the atomic `GPSET0`/`GPCLR0` registers and read from `GPLEV0`.
//!
//! Register layout per the BCM2835 ARM Peripherals datasheet; the same block
//! is carried unchanged through the BCM2711 (Pi 4).

use core::convert::Infallible;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::error::MmioError;
use crate::page::{self, RegisterPage};

/// Peripheral base of the BCM2835 (Pi 1, Pi Zero).
pub const PERI_BASE_BCM2835: u64 = 0x2000_0000;
/// Peripheral base of the BCM2836/BCM2837 (Pi 2, Pi 3).
pub const PERI_BASE_BCM2836: u64 = 0x3F00_0000;
/// Peripheral base of the BCM2711 (Pi 4).
pub const PERI_BASE_BCM2711: u64 = 0xFE00_0000;

/// Offset of the GPIO block within the peripheral window.
pub const GPIO_BLOCK_OFFSET: u64 = 0x0020_0000;

/// The device-tree node carrying the peripheral bus ranges.
const SOC_RANGES: &str = "/proc/device-tree/soc/ranges";
/// Byte offset of the big-endian peripheral base address within that node.
const RANGES_ADDRESS_OFFSET: u64 = 4;

// Word offsets of the GPIO registers within the mapped window.
const GPSET0: usize = 7;
const GPCLR0: usize = 10;
const GPLEV0: usize = 13;

const MAX_PIN: u8 = 31;

/// Reads the peripheral base address for the running board from the device
/// tree.
///
/// # Errors
///
/// Returns [`MmioError::Offset`] if the ranges node is missing or holds fewer
/// than four address bytes.
pub fn peripheral_base() -> Result<u64, MmioError> {
    read_soc_ranges(Path::new(SOC_RANGES))
}

/// Physical base of the GPIO register block for the running board.
///
/// # Errors
///
/// Propagates the [`MmioError::Offset`] failures of [`peripheral_base`].
pub fn gpio_base() -> Result<u64, MmioError> {
    Ok(peripheral_base()? + GPIO_BLOCK_OFFSET)
}

/// GPIO block base for a build-time-known peripheral base, e.g.
/// [`PERI_BASE_BCM2836`].
#[must_use]
pub const fn fixed_gpio_base(peripheral_base: u64) -> u64 {
    peripheral_base + GPIO_BLOCK_OFFSET
}

fn read_soc_ranges(path: &Path) -> Result<u64, MmioError> {
    let mut file = File::open(path).map_err(MmioError::Offset)?;
    file.seek(SeekFrom::Start(RANGES_ADDRESS_OFFSET))
        .map_err(MmioError::Offset)?;

    let mut raw = [0u8; 4];
    file.read_exact(&mut raw).map_err(MmioError::Offset)?;
    Ok(u64::from(u32::from_be_bytes(raw)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Input,
    Output,
}

/// One GPIO line on the Raspberry Pi GPIO block.
///
/// Direction is switched lazily: level writes configure the line as a driven
/// output first, level reads release it to a high-impedance input first. All
/// lines on the block share one register window mapped on first use.
#[derive(Debug)]
pub struct Pin {
    page: RegisterPage,
    index: u8,
    direction: Option<Direction>,
}

impl Pin {
    /// Opens GPIO line `index` (BCM numbering), resolving the GPIO base from
    /// the device tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range, the peripheral base
    /// cannot be resolved, or the register window cannot be mapped.
    pub fn new(index: u8) -> Result<Self, MmioError> {
        let base = gpio_base()?;
        Self::at_base(base, index)
    }

    /// Opens GPIO line `index` on a GPIO block at a known physical base.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or the register window
    /// cannot be mapped.
    pub fn at_base(gpio_base: u64, index: u8) -> Result<Self, MmioError> {
        if index > MAX_PIN {
            return Err(MmioError::InvalidPin { pin: index });
        }
        let page = page::acquire(gpio_base)?;
        Ok(Self {
            page,
            index,
            direction: None,
        })
    }

    /// Releases the line to a high-impedance input.
    pub fn set_input(&mut self) {
        // Function select 0b000 is input.
        self.page
            .update(fsel_word(self.index), |v| v & !(0b111 << fsel_shift(self.index)));
        self.direction = Some(Direction::Input);
        // The line needs a moment to settle before the first level read.
        page::settle_spin();
    }

    /// Configures the line as a driven output.
    pub fn set_output(&mut self) {
        // The function-select field is written by clearing it first, then
        // setting the output bit.
        self.page
            .update(fsel_word(self.index), |v| v & !(0b111 << fsel_shift(self.index)));
        self.page
            .update(fsel_word(self.index), |v| v | 1 << fsel_shift(self.index));
        self.direction = Some(Direction::Output);
    }

    /// Drives the line high through the atomic set register.
    pub fn drive_high(&self) {
        self.page.write(GPSET0, 1 << self.index);
    }

    /// Drives the line low through the atomic clear register.
    pub fn drive_low(&self) {
        self.page.write(GPCLR0, 1 << self.index);
    }

    /// Reads the current line level.
    #[must_use]
    pub fn level(&self) -> bool {
        self.page.read(GPLEV0) & (1 << self.index) != 0
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

const fn fsel_word(index: u8) -> usize {
    index as usize / 10
}

const fn fsel_shift(index: u8) -> u32 {
    (index as u32 % 10) * 3
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
    use std::path::PathBuf;

    use super::*;

    fn test_pin(index: u8) -> Pin {
        Pin {
            page: RegisterPage::for_test(),
            index,
            direction: None,
        }
    }

    fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn rejects_out_of_range_pins_before_any_mapping() {
        // Runs without privilege: validation fails before /dev/mem is touched.
        let result = Pin::at_base(fixed_gpio_base(PERI_BASE_BCM2836), 32);
        assert!(matches!(result, Err(MmioError::InvalidPin { pin: 32 })));
    }

    #[test]
    fn output_mode_writes_the_function_select_field() {
        let mut pin = test_pin(4);

        // Pre-soil the field to verify it is cleared before the output bit is
        // set.
        pin.page.write(fsel_word(4), 0b111 << fsel_shift(4));
        pin.set_output();
        assert_eq!(pin.page.read(fsel_word(4)), 0b001 << fsel_shift(4));

        pin.set_input();
        assert_eq!(pin.page.read(fsel_word(4)), 0);
    }

    #[test]
    fn fsel_fields_pack_ten_pins_per_register() {
        assert_eq!(fsel_word(9), 0);
        assert_eq!(fsel_word(10), 1);
        assert_eq!(fsel_shift(4), 12);
        assert_eq!(fsel_shift(17), 21);
    }

    #[test]
    fn levels_go_through_the_atomic_registers() {
        let mut pin = test_pin(17);

        pin.set_high().unwrap();
        assert_eq!(pin.page.read(GPSET0), 1 << 17);

        pin.set_low().unwrap();
        assert_eq!(pin.page.read(GPCLR0), 1 << 17);
    }

    #[test]
    fn level_reads_the_input_register() {
        let mut pin = test_pin(21);

        assert!(!pin.is_high().unwrap());
        pin.page.write(GPLEV0, 1 << 21);
        assert!(pin.is_high().unwrap());
        assert!(!pin.is_low().unwrap());
    }

    #[test]
    fn resolves_the_peripheral_base_from_the_ranges_node() {
        let path = temp_file(
            "dewline-ranges-ok",
            &[0x00, 0x00, 0x00, 0x00, 0x3F, 0x00, 0x00, 0x00, 0xAA],
        );
        assert_eq!(read_soc_ranges(&path).unwrap(), 0x3F00_0000);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn short_ranges_node_is_an_offset_error() {
        let path = temp_file("dewline-ranges-short", &[0x00, 0x00, 0x00, 0x00, 0x3F]);
        assert!(matches!(read_soc_ranges(&path), Err(MmioError::Offset(_))));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_ranges_node_is_an_offset_error() {
        let path = std::env::temp_dir().join("dewline-ranges-missing");
        assert!(matches!(read_soc_ranges(&path), Err(MmioError::Offset(_))));
    }
}
