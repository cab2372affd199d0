use core::fmt;
use std::io;

/// Errors raised by the memory-mapped GPIO access layer.
///
/// None of these are transient: they indicate missing privilege, a
/// misdetected platform, or a caller bug, and retrying the same call will
/// fail the same way.
#[derive(Debug)]
pub enum MmioError {
    /// `/dev/mem` could not be opened, typically because the process lacks
    /// the privilege to access physical memory.
    DevMem(io::Error),
    /// The GPIO register window could not be mapped into process memory.
    Mmap(io::Error),
    /// The platform description file holding the peripheral base address was
    /// missing or too short. The board was probably misdetected.
    Offset(io::Error),
    /// The pin index lies outside the supported range for its bank.
    InvalidPin {
        /// The rejected pin index.
        pin: u8,
    },
    /// The GPIO bank index lies outside the supported range.
    InvalidBank {
        /// The rejected bank index.
        bank: u8,
    },
    /// The expansion-header pin name does not map to a known GPIO line.
    UnknownPin {
        /// The rejected pin name.
        name: String,
    },
}

impl fmt::Display for MmioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DevMem(error) => write!(f, "cannot open /dev/mem: {error}"),
            Self::Mmap(error) => write!(f, "cannot map the gpio register window: {error}"),
            Self::Offset(error) => {
                write!(f, "cannot read the peripheral base from the device tree: {error}")
            }
            Self::InvalidPin { pin } => write!(f, "gpio pin {pin} is out of range"),
            Self::InvalidBank { bank } => write!(f, "gpio bank {bank} is out of range"),
            Self::UnknownPin { name } => write!(f, "unknown expansion-header pin {name:?}"),
        }
    }
}

impl std::error::Error for MmioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DevMem(error) | Self::Mmap(error) | Self::Offset(error) => Some(error),
            Self::InvalidPin { .. } | Self::InvalidBank { .. } | Self::UnknownPin { .. } => None,
        }
    }
}
