//! `dewline-hal` is the platform access layer for single-wire sensor capture
//! on Raspberry Pi and BeagleBone boards.
//!
//! The crate maps GPIO register windows out of `/dev/mem`, exposes pin-level
//! primitives as volatile operations on those registers, and provides the
//! realtime scheduling guard used to keep capture jitter low. Pin types
//! implement the [`embedded-hal`] digital traits so the drivers built on top
//! stay platform-agnostic.
//!
//! Opening `/dev/mem` requires elevated privilege. Resolving the Raspberry Pi
//! peripheral base additionally requires read access to
//! `/proc/device-tree/soc/ranges`.
//!
//! [`embedded-hal`]: https://crates.io/crates/embedded-hal

/// BeagleBone (AM335x) GPIO banks.
#[cfg(feature = "am335x")]
pub mod am335x;

/// Raspberry Pi (BCM283x family) GPIO.
#[cfg(feature = "bcm")]
pub mod bcm;

/// Realtime scheduling for timing-critical capture windows.
pub mod sched;

mod error;
mod page;

pub use error::MmioError;
