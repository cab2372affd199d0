//! `dewline-drivers` provides drivers for the climate sensors wired to a
//! dewline installation.
//!
//! Drivers are written against the [`embedded-hal`] digital traits; the
//! memory-mapped pins that satisfy those traits on Raspberry Pi and
//! BeagleBone boards live in `dewline-hal`, together with the realtime
//! scheduling guard the timing-critical drivers rely on.
//!
//! [`embedded-hal`]: https://crates.io/crates/embedded-hal

#![forbid(unsafe_code)]

/// The DHT11/DHT22 driver.
#[cfg(feature = "dht")]
pub mod dht;
