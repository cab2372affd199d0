//! # DHT11/DHT22 driver
//!
//! This module decodes the single-wire protocol of the `DHT11` and `DHT22`
//! humidity and temperature sensors. Both models transmit request,
//! acknowledgment, and 40 data bits as pulse-width-modulated levels on one
//! shared data line, with bit periods in the tens of microseconds.
//!
//! On a general-purpose OS there is no timer precise enough to sample that
//! reliably through blocking waits, so the driver measures pulse widths by
//! busy-wait polling the pin and counting iterations. The counts are an
//! uncalibrated time proxy: instead of comparing against absolute durations,
//! the driver derives a classification threshold from the pulse train itself
//! (the low phase of every data pulse is a fixed ~50 µs), which makes
//! decoding self-calibrating against whatever loop speed the host CPU
//! provides. The capture window is bracketed by
//! [`RealtimeGuard`](dewline_hal::sched::RealtimeGuard) to keep scheduler
//! preemption out of the measurements.
//!
//! Reads over this protocol are inherently lossy; expect a fair share of
//! [`DhtError::Timeout`] and [`DhtError::ChecksumMismatch`] results and
//! retry, or use [`read_retry`]. The sensors also need about two seconds
//! between transmissions.
//!
//! For detailed specifications, refer to the
//! [datasheet](https://www.alldatasheet.com/datasheet-pdf/pdf/1132459/ETC2/DHT22.html)
//! and the description of the proprietary
//! [communication protocol](https://www.ocfreaks.com/basics-interfacing-dht11-dht22-humidity-temperature-sensor-mcu/).

use core::fmt;
use std::thread;
use std::time::{Duration, Instant};

use embedded_hal::digital::{InputPin, OutputPin, PinState};

use dewline_hal::sched::RealtimeGuard;

use tracing::trace;

/// Pulse pairs in one transmission: one fixed-width acknowledgment pulse
/// followed by 40 data bits.
const DHT_PULSES: usize = 41;

/// Default bound on busy-wait iterations per bus phase.
///
/// An empirical constant sized for Raspberry Pi / BeagleBone class CPUs, not
/// derived from wall-clock time; hosts that spin much faster need a larger
/// bound.
const DEFAULT_MAX_SPIN: u32 = 32_000;

/// How long the line is driven high to wake the sensor.
const WAKE_HOLD: Duration = Duration::from_millis(500);

/// How long the line is driven low to request a transmission.
const REQUEST_HOLD: Duration = Duration::from_millis(20);

/// Minimum interval the sensors need between transmissions.
pub const MIN_READ_INTERVAL: Duration = Duration::from_secs(2);

/// The supported sensor models.
///
/// Selecting the wrong model yields absurd values but is otherwise harmless:
/// only the interpretation of the validated payload differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SensorKind {
    /// `DHT11`: integer-resolution humidity and temperature.
    Dht11,
    /// `DHT22` (also sold as AM2302): 0.1-resolution fixed-point values with
    /// a signed temperature.
    Dht22,
}

/// A single humidity and temperature measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measurement {
    /// Relative humidity as a percentage (% RH).
    pub humidity: f32,
    /// Temperature in degrees Celsius (°C).
    pub temperature: f32,
}

/// One low/high pulse pair, measured in busy-wait iterations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PulseSample {
    /// Iterations spent in the low phase.
    pub low: u32,
    /// Iterations spent in the high phase.
    pub high: u32,
}

/// Errors that may occur when reading the sensor.
///
/// `Timeout` and `ChecksumMismatch` are transient: the protocol is lossy
/// over a single attempt and callers are expected to retry with their own
/// backoff. `Pin` errors are never retryable.
#[derive(Debug)]
pub enum DhtError<E> {
    /// GPIO pin errors.
    Pin(E),
    /// A bus phase did not complete within the configured spin bound.
    Timeout,
    /// The transmitted checksum does not match the received payload.
    ChecksumMismatch,
}

impl<E> DhtError<E> {
    /// Whether the caller may retry the read.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::ChecksumMismatch)
    }
}

impl<E> From<E> for DhtError<E> {
    fn from(e: E) -> Self {
        DhtError::Pin(e)
    }
}

impl<E: fmt::Display> fmt::Display for DhtError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pin(error) => write!(f, "gpio error: {error}"),
            Self::Timeout => write!(f, "the sensor did not respond within the spin bound"),
            Self::ChecksumMismatch => write!(f, "checksum mismatch in the transmitted frame"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for DhtError<E> {}

/// Tunables for a capture attempt.
#[derive(Debug, Clone, Copy)]
pub struct DhtConfig {
    /// Maximum busy-wait iterations per bus phase before the attempt times
    /// out. Large enough to exceed any expected sensor latency on the stock
    /// boards; raise it on faster hosts.
    pub max_spin: u32,
    /// How long the line is held high to wake the sensor.
    pub wake: Duration,
    /// How long the line is held low to request a transmission.
    pub request: Duration,
}

impl Default for DhtConfig {
    fn default() -> Self {
        Self {
            max_spin: DEFAULT_MAX_SPIN,
            wake: WAKE_HOLD,
            request: REQUEST_HOLD,
        }
    }
}

/// The `DHT11`/`DHT22` driver.
///
/// Generic over any pin implementing the `embedded-hal` digital traits; on
/// dewline hardware that is a memory-mapped pin from `dewline-hal`. One call
/// to [`read`](Dht::read) is one full protocol exchange. The driver takes no
/// internal lock: callers must not interleave capture windows on the same
/// line, and should wait [`MIN_READ_INTERVAL`] between attempts.
pub struct Dht<P> {
    pin: P,
    kind: SensorKind,
    config: DhtConfig,
}

impl<P> Dht<P>
where
    P: InputPin + OutputPin,
{
    /// Creates a driver for the `kind` sensor wired to `pin`.
    #[must_use]
    pub fn new(kind: SensorKind, pin: P) -> Self {
        Self::with_config(kind, pin, DhtConfig::default())
    }

    /// Creates a driver with explicit capture tunables.
    #[must_use]
    pub fn with_config(kind: SensorKind, pin: P, config: DhtConfig) -> Self {
        Self { pin, kind, config }
    }

    /// Reads a single humidity and temperature measurement.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Driving or reading the pin fails
    /// - A bus phase does not complete within the configured spin bound
    /// - The received payload fails checksum validation
    pub fn read(&mut self) -> Result<Measurement, DhtError<P::Error>> {
        self.wake()?;
        self.request()?;
        let pulses = self.capture()?;

        let frame = classify(&pulses);
        trace!(?frame, "decoded sensor frame");

        if !checksum_matches(&frame) {
            return Err(DhtError::ChecksumMismatch);
        }
        Ok(interpret(self.kind, &frame))
    }

    /// Drives the line high long enough for the sensor to leave its
    /// power-on state.
    fn wake(&mut self) -> Result<(), DhtError<P::Error>> {
        self.pin.set_high()?;
        // thread::sleep restarts after signal delivery, so the hold is never
        // truncated.
        thread::sleep(self.config.wake);
        Ok(())
    }

    /// Pulls the line low to request a transmission.
    ///
    /// The hold is a busy-wait: a blocking sleep here could hand the CPU
    /// away right before the timing-critical window.
    fn request(&mut self) -> Result<(), DhtError<P::Error>> {
        self.pin.set_low()?;
        busy_wait(self.config.request);
        Ok(())
    }

    /// Records the 41 pulse pairs of one transmission.
    ///
    /// Either all 41 pairs complete or the attempt aborts with a timeout; a
    /// partial train is never decoded.
    fn capture(&mut self) -> Result<[PulseSample; DHT_PULSES], DhtError<P::Error>> {
        let _rt = RealtimeGuard::acquire();

        // The sensor acknowledges the request by pulling the released line
        // low.
        let _ = self.count_while(PinState::High)?;

        let mut pulses = [PulseSample::default(); DHT_PULSES];
        for pulse in &mut pulses {
            pulse.low = self.count_while(PinState::Low)?;
            pulse.high = self.count_while(PinState::High)?;
        }
        Ok(pulses)
    }

    /// Counts polls while the line stays at `level`, bounded by the spin
    /// limit.
    fn count_while(&mut self, level: PinState) -> Result<u32, DhtError<P::Error>> {
        let expected = level == PinState::High;
        let mut count = 0;
        while self.pin.is_high()? == expected {
            count += 1;
            if count >= self.config.max_spin {
                return Err(DhtError::Timeout);
            }
        }
        Ok(count)
    }
}

/// Derives the timing threshold and packs the 40 data pulses into a frame.
///
/// The acknowledgment pulse is excluded; the threshold is the mean low-phase
/// width of the data pulses, so classification is relative to the host's
/// polling speed rather than any absolute duration. A high phase at least as
/// wide as the threshold counts as a one bit, MSB first.
fn classify(pulses: &[PulseSample; DHT_PULSES]) -> [u8; 5] {
    let data = &pulses[1..];
    let threshold = data.iter().map(|pulse| pulse.low).sum::<u32>() / data.len() as u32;

    let mut frame = [0u8; 5];
    for (i, pulse) in data.iter().enumerate() {
        frame[i / 8] <<= 1;
        if pulse.high >= threshold {
            frame[i / 8] |= 1;
        }
    }
    frame
}

/// The checksum is the low 8 bits of the sum of the four payload bytes.
fn checksum_matches(frame: &[u8; 5]) -> bool {
    frame[0]
        .wrapping_add(frame[1])
        .wrapping_add(frame[2])
        .wrapping_add(frame[3])
        == frame[4]
}

/// Converts a validated frame into calibrated values for the sensor model.
fn interpret(kind: SensorKind, frame: &[u8; 5]) -> Measurement {
    match kind {
        SensorKind::Dht11 => Measurement {
            // Integer resolution: the fractional bytes are always zero.
            humidity: f32::from(frame[0]),
            temperature: f32::from(frame[2]),
        },
        SensorKind::Dht22 => Measurement {
            humidity: decode_humidity(frame[0], frame[1]),
            temperature: decode_temperature(frame[2], frame[3]),
        },
    }
}

#[inline]
fn decode_humidity(high: u8, low: u8) -> f32 {
    // Two bytes form a 16-bit integer holding humidity * 10.
    f32::from((u16::from(high) << 8) | u16::from(low)) / 10.0
}

#[inline]
fn decode_temperature(high: u8, low: u8) -> f32 {
    // The sign lives in bit 15; the remaining bits hold temperature * 10.
    let raw = (u16::from(high & 0x7F) << 8) | u16::from(low);
    let mut t = f32::from(raw) / 10.0;

    if high & 0x80 != 0 {
        t = -t;
    }

    t
}

/// Spins on the monotonic clock without yielding.
fn busy_wait(duration: Duration) {
    let start = Instant::now();
    while start.elapsed() < duration {}
}

/// Identifies the GPIO line a sensor is wired to.
#[cfg(any(feature = "bcm", feature = "am335x"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PinSpec {
    /// A Raspberry Pi GPIO line (BCM numbering).
    #[cfg(feature = "bcm")]
    RaspberryPi {
        /// GPIO number on the Pi's single bank.
        pin: u8,
    },
    /// A BeagleBone GPIO line.
    #[cfg(feature = "am335x")]
    BeagleBone {
        /// GPIO bank, `0..=3`.
        bank: u8,
        /// Line within the bank, `0..=31`.
        pin: u8,
    },
}

/// Errors from the platform read surface.
#[cfg(any(feature = "bcm", feature = "am335x"))]
#[derive(Debug)]
pub enum ReadError {
    /// The GPIO register window could not be resolved or mapped, or the pin
    /// identity is invalid. Fatal for this invocation; do not retry.
    Mmio(dewline_hal::MmioError),
    /// A bus phase did not complete within the spin bound. Retryable.
    Timeout,
    /// The transmitted checksum does not match the payload. Retryable.
    ChecksumMismatch,
}

#[cfg(any(feature = "bcm", feature = "am335x"))]
impl ReadError {
    /// Whether the caller may retry the read.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::ChecksumMismatch)
    }
}

#[cfg(any(feature = "bcm", feature = "am335x"))]
impl From<dewline_hal::MmioError> for ReadError {
    fn from(error: dewline_hal::MmioError) -> Self {
        Self::Mmio(error)
    }
}

#[cfg(any(feature = "bcm", feature = "am335x"))]
impl From<DhtError<core::convert::Infallible>> for ReadError {
    fn from(error: DhtError<core::convert::Infallible>) -> Self {
        match error {
            DhtError::Pin(infallible) => match infallible {},
            DhtError::Timeout => Self::Timeout,
            DhtError::ChecksumMismatch => Self::ChecksumMismatch,
        }
    }
}

#[cfg(any(feature = "bcm", feature = "am335x"))]
impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mmio(error) => error.fmt(f),
            Self::Timeout => write!(f, "the sensor did not respond within the spin bound"),
            Self::ChecksumMismatch => write!(f, "checksum mismatch in the transmitted frame"),
        }
    }
}

#[cfg(any(feature = "bcm", feature = "am335x"))]
impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Mmio(error) => Some(error),
            Self::Timeout | Self::ChecksumMismatch => None,
        }
    }
}

/// Reads one measurement from the `kind` sensor wired to `line`.
///
/// This is the synchronous one-shot surface consumed by polling control
/// loops: resolve and map the GPIO register window (cached process-wide),
/// run one capture, decode. Requires the privilege to open `/dev/mem`.
///
/// # Errors
///
/// [`ReadError::Timeout`] and [`ReadError::ChecksumMismatch`] are transient
/// and worth retrying after [`MIN_READ_INTERVAL`]; [`ReadError::Mmio`]
/// failures are not.
#[cfg(any(feature = "bcm", feature = "am335x"))]
pub fn read(kind: SensorKind, line: PinSpec) -> Result<Measurement, ReadError> {
    match line {
        #[cfg(feature = "bcm")]
        PinSpec::RaspberryPi { pin } => {
            let pin = dewline_hal::bcm::Pin::new(pin)?;
            Ok(Dht::new(kind, pin).read()?)
        }
        #[cfg(feature = "am335x")]
        PinSpec::BeagleBone { bank, pin } => {
            let pin = dewline_hal::am335x::Pin::new(bank, pin)?;
            Ok(Dht::new(kind, pin).read()?)
        }
    }
}

/// Reads with retries on transient failures.
///
/// Timeouts and checksum mismatches are expected over a single-wire line, so
/// this loops over [`read`] up to `retries` additional attempts, sleeping
/// `delay` between them. Delays shorter than [`MIN_READ_INTERVAL`] mostly
/// burn attempts, because the sensor refuses to transmit again that soon.
/// Fatal errors abort immediately.
///
/// # Errors
///
/// As [`read`], once the retry budget is exhausted.
#[cfg(any(feature = "bcm", feature = "am335x"))]
pub fn read_retry(
    kind: SensorKind,
    line: PinSpec,
    retries: u32,
    delay: Duration,
) -> Result<Measurement, ReadError> {
    let mut remaining = retries;
    loop {
        match read(kind, line) {
            Err(error) if error.is_retryable() && remaining > 0 => {
                tracing::debug!("transient sensor failure ({error}), {remaining} retries left");
                remaining -= 1;
                thread::sleep(delay);
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};

    fn instant_config() -> DhtConfig {
        DhtConfig {
            max_spin: 100_000,
            wake: Duration::ZERO,
            request: Duration::ZERO,
        }
    }

    fn push_run(polls: &mut Vec<PinTransaction>, state: State, len: usize) {
        polls.extend(vec![PinTransaction::get(state); len]);
    }

    /// The poll sequence a capture observes for a transmission of `frame`.
    ///
    /// Each level run is one poll longer than the count the driver records,
    /// because the poll that ends a phase consumes the first sample of the
    /// next one. Uniform 6-poll lows put the threshold at 5; highs of 9
    /// polls read as ones and highs of 3 polls as zeros.
    fn transmission(frame: [u8; 5]) -> Vec<PinTransaction> {
        let mut polls = vec![
            PinTransaction::set(State::High),
            PinTransaction::set(State::Low),
        ];

        // The line is still high while the sensor prepares its
        // acknowledgment.
        push_run(&mut polls, State::High, 2);

        // Acknowledgment pulse.
        push_run(&mut polls, State::Low, 6);
        push_run(&mut polls, State::High, 6);

        for byte in frame {
            for bit in (0..8).rev() {
                push_run(&mut polls, State::Low, 6);
                push_run(&mut polls, State::High, if byte >> bit & 1 == 1 { 9 } else { 3 });
            }
        }

        // One final poll so the last high phase terminates.
        polls.push(PinTransaction::get(State::Low));
        polls
    }

    /// A pulse train with synthetic counts encoding `frame`.
    fn train(frame: [u8; 5], low: u32, zero: u32, one: u32) -> [PulseSample; DHT_PULSES] {
        let mut pulses = [PulseSample { low, high: low }; DHT_PULSES];
        for (i, pulse) in pulses[1..].iter_mut().enumerate() {
            let bit = frame[i / 8] >> (7 - i % 8) & 1;
            pulse.high = if bit == 1 { one } else { zero };
        }
        pulses
    }

    #[test]
    fn reads_a_fixed_point_frame() {
        // 65.2% RH, -10.1 °C: 652 = 0x028C, 101 = 0x0065 with the sign bit.
        let frame = [0x02, 0x8C, 0x80, 0x65, 0x73];
        let pin = PinMock::new(&transmission(frame));
        let mut dht = Dht::with_config(SensorKind::Dht22, pin, instant_config());

        let measurement = dht.read().unwrap();
        assert!((measurement.humidity - 65.2).abs() < 0.05);
        assert!((measurement.temperature + 10.1).abs() < 0.05);

        dht.pin.done();
    }

    #[test]
    fn reads_an_integer_frame() {
        let frame = [42, 0, 23, 0, 65];
        let pin = PinMock::new(&transmission(frame));
        let mut dht = Dht::with_config(SensorKind::Dht11, pin, instant_config());

        let measurement = dht.read().unwrap();
        assert_eq!(measurement.humidity, 42.0);
        assert_eq!(measurement.temperature, 23.0);

        dht.pin.done();
    }

    #[test]
    fn rejects_a_corrupted_checksum() {
        let frame = [42, 0, 23, 0, 66];
        let pin = PinMock::new(&transmission(frame));
        let mut dht = Dht::with_config(SensorKind::Dht11, pin, instant_config());

        let result = dht.read();
        assert!(matches!(result, Err(DhtError::ChecksumMismatch)));
        assert!(result.unwrap_err().is_retryable());

        dht.pin.done();
    }

    #[test]
    fn times_out_when_the_sensor_never_acknowledges() {
        let mut polls = vec![
            PinTransaction::set(State::High),
            PinTransaction::set(State::Low),
        ];
        // The line never goes low: the acknowledgment wait burns the whole
        // spin budget.
        push_run(&mut polls, State::High, 4);

        let pin = PinMock::new(&polls);
        let mut config = instant_config();
        config.max_spin = 4;
        let mut dht = Dht::with_config(SensorKind::Dht22, pin, config);

        let result = dht.read();
        assert!(matches!(result, Err(DhtError::Timeout)));
        assert!(result.unwrap_err().is_retryable());

        dht.pin.done();
    }

    #[test]
    fn times_out_mid_train() {
        let mut polls = vec![
            PinTransaction::set(State::High),
            PinTransaction::set(State::Low),
        ];
        push_run(&mut polls, State::High, 2);
        // The acknowledgment low phase never ends. One poll is consumed
        // terminating the wait above, four more exhaust the spin budget.
        push_run(&mut polls, State::Low, 5);

        let pin = PinMock::new(&polls);
        let mut config = instant_config();
        config.max_spin = 4;
        let mut dht = Dht::with_config(SensorKind::Dht22, pin, config);

        assert!(matches!(dht.read(), Err(DhtError::Timeout)));

        dht.pin.done();
    }

    #[test]
    fn classification_packs_bits_msb_first() {
        let frame = [0xA5, 0x01, 0x80, 0xFF, 0x00];
        assert_eq!(classify(&train(frame, 50, 28, 70)), frame);
    }

    #[test]
    fn classification_is_invariant_under_loop_speed_scaling() {
        let frame = [0x02, 0x8C, 0x01, 0x19, 0xA8];
        let slow = train(frame, 50, 28, 70);
        let fast = slow.map(|pulse| PulseSample {
            low: pulse.low * 2,
            high: pulse.high * 2,
        });

        assert_eq!(classify(&slow), classify(&fast));
        assert_eq!(classify(&fast), frame);
    }

    #[test]
    fn a_pulse_exactly_at_the_threshold_is_a_one() {
        // Every high phase equals every low phase, so each data pulse sits
        // exactly on the threshold.
        let pulses = [PulseSample { low: 50, high: 50 }; DHT_PULSES];
        assert_eq!(classify(&pulses), [0xFF; 5]);
    }

    #[test]
    fn checksum_wraps_modulo_256() {
        assert!(checksum_matches(&[1, 2, 3, 4, 10]));
        assert!(checksum_matches(&[0xFF, 0x01, 0x00, 0x00, 0x00]));
        assert!(!checksum_matches(&[1, 2, 3, 4, 9]));
    }

    #[test]
    fn interprets_the_integer_model() {
        let measurement = interpret(SensorKind::Dht11, &[42, 0, 23, 0, 65]);
        assert_eq!(measurement.humidity, 42.0);
        assert_eq!(measurement.temperature, 23.0);
    }

    #[test]
    fn interprets_fixed_point_values() {
        assert!((decode_humidity(0x02, 0x58) - 60.0).abs() < f32::EPSILON);
        assert!((decode_temperature(0x00, 0xFA) - 25.0).abs() < f32::EPSILON);
        assert!((decode_temperature(0x80, 0xFA) + 25.0).abs() < f32::EPSILON);
    }

    #[test]
    fn fixed_point_values_round_trip() {
        let humidities = [0.0_f32, 0.1, 12.3, 55.5, 99.9, 100.0];
        let temperatures = [-40.0_f32, -10.1, -0.1, 0.0, 0.1, 25.4, 79.9, 80.0];

        for &h in &humidities {
            for &t in &temperatures {
                let h10 = (h * 10.0).round() as u16;
                let t10 = (t.abs() * 10.0).round() as u16;
                let sign = if t < 0.0 { 0x80 } else { 0x00 };

                let mut frame = [
                    (h10 >> 8) as u8,
                    (h10 & 0xFF) as u8,
                    (t10 >> 8) as u8 | sign,
                    (t10 & 0xFF) as u8,
                    0,
                ];
                frame[4] = frame[0]
                    .wrapping_add(frame[1])
                    .wrapping_add(frame[2])
                    .wrapping_add(frame[3]);
                assert!(checksum_matches(&frame));

                let measurement = interpret(SensorKind::Dht22, &frame);
                assert!((measurement.humidity - h).abs() < 0.05);
                assert!((measurement.temperature - t).abs() < 0.05);
            }
        }
    }

    #[cfg(any(feature = "bcm", feature = "am335x"))]
    #[test]
    fn mmio_failures_are_not_retryable() {
        let error = ReadError::from(dewline_hal::MmioError::InvalidPin { pin: 99 });
        assert!(!error.is_retryable());
        assert!(ReadError::Timeout.is_retryable());
        assert!(ReadError::ChecksumMismatch.is_retryable());
    }

    #[cfg(feature = "am335x")]
    #[test]
    fn out_of_range_lines_fail_before_any_hardware_access() {
        // Runs without privilege: argument validation precedes /dev/mem.
        let result = read(SensorKind::Dht22, PinSpec::BeagleBone { bank: 9, pin: 0 });
        assert!(matches!(
            result,
            Err(ReadError::Mmio(dewline_hal::MmioError::InvalidBank { bank: 9 }))
        ));
    }
}
