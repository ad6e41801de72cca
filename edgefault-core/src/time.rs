//! Time management for edge devices
//!
//! Two clocks matter to the detector:
//! - the arrival clock (milliseconds) feeding the inter-arrival windows
//! - the timing clock (microseconds) measuring feature extraction and
//!   inference so downstream consumers can spot budget overruns
//!
//! Both are read through [`TimeSource`], so the same code runs against a
//! hardware timer, `std::time::Instant` or a scripted clock in tests.

use crate::constants::time::US_PER_MS;

/// Timestamp in milliseconds since device boot
pub type Timestamp = u64;

/// Microsecond reading from a monotonic counter
pub type Micros = u64;

/// Source of time for the system
pub trait TimeSource {
    /// Current time in microseconds since an arbitrary fixed origin
    fn now_us(&self) -> Micros;

    /// Current time in milliseconds
    fn now(&self) -> Timestamp {
        self.now_us() / US_PER_MS
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now_us(&self) -> Micros {
        (**self).now_us()
    }
}

/// Monotonic system clock (requires std)
///
/// Origin is the moment the clock was created, mirroring a device timer that
/// starts at zero on boot.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct SystemTime {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl SystemTime {
    pub fn new() -> Self {
        Self { origin: std::time::Instant::now() }
    }
}

#[cfg(feature = "std")]
impl Default for SystemTime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now_us(&self) -> Micros {
        self.origin.elapsed().as_micros() as Micros
    }
}

/// Fixed time source for testing
///
/// Interior mutability lets a test advance the clock while a detector holds
/// a shared reference to it.
#[derive(Debug, Default)]
pub struct FixedTime {
    micros: core::cell::Cell<Micros>,
}

impl FixedTime {
    pub fn new(timestamp: Timestamp) -> Self {
        Self { micros: core::cell::Cell::new(timestamp * US_PER_MS) }
    }

    pub fn set(&self, timestamp: Timestamp) {
        self.micros.set(timestamp * US_PER_MS);
    }

    pub fn advance(&self, ms: u64) {
        self.advance_us(ms * US_PER_MS);
    }

    pub fn advance_us(&self, us: Micros) {
        self.micros.set(self.micros.get() + us);
    }
}

impl TimeSource for FixedTime {
    fn now_us(&self) -> Micros {
        self.micros.get()
    }
}

/// Elapsed-time measurement for one phase of the per-sample path
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Micros,
}

impl Stopwatch {
    pub fn start<T: TimeSource + ?Sized>(clock: &T) -> Self {
        Self { started: clock.now_us() }
    }

    /// Microseconds since `start`, saturating if the clock went backwards
    pub fn elapsed_us<T: TimeSource + ?Sized>(&self, clock: &T) -> Micros {
        clock.now_us().saturating_sub(self.started)
    }
}

/// Convert a microsecond duration to fractional milliseconds for reporting
pub fn micros_to_ms(us: Micros) -> f32 {
    us as f32 / US_PER_MS as f32
}
