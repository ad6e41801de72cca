//! Streaming feature engine for EdgeFault
//!
//! Turns a stream of environmental sensor samples into fixed-layout feature
//! vectors for pre-trained fault detection models. Designed for
//! microcontrollers running one sample at a time.
//!
//! Key constraints:
//! - Runs on 32KB RAM (ESP32)
//! - No heap allocation, every buffer sized at compile time
//! - Exact arithmetic parity with the models' training pipeline
//!
//! ```rust
//! use edgefault_core::{RawSample, StreamState, WARM_PROGRAM};
//!
//! let mut state = StreamState::default();
//! let mut features = [0.0f32; 94];
//!
//! let sample = RawSample::try_new([21.5, 48.0, 20.9, 51.0])?;
//! state.observe(&sample, 0);
//! WARM_PROGRAM.evaluate(&sample, &state, &mut features);
//! assert_eq!(features[0], 21.5);
//! # Ok::<(), edgefault_core::SampleError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

// Logging compiles away entirely without the `log` feature

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

pub mod channel;
pub mod constants;
pub mod errors;
pub mod extractors;
pub mod history;
pub mod program;
pub mod stage;
pub mod time;
pub mod window;

// Public API
pub use channel::{Channel, RawSample, NUM_CHANNELS};
pub use errors::{ConfigError, ConfigResult, SampleError, SampleResult};
pub use extractors::{
    DifferentialExtractor, FeatureExtractor, HistogramExtractor, HjorthExtractor,
};
pub use history::{ChannelHistory, InterArrivalWindows, StreamState, WindowSize};
pub use program::{FeatureDescriptor, FeatureProgram, FeatureSpec, COLD_PROGRAM, WARM_PROGRAM};
pub use stage::{DetectorConfig, StageKind, StageSelector};
pub use time::{FixedTime, Micros, Stopwatch, TimeSource, Timestamp};
pub use window::{RingWindow, Statistic};

#[cfg(feature = "std")]
pub use time::SystemTime;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
