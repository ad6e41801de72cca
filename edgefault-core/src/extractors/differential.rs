//! Differential and rate-of-change features
//!
//! Device-level block built around one designated main channel:
//!
//! ```text
//! [ main,
//!   other₁, main − other₁, …            (every other channel, slot order)
//!   speed₀ … speed₃,                    (x − previous, 0 on the first sample)
//!   percent change of main,             (|c − p| / ((c + p)/2))
//!   a₁ − b₁, …                          (configured channel pairs) ]
//! ```

use super::FeatureExtractor;
use crate::{
    channel::{Channel, RawSample, NUM_CHANNELS},
    constants::{numeric::VARIANCE_FLOOR, windows::MAX_CHANNEL_PAIRS},
    errors::{ConfigError, ConfigResult},
};
use heapless::Vec;

/// Rate-of-change family anchored on a main channel
#[derive(Debug, Clone)]
pub struct DifferentialExtractor {
    main: Channel,
    pairs: Vec<(Channel, Channel), MAX_CHANNEL_PAIRS>,
    previous: Option<RawSample>,
}

impl DifferentialExtractor {
    /// Build an extractor for `main` plus pairwise differences
    ///
    /// Fails when more than `MAX_CHANNEL_PAIRS` pairs are requested.
    pub fn new(main: Channel, pairs: &[(Channel, Channel)]) -> ConfigResult<Self> {
        let pairs = Vec::from_slice(pairs).map_err(|_| ConfigError::CapacityExceeded {
            required: pairs.len(),
            limit: MAX_CHANNEL_PAIRS,
        })?;
        Ok(Self { main, pairs, previous: None })
    }

    pub fn main(&self) -> Channel {
        self.main
    }

    fn percent_change(current: f32, previous: f32) -> f32 {
        let average = (current + previous) * 0.5;
        if libm::fabsf(average) > VARIANCE_FLOOR {
            libm::fabsf(current - previous) / average
        } else {
            0.0
        }
    }
}

impl FeatureExtractor for DifferentialExtractor {
    fn feature_count(&self) -> usize {
        // main + (raw, delta) per other channel + speeds + percent change + pairs
        1 + 2 * (NUM_CHANNELS - 1) + NUM_CHANNELS + 1 + self.pairs.len()
    }

    fn extract(&mut self, sample: &RawSample, out: &mut [f32]) {
        let main = sample[self.main];
        let mut values: Vec<f32, { 2 * NUM_CHANNELS + 4 + MAX_CHANNEL_PAIRS }> = Vec::new();

        let _ = values.push(main);
        for channel in Channel::ALL.into_iter().filter(|&c| c != self.main) {
            let _ = values.push(sample[channel]);
            let _ = values.push(main - sample[channel]);
        }

        for channel in Channel::ALL {
            let speed = self.previous.map_or(0.0, |prev| sample[channel] - prev[channel]);
            let _ = values.push(speed);
        }

        let change = self
            .previous
            .map_or(0.0, |prev| Self::percent_change(main, prev[self.main]));
        let _ = values.push(change);

        for &(a, b) in &self.pairs {
            let _ = values.push(sample[a] - sample[b]);
        }

        for (slot, v) in out.iter_mut().zip(values) {
            *slot = v;
        }
        self.previous = Some(*sample);
    }
}
