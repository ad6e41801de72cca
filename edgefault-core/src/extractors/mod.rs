//! Window-Based Feature Families
//!
//! ## Overview
//!
//! Besides the declarative feature programs, a detector can be driven by
//! one of three fixed feature families. Each one turns a raw sample into a
//! block of features with a layout fixed at construction:
//!
//! | Family                                  | Outputs                      |
//! |-----------------------------------------|------------------------------|
//! | [`HistogramExtractor`] (distribution)   | 6 per channel                |
//! | [`HjorthExtractor`] (signal complexity) | 3 per channel                |
//! | [`DifferentialExtractor`] (rates)       | 2·channels + 4 + pairs       |
//!
//! The first two read a dedicated [`SampleHistory`], separate from the
//! rolling windows of [`ChannelHistory`](crate::history::ChannelHistory),
//! so a family keeps exactly the window length its model was trained with.
//!
//! ## Usage
//!
//! ```rust
//! use edgefault_core::extractors::{FeatureExtractor, HjorthExtractor};
//! use edgefault_core::RawSample;
//!
//! let mut hjorth = HjorthExtractor::<15>::new();
//! let mut out = [0.0f32; 12];
//! let sample = RawSample::try_new([21.0, 48.0, 20.5, 50.0])?;
//! hjorth.extract(&sample, &mut out);
//! assert!(out.iter().all(|&v| v == 0.0)); // fewer than 3 samples yet
//! # Ok::<(), edgefault_core::SampleError>(())
//! ```

mod differential;
mod histogram;
mod hjorth;

pub use differential::DifferentialExtractor;
pub use histogram::{
    autocorr_decay_lag, first_autocorr_minimum, histogram_mode, large_step_fraction,
    mean_cubed_difference, HistogramExtractor, HISTOGRAM_FEATURES_PER_CHANNEL,
};
pub use hjorth::{hjorth_parameters, HjorthExtractor, HjorthParameters, HJORTH_FEATURES_PER_CHANNEL};

use crate::channel::{Channel, RawSample, NUM_CHANNELS};
use heapless::Vec;

/// Strategy producing a fixed-length feature block from each sample
///
/// Implementations own whatever cross-sample state they need and update it
/// inside `extract`, so the call must happen exactly once per validated
/// sample, in arrival order.
pub trait FeatureExtractor {
    /// Number of values written by every `extract` call
    fn feature_count(&self) -> usize;

    /// Fold `sample` into the extractor state and write the feature block
    ///
    /// `out` must hold at least `feature_count()` slots; extra slots are
    /// left untouched.
    fn extract(&mut self, sample: &RawSample, out: &mut [f32]);
}

/// Per-channel circular history of the last `W` raw readings
///
/// Unlike [`RingWindow`](crate::window::RingWindow) this stores all channels
/// behind one shared cursor, since the families always push whole samples.
#[derive(Debug, Clone)]
pub struct SampleHistory<const W: usize> {
    values: [[f32; W]; NUM_CHANNELS],
    cursor: usize,
    full: bool,
}

impl<const W: usize> SampleHistory<W> {
    pub const fn new() -> Self {
        Self {
            values: [[0.0; W]; NUM_CHANNELS],
            cursor: 0,
            full: false,
        }
    }

    /// Store every channel of `sample` at the cursor
    pub fn push(&mut self, sample: &RawSample) {
        for channel in Channel::ALL {
            self.values[channel.index()][self.cursor] = sample[channel];
        }
        self.cursor = (self.cursor + 1) % W;
        if self.cursor == 0 {
            self.full = true;
        }
    }

    /// Number of stored samples
    pub fn len(&self) -> usize {
        if self.full {
            W
        } else {
            self.cursor
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored readings of one channel, oldest first
    pub fn series(&self, channel: Channel) -> Vec<f32, W> {
        let row = &self.values[channel.index()];
        let mut series = Vec::new();

        // Once wrapped, the cursor points at the oldest reading
        let (older, newer) = if self.full {
            (&row[self.cursor..], &row[..self.cursor])
        } else {
            (&row[..self.cursor], &row[..0])
        };
        for &v in older.iter().chain(newer) {
            // Capacity is W and at most W values are visited
            let _ = series.push(v);
        }
        series
    }
}

impl<const W: usize> Default for SampleHistory<W> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample variance with divisor n−1, 0 for fewer than two values
pub(crate) fn sample_variance(x: &[f32]) -> f32 {
    if x.len() < 2 {
        return 0.0;
    }
    let n = x.len() as f32;
    let mean = x.iter().sum::<f32>() / n;
    x.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / (n - 1.0)
}

/// First differences of `x` into a fixed-capacity buffer
pub(crate) fn differences<const W: usize>(x: &[f32]) -> Vec<f32, W> {
    let mut out = Vec::new();
    for pair in x.windows(2) {
        let _ = out.push(pair[1] - pair[0]);
    }
    out
}
