//! Distribution and autocorrelation features
//!
//! A compact subset of the catch22 time-series features, evaluated per
//! channel over the last `W` readings. Per channel, in order:
//!
//! 1. histogram mode, 5 bins
//! 2. histogram mode, 10 bins
//! 3. first lag where the autocorrelation falls below 1/e
//! 4. first local minimum of the autocorrelation
//! 5. mean cubed first difference (time reversibility)
//! 6. fraction of successive steps larger than 0.04
//!
//! With fewer than 5 readings stored the whole block is zero.

use super::{FeatureExtractor, SampleHistory};
use crate::{
    channel::{Channel, RawSample, NUM_CHANNELS},
    constants::{
        numeric::{AUTOCORR_DECAY_THRESHOLD, LARGE_STEP_THRESHOLD, VARIANCE_FLOOR},
        windows::{HISTOGRAM_MIN_SAMPLES, HISTOGRAM_WINDOW},
    },
};

/// Outputs produced for each channel
pub const HISTOGRAM_FEATURES_PER_CHANNEL: usize = 6;

/// Upper bound on bins a mode query may ask for
const MAX_BINS: usize = 16;

/// Centre of the most populated equal-width bin
///
/// Ties go to the lowest bin. A series with no spread (or no values)
/// yields 0 regardless of `bins`.
pub fn histogram_mode(x: &[f32], bins: usize) -> f32 {
    let bins = bins.clamp(1, MAX_BINS);
    let Some(&first) = x.first() else {
        return 0.0;
    };

    let (min, max) = x
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if libm::fabsf(max - min) < VARIANCE_FLOOR {
        return 0.0;
    }

    let step = (max - min) / bins as f32;
    let mut counts = [0u16; MAX_BINS];
    for &v in x {
        let idx = ((v - min) / step) as usize;
        counts[idx.min(bins - 1)] += 1;
    }

    let mut best = 0;
    for (idx, &count) in counts[..bins].iter().enumerate() {
        if count > counts[best] {
            best = idx;
        }
    }
    min + (best as f32 + 0.5) * step
}

/// Mean and sum of squared deviations
fn centred_energy(x: &[f32]) -> (f32, f32) {
    let mean = x.iter().sum::<f32>() / x.len() as f32;
    let energy = x.iter().map(|v| (v - mean) * (v - mean)).sum();
    (mean, energy)
}

/// Autocorrelation at `lag`, normalized by the lag-0 energy
fn autocorrelation(x: &[f32], mean: f32, energy: f32, lag: usize) -> f32 {
    let cov: f32 = x
        .iter()
        .zip(&x[lag..])
        .map(|(a, b)| (a - mean) * (b - mean))
        .sum();
    cov / energy
}

/// First lag τ ≥ 1 at which the autocorrelation drops below 1/e
///
/// Returns the series length if it never does, and also for a series with
/// no variance. Fewer than two values yield 0.
pub fn autocorr_decay_lag(x: &[f32]) -> f32 {
    let n = x.len();
    if n < 2 {
        return 0.0;
    }
    let (mean, energy) = centred_energy(x);
    if energy < VARIANCE_FLOOR {
        return n as f32;
    }

    (1..n)
        .find(|&tau| autocorrelation(x, mean, energy, tau) < AUTOCORR_DECAY_THRESHOLD)
        .unwrap_or(n) as f32
}

/// Lag just before the autocorrelation first rises
///
/// Returns the series length if it never rises, and 0 for a series with no
/// variance or fewer than two values.
pub fn first_autocorr_minimum(x: &[f32]) -> f32 {
    let n = x.len();
    if n < 2 {
        return 0.0;
    }
    let (mean, energy) = centred_energy(x);
    if energy < VARIANCE_FLOOR {
        return 0.0;
    }

    let mut previous = 1.0;
    for tau in 1..n {
        let ac = autocorrelation(x, mean, energy, tau);
        if ac > previous {
            return (tau - 1) as f32;
        }
        previous = ac;
    }
    n as f32
}

/// Σ(Δx)³ / (n−1)
pub fn mean_cubed_difference(x: &[f32]) -> f32 {
    if x.len() < 2 {
        return 0.0;
    }
    let sum: f32 = x.windows(2).map(|w| {
            let d = w[1] - w[0];
            d * d * d
        }).sum();
    sum / (x.len() - 1) as f32
}

/// Share of successive steps with |Δx| > 0.04
pub fn large_step_fraction(x: &[f32]) -> f32 {
    if x.len() < 2 {
        return 0.0;
    }
    let count = x
        .windows(2)
        .filter(|w| libm::fabsf(w[1] - w[0]) > LARGE_STEP_THRESHOLD)
        .count();
    count as f32 / (x.len() - 1) as f32
}

/// Histogram/autocorrelation family over a `W`-sample history
#[derive(Debug, Clone, Default)]
pub struct HistogramExtractor<const W: usize = HISTOGRAM_WINDOW> {
    history: SampleHistory<W>,
}

impl<const W: usize> HistogramExtractor<W> {
    pub const fn new() -> Self {
        Self { history: SampleHistory::new() }
    }

    fn channel_block(series: &[f32], out: &mut [f32]) {
        let values = [
            histogram_mode(series, 5),
            histogram_mode(series, 10),
            autocorr_decay_lag(series),
            first_autocorr_minimum(series),
            mean_cubed_difference(series),
            large_step_fraction(series),
        ];
        for (slot, v) in out.iter_mut().zip(values) {
            *slot = v;
        }
    }
}

impl<const W: usize> FeatureExtractor for HistogramExtractor<W> {
    fn feature_count(&self) -> usize {
        NUM_CHANNELS * HISTOGRAM_FEATURES_PER_CHANNEL
    }

    fn extract(&mut self, sample: &RawSample, out: &mut [f32]) {
        self.history.push(sample);
        let warm = self.history.len() >= HISTOGRAM_MIN_SAMPLES;

        for (channel, block) in Channel::ALL
            .iter()
            .zip(out.chunks_mut(HISTOGRAM_FEATURES_PER_CHANNEL))
        {
            if warm {
                Self::channel_block(&self.history.series(*channel), block);
            } else {
                block.fill(0.0);
            }
        }
    }
}
