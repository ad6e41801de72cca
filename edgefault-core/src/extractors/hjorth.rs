//! Hjorth parameters
//!
//! Three descriptors per channel from the variance of the signal and of
//! its first and second differences:
//!
//! ```text
//! activity   = var(x)
//! mobility   = sqrt(var(Δx) / var(x))
//! complexity = sqrt(var(Δ²x) / var(Δx)) / mobility
//! ```
//!
//! Each ratio collapses to 0 when its denominator is at or below 1e-9.

use super::{differences, sample_variance, FeatureExtractor, SampleHistory};
use crate::{
    channel::{Channel, RawSample, NUM_CHANNELS},
    constants::{
        numeric::VARIANCE_FLOOR,
        windows::{HJORTH_MIN_SAMPLES, HJORTH_WINDOW},
    },
};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Outputs produced for each channel
pub const HJORTH_FEATURES_PER_CHANNEL: usize = 3;

/// Activity, mobility and complexity of one series
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct HjorthParameters {
    pub activity: f32,
    pub mobility: f32,
    pub complexity: f32,
}

fn ratio_sqrt(num: f32, den: f32) -> f32 {
    if den > VARIANCE_FLOOR {
        libm::sqrtf(num / den)
    } else {
        0.0
    }
}

/// Hjorth parameters of a series of at most `W` values
///
/// Fewer than 3 values yield all zeros.
pub fn hjorth_parameters<const W: usize>(x: &[f32]) -> HjorthParameters {
    if x.len() < HJORTH_MIN_SAMPLES {
        return HjorthParameters::default();
    }

    let dx: heapless::Vec<f32, W> = differences(x);
    let ddx: heapless::Vec<f32, W> = differences(&dx);

    let var_x = sample_variance(x);
    let var_dx = sample_variance(&dx);
    let var_ddx = sample_variance(&ddx);

    let mobility = ratio_sqrt(var_dx, var_x);
    let mobility_dx = ratio_sqrt(var_ddx, var_dx);
    let complexity = if mobility > VARIANCE_FLOOR {
        mobility_dx / mobility
    } else {
        0.0
    };

    HjorthParameters { activity: var_x, mobility, complexity }
}

/// Hjorth family over a `W`-sample history
#[derive(Debug, Clone, Default)]
pub struct HjorthExtractor<const W: usize = HJORTH_WINDOW> {
    history: SampleHistory<W>,
}

impl<const W: usize> HjorthExtractor<W> {
    pub const fn new() -> Self {
        Self { history: SampleHistory::new() }
    }
}

impl<const W: usize> FeatureExtractor for HjorthExtractor<W> {
    fn feature_count(&self) -> usize {
        NUM_CHANNELS * HJORTH_FEATURES_PER_CHANNEL
    }

    fn extract(&mut self, sample: &RawSample, out: &mut [f32]) {
        self.history.push(sample);

        for (channel, block) in Channel::ALL
            .iter()
            .zip(out.chunks_mut(HJORTH_FEATURES_PER_CHANNEL))
        {
            let p = hjorth_parameters::<W>(&self.history.series(*channel));
            for (slot, v) in block.iter_mut().zip([p.activity, p.mobility, p.complexity]) {
                *slot = v;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_series_is_flat() {
        let p = hjorth_parameters::<15>(&[4.2; 15]);
        assert_eq!(p, HjorthParameters::default());
    }

    #[test]
    fn short_series_is_zero() {
        assert_eq!(hjorth_parameters::<15>(&[1.0, 5.0]), HjorthParameters::default());
    }

    #[test]
    fn linear_ramp_has_no_complexity() {
        // Δx constant ⇒ var(Δx) = 0 ⇒ mobility 0
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let p = hjorth_parameters::<15>(&x);
        assert_eq!(p.activity, 2.5);
        assert_eq!(p.mobility, 0.0);
        assert_eq!(p.complexity, 0.0);
    }

    #[test]
    fn alternating_series() {
        let x = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let p = hjorth_parameters::<15>(&x);

        let var_x = sample_variance(&x);
        let var_dx = sample_variance(&[-2.0, 2.0, -2.0, 2.0, -2.0]);
        let var_ddx = sample_variance(&[4.0, -4.0, 4.0, -4.0]);
        let mobility = libm::sqrtf(var_dx / var_x);

        assert_eq!(p.activity, var_x);
        assert!((p.mobility - mobility).abs() < 1e-6);
        assert!((p.complexity - libm::sqrtf(var_ddx / var_dx) / mobility).abs() < 1e-6);
    }

    #[test]
    fn extractor_layout_follows_channel_order() {
        let mut extractor = HjorthExtractor::<15>::new();
        let mut out = [0.0f32; 12];
        for i in 0..6 {
            let t = if i % 2 == 0 { 1.0 } else { -1.0 };
            let s = RawSample::try_new([t, 50.0, 20.0, 60.0]).unwrap();
            extractor.extract(&s, &mut out);
        }

        assert!(out[0] > 0.0);
        assert!(out[1] > 0.0);
        assert_eq!(&out[3..], &[0.0; 9]);
        assert_eq!(extractor.feature_count(), 12);
    }
}
