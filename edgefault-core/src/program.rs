//! Declarative Feature Programs
//!
//! ## Overview
//!
//! A trained model expects its inputs in one exact order. A
//! [`FeatureProgram`] is that order written down: an ordered slice of
//! [`FeatureSpec`]s, each naming one value to compute from the current
//! sample and the [`StreamState`]. Evaluating the program writes exactly
//! one output per spec, in program order, so slot `i` of the feature
//! vector is always spec `i`.
//!
//! ## Evaluation Rules
//!
//! | Spec               | Value                                          |
//! |--------------------|------------------------------------------------|
//! | `Raw`              | `sample[ch]`                                   |
//! | `Diff`             | `sample[ch]` minus the stored previous value   |
//! | `RollingRaw`       | statistic of the raw window                    |
//! | `RollingDiff`      | statistic of the first-difference window       |
//! | `Lag`              | lag slot `depth-1`, current raw if not finite  |
//! | `Ewma`             | smoothed value                                 |
//! | `Product`          | `sample[a] * sample[b]`                        |
//! | `InterArrivalStd`  | std-dev of the arrival-gap window              |
//! | `Zero`             | 0                                              |
//!
//! The state must already contain the current sample: the caller runs
//! [`StreamState::observe`] first, then evaluates. `Diff` therefore reads
//! 0 on the live stream; the rate of change is in the `RollingDiff`
//! windows.
//!
//! ## Exported Descriptors
//!
//! Model export tooling emits programs as numeric tuples
//! `{kind, stat, window, lag, channel1, channel2}`. [`FeatureSpec::decode`]
//! maps those onto the typed form; any code it cannot place (unknown kind,
//! statistic or channel) becomes [`FeatureSpec::Zero`], which keeps the
//! slot count intact.

use core::fmt;

use crate::{
    channel::{Channel, RawSample, NUM_CHANNELS},
    constants::{
        stages::{COLD_FEATURE_COUNT, WARM_FEATURE_COUNT},
        windows::{LAG_DEPTH, LONG_WINDOW, SHORT_WINDOW},
    },
    history::{StreamState, WindowSize},
    window::Statistic,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One slot of a feature vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FeatureSpec {
    /// Raw reading passthrough
    Raw(Channel),
    /// First difference of the channel
    Diff(Channel),
    /// Rolling statistic over raw readings
    RollingRaw {
        channel: Channel,
        stat: Statistic,
        window: WindowSize,
    },
    /// Rolling statistic over first differences
    RollingDiff {
        channel: Channel,
        stat: Statistic,
        window: WindowSize,
    },
    /// Reading from `depth` samples ago, 1 to 3
    Lag { channel: Channel, depth: u8 },
    /// Exponentially weighted average
    Ewma(Channel),
    /// Product of two current readings
    Product(Channel, Channel),
    /// Std-dev of the inter-arrival gaps
    InterArrivalStd(WindowSize),
    /// Placeholder for an undecodable descriptor
    Zero,
}

/// Numeric feature kind codes used by exported descriptors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FeatureKind {
    Raw = 0,
    Diff = 1,
    RollingRaw = 2,
    RollingDiff = 3,
    Lag = 4,
    Ewma = 5,
    Product = 6,
    InterArrivalStd = 7,
}

impl FeatureKind {
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(FeatureKind::Raw),
            1 => Some(FeatureKind::Diff),
            2 => Some(FeatureKind::RollingRaw),
            3 => Some(FeatureKind::RollingDiff),
            4 => Some(FeatureKind::Lag),
            5 => Some(FeatureKind::Ewma),
            6 => Some(FeatureKind::Product),
            7 => Some(FeatureKind::InterArrivalStd),
            _ => None,
        }
    }
}

/// Numeric descriptor as emitted by the model export tooling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeatureDescriptor {
    pub kind: i32,
    pub stat: i32,
    pub window: i32,
    pub lag: i32,
    pub channel1: i32,
    pub channel2: i32,
}

fn channel_code(code: i32) -> Option<Channel> {
    usize::try_from(code).ok().and_then(Channel::from_index)
}

impl FeatureSpec {
    /// Map a numeric descriptor onto a typed spec
    ///
    /// Rolling windows: 15 selects the long window, anything else the short
    /// one. Inter-arrival: 5 selects the short window, anything else the
    /// long one.
    pub fn decode(d: &FeatureDescriptor) -> Self {
        let rolling_window = if d.window == LONG_WINDOW as i32 {
            WindowSize::Long
        } else {
            WindowSize::Short
        };
        let ch1 = channel_code(d.channel1);

        let spec = match FeatureKind::from_code(d.kind) {
            Some(FeatureKind::Raw) => ch1.map(FeatureSpec::Raw),
            Some(FeatureKind::Diff) => ch1.map(FeatureSpec::Diff),
            Some(FeatureKind::RollingRaw) => ch1
                .zip(Statistic::from_code(d.stat))
                .map(|(channel, stat)| FeatureSpec::RollingRaw { channel, stat, window: rolling_window }),
            Some(FeatureKind::RollingDiff) => ch1
                .zip(Statistic::from_code(d.stat))
                .map(|(channel, stat)| FeatureSpec::RollingDiff { channel, stat, window: rolling_window }),
            Some(FeatureKind::Lag) => ch1.and_then(|channel| {
                u8::try_from(d.lag)
                    .ok()
                    .filter(|depth| (1..=LAG_DEPTH as u8).contains(depth))
                    .map(|depth| FeatureSpec::Lag { channel, depth })
            }),
            Some(FeatureKind::Ewma) => ch1.map(FeatureSpec::Ewma),
            Some(FeatureKind::Product) => ch1
                .zip(channel_code(d.channel2))
                .map(|(a, b)| FeatureSpec::Product(a, b)),
            Some(FeatureKind::InterArrivalStd) => Some(FeatureSpec::InterArrivalStd(
                if d.window == SHORT_WINDOW as i32 {
                    WindowSize::Short
                } else {
                    WindowSize::Long
                },
            )),
            None => None,
        };

        spec.unwrap_or_else(|| {
            log_debug!("descriptor {:?} decoded as zero slot", d);
            FeatureSpec::Zero
        })
    }

    /// Compute this slot from the current sample and stream state
    pub fn evaluate(&self, sample: &RawSample, state: &StreamState) -> f32 {
        let history = &state.channels;
        match *self {
            FeatureSpec::Raw(ch) => sample[ch],
            // Read after the update, so `previous` is already this sample
            FeatureSpec::Diff(ch) => history
                .channel(ch)
                .previous()
                .map(|prev| sample[ch] - prev)
                .filter(|d| d.is_finite())
                .unwrap_or(0.0),
            FeatureSpec::RollingRaw { channel, stat, window } => {
                history.channel(channel).raw_stat(window, stat)
            }
            FeatureSpec::RollingDiff { channel, stat, window } => {
                history.channel(channel).diff_stat(window, stat)
            }
            FeatureSpec::Lag { channel, depth } => {
                let depth = usize::from(depth);
                if (1..=LAG_DEPTH).contains(&depth) {
                    history
                        .channel(channel)
                        .lag(depth)
                        .filter(|v| v.is_finite())
                        .unwrap_or(sample[channel])
                } else {
                    0.0
                }
            }
            FeatureSpec::Ewma(ch) => history.channel(ch).ewma().unwrap_or(sample[ch]),
            FeatureSpec::Product(a, b) => sample[a] * sample[b],
            FeatureSpec::InterArrivalStd(window) => state.arrivals.stat(window, Statistic::StdDev),
            FeatureSpec::Zero => 0.0,
        }
    }
}

/// Column names matching the training data
impl fmt::Display for FeatureSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureSpec::Raw(ch) => write!(f, "{}", ch.name()),
            FeatureSpec::Diff(ch) => write!(f, "speed_change_{}", ch.name()),
            FeatureSpec::RollingRaw { channel, stat, window } => {
                write!(f, "rolling_{}_{}_{}", stat.name(), window.samples(), channel.name())
            }
            FeatureSpec::RollingDiff { channel, stat, window } => write!(
                f,
                "rolling_{}_{}_speed_change_{}",
                stat.name(),
                window.samples(),
                channel.name()
            ),
            FeatureSpec::Lag { channel, depth } => write!(f, "lag_{}_{}", depth, channel.name()),
            FeatureSpec::Ewma(ch) => write!(f, "ewma_{}_{}", SHORT_WINDOW, ch.name()),
            FeatureSpec::Product(a, b) => write!(f, "inter_{}_x_{}", a.name(), b.name()),
            FeatureSpec::InterArrivalStd(window) => {
                write!(f, "rolling_std_{}_time_diff", window.samples())
            }
            FeatureSpec::Zero => f.write_str("zero"),
        }
    }
}

/// Ordered list of feature specs defining a model's input layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureProgram<'a> {
    specs: &'a [FeatureSpec],
}

impl<'a> FeatureProgram<'a> {
    pub const fn new(specs: &'a [FeatureSpec]) -> Self {
        Self { specs }
    }

    /// Number of slots produced
    pub const fn len(&self) -> usize {
        self.specs.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn specs(&self) -> &'a [FeatureSpec] {
        self.specs
    }

    /// Write one value per spec into `out`, in program order
    ///
    /// `out` must hold at least `len()` slots; extra slots are untouched.
    pub fn evaluate(&self, sample: &RawSample, state: &StreamState, out: &mut [f32]) {
        debug_assert!(out.len() >= self.len());
        for (slot, spec) in out.iter_mut().zip(self.specs) {
            *slot = spec.evaluate(sample, state);
        }
    }
}

/// Channel pairs multiplied by the shipped programs, in order
pub const PRODUCT_PAIRS: [(Channel, Channel); 6] = [
    (Channel::Temperature, Channel::Humidity),
    (Channel::Temperature, Channel::TemperatureWeatherStation),
    (Channel::Temperature, Channel::HumidityWeatherStation),
    (Channel::Humidity, Channel::TemperatureWeatherStation),
    (Channel::Humidity, Channel::HumidityWeatherStation),
    (Channel::TemperatureWeatherStation, Channel::HumidityWeatherStation),
];

const fn cold_specs() -> [FeatureSpec; COLD_FEATURE_COUNT] {
    let mut specs = [FeatureSpec::Zero; COLD_FEATURE_COUNT];
    let mut i = 0;
    while i < NUM_CHANNELS {
        specs[i] = FeatureSpec::Raw(Channel::ALL[i]);
        i += 1;
    }
    let mut p = 0;
    while p < PRODUCT_PAIRS.len() {
        specs[NUM_CHANNELS + p] = FeatureSpec::Product(PRODUCT_PAIRS[p].0, PRODUCT_PAIRS[p].1);
        p += 1;
    }
    specs
}

const fn warm_specs() -> [FeatureSpec; WARM_FEATURE_COUNT] {
    let mut specs = [FeatureSpec::Zero; WARM_FEATURE_COUNT];
    let mut n = 0;

    let mut c = 0;
    while c < NUM_CHANNELS {
        specs[n] = FeatureSpec::Raw(Channel::ALL[c]);
        n += 1;
        c += 1;
    }
    c = 0;
    while c < NUM_CHANNELS {
        specs[n] = FeatureSpec::Diff(Channel::ALL[c]);
        n += 1;
        c += 1;
    }

    // Raw rolling block: window, then channel, then statistic
    let windows = [WindowSize::Short, WindowSize::Long];
    let mut w = 0;
    while w < windows.len() {
        c = 0;
        while c < NUM_CHANNELS {
            let mut s = 0;
            while s < Statistic::ALL.len() {
                specs[n] = FeatureSpec::RollingRaw {
                    channel: Channel::ALL[c],
                    stat: Statistic::ALL[s],
                    window: windows[w],
                };
                n += 1;
                s += 1;
            }
            c += 1;
        }
        w += 1;
    }

    // Difference rolling block keeps only mean and std
    let diff_stats = [Statistic::Mean, Statistic::StdDev];
    w = 0;
    while w < windows.len() {
        c = 0;
        while c < NUM_CHANNELS {
            let mut s = 0;
            while s < diff_stats.len() {
                specs[n] = FeatureSpec::RollingDiff {
                    channel: Channel::ALL[c],
                    stat: diff_stats[s],
                    window: windows[w],
                };
                n += 1;
                s += 1;
            }
            c += 1;
        }
        w += 1;
    }

    let mut depth = 1;
    while depth <= LAG_DEPTH {
        c = 0;
        while c < NUM_CHANNELS {
            specs[n] = FeatureSpec::Lag { channel: Channel::ALL[c], depth: depth as u8 };
            n += 1;
            c += 1;
        }
        depth += 1;
    }

    c = 0;
    while c < NUM_CHANNELS {
        specs[n] = FeatureSpec::Ewma(Channel::ALL[c]);
        n += 1;
        c += 1;
    }

    let mut p = 0;
    while p < PRODUCT_PAIRS.len() {
        specs[n] = FeatureSpec::Product(PRODUCT_PAIRS[p].0, PRODUCT_PAIRS[p].1);
        n += 1;
        p += 1;
    }

    assert!(n == WARM_FEATURE_COUNT);
    specs
}

static COLD_SPECS: [FeatureSpec; COLD_FEATURE_COUNT] = cold_specs();
static WARM_SPECS: [FeatureSpec; WARM_FEATURE_COUNT] = warm_specs();

/// Layout of the shipped cold-start models: raw readings and their products
pub static COLD_PROGRAM: FeatureProgram<'static> = FeatureProgram::new(&COLD_SPECS);

/// Layout of the shipped steady-state models
pub static WARM_PROGRAM: FeatureProgram<'static> = FeatureProgram::new(&WARM_SPECS);
