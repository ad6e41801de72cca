//! Per-channel streaming state
//!
//! Every validated sample updates each channel exactly once, in arrival
//! order. The state kept here is what the feature programs read back:
//!
//! ```text
//! update(x):
//!   diff    = x - previous            (0 on the first sample)
//!   raw@5, raw@15   <- x
//!   diff@5, diff@15 <- diff
//!   lags    = [previous or x, lags[0], lags[1]]
//!   ewma    = x                       (first sample)
//!           = 0.333·x + 0.667·ewma    (afterwards)
//!   previous = x
//! ```
//!
//! Reordering or skipping updates corrupts lag and diff features for the
//! rest of the process lifetime; the only recovery is rebuilding the
//! detector.

use crate::{
    channel::{Channel, RawSample, NUM_CHANNELS},
    constants::{
        numeric::{EWMA_ALPHA, EWMA_DECAY},
        time::DEFAULT_CADENCE_RESOLUTION_MS,
        windows::{LAG_DEPTH, LONG_WINDOW, SHORT_WINDOW},
    },
    time::Timestamp,
    window::{RingWindow, Statistic},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rolling window length selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WindowSize {
    /// Five samples
    Short,
    /// Fifteen samples
    Long,
}

impl WindowSize {
    /// Number of samples covered
    pub const fn samples(self) -> usize {
        match self {
            WindowSize::Short => SHORT_WINDOW,
            WindowSize::Long => LONG_WINDOW,
        }
    }
}

/// Streaming state of a single channel
#[derive(Debug, Clone, Default)]
pub struct ChannelState {
    previous: Option<f32>,
    ewma: Option<f32>,
    lags: [Option<f32>; LAG_DEPTH],
    raw_short: RingWindow<SHORT_WINDOW>,
    raw_long: RingWindow<LONG_WINDOW>,
    diff_short: RingWindow<SHORT_WINDOW>,
    diff_long: RingWindow<LONG_WINDOW>,
}

impl ChannelState {
    /// Blank state, nothing observed yet
    pub const fn new() -> Self {
        Self {
            previous: None,
            ewma: None,
            lags: [None; LAG_DEPTH],
            raw_short: RingWindow::new(),
            raw_long: RingWindow::new(),
            diff_short: RingWindow::new(),
            diff_long: RingWindow::new(),
        }
    }

    /// Fold one reading into the channel state
    pub fn update(&mut self, x: f32) {
        let diff = match self.previous {
            Some(prev) => x - prev,
            None => 0.0,
        };

        self.raw_short.push(x);
        self.raw_long.push(x);
        self.diff_short.push(diff);
        self.diff_long.push(diff);

        self.lags.rotate_right(1);
        self.lags[0] = Some(self.previous.unwrap_or(x));

        self.ewma = Some(match self.ewma {
            Some(ewma) => EWMA_ALPHA * x + EWMA_DECAY * ewma,
            None => x,
        });

        self.previous = Some(x);
    }

    /// Value seen by the last update, `None` before the first one
    pub fn previous(&self) -> Option<f32> {
        self.previous
    }

    /// First difference computed by the last update
    pub fn last_diff(&self) -> Option<f32> {
        self.diff_short.last()
    }

    /// Current smoothed value, `None` before the first update
    pub fn ewma(&self) -> Option<f32> {
        self.ewma
    }

    /// Lag register slot for `depth` in `1..=3`
    ///
    /// Returns `None` for an unfilled slot or an out-of-range depth.
    pub fn lag(&self, depth: usize) -> Option<f32> {
        depth.checked_sub(1).and_then(|slot| self.lags.get(slot).copied().flatten())
    }

    /// Statistic of the raw-value window
    pub fn raw_stat(&self, size: WindowSize, kind: Statistic) -> f32 {
        match size {
            WindowSize::Short => self.raw_short.stat(kind),
            WindowSize::Long => self.raw_long.stat(kind),
        }
    }

    /// Statistic of the first-difference window
    pub fn diff_stat(&self, size: WindowSize, kind: Statistic) -> f32 {
        match size {
            WindowSize::Short => self.diff_short.stat(kind),
            WindowSize::Long => self.diff_long.stat(kind),
        }
    }
}

/// Streaming state of every channel
#[derive(Debug, Clone, Default)]
pub struct ChannelHistory {
    channels: [ChannelState; NUM_CHANNELS],
}

impl ChannelHistory {
    /// One blank [`ChannelState`] per channel
    pub const fn new() -> Self {
        Self {
            channels: [
                ChannelState::new(),
                ChannelState::new(),
                ChannelState::new(),
                ChannelState::new(),
            ],
        }
    }

    /// Update a single channel
    pub fn update(&mut self, channel: Channel, x: f32) {
        self.channels[channel.index()].update(x);
    }

    /// Update every channel from one sample, in slot order
    pub fn update_all(&mut self, sample: &RawSample) {
        for channel in Channel::ALL {
            self.update(channel, sample[channel]);
        }
    }

    /// State of a single channel
    pub fn channel(&self, channel: Channel) -> &ChannelState {
        &self.channels[channel.index()]
    }
}

/// Rolling windows over the gap between successive sample arrivals
///
/// Gaps are measured in whole units of `resolution_ms` (seconds by
/// default), matching the coarse device clock the cadence features were
/// trained on. The first gap is 0.
#[derive(Debug, Clone)]
pub struct InterArrivalWindows {
    short: RingWindow<SHORT_WINDOW>,
    long: RingWindow<LONG_WINDOW>,
    last_tick: Option<u64>,
    resolution_ms: u64,
}

impl InterArrivalWindows {
    /// Empty windows counting gaps in ticks of `resolution_ms`
    ///
    /// A zero resolution is treated as 1 ms.
    pub fn new(resolution_ms: u64) -> Self {
        Self {
            short: RingWindow::new(),
            long: RingWindow::new(),
            last_tick: None,
            resolution_ms: resolution_ms.max(1),
        }
    }

    /// Record an arrival and return the gap pushed into the windows
    ///
    /// A clock that steps backwards yields a gap of 0.
    pub fn record(&mut self, arrival: Timestamp) -> f32 {
        let tick = arrival / self.resolution_ms;
        let gap = match self.last_tick {
            Some(last) => tick.saturating_sub(last) as f32,
            None => 0.0,
        };
        self.last_tick = Some(tick);

        self.short.push(gap);
        self.long.push(gap);
        gap
    }

    /// Statistic of the gap window
    pub fn stat(&self, size: WindowSize, kind: Statistic) -> f32 {
        match size {
            WindowSize::Short => self.short.stat(kind),
            WindowSize::Long => self.long.stat(kind),
        }
    }
}

impl Default for InterArrivalWindows {
    fn default() -> Self {
        Self::new(DEFAULT_CADENCE_RESOLUTION_MS)
    }
}

/// Cross-sample state read by feature programs
///
/// Owned by a single detector. There is no in-place reset: dropping the
/// detector and building a new one is the only way back to a blank state.
#[derive(Debug, Clone, Default)]
pub struct StreamState {
    /// Per-channel values, differences, lags and EWMA
    pub channels: ChannelHistory,
    /// Gaps between sample arrivals
    pub arrivals: InterArrivalWindows,
}

impl StreamState {
    /// Blank state with the given cadence resolution
    pub fn new(cadence_resolution_ms: u64) -> Self {
        Self {
            channels: ChannelHistory::new(),
            arrivals: InterArrivalWindows::new(cadence_resolution_ms),
        }
    }

    /// Record the arrival, then update every channel
    pub fn observe(&mut self, sample: &RawSample, arrival: Timestamp) {
        self.arrivals.record(arrival);
        self.channels.update_all(sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_update_seeds_everything() {
        let mut state = ChannelState::new();
        state.update(12.5);

        assert_eq!(state.previous(), Some(12.5));
        assert_eq!(state.ewma(), Some(12.5));
        assert_eq!(state.lag(1), Some(12.5));
        assert_eq!(state.lag(2), None);
        assert_eq!(state.diff_stat(WindowSize::Short, Statistic::Mean), 0.0);
        assert_eq!(state.raw_stat(WindowSize::Long, Statistic::Max), 12.5);
    }

    #[test]
    fn ewma_weights_newest_by_a_third() {
        let mut state = ChannelState::new();
        state.update(3.0);
        state.update(6.0);

        let expected = 6.0 / 3.0 + 3.0 * 2.0 / 3.0;
        let ewma = state.ewma().unwrap();
        assert!((ewma - expected).abs() < 1e-2, "ewma {} vs {}", ewma, expected);
        assert_eq!(ewma, EWMA_ALPHA * 6.0 + EWMA_DECAY * 3.0);
    }

    #[test]
    fn lag_register_shifts_previous_values() {
        let mut state = ChannelState::new();
        for x in [1.0, 2.0, 3.0, 4.0] {
            state.update(x);
        }

        // lag[0] holds the value that was previous when 4.0 arrived
        assert_eq!(state.lag(1), Some(3.0));
        assert_eq!(state.lag(2), Some(2.0));
        assert_eq!(state.lag(3), Some(1.0));
        assert_eq!(state.lag(0), None);
        assert_eq!(state.lag(4), None);
    }

    #[test]
    fn diff_windows_track_first_difference() {
        let mut state = ChannelState::new();
        for x in [10.0, 12.0, 15.0] {
            state.update(x);
        }
        // diffs: 0, 2, 3
        assert_eq!(state.diff_stat(WindowSize::Short, Statistic::Max), 3.0);
        assert_eq!(state.diff_stat(WindowSize::Short, Statistic::Min), 0.0);
        assert!((state.diff_stat(WindowSize::Long, Statistic::Mean) - 5.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn history_updates_each_channel() {
        let mut history = ChannelHistory::new();
        let sample = RawSample::try_new([20.0, 50.0, 19.0, 55.0]).unwrap();
        history.update_all(&sample);

        for channel in Channel::ALL {
            assert_eq!(history.channel(channel).previous(), Some(sample[channel]));
        }
    }

    #[test]
    fn inter_arrival_gaps_use_whole_seconds() {
        let mut gaps = InterArrivalWindows::default();
        assert_eq!(gaps.record(10_400), 0.0);
        assert_eq!(gaps.record(11_900), 1.0);
        assert_eq!(gaps.record(14_100), 3.0);

        // gaps 0, 1, 3: sample std = sqrt(7/3)
        let std = gaps.stat(WindowSize::Short, Statistic::StdDev);
        assert!((std - (7.0f32 / 3.0).sqrt()).abs() < 1e-6);
    }

    #[test]
    fn clock_stepping_back_gives_zero_gap() {
        let mut gaps = InterArrivalWindows::default();
        gaps.record(5_000);
        assert_eq!(gaps.record(2_000), 0.0);
        // Later gaps are measured from the earlier reading
        assert_eq!(gaps.record(4_000), 2.0);
        assert_eq!(gaps.stat(WindowSize::Short, Statistic::Min), 0.0);
    }

    #[test]
    fn zero_resolution_counts_milliseconds() {
        let mut gaps = InterArrivalWindows::new(0);
        gaps.record(100);
        assert_eq!(gaps.record(350), 250.0);
    }

    #[test]
    fn non_finite_reading_lands_in_lag_register() {
        let mut state = ChannelState::new();
        state.update(1.0);
        state.update(f32::NAN);
        state.update(2.0);
        assert!(state.lag(1).is_some_and(f32::is_nan));
        assert_eq!(state.lag(2), Some(1.0));
    }

    #[test]
    fn stream_state_observes_arrival_and_values() {
        let mut state = StreamState::new(1000);
        let a = RawSample::try_new([20.0, 50.0, 19.0, 55.0]).unwrap();
        let b = RawSample::try_new([21.0, 49.0, 19.0, 55.0]).unwrap();
        state.observe(&a, 0);
        state.observe(&b, 2_000);

        let temperature = state.channels.channel(Channel::Temperature);
        assert_eq!(temperature.last_diff(), Some(1.0));
        assert_eq!(state.arrivals.stat(WindowSize::Long, Statistic::Max), 2.0);
    }

    #[test]
    fn window_size_samples() {
        assert_eq!(WindowSize::Short.samples(), 5);
        assert_eq!(WindowSize::Long.samples(), 15);
    }
}
