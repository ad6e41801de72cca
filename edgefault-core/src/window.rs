//! Fixed-Size Rolling Window over Scalar Samples
//!
//! ## Overview
//!
//! `RingWindow<N>` keeps the `N` most recent `f32` values of a stream and
//! computes the rolling statistics the feature programs ask for: mean,
//! median, sample variance, standard deviation, min and max. Storage is an
//! inline array sized by a const generic, so a window never allocates.
//!
//! ## Memory Layout
//!
//! ```text
//! RingWindow<5> after 7 pushes (v0..v6):
//! ┌────┬────┬────┬────┬────┐
//! │ v5 │ v6 │ v2 │ v3 │ v4 │   ← slots
//! └────┴────┴────┴────┴────┘
//!            ↑
//!            └── head = 2 (next write, also the oldest value once full)
//!
//! len = 5, chronological order = v2 v3 v4 v5 v6
//! ```
//!
//! ## Partial Windows
//!
//! Until `N` values have been pushed only `len` slots are valid, and every
//! statistic is computed over those alone. This matches how the training
//! pipeline computed rolling features with `min_periods = 1`.
//!
//! ## Statistic Semantics
//!
//! | Statistic | Definition                              | Empty | len = 1 |
//! |-----------|-----------------------------------------|-------|---------|
//! | Mean      | Σx / n                                  | 0     | x       |
//! | Median    | middle of sorted copy, mean of two mids | 0     | x       |
//! | Variance  | Σ(x-mean)² / (n-1)                      | 0     | 0       |
//! | StdDev    | sqrt(variance)                          | 0     | 0       |
//! | Min / Max | extreme of the valid values             | 0     | x       |

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rolling statistic selector
///
/// Discriminants match the numeric codes used by exported feature tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Statistic {
    Mean = 0,
    Median = 1,
    StdDev = 2,
    Variance = 3,
    Min = 4,
    Max = 5,
}

impl Statistic {
    /// All statistics in code order
    pub const ALL: [Statistic; 6] = [
        Statistic::Mean,
        Statistic::Median,
        Statistic::StdDev,
        Statistic::Variance,
        Statistic::Min,
        Statistic::Max,
    ];

    /// Decode an exported statistic code
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Statistic::Mean),
            1 => Some(Statistic::Median),
            2 => Some(Statistic::StdDev),
            3 => Some(Statistic::Variance),
            4 => Some(Statistic::Min),
            5 => Some(Statistic::Max),
            _ => None,
        }
    }

    /// Short name used in feature labels
    pub const fn name(&self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::Median => "median",
            Statistic::StdDev => "std",
            Statistic::Variance => "var",
            Statistic::Min => "min",
            Statistic::Max => "max",
        }
    }
}

/// Fixed-capacity circular window of `f32` samples
///
/// ## Internal Invariants
///
/// - `head < N`: next write slot, and the oldest value once full
/// - `len <= N`: grows by one per push until it saturates at `N`
/// - slots outside the valid range are never read
#[derive(Debug, Clone)]
pub struct RingWindow<const N: usize> {
    data: [f32; N],
    head: usize,
    len: usize,
}

impl<const N: usize> RingWindow<N> {
    /// Creates an empty window
    pub const fn new() -> Self {
        Self {
            data: [0.0; N],
            head: 0,
            len: 0,
        }
    }

    /// Append a value, evicting the oldest one when full
    pub fn push(&mut self, value: f32) {
        self.data[self.head] = value;
        self.head = (self.head + 1) % N;

        if self.len < N {
            self.len += 1;
        }
    }

    /// Number of valid values
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no values are held
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True once `N` values have been pushed
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Maximum number of values held
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Most recent value
    pub fn last(&self) -> Option<f32> {
        if self.is_empty() {
            return None;
        }
        Some(self.data[(self.head + N - 1) % N])
    }

    /// Iterate over all valid values from oldest to newest
    pub fn iter(&self) -> RingWindowIter<'_, N> {
        self.recent(self.len)
    }

    /// Iterate over the `count` most recent values, oldest first
    ///
    /// `count` is clamped to the number of valid values.
    pub fn recent(&self, count: usize) -> RingWindowIter<'_, N> {
        let count = count.min(self.len);
        RingWindowIter {
            window: self,
            // Oldest of the requested values sits `count` slots behind head
            next: (self.head + N - count) % N,
            remaining: count,
        }
    }

    /// Statistic over every valid value
    pub fn stat(&self, kind: Statistic) -> f32 {
        self.stat_recent(kind, self.len)
    }

    /// Statistic over the `count` most recent valid values
    pub fn stat_recent(&self, kind: Statistic, count: usize) -> f32 {
        let count = count.min(self.len);
        if count == 0 {
            return 0.0;
        }

        match kind {
            Statistic::Mean => self.mean(count),
            Statistic::Median => self.median(count),
            Statistic::Variance => self.variance(count),
            Statistic::StdDev => libm::sqrtf(self.variance(count)),
            Statistic::Min => self.recent(count).fold(f32::INFINITY, f32::min),
            Statistic::Max => self.recent(count).fold(f32::NEG_INFINITY, f32::max),
        }
    }

    /// The `count` most recent values, newest first
    ///
    /// Sums run in this order so f32 rounding matches the device build.
    fn newest_first(&self, count: usize) -> impl Iterator<Item = f32> + '_ {
        (0..count).map(move |i| self.data[(self.head + N - 1 - i) % N])
    }

    fn mean(&self, count: usize) -> f32 {
        let sum = self.newest_first(count).fold(0.0f32, |acc, x| acc + x);
        sum / count as f32
    }

    fn variance(&self, count: usize) -> f32 {
        if count < 2 {
            return 0.0;
        }
        let mean = self.mean(count);
        let sq_sum = self
            .newest_first(count)
            .fold(0.0f32, |acc, x| acc + (x - mean) * (x - mean));
        sq_sum / (count - 1) as f32
    }

    fn median(&self, count: usize) -> f32 {
        let mut sorted = [0.0f32; N];
        for (slot, value) in sorted.iter_mut().zip(self.recent(count)) {
            *slot = value;
        }
        let sorted = &mut sorted[..count];
        sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(core::cmp::Ordering::Equal));

        if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        }
    }

    /// Forget every value
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}

impl<const N: usize> Default for RingWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Chronological iterator over a window
pub struct RingWindowIter<'a, const N: usize> {
    window: &'a RingWindow<N>,
    next: usize,
    remaining: usize,
}

impl<'a, const N: usize> Iterator for RingWindowIter<'a, N> {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let value = self.window.data[self.next];
        self.next = (self.next + 1) % N;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, const N: usize> ExactSizeIterator for RingWindowIter<'a, N> {}
