//! Cold/warm stage selection
//!
//! Rolling features need a history before they mean anything, so a detector
//! starts on a cold-start model fed only instantaneous features and moves to
//! the full model once enough samples have been seen:
//!
//! ```text
//!            count < threshold            count >= threshold
//!  ┌──────┐ ─────────────────► ┌──────┐ ─────────────────► (stays)
//!  │ COLD │                    │ WARM │
//!  └──────┘                    └──────┘
//! ```
//!
//! The counter is bumped before the stage is chosen, so with the default
//! threshold of 15 the first 14 samples are scored cold and the 15th is the
//! first warm one. There is no way back to cold short of rebuilding the
//! detector.

use crate::constants::{stages::DEFAULT_WARMUP_SAMPLES, time::DEFAULT_CADENCE_RESOLUTION_MS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Active operating stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StageKind {
    Cold,
    Warm,
}

impl StageKind {
    pub const fn name(&self) -> &'static str {
        match self {
            StageKind::Cold => "cold",
            StageKind::Warm => "warm",
        }
    }
}

/// Monotone sample counter driving the cold→warm transition
#[derive(Debug, Clone)]
pub struct StageSelector {
    seen: u32,
    threshold: u32,
}

impl StageSelector {
    pub const fn new(threshold: u32) -> Self {
        Self { seen: 0, threshold }
    }

    /// Count one validated sample and return the stage to score it with
    pub fn observe(&mut self) -> StageKind {
        let before = self.current();
        self.seen = self.seen.saturating_add(1);
        let stage = self.current();

        if before != stage {
            log_info!("switching to warm stage after {} samples", self.seen);
        }
        stage
    }

    /// Stage implied by the samples counted so far
    pub fn current(&self) -> StageKind {
        if self.seen < self.threshold {
            StageKind::Cold
        } else {
            StageKind::Warm
        }
    }

    pub fn samples_seen(&self) -> u32 {
        self.seen
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

impl Default for StageSelector {
    fn default() -> Self {
        Self::new(DEFAULT_WARMUP_SAMPLES)
    }
}

/// Runtime knobs of a staged detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectorConfig {
    /// Samples counted before the warm stage takes over
    pub warmup_samples: u32,
    /// Granularity of the arrival clock feeding the cadence features
    pub cadence_resolution_ms: u64,
}

impl DetectorConfig {
    /// Behaviour of the deployed firmware
    pub const fn firmware() -> Self {
        Self {
            warmup_samples: DEFAULT_WARMUP_SAMPLES,
            cadence_resolution_ms: DEFAULT_CADENCE_RESOLUTION_MS,
        }
    }

    /// Warm stage from the first sample, millisecond cadence
    ///
    /// Handy for replaying recorded data whose history is already long.
    pub const fn immediate() -> Self {
        Self { warmup_samples: 0, cadence_resolution_ms: 1 }
    }

    pub const fn with_warmup(mut self, samples: u32) -> Self {
        self.warmup_samples = samples;
        self
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::firmware()
    }
}
