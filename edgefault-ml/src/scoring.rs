//! Scores and per-sample results
//!
//! A model turns a feature vector into a [`Score`]: a binary label plus a
//! continuous value. What the value means depends on the model: logistic
//! regression, calibrated SVMs and forests report a probability in [0, 1],
//! an uncalibrated SVM reports its signed margin. [`ScoreKind`] carries
//! that distinction so reporting never mixes the two.

use edgefault_core::{
    stage::StageKind,
    time::{micros_to_ms, Micros},
};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Binary verdict for one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[repr(u8)]
pub enum Label {
    Normal = 0,
    Fault = 1,
}

impl Label {
    pub const fn from_bool(fault: bool) -> Self {
        if fault {
            Label::Fault
        } else {
            Label::Normal
        }
    }

    /// 0 or 1, as published
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn is_fault(self) -> bool {
        matches!(self, Label::Fault)
    }
}

/// Meaning of [`Score::value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ScoreKind {
    /// Probability of the fault class
    Probability,
    /// Signed distance to the separating hyperplane
    Margin,
}

/// Output of a single model evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Score {
    pub label: Label,
    pub value: f32,
    pub kind: ScoreKind,
}

impl Score {
    /// Probability score, fault when `p >= 0.5`
    pub fn probability(p: f32) -> Self {
        Self {
            label: Label::from_bool(p >= edgefault_core::constants::PROBABILITY_THRESHOLD),
            value: p,
            kind: ScoreKind::Probability,
        }
    }

    /// Margin score, fault when `d >= 0`
    pub fn margin(d: f32) -> Self {
        Self {
            label: Label::from_bool(d >= edgefault_core::constants::DECISION_THRESHOLD),
            value: d,
            kind: ScoreKind::Margin,
        }
    }
}

/// Logistic function
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + libm::expf(-x))
}

/// Everything reported for one processed sample
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ScoreResult {
    pub label: Label,
    pub score: f32,
    pub kind: ScoreKind,
    /// Stage that scored the sample, `None` for single-model detectors
    pub stage: Option<StageKind>,
    /// Time spent computing features
    pub feature_us: Micros,
    /// Time spent in the model
    pub inference_us: Micros,
}

impl ScoreResult {
    pub fn new(score: Score, stage: Option<StageKind>, feature_us: Micros, inference_us: Micros) -> Self {
        Self {
            label: score.label,
            score: score.value,
            kind: score.kind,
            stage,
            feature_us,
            inference_us,
        }
    }

    pub fn feature_ms(&self) -> f32 {
        micros_to_ms(self.feature_us)
    }

    pub fn inference_ms(&self) -> f32 {
        micros_to_ms(self.inference_us)
    }
}
