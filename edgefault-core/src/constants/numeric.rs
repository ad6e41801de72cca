//! Numeric Guards and Coefficients
//!
//! These values are part of the scoring contract. Reference outputs from
//! the device were produced with `f32` arithmetic and exactly these guards.

// ===== DIVISION FLOORS =====

/// Variance below this is treated as zero.
///
/// Applies to autocorrelation normalization, Hjorth mobility/complexity
/// denominators, histogram range checks and the rate-of-change average.
pub const VARIANCE_FLOOR: f32 = 1e-9;

/// Standardization divisor floor.
///
/// A per-feature scale below this is replaced by 1.0 (the feature is then
/// only centred, not scaled).
pub const STD_FLOOR: f32 = 1e-9;

// ===== SMOOTHING =====

/// Weight of the newest sample in the channel EWMA.
///
/// The firmware stores 1/3 as a three-digit literal; keeping the literal
/// keeps EWMA features bit-compatible with recorded device output.
pub const EWMA_ALPHA: f32 = 0.333;

/// Weight of the previous EWMA value.
pub const EWMA_DECAY: f32 = 0.667;

// ===== FEATURE THRESHOLDS =====

/// Autocorrelation level (1/e) marking the decay lag.
pub const AUTOCORR_DECAY_THRESHOLD: f32 = 0.367879;

/// Absolute successive difference counted as a "large step".
pub const LARGE_STEP_THRESHOLD: f32 = 0.04;

// ===== DECISION RULES =====

/// Raw margin threshold for uncalibrated SVM decisions.
pub const DECISION_THRESHOLD: f32 = 0.0;

/// Probability threshold for logistic, calibrated and forest decisions.
///
/// Inclusive: a score equal to the threshold yields label 1.
pub const PROBABILITY_THRESHOLD: f32 = 0.5;
