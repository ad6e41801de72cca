//! Constants for EdgeFault Core
//!
//! Every numeric guard, window size and stage parameter used by the feature
//! engine lives here. The trained models downstream were fitted against
//! features computed with exactly these values, so changing one of them
//! silently shifts the input layout the models expect.
//!
//! ## Organization
//!
//! - **Numeric**: division floors, smoothing coefficients, feature thresholds
//! - **Windows**: rolling window capacities and extractor history sizes
//! - **Stages**: cold/warm model selection parameters
//! - **Time**: unit conversions and cadence resolution

/// Numeric guards and coefficients reproduced from the reference firmware.
pub mod numeric;

/// Rolling window capacities and extractor history sizes.
pub mod windows;

/// Cold/warm stage selection parameters.
pub mod stages;

/// Time unit conversions and cadence resolution.
pub mod time;

// Re-export commonly used constants for convenience
pub use numeric::{
    VARIANCE_FLOOR, STD_FLOOR, EWMA_ALPHA, EWMA_DECAY, AUTOCORR_DECAY_THRESHOLD,
    LARGE_STEP_THRESHOLD, DECISION_THRESHOLD, PROBABILITY_THRESHOLD,
};

pub use windows::{
    SHORT_WINDOW, LONG_WINDOW, LAG_DEPTH, HISTOGRAM_WINDOW, HJORTH_WINDOW,
    HISTOGRAM_MIN_SAMPLES, HJORTH_MIN_SAMPLES, MAX_FEATURES, MAX_CHANNEL_PAIRS,
};

pub use stages::{DEFAULT_WARMUP_SAMPLES, COLD_FEATURE_COUNT, WARM_FEATURE_COUNT};

pub use time::{US_PER_MS, DEFAULT_CADENCE_RESOLUTION_MS};
