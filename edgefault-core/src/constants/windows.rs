//! Window Sizes and Capacity Limits
//!
//! All storage in the per-sample path is fixed at compile time. These
//! capacities bound every window, history and feature vector.

// ===== CHANNEL HISTORY WINDOWS =====

/// Short rolling window (samples).
pub const SHORT_WINDOW: usize = 5;

/// Long rolling window (samples).
pub const LONG_WINDOW: usize = 15;

/// Depth of the per-channel lag register.
pub const LAG_DEPTH: usize = 3;

// ===== EXTRACTOR HISTORY =====

/// History length of the histogram/autocorrelation extractor.
pub const HISTOGRAM_WINDOW: usize = 15;

/// History length of the Hjorth extractor.
pub const HJORTH_WINDOW: usize = 15;

/// Minimum valid samples before histogram features are computed.
pub const HISTOGRAM_MIN_SAMPLES: usize = 5;

/// Minimum valid samples before Hjorth features are computed.
pub const HJORTH_MIN_SAMPLES: usize = 3;

// ===== FEATURE VECTORS =====

/// Largest feature vector any stage may produce.
///
/// The shipped warm program uses 94 slots.
pub const MAX_FEATURES: usize = 128;

/// Largest number of channel pairs the differential extractor accepts.
pub const MAX_CHANNEL_PAIRS: usize = 8;
