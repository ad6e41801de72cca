//! Stage Selection Parameters

/// Validated samples after which the warm stage takes over.
///
/// Matches the longest rolling window: once 15 samples have been seen every
/// window-derived feature is computed over a full window.
pub const DEFAULT_WARMUP_SAMPLES: u32 = 15;

/// Slots in the shipped cold feature program.
pub const COLD_FEATURE_COUNT: usize = 10;

/// Slots in the shipped warm feature program.
pub const WARM_FEATURE_COUNT: usize = 94;
