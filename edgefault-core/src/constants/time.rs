//! Time-Related Constants

/// Microseconds per millisecond.
pub const US_PER_MS: u64 = 1000;

/// Granularity of inter-arrival gaps (milliseconds).
///
/// The device clock feeding the cadence windows ticks in whole seconds, so
/// gaps are measured in seconds truncated to this resolution.
pub const DEFAULT_CADENCE_RESOLUTION_MS: u64 = 1000;
