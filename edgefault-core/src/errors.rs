//! Error Types for Sample Ingestion and Stage Configuration
//!
//! ## Design Philosophy
//!
//! The per-sample path of the detector never fails once it has been built:
//! degenerate statistics have defined fallback values and every buffer is
//! sized at compile time. What can fail is split into two groups:
//!
//! 1. **Sample rejection** (`SampleError`): an inbound reading carries a
//!    non-finite value. The sample is dropped before it touches any state.
//!
//! 2. **Configuration** (`ConfigError`): a feature program does not match the
//!    model it feeds, a forest links to a node that does not exist, or a
//!    stage needs more slots than the fixed capacity allows. These surface
//!    once, when a detector is assembled at startup.
//!
//! Both enums are `Copy`, carry only `&'static str` reasons and small
//! integers, and never allocate, matching the embedded constraints of the
//! rest of the crate.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use edgefault_core::{ConfigError, RawSample, SampleError};
//!
//! match RawSample::try_new([21.5, 48.0, f32::NAN, 50.2]) {
//!     Ok(_) => {}
//!     Err(SampleError::NonFinite { channel }) => {
//!         // drop the message, nothing was mutated
//!         let _ = channel;
//!     }
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for configuration checks
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for sample construction
pub type SampleResult<T> = Result<T, SampleError>;

/// Rejection of an inbound sample
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SampleError {
    /// A channel reading is NaN or infinite
    #[error("Channel {channel} reading is not a finite number")]
    NonFinite {
        /// Index of the offending channel
        channel: usize,
    },
}

/// Startup configuration errors
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Feature program length differs from the model's input dimensionality
    #[error("Feature program yields {program} values but model expects {model}")]
    DimensionMismatch {
        /// Number of slots the program produces
        program: usize,
        /// Number of inputs the model was trained on
        model: usize,
    },

    /// Parameter arrays of one model disagree in length
    #[error("Parameter table '{table}' has {actual} entries, expected {expected}")]
    TableLength {
        /// Name of the short or long table
        table: &'static str,
        /// Length implied by the model's feature count
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },

    /// Requested size exceeds a compile-time capacity
    #[error("Capacity exceeded: need {required}, limit {limit}")]
    CapacityExceeded {
        /// Slots requested
        required: usize,
        /// Fixed capacity
        limit: usize,
    },

    /// Tree node refers to a missing node or feature, or links backwards
    #[error("Malformed tree at node {node}: {reason}")]
    MalformedTree {
        /// Arena index of the offending node
        node: usize,
        /// What is wrong with it
        reason: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for SampleError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::NonFinite { channel } =>
                defmt::write!(fmt, "Channel {} not finite", channel),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::DimensionMismatch { program, model } =>
                defmt::write!(fmt, "Program {} slots, model {}", program, model),
            Self::TableLength { table, expected, actual } =>
                defmt::write!(fmt, "Table {} has {}, expected {}", table, actual, expected),
            Self::CapacityExceeded { required, limit } =>
                defmt::write!(fmt, "Need {} slots, limit {}", required, limit),
            Self::MalformedTree { node, reason } =>
                defmt::write!(fmt, "Tree node {}: {}", node, reason),
        }
    }
}
