//! Per-feature standardization
//!
//! Every shipped model was trained on z-scored inputs, so scoring starts
//! with `(x - mean) / scale` per feature. A scale below 1e-9 (a feature
//! that was constant in training) is replaced by 1.0, which centres the
//! feature without blowing it up.

use edgefault_core::{
    constants::numeric::STD_FLOOR,
    errors::{ConfigError, ConfigResult},
};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Borrowed mean/scale tables of a fitted scaler
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Standardizer<'a> {
    mean: &'a [f32],
    scale: &'a [f32],
}

impl<'a> Standardizer<'a> {
    pub const fn new(mean: &'a [f32], scale: &'a [f32]) -> Self {
        Self { mean, scale }
    }

    /// Number of features covered
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    /// Both tables must have the same length
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scale.len() != self.mean.len() {
            return Err(ConfigError::TableLength {
                table: "scale",
                expected: self.mean.len(),
                actual: self.scale.len(),
            });
        }
        Ok(())
    }

    /// Standardized value of feature `index`
    ///
    /// Indices past the tables pass the value through unchanged.
    #[inline]
    pub fn normalize(&self, index: usize, value: f32) -> f32 {
        match (self.mean.get(index), self.scale.get(index)) {
            (Some(&mean), Some(&scale)) => {
                let scale = if scale < STD_FLOOR { 1.0 } else { scale };
                (value - mean) / scale
            }
            _ => value,
        }
    }
}
