//! Linear models: logistic regression and linear SVM
//!
//! Both compute the decision value `d = w·z + b` over standardized inputs.
//! Logistic regression maps it through the logistic function. The SVM
//! either reports `d` as a margin or, when Platt coefficients were fitted,
//! the calibrated probability `1 / (1 + exp(A·d + B))`.

use crate::{
    scoring::{sigmoid, Score},
    standardize::Standardizer,
};
use edgefault_core::errors::{ConfigError, ConfigResult};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Weights of a linear decision function
#[derive(Debug, Clone, Copy)]
pub struct LinearModel<'a> {
    scaler: Standardizer<'a>,
    coefficients: &'a [f32],
    bias: f32,
}

impl<'a> LinearModel<'a> {
    pub const fn new(scaler: Standardizer<'a>, coefficients: &'a [f32], bias: f32) -> Self {
        Self { scaler, coefficients, bias }
    }

    pub fn feature_count(&self) -> usize {
        self.coefficients.len()
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.scaler.validate()?;
        if self.scaler.len() != self.coefficients.len() {
            return Err(ConfigError::TableLength {
                table: "mean",
                expected: self.coefficients.len(),
                actual: self.scaler.len(),
            });
        }
        Ok(())
    }

    /// `w·z + b`, bias added after the dot product
    pub fn decision(&self, features: &[f32]) -> f32 {
        let dot = self
            .coefficients
            .iter()
            .zip(features)
            .enumerate()
            .fold(0.0f32, |acc, (i, (&w, &x))| acc + self.scaler.normalize(i, x) * w);
        dot + self.bias
    }

    /// Logistic regression probability
    pub fn score(&self, features: &[f32]) -> Score {
        Score::probability(sigmoid(self.decision(features)))
    }
}

/// Platt scaling coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PlattCalibration {
    pub a: f32,
    pub b: f32,
}

impl PlattCalibration {
    pub const fn new(a: f32, b: f32) -> Self {
        Self { a, b }
    }

    /// Calibrated probability for decision value `d`
    pub fn probability(&self, d: f32) -> f32 {
        1.0 / (1.0 + libm::expf(self.a * d + self.b))
    }
}

/// Linear SVM with optional probability calibration
#[derive(Debug, Clone, Copy)]
pub struct SvmModel<'a> {
    linear: LinearModel<'a>,
    calibration: Option<PlattCalibration>,
}

impl<'a> SvmModel<'a> {
    /// Uncalibrated SVM, scores are margins
    pub const fn new(linear: LinearModel<'a>) -> Self {
        Self { linear, calibration: None }
    }

    /// Calibrated SVM, scores are probabilities
    pub const fn calibrated(linear: LinearModel<'a>, calibration: PlattCalibration) -> Self {
        Self { linear, calibration: Some(calibration) }
    }

    pub fn calibration(&self) -> Option<PlattCalibration> {
        self.calibration
    }

    pub fn feature_count(&self) -> usize {
        self.linear.feature_count()
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.linear.validate()
    }

    pub fn score(&self, features: &[f32]) -> Score {
        let d = self.linear.decision(features);
        match self.calibration {
            Some(platt) => Score::probability(platt.probability(d)),
            None => Score::margin(d),
        }
    }
}
