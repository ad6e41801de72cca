//! Pre-trained model scoring for EdgeFault
//!
//! ## Overview
//!
//! Models are trained offline and shipped as constant parameter tables.
//! This crate evaluates them on-device against the feature vectors built by
//! `edgefault-core`, with no allocation and no training code.
//!
//! ## Model Families
//!
//! | Model               | Score                  | Fault when   |
//! |---------------------|------------------------|--------------|
//! | Logistic regression | `sigmoid(w·z + b)`     | score ≥ 0.5  |
//! | Linear SVM          | margin `w·z + b`       | margin ≥ 0   |
//! | Calibrated SVM      | `1/(1+exp(A·d + B))`   | score ≥ 0.5  |
//! | Random forest       | mean leaf probability  | score ≥ 0.5  |
//!
//! Every model standardizes its inputs first (`z = (x - mean) / scale`).
//!
//! ## Memory Model
//!
//! Parameter tables are borrowed slices, normally `static` data in flash.
//! Forest nodes live in one arena indexed by `u16`:
//! ```text
//! Node: 12 bytes (feature u16, threshold f32, left u16, right u16)
//! 10 trees × 63 nodes ≈ 7.5KB flash
//! Runtime: 2 × 128 × 4 bytes of feature buffers
//! ```
//!
//! ## Detectors
//!
//! [`StagedDetector`] runs the deployed cold/warm design on top of
//! [`edgefault_core::StreamState`]; [`WindowedDetector`] pairs a single
//! window extractor with a model.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

pub mod forest;
pub mod linear;
pub mod model;
pub mod node;
pub mod pipeline;
pub mod scoring;
pub mod standardize;
pub mod tree;

pub use forest::ForestModel;
pub use linear::{LinearModel, PlattCalibration, SvmModel};
pub use model::Model;
pub use node::{decode_flat, Node};
pub use pipeline::{Detector, Stage, StagedDetector, WindowedDetector, MAX_FEATURES};
pub use scoring::{sigmoid, Label, Score, ScoreKind, ScoreResult};
pub use standardize::Standardizer;
pub use tree::Tree;
