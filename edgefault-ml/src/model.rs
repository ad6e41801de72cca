//! Model dispatch
//!
//! The three model families share one interface so a detector stage can
//! hold any of them.

use crate::{
    forest::ForestModel,
    linear::{LinearModel, SvmModel},
    scoring::Score,
};
use edgefault_core::errors::ConfigResult;

/// A pre-trained scoring model
#[derive(Debug, Clone, Copy)]
pub enum Model<'a> {
    /// Logistic regression
    Logistic(LinearModel<'a>),
    /// Linear SVM, calibrated or not
    Svm(SvmModel<'a>),
    /// Random forest
    Forest(ForestModel<'a>),
}

impl<'a> Model<'a> {
    /// Input dimensionality the model was trained on
    pub fn feature_count(&self) -> usize {
        match self {
            Model::Logistic(m) => m.feature_count(),
            Model::Svm(m) => m.feature_count(),
            Model::Forest(m) => m.feature_count(),
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        match self {
            Model::Logistic(m) => m.validate(),
            Model::Svm(m) => m.validate(),
            Model::Forest(m) => m.validate(),
        }
    }

    pub fn score(&self, features: &[f32]) -> Score {
        match self {
            Model::Logistic(m) => m.score(features),
            Model::Svm(m) => m.score(features),
            Model::Forest(m) => m.score(features),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Model::Logistic(_) => "logistic",
            Model::Svm(m) if m.calibration().is_some() => "svm-calibrated",
            Model::Svm(_) => "svm",
            Model::Forest(_) => "random-forest",
        }
    }
}

impl<'a> From<LinearModel<'a>> for Model<'a> {
    fn from(model: LinearModel<'a>) -> Self {
        Model::Logistic(model)
    }
}

impl<'a> From<SvmModel<'a>> for Model<'a> {
    fn from(model: SvmModel<'a>) -> Self {
        Model::Svm(model)
    }
}

impl<'a> From<ForestModel<'a>> for Model<'a> {
    fn from(model: ForestModel<'a>) -> Self {
        Model::Forest(model)
    }
}
