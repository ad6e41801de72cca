//! Detection pipelines
//!
//! A detector consumes validated samples one at a time and scores each of
//! them. Two shapes are provided:
//!
//! - [`StagedDetector`]: the deployed two-stage design. A cold
//!   program/model pair scores samples while history is short, a warm pair
//!   takes over once the warm-up count is reached.
//! - [`WindowedDetector`]: one [`FeatureExtractor`] strategy feeding one
//!   model, for the window-statistic model families.
//!
//! Both time feature extraction and inference separately against a
//! [`TimeSource`] and report the durations with every result.
//!
//! ```rust
//! use edgefault_core::{DetectorConfig, FeatureProgram, FeatureSpec, FixedTime, RawSample, Channel};
//! use edgefault_ml::{Detector, LinearModel, Model, Stage, StagedDetector, Standardizer};
//!
//! static SPECS: [FeatureSpec; 1] = [FeatureSpec::Raw(Channel::Temperature)];
//! static PROGRAM: FeatureProgram<'static> = FeatureProgram::new(&SPECS);
//! let model = Model::from(LinearModel::new(Standardizer::new(&[20.0], &[1.0]), &[1.0], 0.0));
//!
//! let stage = Stage::new(PROGRAM, model)?;
//! let mut detector = StagedDetector::new(stage, stage, DetectorConfig::default(), FixedTime::new(0));
//!
//! let result = detector.process(&RawSample::try_new([22.0, 50.0, 21.0, 55.0])?, 0);
//! assert_eq!(result.label.as_u8(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::{model::Model, scoring::ScoreResult};
use edgefault_core::{
    errors::{ConfigError, ConfigResult},
    extractors::FeatureExtractor,
    program::FeatureProgram,
    stage::{DetectorConfig, StageKind, StageSelector},
    time::{Stopwatch, TimeSource, Timestamp},
    RawSample, StreamState,
};

pub use edgefault_core::constants::MAX_FEATURES;

/// Anything that turns a sample stream into per-sample verdicts
pub trait Detector {
    /// Score one validated sample that arrived at `arrival` (ms)
    fn process(&mut self, sample: &RawSample, arrival: Timestamp) -> ScoreResult;
}

impl<D: Detector + ?Sized> Detector for &mut D {
    fn process(&mut self, sample: &RawSample, arrival: Timestamp) -> ScoreResult {
        (**self).process(sample, arrival)
    }
}

fn check_dimensions(program: usize, model: usize) -> ConfigResult<()> {
    if program != model {
        log_warn!("feature layout yields {} values, model expects {}", program, model);
        return Err(ConfigError::DimensionMismatch { program, model });
    }
    if program > MAX_FEATURES {
        log_warn!("feature layout of {} values exceeds capacity", program);
        return Err(ConfigError::CapacityExceeded { required: program, limit: MAX_FEATURES });
    }
    Ok(())
}

/// A feature program paired with the model trained on its output
#[derive(Debug, Clone, Copy)]
pub struct Stage<'a> {
    program: FeatureProgram<'a>,
    model: Model<'a>,
}

impl<'a> Stage<'a> {
    /// Pair a program with a model
    ///
    /// Fails when the model's tables are inconsistent or the program does
    /// not produce exactly the model's input width.
    pub fn new(program: FeatureProgram<'a>, model: Model<'a>) -> ConfigResult<Self> {
        if let Err(e) = model.validate() {
            log_warn!("rejecting {} model: {}", model.name(), e);
            return Err(e);
        }
        check_dimensions(program.len(), model.feature_count())?;
        Ok(Self { program, model })
    }

    pub fn program(&self) -> &FeatureProgram<'a> {
        &self.program
    }

    pub fn model(&self) -> &Model<'a> {
        &self.model
    }

    pub fn feature_count(&self) -> usize {
        self.program.len()
    }
}

/// Two-stage streaming detector
pub struct StagedDetector<'a, T: TimeSource> {
    cold: Stage<'a>,
    warm: Stage<'a>,
    cold_features: [f32; MAX_FEATURES],
    warm_features: [f32; MAX_FEATURES],
    state: StreamState,
    selector: StageSelector,
    clock: T,
}

impl<'a, T: TimeSource> StagedDetector<'a, T> {
    pub fn new(cold: Stage<'a>, warm: Stage<'a>, config: DetectorConfig, clock: T) -> Self {
        Self {
            cold,
            warm,
            cold_features: [0.0; MAX_FEATURES],
            warm_features: [0.0; MAX_FEATURES],
            state: StreamState::new(config.cadence_resolution_ms),
            selector: StageSelector::new(config.warmup_samples),
            clock,
        }
    }

    /// Stage that will score the next sample
    pub fn stage(&self) -> StageKind {
        // The counter is bumped before selection
        if self.selector.samples_seen().saturating_add(1) < self.selector.threshold() {
            StageKind::Cold
        } else {
            StageKind::Warm
        }
    }

    pub fn samples_seen(&self) -> u32 {
        self.selector.samples_seen()
    }

    pub fn state(&self) -> &StreamState {
        &self.state
    }

    /// Feature vector most recently computed by `kind`
    pub fn features(&self, kind: StageKind) -> &[f32] {
        match kind {
            StageKind::Cold => &self.cold_features[..self.cold.feature_count()],
            StageKind::Warm => &self.warm_features[..self.warm.feature_count()],
        }
    }

    pub fn clock(&self) -> &T {
        &self.clock
    }
}

impl<'a, T: TimeSource> Detector for StagedDetector<'a, T> {
    fn process(&mut self, sample: &RawSample, arrival: Timestamp) -> ScoreResult {
        self.state.observe(sample, arrival);
        let kind = self.selector.observe();

        let (stage, features) = match kind {
            StageKind::Cold => (&self.cold, &mut self.cold_features[..self.cold.feature_count()]),
            StageKind::Warm => (&self.warm, &mut self.warm_features[..self.warm.feature_count()]),
        };

        let watch = Stopwatch::start(&self.clock);
        stage.program.evaluate(sample, &self.state, features);
        let feature_us = watch.elapsed_us(&self.clock);

        let watch = Stopwatch::start(&self.clock);
        let score = stage.model.score(features);
        let inference_us = watch.elapsed_us(&self.clock);

        ScoreResult::new(score, Some(kind), feature_us, inference_us)
    }
}

/// Single-model detector over a window extractor
pub struct WindowedDetector<'a, E: FeatureExtractor, T: TimeSource> {
    extractor: E,
    model: Model<'a>,
    features: [f32; MAX_FEATURES],
    clock: T,
}

impl<'a, E: FeatureExtractor, T: TimeSource> WindowedDetector<'a, E, T> {
    pub fn new(extractor: E, model: Model<'a>, clock: T) -> ConfigResult<Self> {
        model.validate()?;
        check_dimensions(extractor.feature_count(), model.feature_count())?;
        Ok(Self { extractor, model, features: [0.0; MAX_FEATURES], clock })
    }

    pub fn features(&self) -> &[f32] {
        &self.features[..self.extractor.feature_count()]
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }
}

impl<'a, E: FeatureExtractor, T: TimeSource> Detector for WindowedDetector<'a, E, T> {
    fn process(&mut self, sample: &RawSample, _arrival: Timestamp) -> ScoreResult {
        let n = self.extractor.feature_count();

        let watch = Stopwatch::start(&self.clock);
        self.extractor.extract(sample, &mut self.features[..n]);
        let feature_us = watch.elapsed_us(&self.clock);

        let watch = Stopwatch::start(&self.clock);
        let score = self.model.score(&self.features[..n]);
        let inference_us = watch.elapsed_us(&self.clock);

        ScoreResult::new(score, None, feature_us, inference_us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        linear::{LinearModel, PlattCalibration, SvmModel},
        scoring::{Label, ScoreKind},
        standardize::Standardizer,
    };
    use edgefault_core::{
        extractors::HjorthExtractor, Channel, FeatureSpec, FixedTime, COLD_PROGRAM,
    };

    static TEMP: [FeatureSpec; 1] = [FeatureSpec::Raw(Channel::Temperature)];
    static TEMP_PROGRAM: FeatureProgram<'static> = FeatureProgram::new(&TEMP);
    static HUM: [FeatureSpec; 1] = [FeatureSpec::Raw(Channel::Humidity)];
    static HUM_PROGRAM: FeatureProgram<'static> = FeatureProgram::new(&HUM);

    const IDENTITY_MEAN: [f32; 1] = [0.0];
    const IDENTITY_SCALE: [f32; 1] = [1.0];
    const UNIT: [f32; 1] = [1.0];

    fn identity() -> LinearModel<'static> {
        LinearModel::new(Standardizer::new(&IDENTITY_MEAN, &IDENTITY_SCALE), &UNIT, 0.0)
    }

    fn sample(t: f32, h: f32) -> RawSample {
        RawSample::try_new([t, h, 0.0, 0.0]).unwrap()
    }

    #[test]
    fn identity_models_on_two() {
        let logistic = Stage::new(TEMP_PROGRAM, identity().into()).unwrap();
        let svm = Stage::new(TEMP_PROGRAM, SvmModel::new(identity()).into()).unwrap();
        let config = DetectorConfig::immediate();

        let mut lr = StagedDetector::new(logistic, logistic, config, FixedTime::new(0));
        let result = lr.process(&sample(2.0, 0.0), 0);
        assert!((result.score - 0.880797).abs() < 1e-5);
        assert_eq!(result.label, Label::Fault);

        let mut raw = StagedDetector::new(svm, svm, config, FixedTime::new(0));
        let result = raw.process(&sample(2.0, 0.0), 0);
        assert_eq!(result.score, 2.0);
        assert_eq!(result.kind, ScoreKind::Margin);
        assert_eq!(result.label, Label::Fault);
    }

    #[test]
    fn dimension_mismatch_rejected_at_startup() {
        let err = Stage::new(COLD_PROGRAM, identity().into()).unwrap_err();
        assert_eq!(err, ConfigError::DimensionMismatch { program: 10, model: 1 });
    }

    #[test]
    fn inconsistent_model_rejected() {
        let broken = LinearModel::new(Standardizer::new(&[0.0, 0.0], &[1.0]), &UNIT, 0.0);
        assert!(Stage::new(TEMP_PROGRAM, broken.into()).is_err());
    }

    #[test]
    fn warm_stage_after_threshold() {
        // Cold looks at temperature, warm at humidity
        let cold = Stage::new(TEMP_PROGRAM, identity().into()).unwrap();
        let warm = Stage::new(HUM_PROGRAM, identity().into()).unwrap();
        let config = DetectorConfig::firmware().with_warmup(3);
        let mut detector = StagedDetector::new(cold, warm, config, FixedTime::new(0));

        let mut kinds = [None; 5];
        for (i, kind) in kinds.iter_mut().enumerate() {
            assert_eq!(detector.stage(), if i < 2 { StageKind::Cold } else { StageKind::Warm });
            let result = detector.process(&sample(10.0, -10.0), i as u64 * 1000);
            *kind = result.stage;
            let expected = if i < 2 { Label::Fault } else { Label::Normal };
            assert_eq!(result.label, expected);
        }
        assert_eq!(
            kinds,
            [
                Some(StageKind::Cold),
                Some(StageKind::Cold),
                Some(StageKind::Warm),
                Some(StageKind::Warm),
                Some(StageKind::Warm)
            ]
        );
        assert_eq!(detector.samples_seen(), 5);
        assert_eq!(detector.features(StageKind::Warm), &[-10.0]);
        assert_eq!(detector.features(StageKind::Cold), &[10.0]);
    }

    #[test]
    fn calibrated_svm_reports_probability() {
        let svm = SvmModel::calibrated(identity(), PlattCalibration::new(-1.0, 0.0));
        let stage = Stage::new(TEMP_PROGRAM, svm.into()).unwrap();
        let mut detector = StagedDetector::new(stage, stage, DetectorConfig::default(), FixedTime::new(0));
        let result = detector.process(&sample(-2.0, 0.0), 0);
        assert_eq!(result.kind, ScoreKind::Probability);
        assert_eq!(result.label, Label::Normal);
        assert!((result.score - 0.119203).abs() < 1e-5);
    }

    #[test]
    fn windowed_detector_checks_width() {
        let err = WindowedDetector::new(HjorthExtractor::<15>::new(), identity().into(), FixedTime::new(0))
            .err();
        assert_eq!(err, Some(ConfigError::DimensionMismatch { program: 12, model: 1 }));
    }

    #[test]
    fn windowed_detector_scores_without_stage() {
        static MEAN: [f32; 12] = [0.0; 12];
        static SCALE: [f32; 12] = [1.0; 12];
        static WEIGHTS: [f32; 12] = [1.0; 12];
        let model = LinearModel::new(Standardizer::new(&MEAN, &SCALE), &WEIGHTS, -0.5);
        let mut detector =
            WindowedDetector::new(HjorthExtractor::<15>::new(), model.into(), FixedTime::new(0)).unwrap();

        for _ in 0..20 {
            let result = detector.process(&sample(21.0, 40.0), 0);
            assert_eq!(result.stage, None);
            // Constant input: every Hjorth value is 0, so d = bias
            assert_eq!(result.label, Label::Normal);
        }
        assert!(detector.features().iter().all(|&v| v == 0.0));
    }
}
