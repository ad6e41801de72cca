//! Outbound detection records
//!
//! One CSV line per processed sample, in the column order host-side replay
//! tools expect. Note the weather-station columns are humidity first.

use std::fmt;

use edgefault_core::{Channel, RawSample};
use edgefault_ml::{Label, ScoreResult};
use serde::Serialize;

/// Decimals for raw channel readings
pub const VALUE_DECIMALS: usize = 2;
/// Decimals for phase durations in milliseconds
pub const DURATION_DECIMALS: usize = 3;
/// Decimals for the score
pub const SCORE_DECIMALS: usize = 4;

/// Channels in CSV column order
const COLUMN_ORDER: [Channel; 4] = [
    Channel::Temperature,
    Channel::Humidity,
    Channel::HumidityWeatherStation,
    Channel::TemperatureWeatherStation,
];

/// Result of one sample, ready to publish
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionRecord {
    pub time: String,
    pub sample: RawSample,
    pub label: Label,
    pub feature_ms: f32,
    pub inference_ms: f32,
    pub score: f32,
}

impl DetectionRecord {
    /// Header line matching [`fmt::Display`]
    pub const CSV_HEADER: &'static str = "Time,Temperature,Humidity,Humidity_WeatherStation,\
        Temperature_WeatherStation,Label,FeatureTimeMs,InferenceTimeMs,Score";

    pub fn new(time: String, sample: RawSample, result: &ScoreResult) -> Self {
        Self {
            time,
            sample,
            label: result.label,
            feature_ms: result.feature_ms(),
            inference_ms: result.inference_ms(),
            score: result.score,
        }
    }
}

impl fmt::Display for DetectionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.time)?;
        for channel in COLUMN_ORDER {
            write!(f, ",{:.*}", VALUE_DECIMALS, self.sample[channel])?;
        }
        write!(
            f,
            ",{},{:.*},{:.*},{:.*}",
            self.label.as_u8(),
            DURATION_DECIMALS,
            self.feature_ms,
            DURATION_DECIMALS,
            self.inference_ms,
            SCORE_DECIMALS,
            self.score
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgefault_core::StageKind;
    use edgefault_ml::{Score, ScoreKind};

    fn record(score: Score) -> DetectionRecord {
        let sample = RawSample::try_new([24.126, 51.3, 22.8, 63.04]).unwrap();
        let result = ScoreResult::new(score, Some(StageKind::Warm), 1234, 56);
        DetectionRecord::new("10:00:05".to_string(), sample, &result)
    }

    #[test]
    fn csv_line_layout() {
        let line = record(Score::probability(0.87654)).to_string();
        assert_eq!(line, "10:00:05,24.13,51.30,63.04,22.80,1,1.234,0.056,0.8765");
    }

    #[test]
    fn margin_scores_keep_sign() {
        let rec = record(Score::margin(-1.5));
        assert_eq!(rec.label, Label::Normal);
        assert!(rec.to_string().ends_with(",0,1.234,0.056,-1.5000"));
        assert_eq!(Score::margin(-1.5).kind, ScoreKind::Margin);
    }

    #[test]
    fn header_has_one_column_per_field() {
        let line = record(Score::probability(0.1)).to_string();
        assert_eq!(
            DetectionRecord::CSV_HEADER.split(',').count(),
            line.split(',').count()
        );
        assert!(DetectionRecord::CSV_HEADER.starts_with("Time,Temperature,Humidity,Humidity_WeatherStation,"));
    }
}
