//! Replays JSON sample streams through a service backed by a staged detector

use edgefault_connectors::{
    Connector, ConnectorError, DetectionRecord, DetectorService, Outbox, Outcome, ServiceConfig, READY_MESSAGE,
};
use edgefault_core::{
    constants::{COLD_FEATURE_COUNT, WARM_FEATURE_COUNT},
    DetectorConfig, FixedTime, StageKind, COLD_PROGRAM, WARM_PROGRAM,
};
use edgefault_ml::{LinearModel, Stage, StagedDetector, Standardizer, SvmModel};
use proptest::prelude::*;

static COLD_MEAN: [f32; COLD_FEATURE_COUNT] = [0.0; COLD_FEATURE_COUNT];
static COLD_SCALE: [f32; COLD_FEATURE_COUNT] = [1.0; COLD_FEATURE_COUNT];
static COLD_WEIGHTS: [f32; COLD_FEATURE_COUNT] = [0.0; COLD_FEATURE_COUNT];

static WARM_MEAN: [f32; WARM_FEATURE_COUNT] = [0.0; WARM_FEATURE_COUNT];
static WARM_SCALE: [f32; WARM_FEATURE_COUNT] = [1.0; WARM_FEATURE_COUNT];

/// Slot of the 5-sample mean temperature difference in the warm layout
const TEMPERATURE_DIFF_MEAN: usize = 56;

/// Warm SVM weighting only the summed recent temperature change
static WARM_WEIGHTS: [f32; WARM_FEATURE_COUNT] = {
    let mut w = [0.0; WARM_FEATURE_COUNT];
    w[TEMPERATURE_DIFF_MEAN] = 5.0;
    w
};

type Service = DetectorService<StagedDetector<'static, FixedTime>, Recorder, FixedTime>;

#[derive(Default)]
struct Recorder {
    lines: Vec<String>,
}

impl Connector for Recorder {
    type Error = std::convert::Infallible;

    fn send(&mut self, _topic: &str, data: &[u8]) -> Result<(), Self::Error> {
        self.lines.push(String::from_utf8(data.to_vec()).unwrap_or_default());
        Ok(())
    }

    fn is_connected(&self) -> bool {
        true
    }
}

fn build_detector() -> StagedDetector<'static, FixedTime> {
    let cold = LinearModel::new(Standardizer::new(&COLD_MEAN, &COLD_SCALE), &COLD_WEIGHTS, -2.0);
    // Margin = temperature change over the last five samples minus 3 degrees
    let warm = LinearModel::new(Standardizer::new(&WARM_MEAN, &WARM_SCALE), &WARM_WEIGHTS, -3.0);
    StagedDetector::new(
        Stage::new(COLD_PROGRAM, cold.into()).expect("cold"),
        Stage::new(WARM_PROGRAM, SvmModel::new(warm).into()).expect("warm"),
        DetectorConfig::firmware(),
        FixedTime::new(0),
    )
}

fn service() -> Service {
    DetectorService::new(build_detector, Recorder::default(), FixedTime::new(0), ServiceConfig::default())
}

fn message(i: usize, temperature: f32) -> String {
    format!(
        r#"{{"Time":"t{}","Temperature":{},"Humidity":45.5,"Humidity_WeatherStation":60,"Temperature_WeatherStation":{}}}"#,
        i,
        temperature,
        temperature - 2.0
    )
}

#[test]
fn replay_produces_one_record_per_sample() {
    let mut service = service();
    service.announce_ready().unwrap();

    for i in 0..20 {
        let outcome = service.handle_message(message(i, 21.0).as_bytes()).unwrap();
        assert!(matches!(outcome, Outcome::Published(_)));
    }

    let lines = &service.connector().lines;
    assert_eq!(lines[0], READY_MESSAGE);
    assert_eq!(lines.len(), 21);
    let columns = DetectionRecord::CSV_HEADER.split(',').count();
    for (i, line) in lines[1..].iter().enumerate() {
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), columns);
        assert_eq!(fields[0], format!("t{}", i));
        assert_eq!(fields[1], "21.00");
        assert_eq!(fields[3], "60.00");
        assert_eq!(fields[4], "19.00");
        assert_eq!(fields[5], "0");
    }
    // Warm records carry the SVM margin, cold ones a probability
    assert!(lines[1].ends_with(",0.1192"));
    assert!(lines[20].ends_with(",-3.0000"));
}

#[test]
fn jump_in_warm_stage_is_flagged() {
    let mut service = service();
    for i in 0..16 {
        service.handle_message(message(i, 21.0).as_bytes()).unwrap();
    }
    assert_eq!(
        WARM_PROGRAM.specs()[TEMPERATURE_DIFF_MEAN].to_string(),
        "rolling_mean_5_speed_change_Temperature"
    );
    let Outcome::Published(record) = service.handle_message(message(16, 25.5).as_bytes()).unwrap() else {
        panic!("expected a record");
    };
    assert_eq!(record.label.as_u8(), 1);
    assert!((record.score - 1.5).abs() < 1e-4);
}

#[test]
fn dropped_messages_do_not_advance_warmup() {
    let mut service = service();
    for i in 0..14 {
        service.handle_message(message(i, 21.0).as_bytes()).unwrap();
        service.handle_message(b"{\"Temperature\": null}").unwrap();
    }
    assert_eq!(service.stats().dropped, 14);
    assert_eq!(service.detector().samples_seen(), 14);
    assert_eq!(service.detector().stage(), StageKind::Warm);
}

#[test]
fn reset_returns_to_cold_stage() {
    let mut service = service();
    for i in 0..20 {
        service.handle_message(message(i, 21.0).as_bytes()).unwrap();
    }
    assert_eq!(service.detector().stage(), StageKind::Warm);

    let outcome = service.handle_message(br#"{"reset": true}"#).unwrap();
    assert!(matches!(outcome, Outcome::Reset));
    assert_eq!(service.detector().samples_seen(), 0);
    assert_eq!(service.detector().stage(), StageKind::Cold);
    assert_eq!(service.connector().lines.last().map(String::as_str), Some(READY_MESSAGE));
}

#[test]
fn outbox_backpressure_surfaces_after_processing() {
    let mut service =
        DetectorService::new(build_detector, Outbox::new(2), FixedTime::new(0), ServiceConfig::default());
    service.handle_message(message(0, 21.0).as_bytes()).unwrap();
    service.handle_message(message(1, 21.0).as_bytes()).unwrap();

    // The sample still counts even though its record could not be queued
    let err = service.handle_message(message(2, 21.0).as_bytes()).unwrap_err();
    assert!(matches!(err, ConnectorError::BufferFull));
    assert_eq!(service.detector().samples_seen(), 3);

    let sent: Vec<_> = service.connector_mut().drain().collect();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|e| e.topic == "edgefault/detections"));
    assert!(sent[1].payload.starts_with(b"t1,"));
}

proptest! {
    #[test]
    fn arbitrary_bytes_never_touch_state(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let mut service = service();
        let outcome = service.handle_message(&bytes).unwrap();
        if let Outcome::Dropped(_) = outcome {
            prop_assert_eq!(service.detector().samples_seen(), 0);
            prop_assert!(service.connector().lines.is_empty());
        }
    }
}
