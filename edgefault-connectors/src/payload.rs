//! Inbound message decoding
//!
//! Samples arrive as flat JSON objects:
//!
//! ```json
//! {"Time": "2024-03-01 10:00:05", "Temperature": 24.1, "Humidity": 51.3,
//!  "Humidity_WeatherStation": 63.0, "Temperature_WeatherStation": 22.8}
//! ```
//!
//! `Time` is an opaque label echoed back in the result record; anything
//! other than a string reads as empty. Every channel must be a finite
//! number. `{"reset": true}` asks the service to rebuild its detector.

use edgefault_core::{Channel, RawSample, SampleError, NUM_CHANNELS};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Why a message was not turned into a sample
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Field '{0}' is missing or not a number")]
    MissingField(&'static str),

    #[error(transparent)]
    Sample(#[from] SampleError),
}

pub type PayloadResult<T> = Result<T, PayloadError>;

/// A decoded inbound message
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// A reading of every channel with its time label
    Sample { time: String, sample: RawSample },
    /// Discard all detector state
    Reset,
}

#[derive(Deserialize)]
struct Message {
    #[serde(default)]
    reset: Option<Value>,
    #[serde(rename = "Time", default)]
    time: Option<Value>,
    #[serde(rename = "Temperature", default)]
    temperature: Option<Value>,
    #[serde(rename = "Humidity", default)]
    humidity: Option<Value>,
    #[serde(rename = "Temperature_WeatherStation", default)]
    temperature_ws: Option<Value>,
    #[serde(rename = "Humidity_WeatherStation", default)]
    humidity_ws: Option<Value>,
}

impl Message {
    fn field(&self, channel: Channel) -> &Option<Value> {
        match channel {
            Channel::Temperature => &self.temperature,
            Channel::Humidity => &self.humidity,
            Channel::TemperatureWeatherStation => &self.temperature_ws,
            Channel::HumidityWeatherStation => &self.humidity_ws,
        }
    }
}

impl Inbound {
    /// Decode one message body
    pub fn decode(bytes: &[u8]) -> PayloadResult<Self> {
        let message: Message = serde_json::from_slice(bytes)?;

        if matches!(message.reset, Some(Value::Bool(true))) {
            return Ok(Inbound::Reset);
        }

        let mut values = [0.0f32; NUM_CHANNELS];
        for channel in Channel::ALL {
            let value = message
                .field(channel)
                .as_ref()
                .and_then(Value::as_f64)
                .ok_or(PayloadError::MissingField(channel.name()))?;
            values[channel.index()] = value as f32;
        }

        let time = match message.time {
            Some(Value::String(label)) => label,
            _ => String::new(),
        };

        Ok(Inbound::Sample { time, sample: RawSample::try_new(values)? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{"Time":"10:00:05","Temperature":24.1,"Humidity":51.3,
        "Humidity_WeatherStation":63.0,"Temperature_WeatherStation":22.8}"#;

    #[test]
    fn decodes_in_channel_order() {
        match Inbound::decode(FULL.as_bytes()).unwrap() {
            Inbound::Sample { time, sample } => {
                assert_eq!(time, "10:00:05");
                assert_eq!(sample.values(), &[24.1, 51.3, 22.8, 63.0]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn reset_wins_over_fields() {
        assert_eq!(Inbound::decode(br#"{"reset": true}"#).unwrap(), Inbound::Reset);
        let both = br#"{"reset": true, "Temperature": 1.0}"#;
        assert_eq!(Inbound::decode(both).unwrap(), Inbound::Reset);
    }

    #[test]
    fn false_reset_is_not_a_reset() {
        let err = Inbound::decode(br#"{"reset": false}"#).unwrap_err();
        assert!(matches!(err, PayloadError::MissingField("Temperature")));
    }

    #[test]
    fn missing_time_reads_empty() {
        let body = r#"{"Temperature":1,"Humidity":2,"Humidity_WeatherStation":3,"Temperature_WeatherStation":4}"#;
        match Inbound::decode(body.as_bytes()).unwrap() {
            Inbound::Sample { time, .. } => assert!(time.is_empty()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn numeric_time_reads_empty() {
        let body = FULL.replace("\"10:00:05\"", "1700000000");
        match Inbound::decode(body.as_bytes()).unwrap() {
            Inbound::Sample { time, .. } => assert!(time.is_empty()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn missing_or_textual_channel_rejected() {
        let body = FULL.replace("\"Humidity\":51.3,", "");
        assert!(matches!(
            Inbound::decode(body.as_bytes()),
            Err(PayloadError::MissingField("Humidity"))
        ));

        let body = FULL.replace("24.1", "\"24.1\"");
        assert!(matches!(
            Inbound::decode(body.as_bytes()),
            Err(PayloadError::MissingField("Temperature"))
        ));
    }

    #[test]
    fn overflowing_value_is_not_finite() {
        let body = FULL.replace("63.0", "1e300");
        assert!(matches!(
            Inbound::decode(body.as_bytes()),
            Err(PayloadError::Sample(SampleError::NonFinite { channel: 3 }))
        ));
    }

    #[test]
    fn garbage_is_a_json_error() {
        assert!(matches!(Inbound::decode(b"temp=24"), Err(PayloadError::Json(_))));
    }
}
