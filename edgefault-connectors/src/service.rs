//! Detector service
//!
//! Glue between a message transport and a detector: decode each inbound
//! message, run the detector, publish the CSV record. Reset requests
//! rebuild the detector from its factory, so no state survives a reset.

use edgefault_core::TimeSource;
use edgefault_ml::Detector;
use serde::{Deserialize, Serialize};

use crate::{
    payload::{Inbound, PayloadError},
    record::DetectionRecord,
    Connector,
};

/// Published on the output topic whenever the service (re)starts listening
pub const READY_MESSAGE: &str = r#"{"status": "READY"}"#;

/// Topics and identity of a service instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Topic carrying inbound samples and reset requests
    pub input_topic: String,
    /// Topic receiving detection records and ready announcements
    pub output_topic: String,
    pub client_id: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            input_topic: "edgefault/samples".to_string(),
            output_topic: "edgefault/detections".to_string(),
            client_id: "edgefault-detector".to_string(),
        }
    }
}

/// What happened to one inbound message
#[derive(Debug)]
pub enum Outcome {
    /// Sample scored and its record sent
    Published(DetectionRecord),
    /// Message ignored, detector state untouched
    Dropped(PayloadError),
    /// Detector rebuilt from scratch
    Reset,
}

/// Message counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceStats {
    pub processed: u64,
    pub dropped: u64,
    pub resets: u64,
    pub bytes_sent: u64,
}

/// Owns a detector, its factory and the transport it answers on
pub struct DetectorService<D: Detector, C: Connector, T: TimeSource> {
    factory: Box<dyn FnMut() -> D>,
    detector: D,
    connector: C,
    clock: T,
    config: ServiceConfig,
    stats: ServiceStats,
}

impl<D: Detector, C: Connector, T: TimeSource> DetectorService<D, C, T> {
    /// Build the first detector from `factory` and wrap it
    ///
    /// `clock` stamps sample arrivals in milliseconds.
    pub fn new<F>(mut factory: F, connector: C, clock: T, config: ServiceConfig) -> Self
    where
        F: FnMut() -> D + 'static,
    {
        let detector = factory();
        Self {
            factory: Box::new(factory),
            detector,
            connector,
            clock,
            config,
            stats: ServiceStats::default(),
        }
    }

    /// Tell listeners the detector is live
    pub fn announce_ready(&mut self) -> Result<(), C::Error> {
        log::info!("{} ready on {}", self.config.client_id, self.config.input_topic);
        self.send(READY_MESSAGE.as_bytes())
    }

    /// Process one message from the input topic
    ///
    /// Only transport failures are errors. Bad payloads come back as
    /// [`Outcome::Dropped`].
    pub fn handle_message(&mut self, bytes: &[u8]) -> Result<Outcome, C::Error> {
        let (time, sample) = match Inbound::decode(bytes) {
            Ok(Inbound::Sample { time, sample }) => (time, sample),
            Ok(Inbound::Reset) => {
                self.reset();
                self.announce_ready()?;
                return Ok(Outcome::Reset);
            }
            Err(e) => {
                log::debug!("dropping message: {}", e);
                self.stats.dropped += 1;
                return Ok(Outcome::Dropped(e));
            }
        };

        let result = self.detector.process(&sample, self.clock.now());
        self.stats.processed += 1;

        let record = DetectionRecord::new(time, sample, &result);
        self.send(record.to_string().as_bytes())?;
        Ok(Outcome::Published(record))
    }

    /// Replace the detector with a fresh one
    pub fn reset(&mut self) {
        log::info!("reset requested, rebuilding detector");
        self.detector = (self.factory)();
        self.stats.resets += 1;
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), C::Error> {
        self.connector.send(&self.config.output_topic, bytes)?;
        self.stats.bytes_sent += bytes.len() as u64;
        Ok(())
    }

    pub fn stats(&self) -> ServiceStats {
        self.stats
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn connector_mut(&mut self) -> &mut C {
        &mut self.connector
    }
}
