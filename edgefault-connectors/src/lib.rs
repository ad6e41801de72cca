//! Message-Broker Connectors for EdgeFault Detectors
//!
//! ## Overview
//!
//! The deployed detector sits on a publish/subscribe broker. Samples arrive
//! as JSON on an input topic, one CSV detection record goes back per sample
//! on an output topic, and a `{"reset": true}` message wipes the detector.
//!
//! ```text
//!  replay tool ──JSON──▶ input topic ──▶ DetectorService ──CSV──▶ output topic
//!                                          │
//!                                          ├─ Inbound::decode
//!                                          ├─ Detector::process
//!                                          └─ DetectionRecord (Display)
//! ```
//!
//! ## Message Contract
//!
//! | Direction | Payload                                  |
//! |-----------|------------------------------------------|
//! | in        | `{"Time": .., "Temperature": .., ...}`   |
//! | in        | `{"reset": true}`                        |
//! | out       | `Time,Temperature,...,Label,...,Score`   |
//! | out       | `{"status": "READY"}` after (re)connect  |
//!
//! Malformed messages are dropped without touching detector state.
//!
//! ## Logging
//!
//! This crate always builds with `std` and a non-optional `log`, so it
//! calls `log::info!`/`log::debug!` directly. The feature-gated wrappers
//! only exist in the `no_std`-capable core and ml crates.
//!
//! ## Transports
//!
//! [`DetectorService`] only needs something implementing [`Connector`].
//! The broker client itself (connection, subscription, reconnects) belongs
//! to the host application, which forwards each input-topic payload to
//! [`DetectorService::handle_message`] and calls
//! [`DetectorService::announce_ready`] after every (re)connect. When that
//! client runs on its own loop, [`Outbox`] buffers outgoing messages for it.
//!
//! ```rust
//! use edgefault_connectors::{Connector, DetectorService, Outcome, ServiceConfig};
//! use edgefault_core::{FixedTime, RawSample, Timestamp};
//! use edgefault_ml::{Detector, Score, ScoreResult};
//!
//! struct AlwaysNormal;
//! impl Detector for AlwaysNormal {
//!     fn process(&mut self, _: &RawSample, _: Timestamp) -> ScoreResult {
//!         ScoreResult::new(Score::probability(0.1), None, 0, 0)
//!     }
//! }
//!
//! struct Stdout;
//! impl Connector for Stdout {
//!     type Error = std::io::Error;
//!     fn send(&mut self, topic: &str, data: &[u8]) -> Result<(), Self::Error> {
//!         println!("{} {}", topic, String::from_utf8_lossy(data));
//!         Ok(())
//!     }
//!     fn is_connected(&self) -> bool { true }
//! }
//!
//! let mut service = DetectorService::new(|| AlwaysNormal, Stdout, FixedTime::new(0), ServiceConfig::default());
//! service.announce_ready()?;
//! let outcome = service.handle_message(br#"{"Time":"t","Temperature":1,"Humidity":2,
//!     "Humidity_WeatherStation":3,"Temperature_WeatherStation":4}"#)?;
//! assert!(matches!(outcome, Outcome::Published(_)));
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod outbox;
pub mod payload;
pub mod record;
pub mod service;

// Re-export common types
pub use outbox::{Envelope, Outbox};
pub use payload::{Inbound, PayloadError, PayloadResult};
pub use record::DetectionRecord;
pub use service::{DetectorService, Outcome, ServiceConfig, ServiceStats, READY_MESSAGE};

use thiserror::Error;

/// Common connector errors
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Not connected")]
    NotConnected,

    #[error("Buffer full")]
    BufferFull,
}

/// Trait for all message transports
pub trait Connector {
    type Error;

    /// Publish `data` on `topic`
    fn send(&mut self, topic: &str, data: &[u8]) -> Result<(), Self::Error>;

    /// Check if connected
    fn is_connected(&self) -> bool;
}
