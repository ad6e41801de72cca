//! Common test utilities and data generators for integration tests
//!
//! Provides deterministic sensor streams shaped like the deployment data:
//! indoor temperature/humidity plus a nearby weather station, sampled every
//! few seconds, with optional fault injection.

#![allow(dead_code)]

use edgefault_core::{time::Timestamp, RawSample};

/// One generated reading with its arrival time
#[derive(Debug, Clone, Copy)]
pub struct TimedSample {
    pub arrival: Timestamp,
    pub sample: RawSample,
}

/// Kinds of sensor fault the generator can inject
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fault {
    /// Indoor temperature reading jumps by the given offset
    Spike(f32),
    /// Indoor humidity freezes at its last value
    Stuck,
}

/// Test data generator for realistic sensor scenarios
pub struct TestDataGenerator {
    seed: u32,
    interval_ms: u64,
    next_arrival: Timestamp,
    step: u32,
    last_humidity: f32,
}

impl TestDataGenerator {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            seed: 42,
            interval_ms,
            next_arrival: 0,
            step: 0,
            last_humidity: 55.0,
        }
    }

    /// Next sample, optionally with a fault applied
    pub fn next(&mut self, fault: Option<Fault>) -> TimedSample {
        let phase = self.step as f32 * 0.05;
        let temperature = 24.0 + 2.0 * phase.sin() + self.noise(0.1);
        let station_temperature = 22.5 + 2.5 * phase.sin() + self.noise(0.2);

        // Humidity moves opposite to temperature
        let mut humidity = 55.0 - 2.0 * (temperature - 24.0) + self.noise(0.5);
        let station_humidity = 60.0 - 2.5 * (station_temperature - 22.5) + self.noise(1.0);

        let mut readings = [temperature, humidity, station_temperature, station_humidity];
        match fault {
            Some(Fault::Spike(offset)) => readings[0] += offset,
            Some(Fault::Stuck) => {
                humidity = self.last_humidity;
                readings[1] = humidity;
            }
            None => {}
        }
        self.last_humidity = humidity;

        let arrival = self.next_arrival;
        self.next_arrival += self.interval_ms;
        self.step += 1;

        TimedSample {
            arrival,
            sample: RawSample::try_new(readings).expect("generated readings are finite"),
        }
    }

    /// `n` clean samples
    pub fn series(&mut self, n: usize) -> Vec<TimedSample> {
        (0..n).map(|_| self.next(None)).collect()
    }

    fn noise(&mut self, amplitude: f32) -> f32 {
        self.seed = self.seed.wrapping_mul(1664525).wrapping_add(1013904223);
        let uniform = (self.seed as f32) / (u32::MAX as f32);
        (uniform - 0.5) * 2.0 * amplitude
    }
}

/// `n` identical samples one second apart
pub fn constant_series(value: f32, n: usize) -> Vec<TimedSample> {
    (0..n)
        .map(|i| TimedSample {
            arrival: i as Timestamp * 1000,
            sample: RawSample::try_new([value; 4]).expect("finite"),
        })
        .collect()
}
