//! Input channels and raw samples
//!
//! A sample is one reading of every input channel taken at the same
//! instant. Channel indices are fixed: the trained models and feature
//! tables address inputs by these positions.

use crate::errors::{SampleError, SampleResult};
use core::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of input channels per sample
pub const NUM_CHANNELS: usize = 4;

/// Input channel enumeration
///
/// Discriminants are the slot positions inside [`RawSample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Channel {
    Temperature = 0,
    Humidity = 1,
    TemperatureWeatherStation = 2,
    HumidityWeatherStation = 3,
}

impl Channel {
    /// All channels in slot order
    pub const ALL: [Channel; NUM_CHANNELS] = [
        Channel::Temperature,
        Channel::Humidity,
        Channel::TemperatureWeatherStation,
        Channel::HumidityWeatherStation,
    ];

    /// Slot position of this channel
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Channel for a slot position
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Channel::Temperature),
            1 => Some(Channel::Humidity),
            2 => Some(Channel::TemperatureWeatherStation),
            3 => Some(Channel::HumidityWeatherStation),
            _ => None,
        }
    }

    /// Field name used by the message payloads and training data
    pub const fn name(&self) -> &'static str {
        match self {
            Channel::Temperature => "Temperature",
            Channel::Humidity => "Humidity",
            Channel::TemperatureWeatherStation => "Temperature_WeatherStation",
            Channel::HumidityWeatherStation => "Humidity_WeatherStation",
        }
    }
}

/// One validated reading of every channel
///
/// Construction through [`RawSample::try_new`] guarantees every value is
/// finite, so nothing downstream has to re-check.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RawSample {
    values: [f32; NUM_CHANNELS],
}

impl RawSample {
    /// Build a sample, rejecting NaN and infinite readings
    pub fn try_new(values: [f32; NUM_CHANNELS]) -> SampleResult<Self> {
        if let Some(channel) = values.iter().position(|v| !v.is_finite()) {
            return Err(SampleError::NonFinite { channel });
        }
        Ok(Self { values })
    }

    /// Reading of one channel
    pub fn get(&self, channel: Channel) -> f32 {
        self.values[channel.index()]
    }

    /// Readings in slot order
    pub fn values(&self) -> &[f32; NUM_CHANNELS] {
        &self.values
    }
}

impl Index<Channel> for RawSample {
    type Output = f32;

    fn index(&self, channel: Channel) -> &f32 {
        &self.values[channel.index()]
    }
}
