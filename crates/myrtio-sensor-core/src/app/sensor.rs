use core::fmt::Write;

use embassy_time::Duration;
use heapless::String;

use crate::domain::entity::{QoS, SensorChannel, SensorReading};
use crate::domain::ports::{Entropy, Publisher};

/// Time between the starts of two publishing cycles
pub const SENSOR_PERIOD: Duration = Duration::from_millis(5000);

const READING_QOS: QoS = QoS::AtLeastOnce;

/// Synthetic sensor readings drawn from an entropy source
pub struct Sampler<E> {
    entropy: E,
}

impl<E: Entropy> Sampler<E> {
    pub const fn new(entropy: E) -> Self {
        Self { entropy }
    }

    pub fn sample(&mut self) -> SensorReading {
        SensorReading {
            temperature: self.draw(SensorChannel::Temperature),
            humidity: self.draw(SensorChannel::Humidity),
            light: self.draw(SensorChannel::Light),
        }
    }

    fn draw(&mut self, channel: SensorChannel) -> u8 {
        let (min, max) = channel.range();
        scale(self.entropy.next_u32(), min, max)
    }
}

// `raw % span` is below 256, the sum stays within `min..=max`
#[allow(clippy::cast_possible_truncation)]
fn scale(raw: u32, min: u8, max: u8) -> u8 {
    let span = u32::from(max - min) + 1;
    min + (raw % span) as u8
}

/// Decimal representation of a reading
pub fn format_value(value: u8) -> String<15> {
    let mut out = String::new();
    let _ = write!(out, "{}", value);
    out
}

/// Result of one publishing cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub published: u8,
    pub dropped: u8,
}

/// Publish every channel of `reading` once, in channel order.
///
/// Rejected publishes are dropped, never retried.
pub fn publish_reading<P: Publisher>(publisher: &mut P, reading: &SensorReading) -> PublishReport {
    let mut report = PublishReport::default();
    for (channel, value) in reading.channels() {
        let payload = format_value(value);
        match publisher.publish(channel.topic(), payload.as_bytes(), READING_QOS, false) {
            Ok(()) => report.published += 1,
            Err(e) => {
                log::debug!("sensor: {} dropped: {}", channel.topic(), e);
                report.dropped += 1;
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_covers_bounds() {
        assert_eq!(scale(0, 10, 60), 10);
        assert_eq!(scale(50, 10, 60), 60);
        assert_eq!(scale(51, 10, 60), 10);
        assert_eq!(scale(u32::MAX, 0, 100), (u32::MAX % 101) as u8);
    }

    #[test]
    fn format_value_is_decimal() {
        assert_eq!(format_value(0).as_str(), "0");
        assert_eq!(format_value(100).as_str(), "100");
    }
}
