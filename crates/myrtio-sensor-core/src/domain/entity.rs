use smart_leds::RGB8;

/// Logical LED color. Physical channel order (GRB) is handled by the driver.
pub type Rgb = RGB8;

pub const GREEN: Rgb = Rgb::new(0, 255, 0);
pub const RED: Rgb = Rgb::new(255, 0, 0);
pub const BLUE: Rgb = Rgb::new(0, 0, 255);

/// Command carried by a payload on the control topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Increase,
    Decrease,
    /// Any payload that is not an exact match of a known command
    Unknown,
}

impl ControlCommand {
    /// Parse a control payload.
    ///
    /// The whole payload must match, byte for byte and case-sensitive.
    /// `b"increase"` is a command, `b"increase "` and `b"Increase"` are not.
    pub fn from_payload(payload: &[u8]) -> Self {
        match payload {
            b"increase" => ControlCommand::Increase,
            b"decrease" => ControlCommand::Decrease,
            _ => ControlCommand::Unknown,
        }
    }

    pub const fn color(self) -> Rgb {
        match self {
            ControlCommand::Increase => GREEN,
            ControlCommand::Decrease => RED,
            ControlCommand::Unknown => BLUE,
        }
    }
}

/// MQTT delivery guarantee
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QoS {
    AtMostOnce,
    AtLeastOnce,
}

/// One of the synthetic sensors published by the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorChannel {
    Temperature,
    Humidity,
    Light,
}

impl SensorChannel {
    pub const ALL: [SensorChannel; 3] = [
        SensorChannel::Temperature,
        SensorChannel::Humidity,
        SensorChannel::Light,
    ];

    /// Inclusive value range of the channel
    pub const fn range(self) -> (u8, u8) {
        match self {
            SensorChannel::Temperature => (10, 60),
            SensorChannel::Humidity | SensorChannel::Light => (0, 100),
        }
    }

    pub const fn topic(self) -> &'static str {
        match self {
            SensorChannel::Temperature => super::topics::TEMPERATURE_TOPIC,
            SensorChannel::Humidity => super::topics::HUMIDITY_TOPIC,
            SensorChannel::Light => super::topics::LIGHT_TOPIC,
        }
    }
}

/// One sampling cycle worth of readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorReading {
    pub temperature: u8,
    pub humidity: u8,
    pub light: u8,
}

impl SensorReading {
    pub const fn value(&self, channel: SensorChannel) -> u8 {
        match channel {
            SensorChannel::Temperature => self.temperature,
            SensorChannel::Humidity => self.humidity,
            SensorChannel::Light => self.light,
        }
    }

    /// Readings paired with their channel, in publish order
    pub fn channels(&self) -> [(SensorChannel, u8); 3] {
        SensorChannel::ALL.map(|channel| (channel, self.value(channel)))
    }
}
