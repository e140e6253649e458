//! # Sensor node core
//!
//! Hardware-independent part of the `MyrtIO` sensor node firmware.
//!
//! The firmware reacts to a small set of lifecycle events (Wi-Fi link, DHCP
//! address, MQTT session) and to control messages that drive the color of a
//! single WS2812 LED. Between those events it periodically publishes synthetic
//! sensor readings.
//!
//! Everything that touches the radio, the TLS stack or the RMT peripheral lives
//! behind the traits in [`domain::ports`], so the sequencing can be driven by
//! synthetic [`domain::event::Event`] values on the host.
//!
//! ## Layers
//!
//! - [`domain`]: entities, events, configuration and port traits.
//! - [`app`]: the event controller, the LED indicator and the sensor sampler.
//! - [`mqtt`]: the broker session loop over a buffered byte stream.
//! - [`tls`]: the TLS handshake with the broker.

#![cfg_attr(not(test), no_std)]

pub mod app;
pub mod domain;
pub mod mqtt;
pub mod tls;

pub use app::{EventController, LedIndicator, Outcome, Sampler};
pub use domain::config::{BrokerConfig, DeviceConfig, ReconnectPolicy, WifiConfig};
pub use domain::entity::{ControlCommand, QoS, Rgb, SensorReading};
pub use domain::event::Event;
