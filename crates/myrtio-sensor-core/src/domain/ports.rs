//! Ports implemented by the firmware infrastructure
//!
//! All methods are synchronous and must return quickly: they are called from
//! the controller while it handles an event. Implementations queue the actual
//! work for the task that owns the hardware or the socket.

use super::config::SessionConfig;
use super::entity::{QoS, Rgb};
use super::error::{LedError, PortError};

/// Addressable LED strip
pub trait LedStrip {
    /// Update one pixel in the frame buffer
    fn set_pixel(&mut self, index: usize, color: Rgb) -> Result<(), LedError>;

    /// Push the frame buffer to the strip
    fn refresh(&mut self) -> Result<(), LedError>;

    /// Turn every pixel off and push the frame
    fn clear(&mut self) -> Result<(), LedError>;
}

/// Wi-Fi station control
pub trait LinkControl {
    /// Associate after the station has started
    fn connect(&mut self) -> Result<(), PortError>;

    /// Associate again after the link dropped
    fn reconnect(&mut self) -> Result<(), PortError>;
}

/// MQTT client lifecycle
pub trait MessagingClient {
    /// Create a client for the given session configuration
    fn init(&mut self, session: SessionConfig) -> Result<(), PortError>;

    /// Start the most recently initialized client
    fn start(&mut self) -> Result<(), PortError>;

    fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<(), PortError>;
}

/// Fire-and-forget publishing
pub trait Publisher {
    fn publish(&mut self, topic: &str, payload: &[u8], qos: QoS, retain: bool)
    -> Result<(), PortError>;
}

/// Source of pseudo-random numbers for the synthetic sensors
pub trait Entropy {
    fn next_u32(&mut self) -> u32;
}
