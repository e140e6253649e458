//! Error types of the sensor node

use core::fmt;

/// Configuration could not be built from the provided values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Broker URI does not start with `mqtts://`
    UnsupportedScheme,
    /// Broker URI has no host
    MissingHost,
    /// Broker port is not a number in `1..=65535`
    InvalidPort,
    /// Wi-Fi SSID is empty
    MissingSsid,
    /// Reconnect limit is not a number
    InvalidReconnectLimit,
    /// A value does not fit into its fixed-size buffer
    TooLong(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnsupportedScheme => write!(f, "broker URI must use the mqtts:// scheme"),
            ConfigError::MissingHost => write!(f, "broker URI has no host"),
            ConfigError::InvalidPort => write!(f, "broker URI has an invalid port"),
            ConfigError::MissingSsid => write!(f, "Wi-Fi SSID is empty"),
            ConfigError::InvalidReconnectLimit => write!(f, "reconnect limit is not a number"),
            ConfigError::TooLong(field) => write!(f, "{} is too long", field),
        }
    }
}

/// Trust anchor cannot be used to verify the broker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorError {
    /// Certificate ends inside a DER element
    Truncated,
    /// Certificate is not an X.509 DER structure
    Malformed,
    /// Public key is neither EC nor Ed25519
    UnsupportedKey,
}

impl fmt::Display for AnchorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorError::Truncated => write!(f, "certificate is truncated"),
            AnchorError::Malformed => write!(f, "certificate is not DER encoded X.509"),
            AnchorError::UnsupportedKey => {
                write!(f, "certificate key must be ECDSA or Ed25519, RSA anchors are not supported")
            }
        }
    }
}

/// LED driver failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedError {
    /// Pixel index is outside of the strip
    PixelOutOfRange,
    /// Driver failed to push the frame to the strip
    Write,
}

impl fmt::Display for LedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedError::PixelOutOfRange => write!(f, "pixel index out of range"),
            LedError::Write => write!(f, "failed to write LED frame"),
        }
    }
}

/// Request to the link or messaging layer was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortError {
    /// Messaging session is not connected
    NotConnected,
    /// Session was started before it was initialized
    NotInitialized,
    /// Request queue is full
    QueueFull,
    /// Topic or payload does not fit into the request buffer
    TooLarge,
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortError::NotConnected => write!(f, "session is not connected"),
            PortError::NotInitialized => write!(f, "session is not initialized"),
            PortError::QueueFull => write!(f, "request queue is full"),
            PortError::TooLarge => write!(f, "request does not fit into buffer"),
        }
    }
}

/// Error returned by the event controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerError {
    Led(LedError),
    Port(PortError),
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::Led(e) => write!(f, "LED error: {}", e),
            HandlerError::Port(e) => write!(f, "port error: {}", e),
        }
    }
}

impl From<LedError> for HandlerError {
    fn from(e: LedError) -> Self {
        HandlerError::Led(e)
    }
}

impl From<PortError> for HandlerError {
    fn from(e: PortError) -> Self {
        HandlerError::Port(e)
    }
}
