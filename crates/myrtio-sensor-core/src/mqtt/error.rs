use core::fmt;

use embedded_io_async::ErrorKind;
use rust_mqtt::packet::v5::reason_codes::ReasonCode;

/// Failure of the buffered connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    Io(ErrorKind),
    /// Peer closed the connection
    Closed,
    /// Packet does not fit into the receive buffer
    Overflow,
    /// Packet header cannot be parsed
    Malformed,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::Io(kind) => write!(f, "I/O error: {:?}", kind),
            LinkError::Closed => write!(f, "connection closed by broker"),
            LinkError::Overflow => write!(f, "packet exceeds receive buffer"),
            LinkError::Malformed => write!(f, "malformed packet header"),
        }
    }
}

/// Reason a broker session ended
#[derive(Debug)]
pub enum SessionFault {
    Link(LinkError),
    /// Client rejected a packet or the broker refused a request
    Protocol(ReasonCode),
    /// Broker closed the session
    Disconnected(ReasonCode),
    /// First packet after connect was not a CONNACK
    NotAcknowledged,
    /// Previous ping was never answered
    KeepAliveTimeout,
}

impl fmt::Display for SessionFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionFault::Link(e) => write!(f, "link error: {}", e),
            SessionFault::Protocol(code) => write!(f, "MQTT error: {:?}", code),
            SessionFault::Disconnected(code) => write!(f, "disconnected by broker: {:?}", code),
            SessionFault::NotAcknowledged => write!(f, "broker did not acknowledge connect"),
            SessionFault::KeepAliveTimeout => write!(f, "broker did not answer ping"),
        }
    }
}

impl From<LinkError> for SessionFault {
    fn from(e: LinkError) -> Self {
        SessionFault::Link(e)
    }
}
