//! Broker session over any byte stream
//!
//! [`FramedLink`] buffers the stream so a whole MQTT packet is in memory before
//! the client parses it, and [`BrokerSession`] drives a single client from one
//! loop: reads, publishes, subscriptions and keep-alive pings interleave freely
//! and every acknowledgement is matched against what is still outstanding.

mod error;
mod frame;
mod in_flight;
mod link;
mod session;

pub use error::{LinkError, SessionFault};
pub use frame::{FrameError, packet_len};
pub use in_flight::{InFlight, MAX_IN_FLIGHT};
pub use link::{FramedLink, LinkHandle};
pub use session::{BrokerSession, Inbound, MAX_PROPERTIES};
