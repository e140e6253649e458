use core::net::Ipv4Addr;

/// Everything the controller reacts to.
///
/// Link events come from the Wi-Fi station, session events from the MQTT
/// client. Both are delivered to one [`EventController`](crate::EventController)
/// in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    /// Station interface is up and ready to associate
    LinkStarted,
    /// Association lost or failed
    LinkDisconnected,
    /// DHCP lease obtained
    AddressAcquired { address: Ipv4Addr },
    /// MQTT session accepted by the broker
    ClientConnected,
    /// MQTT session closed
    ClientDisconnected,
    /// Message delivered on a subscribed topic
    MessageArrived { topic: &'a str, payload: &'a [u8] },
    /// MQTT session failed
    ClientError,
}
