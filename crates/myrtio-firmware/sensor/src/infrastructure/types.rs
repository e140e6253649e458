use core::net::Ipv4Addr;
use core::sync::atomic::AtomicBool;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use heapless::{String, Vec};
use myrtio_sensor_core::domain::config::SessionConfig;
use myrtio_sensor_core::{Event, EventController, QoS};

use crate::infrastructure::adapters::{LinkRequester, MessagingAdapter};
use crate::infrastructure::drivers::EspLedStrip;

const EVENT_QUEUE_DEPTH: usize = 8;
const SESSION_QUEUE_DEPTH: usize = 4;
const OUTBOX_DEPTH: usize = 6;

pub(crate) const MAX_TOPIC_LEN: usize = 64;
/// Longer payloads are truncated when copied into an event
pub(crate) const MAX_EVENT_PAYLOAD: usize = 128;
pub(crate) const MAX_OUTBOUND_PAYLOAD: usize = 16;

pub(crate) type Topic = String<MAX_TOPIC_LEN>;

pub(crate) type SensorController =
    EventController<EspLedStrip<'static>, LinkRequester, MessagingAdapter>;

/// Owned copy of an [`Event`], so it can cross a channel.
#[derive(Debug, Clone)]
pub(crate) enum OwnedEvent {
    LinkStarted,
    LinkDisconnected,
    AddressAcquired(Ipv4Addr),
    ClientConnected,
    ClientDisconnected,
    MessageArrived {
        topic: Topic,
        payload: Vec<u8, MAX_EVENT_PAYLOAD>,
    },
    ClientError,
}

impl OwnedEvent {
    pub(crate) fn message(topic: &str, payload: &[u8]) -> Self {
        let mut owned_topic = Topic::new();
        for c in topic.chars() {
            if owned_topic.push(c).is_err() {
                break;
            }
        }
        let len = payload.len().min(MAX_EVENT_PAYLOAD);
        let mut owned_payload = Vec::new();
        let _ = owned_payload.extend_from_slice(&payload[..len]);

        OwnedEvent::MessageArrived {
            topic: owned_topic,
            payload: owned_payload,
        }
    }

    pub(crate) fn as_event(&self) -> Event<'_> {
        match self {
            OwnedEvent::LinkStarted => Event::LinkStarted,
            OwnedEvent::LinkDisconnected => Event::LinkDisconnected,
            OwnedEvent::AddressAcquired(address) => Event::AddressAcquired { address: *address },
            OwnedEvent::ClientConnected => Event::ClientConnected,
            OwnedEvent::ClientDisconnected => Event::ClientDisconnected,
            OwnedEvent::MessageArrived { topic, payload } => Event::MessageArrived {
                topic: topic.as_str(),
                payload: payload.as_slice(),
            },
            OwnedEvent::ClientError => Event::ClientError,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LinkRequest {
    Connect,
    Reconnect,
}

#[derive(Debug, Clone)]
pub(crate) enum SessionCommand {
    /// Open a session, dropping the current one if any
    Start(SessionConfig),
    Subscribe { topic: Topic, qos: QoS },
}

#[derive(Debug, Clone)]
pub(crate) struct OutboundMessage {
    pub topic: Topic,
    pub payload: Vec<u8, MAX_OUTBOUND_PAYLOAD>,
    pub qos: QoS,
    pub retain: bool,
}

/// Lifecycle events consumed by the controller task
pub(crate) static EVENTS: Channel<CriticalSectionRawMutex, OwnedEvent, EVENT_QUEUE_DEPTH> =
    Channel::new();

/// Association requests for the Wi-Fi task
pub(crate) static LINK_REQUESTS: Signal<CriticalSectionRawMutex, LinkRequest> = Signal::new();

/// Lifecycle requests for the MQTT session task
pub(crate) static SESSION_COMMANDS: Channel<
    CriticalSectionRawMutex,
    SessionCommand,
    SESSION_QUEUE_DEPTH,
> = Channel::new();

/// Messages waiting to be published by the MQTT session task
pub(crate) static OUTBOX: Channel<CriticalSectionRawMutex, OutboundMessage, OUTBOX_DEPTH> =
    Channel::new();

/// Set while the broker has accepted the session
pub(crate) static SESSION_CONNECTED: AtomicBool = AtomicBool::new(false);

#[macro_export]
// Create a static cell for a given type and value
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        #[deny(unused_attributes)]
        let x = STATIC_CELL.uninit().write(($val));
        x
    }};
}
