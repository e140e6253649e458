use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_io_async::{ErrorKind, ErrorType, Read, Write};
use myrtio_sensor_core::app::EventController;
use myrtio_sensor_core::domain::config::SessionConfig;
use myrtio_sensor_core::domain::error::{LedError, PortError};
use myrtio_sensor_core::domain::ports::{
    Entropy, LedStrip, LinkControl, MessagingClient, Publisher,
};
use myrtio_sensor_core::{
    BrokerConfig, DeviceConfig, LedIndicator, QoS, ReconnectPolicy, Rgb, WifiConfig,
};

pub(crate) static TRUST_ANCHOR: &[u8] = b"test-root-ca";

pub(crate) type TestController = EventController<RecordingStrip, RecordingLink, RecordingMessaging>;

#[derive(Debug, Default)]
pub(crate) struct RecordingStrip {
    pub frame: [Rgb; 1],
    pub refreshes: u32,
    pub clears: u32,
}

impl LedStrip for RecordingStrip {
    fn set_pixel(&mut self, index: usize, color: Rgb) -> Result<(), LedError> {
        let pixel = self.frame.get_mut(index).ok_or(LedError::PixelOutOfRange)?;
        *pixel = color;
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), LedError> {
        self.refreshes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), LedError> {
        self.frame = [Rgb::default(); 1];
        self.clears += 1;
        Ok(())
    }
}

/// Strip whose driver rejects every frame
#[derive(Debug, Default)]
pub(crate) struct FailingStrip;

impl LedStrip for FailingStrip {
    fn set_pixel(&mut self, _index: usize, _color: Rgb) -> Result<(), LedError> {
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), LedError> {
        Err(LedError::Write)
    }

    fn clear(&mut self) -> Result<(), LedError> {
        Err(LedError::Write)
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingLink {
    pub connects: u32,
    pub reconnects: u32,
}

impl LinkControl for RecordingLink {
    fn connect(&mut self) -> Result<(), PortError> {
        self.connects += 1;
        Ok(())
    }

    fn reconnect(&mut self) -> Result<(), PortError> {
        self.reconnects += 1;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingMessaging {
    pub inits: Vec<SessionConfig>,
    pub starts: u32,
    pub subscriptions: Vec<(String, QoS)>,
    pending: Option<SessionConfig>,
}

impl MessagingClient for RecordingMessaging {
    fn init(&mut self, session: SessionConfig) -> Result<(), PortError> {
        self.inits.push(session.clone());
        self.pending = Some(session);
        Ok(())
    }

    fn start(&mut self) -> Result<(), PortError> {
        self.pending.take().ok_or(PortError::NotInitialized)?;
        self.starts += 1;
        Ok(())
    }

    fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<(), PortError> {
        self.subscriptions.push((topic.to_owned(), qos));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Published {
    pub topic: String,
    pub payload: Vec<u8>,
    pub qos: QoS,
    pub retain: bool,
}

#[derive(Debug, Default)]
pub(crate) struct RecordingPublisher {
    pub connected: bool,
    pub messages: Vec<Published>,
}

impl RecordingPublisher {
    pub fn connected() -> Self {
        Self {
            connected: true,
            messages: Vec::new(),
        }
    }
}

impl Publisher for RecordingPublisher {
    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(), PortError> {
        if !self.connected {
            return Err(PortError::NotConnected);
        }
        self.messages.push(Published {
            topic: topic.to_owned(),
            payload: payload.to_vec(),
            qos,
            retain,
        });
        Ok(())
    }
}

/// Replays a fixed list of values, wrapping around
pub(crate) struct ScriptedEntropy {
    values: Vec<u32>,
    next: usize,
}

impl ScriptedEntropy {
    pub fn new(values: &[u32]) -> Self {
        Self {
            values: values.to_vec(),
            next: 0,
        }
    }
}

impl Entropy for ScriptedEntropy {
    fn next_u32(&mut self) -> u32 {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}

/// xorshift32, enough to spread values over the whole `u32` range
pub(crate) struct XorShift(pub u32);

impl Entropy for XorShift {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }
}

pub(crate) fn device_config(reconnect: ReconnectPolicy) -> DeviceConfig {
    DeviceConfig {
        wifi: WifiConfig::new("test-ssid", "test-passphrase").unwrap(),
        broker: BrokerConfig::new("mqtts://broker.example.com", "sensor", "secret").unwrap(),
        trust_anchor: TRUST_ANCHOR,
        reconnect,
    }
}

pub(crate) fn controller_with(reconnect: ReconnectPolicy) -> TestController {
    EventController::new(
        device_config(reconnect),
        LedIndicator::new(RecordingStrip::default()),
        RecordingLink::default(),
        RecordingMessaging::default(),
    )
}

pub(crate) fn controller() -> TestController {
    controller_with(ReconnectPolicy::Unlimited)
}

#[derive(Debug, Default)]
struct StreamState {
    inbound: VecDeque<u8>,
    sent: Vec<u8>,
    closed: bool,
}

/// Broker end of a connection, fed by the test.
///
/// Like a socket, a read with nothing to deliver waits until it is dropped.
#[derive(Debug, Clone, Default)]
pub(crate) struct BrokerStream {
    state: Rc<RefCell<StreamState>>,
}

impl BrokerStream {
    pub fn push(&self, bytes: &[u8]) {
        self.state.borrow_mut().inbound.extend(bytes.iter().copied());
    }

    pub fn close(&self) {
        self.state.borrow_mut().closed = true;
    }

    pub fn sent(&self) -> Vec<u8> {
        self.state.borrow().sent.clone()
    }
}

impl ErrorType for BrokerStream {
    type Error = ErrorKind;
}

impl Read for BrokerStream {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, ErrorKind> {
        let idle = {
            let state = self.state.borrow();
            state.inbound.is_empty() && !state.closed
        };
        if idle {
            core::future::pending::<()>().await;
        }

        let mut state = self.state.borrow_mut();
        let count = buf.len().min(state.inbound.len());
        for (slot, byte) in buf.iter_mut().zip(state.inbound.drain(..count)) {
            *slot = byte;
        }
        Ok(count)
    }
}

impl Write for BrokerStream {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, ErrorKind> {
        self.state.borrow_mut().sent.extend_from_slice(buf);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), ErrorKind> {
        Ok(())
    }
}
