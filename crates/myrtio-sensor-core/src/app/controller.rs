//! Event controller
//!
//! Sequences the node: link started → connect, address acquired → start the
//! MQTT client, client connected → subscribe, control message → LED color.
//! The controller owns the LED indicator and the link and messaging handles,
//! so every event is processed by exactly one owner, one at a time.

use log::{debug, error, info, warn};

use super::led::LedIndicator;
use crate::domain::config::DeviceConfig;
use crate::domain::entity::{ControlCommand, QoS};
use crate::domain::error::HandlerError;
use crate::domain::event::Event;
use crate::domain::ports::{LedStrip, LinkControl, MessagingClient};
use crate::domain::topics::CONTROL_TOPIC;

/// Messaging client lifecycle as seen by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initialized,
    Connected,
    Disconnected,
    Error,
}

/// What the controller did in response to an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    ConnectRequested,
    /// `attempt` counts reconnects since the last acquired address
    ReconnectRequested { attempt: u32 },
    /// Reconnect policy exhausted, the link stays down
    ReconnectSuppressed { attempts: u32 },
    /// First messaging client created and started
    ClientStarted,
    /// Another client was created while the previous one is still live
    ClientReinitialized { clients: u32 },
    /// Address acquired again, the existing client is kept
    ClientReused,
    Subscribed,
    /// Control message applied, `Unknown` payloads light the LED blue
    ColorApplied(ControlCommand),
    ClientErrorLogged,
    Ignored,
}

impl Outcome {
    /// Outcomes that are reported with a warning
    pub const fn is_warning(self) -> bool {
        matches!(
            self,
            Outcome::ColorApplied(ControlCommand::Unknown)
                | Outcome::ClientReinitialized { .. }
                | Outcome::ReconnectSuppressed { .. }
        )
    }
}

pub struct EventController<S, L, M> {
    config: DeviceConfig,
    led: LedIndicator<S>,
    link: L,
    messaging: M,
    state: SessionState,
    clients: u32,
    reconnect_attempts: u32,
}

impl<S, L, M> EventController<S, L, M>
where
    S: LedStrip,
    L: LinkControl,
    M: MessagingClient,
{
    pub fn new(config: DeviceConfig, led: LedIndicator<S>, link: L, messaging: M) -> Self {
        Self {
            config,
            led,
            link,
            messaging,
            state: SessionState::Uninitialized,
            clients: 0,
            reconnect_attempts: 0,
        }
    }

    pub fn handle(&mut self, event: Event<'_>) -> Result<Outcome, HandlerError> {
        match event {
            Event::LinkStarted => {
                self.link.connect()?;
                Ok(Outcome::ConnectRequested)
            }
            Event::LinkDisconnected => self.on_link_disconnected(),
            Event::AddressAcquired { address } => {
                info!("network: got IP {}, connecting to MQTT...", address);
                self.reconnect_attempts = 0;
                self.start_client()
            }
            Event::ClientConnected => {
                info!("mqtt: connected");
                self.state = SessionState::Connected;
                self.messaging.subscribe(CONTROL_TOPIC, QoS::AtMostOnce)?;
                Ok(Outcome::Subscribed)
            }
            Event::ClientDisconnected => {
                debug!("mqtt: disconnected");
                self.state = SessionState::Disconnected;
                Ok(Outcome::Ignored)
            }
            Event::MessageArrived { topic, payload } => self.on_message(topic, payload),
            Event::ClientError => {
                error!("mqtt: client error");
                self.state = SessionState::Error;
                Ok(Outcome::ClientErrorLogged)
            }
        }
    }

    fn on_link_disconnected(&mut self) -> Result<Outcome, HandlerError> {
        if !self.config.reconnect.allows(self.reconnect_attempts) {
            warn!(
                "network: disconnected, giving up after {} reconnect attempts",
                self.reconnect_attempts
            );
            return Ok(Outcome::ReconnectSuppressed {
                attempts: self.reconnect_attempts,
            });
        }

        info!("network: disconnected from Wi-Fi, reconnecting...");
        self.reconnect_attempts += 1;
        self.link.reconnect()?;
        Ok(Outcome::ReconnectRequested {
            attempt: self.reconnect_attempts,
        })
    }

    fn start_client(&mut self) -> Result<Outcome, HandlerError> {
        if cfg!(feature = "single-session") && self.clients > 0 {
            info!("mqtt: client already exists, keeping it");
            return Ok(Outcome::ClientReused);
        }

        // A second address acquisition creates a new client while the previous
        // one is still live. Kept as is and reported, see DESIGN.md.
        self.messaging.init(self.config.session())?;
        self.messaging.start()?;
        self.clients += 1;
        self.state = SessionState::Initialized;

        if self.clients > 1 {
            warn!(
                "mqtt: client re-initialized without releasing the previous one ({} created)",
                self.clients
            );
            return Ok(Outcome::ClientReinitialized {
                clients: self.clients,
            });
        }
        Ok(Outcome::ClientStarted)
    }

    fn on_message(&mut self, topic: &str, payload: &[u8]) -> Result<Outcome, HandlerError> {
        let text = core::str::from_utf8(payload).unwrap_or("<binary>");
        info!("mqtt: message received on topic: {}, message: {}", topic, text);

        if topic != CONTROL_TOPIC {
            return Ok(Outcome::Ignored);
        }

        let command = ControlCommand::from_payload(payload);
        self.led.set_color(command.color())?;
        match command {
            ControlCommand::Increase => info!("led: color GREEN (increase)"),
            ControlCommand::Decrease => info!("led: color RED (decrease)"),
            ControlCommand::Unknown => warn!("led: unknown message: {}", text),
        }
        Ok(Outcome::ColorApplied(command))
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Number of messaging clients created so far
    pub fn clients(&self) -> u32 {
        self.clients
    }

    pub fn led(&self) -> &LedIndicator<S> {
        &self.led
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn messaging(&self) -> &M {
        &self.messaging
    }
}
