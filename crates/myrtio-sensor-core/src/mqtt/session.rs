use embedded_io_async::{Read, Write};
use log::{trace, warn};
use rand_core::RngCore;
use rust_mqtt::client::client_config::ClientConfig;
use rust_mqtt::client::raw_client::{Event as MqttEvent, RawMqttClient};
use rust_mqtt::packet::v5::publish_packet::QualityOfService;
use rust_mqtt::packet::v5::reason_codes::ReasonCode;

use super::error::SessionFault;
use super::in_flight::InFlight;
use super::link::{FramedLink, LinkHandle};
use crate::domain::entity::QoS;

pub const MAX_PROPERTIES: usize = 5;
/// Topic filters the client matches incoming messages against
const MAX_TOPICS: usize = 1;

type Client<'a, T, R, const N: usize> = RawMqttClient<'a, LinkHandle<'a, T, N>, MAX_PROPERTIES, R>;

/// Packet received from the broker
#[derive(Debug, PartialEq, Eq)]
pub enum Inbound<'a> {
    Message { topic: &'a str, payload: &'a [u8] },
    /// PUBACK for a tracked publish
    Published(u16),
    /// SUBACK for a tracked subscription
    Subscribed(u16),
    Pong,
    /// Acknowledgement nothing was waiting for
    Unmatched,
}

/// One MQTT session on top of a [`FramedLink`]
pub struct BrokerSession<'a, T: Read + Write, R: RngCore, const N: usize> {
    client: Client<'a, T, R, N>,
    link: &'a FramedLink<T, N>,
    in_flight: InFlight,
}

impl<'a, T: Read + Write, R: RngCore, const N: usize> BrokerSession<'a, T, R, N> {
    pub fn new(
        link: &'a FramedLink<T, N>,
        write_buf: &'a mut [u8],
        read_buf: &'a mut [u8],
        config: ClientConfig<'a, MAX_PROPERTIES, R>,
    ) -> Self {
        let write_len = write_buf.len();
        let read_len = read_buf.len();
        Self {
            client: RawMqttClient::new(
                link.handle(),
                write_buf,
                write_len,
                read_buf,
                read_len,
                config,
            ),
            link,
            in_flight: InFlight::new(),
        }
    }

    /// Send CONNECT and wait for the broker to accept it
    pub async fn connect(&mut self) -> Result<(), SessionFault> {
        self.client
            .connect_to_broker()
            .await
            .map_err(SessionFault::Protocol)?;
        self.wait_for_packet().await?;
        match self.client.poll::<MAX_TOPICS>().await {
            Ok(MqttEvent::Connack) => Ok(()),
            Ok(MqttEvent::Disconnect(code)) | Err(code) => Err(SessionFault::Protocol(code)),
            Ok(_) => Err(SessionFault::NotAcknowledged),
        }
    }

    /// Receive more bytes from the broker, safe to drop at any await
    pub async fn fill(&self) -> Result<(), SessionFault> {
        self.link.fill().await?;
        Ok(())
    }

    /// Whether [`Self::next_inbound`] can complete without waiting on the network
    pub async fn packet_ready(&self) -> Result<bool, SessionFault> {
        Ok(self.link.packet_ready().await?)
    }

    /// Parse the next packet and match acknowledgements against the requests
    /// still in flight.
    pub async fn next_inbound(&mut self) -> Result<Inbound<'_>, SessionFault> {
        self.wait_for_packet().await?;
        let event = match self.client.poll::<MAX_TOPICS>().await {
            Ok(event) => event,
            // Delivered, the broker only reports that nobody listens
            Err(ReasonCode::NoMatchingSubscribers) => {
                return Ok(match self.in_flight.settle_oldest() {
                    Some(id) => Inbound::Published(id),
                    None => Inbound::Unmatched,
                });
            }
            Err(code) => return Err(SessionFault::Protocol(code)),
        };

        let inbound = match event {
            MqttEvent::Message(topic, payload) => Inbound::Message { topic, payload },
            MqttEvent::Puback(id) if self.in_flight.puback(id) => Inbound::Published(id),
            MqttEvent::Suback(id) if self.in_flight.suback(id) => Inbound::Subscribed(id),
            MqttEvent::Pingresp if self.in_flight.pingresp() => Inbound::Pong,
            MqttEvent::Disconnect(code) => return Err(SessionFault::Disconnected(code)),
            _ => {
                warn!("mqtt: received a packet nothing was waiting for");
                Inbound::Unmatched
            }
        };
        Ok(inbound)
    }

    /// Send a message and return its packet id.
    ///
    /// A QoS 1 publish stays in flight until its PUBACK is read by
    /// [`Self::next_inbound`].
    pub async fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<u16, SessionFault> {
        let id = self
            .client
            .send_message(topic, payload, mqtt_qos(qos), retain)
            .await
            .map_err(SessionFault::Protocol)?;
        if qos == QoS::AtLeastOnce {
            if let Some(dropped) = self.in_flight.publish_sent(id) {
                warn!("mqtt: no PUBACK for packet {}, giving up on it", dropped);
            }
        }
        trace!("mqtt: published packet {} to {}", id, topic);
        Ok(id)
    }

    pub async fn subscribe(&mut self, topic: &str) -> Result<u16, SessionFault> {
        let mut topics = heapless::Vec::<&str, 1>::new();
        topics.push(topic).unwrap();
        let id = self
            .client
            .subscribe_to_topics(&topics)
            .await
            .map_err(SessionFault::Protocol)?;
        self.in_flight.subscribe_sent(id);
        Ok(id)
    }

    /// Send a keep-alive ping, failing if the last one was never answered
    pub async fn ping(&mut self) -> Result<(), SessionFault> {
        if !self.in_flight.ping_sent() {
            return Err(SessionFault::KeepAliveTimeout);
        }
        self.client
            .send_ping()
            .await
            .map_err(SessionFault::Protocol)
    }

    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    async fn wait_for_packet(&self) -> Result<(), SessionFault> {
        while !self.link.packet_ready().await? {
            self.link.fill().await?;
        }
        Ok(())
    }
}

fn mqtt_qos(qos: QoS) -> QualityOfService {
    match qos {
        QoS::AtMostOnce => QualityOfService::QoS0,
        QoS::AtLeastOnce => QualityOfService::QoS1,
    }
}
