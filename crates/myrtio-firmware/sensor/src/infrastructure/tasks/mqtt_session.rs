//! MQTT session task
//!
//! Owns the TLS connection to the broker. Sessions are opened on request of
//! the controller, messages from the broker are turned into events and queued
//! publishes are sent while the session is up.

use core::sync::atomic::Ordering;

use embassy_futures::select::{Either, Either4, select, select4};
use embassy_net::Stack;
use embassy_net::tcp::{ConnectError, TcpSocket};
use embassy_time::{Duration, Ticker, Timer};
use embedded_tls::{TlsConnection, TlsError};
use log::{debug, error, info, trace, warn};
use myrtio_sensor_core::QoS;
use myrtio_sensor_core::domain::config::SessionConfig;
use myrtio_sensor_core::mqtt::{BrokerSession, FramedLink, Inbound, MAX_PROPERTIES, SessionFault};
use myrtio_sensor_core::tls::{BrokerCipherSuite, open_broker_tls};
use rust_mqtt::{
    client::client_config::{ClientConfig as MqttClientConfig, MqttVersion::MQTTv5},
    packet::v5::publish_packet::QualityOfService,
    utils::rng_generator::CountingRng,
};

use crate::infrastructure::drivers::{FirmwareClock, HardwareRng, resolve_host};
use crate::infrastructure::types::{
    EVENTS, OUTBOX, OutboundMessage, OwnedEvent, SESSION_COMMANDS, SESSION_CONNECTED,
    SessionCommand, Topic,
};

const MQTT_BUF_SIZE: usize = 1024;
const TCP_BUF_SIZE: usize = 4096;
// Largest TLS record plus header and tag
const TLS_READ_BUF_SIZE: usize = 16640;
const TLS_WRITE_BUF_SIZE: usize = 4096;

const KEEP_ALIVE_SECS: u16 = 60;
const SOCKET_TIMEOUT: Duration = Duration::from_secs(90);
/// Delay before a failed session is opened again
const RECONNECT_DELAY: Duration = Duration::from_secs(10);
/// Every subscription of the node is at most once
const SUBSCRIBE_QOS: QoS = QoS::AtMostOnce;

type BrokerConnection<'a> = TlsConnection<'a, TcpSocket<'a>, BrokerCipherSuite>;
type BrokerLink<'a> = FramedLink<BrokerConnection<'a>, MQTT_BUF_SIZE>;

#[derive(Debug)]
enum SessionError {
    Dns,
    Tcp(ConnectError),
    Tls(TlsError),
    Mqtt(SessionFault),
}

impl core::fmt::Display for SessionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SessionError::Dns => write!(f, "broker host could not be resolved"),
            SessionError::Tcp(e) => write!(f, "TCP connect failed: {:?}", e),
            SessionError::Tls(e) => write!(f, "TLS handshake failed: {:?}", e),
            SessionError::Mqtt(e) => write!(f, "{}", e),
        }
    }
}

impl From<SessionFault> for SessionError {
    fn from(e: SessionFault) -> Self {
        SessionError::Mqtt(e)
    }
}

/// Step picked by one round of the session loop
enum Step {
    Restart(SessionConfig),
    Subscribe(Topic, QoS),
    Publish(OutboundMessage),
    Ping,
}

/// Background task running the MQTT session
///
/// Waits for the first start request, then keeps the session alive. A new
/// start request replaces the running session, a failed session is opened
/// again after [`RECONNECT_DELAY`].
#[embassy_executor::task]
pub(crate) async fn mqtt_session_task(stack: Stack<'static>, client_id: &'static str) {
    info!("mqtt: client id: {}", client_id);
    let mut rng = HardwareRng::new();
    let mut session = wait_for_start().await;

    loop {
        match run_session(stack, &mut rng, client_id, &session).await {
            Ok(next) => {
                warn!("mqtt: dropping current session for a new client");
                close_session().await;
                session = next;
            }
            Err(e) => {
                error!("mqtt: session failed: {}", e);
                EVENTS.send(OwnedEvent::ClientError).await;
                close_session().await;

                info!("mqtt: reconnecting in {}s", RECONNECT_DELAY.as_secs());
                let retry = select(Timer::after(RECONNECT_DELAY), wait_for_start()).await;
                if let Either::Second(next) = retry {
                    session = next;
                }
            }
        }
    }
}

/// Wait for a start request, dropping subscriptions sent while no session exists
async fn wait_for_start() -> SessionConfig {
    loop {
        match SESSION_COMMANDS.receive().await {
            SessionCommand::Start(session) => return session,
            SessionCommand::Subscribe { topic, .. } => {
                debug!("mqtt: no session, dropping subscription to {}", topic);
            }
        }
    }
}

/// Report the end of a connected session
async fn close_session() {
    if SESSION_CONNECTED.load(Ordering::Acquire) {
        SESSION_CONNECTED.store(false, Ordering::Release);
        EVENTS.send(OwnedEvent::ClientDisconnected).await;
    }
}

/// Run one session until it fails or a new session is requested.
///
/// Returns the configuration of the requested session.
async fn run_session(
    stack: Stack<'static>,
    rng: &mut HardwareRng,
    client_id: &str,
    session: &SessionConfig,
) -> Result<SessionConfig, SessionError> {
    let broker = &session.broker;
    let address = resolve_host(stack, broker.host.as_str())
        .await
        .ok_or(SessionError::Dns)?;

    let mut rx_buffer = [0u8; TCP_BUF_SIZE];
    let mut tx_buffer = [0u8; TCP_BUF_SIZE];
    let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
    socket.set_timeout(Some(SOCKET_TIMEOUT));

    info!("mqtt: connecting to broker {}:{}...", address, broker.port);
    if let Err(e) = socket.connect((address, broker.port)).await {
        socket.abort();
        return Err(SessionError::Tcp(e));
    }
    debug!("mqtt: TCP socket connected");

    let mut read_record = [0u8; TLS_READ_BUF_SIZE];
    let mut write_record = [0u8; TLS_WRITE_BUF_SIZE];
    let mut tls: BrokerConnection<'_> =
        TlsConnection::new(socket, &mut read_record, &mut write_record);
    open_broker_tls::<_, _, FirmwareClock>(&mut tls, session, rng)
        .await
        .map_err(SessionError::Tls)?;
    debug!("mqtt: TLS session established with {}", broker.host);

    let mut config = MqttClientConfig::<MAX_PROPERTIES, CountingRng>::new(
        MQTTv5,
        CountingRng(20000),
    );
    config.add_max_subscribe_qos(match SUBSCRIBE_QOS {
        QoS::AtMostOnce => QualityOfService::QoS0,
        QoS::AtLeastOnce => QualityOfService::QoS1,
    });
    config.add_client_id(client_id);
    config.keep_alive = KEEP_ALIVE_SECS;
    config.max_packet_size = MQTT_BUF_SIZE as u32;
    if !broker.username.is_empty() {
        config.add_username(broker.username.as_str());
        config.add_password(broker.password.as_str());
    }

    let link: BrokerLink<'_> = FramedLink::new(tls);
    let mut write_buf = [0u8; MQTT_BUF_SIZE];
    let mut read_buf = [0u8; MQTT_BUF_SIZE];
    let mut mqtt = BrokerSession::new(&link, &mut write_buf, &mut read_buf, config);
    mqtt.connect().await?;

    SESSION_CONNECTED.store(true, Ordering::Release);
    EVENTS.send(OwnedEvent::ClientConnected).await;

    let mut keep_alive = Ticker::every(Duration::from_secs(u64::from(KEEP_ALIVE_SECS / 2)));
    loop {
        // Packets are only parsed once fully buffered, so this never waits on
        // the network.
        while mqtt.packet_ready().await? {
            match mqtt.next_inbound().await? {
                Inbound::Message { topic, payload } => {
                    EVENTS.send(OwnedEvent::message(topic, payload)).await;
                }
                Inbound::Subscribed(id) => debug!("mqtt: subscription {} acknowledged", id),
                Inbound::Published(id) => trace!("mqtt: packet {} acknowledged", id),
                Inbound::Pong => trace!("mqtt: pong"),
                Inbound::Unmatched => {}
            }
        }

        // Only the fill may lose the race, it keeps what it already read
        let step = match select4(
            mqtt.fill(),
            SESSION_COMMANDS.receive(),
            OUTBOX.receive(),
            keep_alive.next(),
        )
        .await
        {
            Either4::First(received) => {
                received?;
                continue;
            }
            Either4::Second(SessionCommand::Start(next)) => Step::Restart(next),
            Either4::Second(SessionCommand::Subscribe { topic, qos }) => Step::Subscribe(topic, qos),
            Either4::Third(message) => Step::Publish(message),
            Either4::Fourth(()) => Step::Ping,
        };

        match step {
            Step::Restart(next) => return Ok(next),
            Step::Subscribe(topic, qos) => {
                if qos != SUBSCRIBE_QOS {
                    warn!("mqtt: {} subscribed at {:?}", topic, SUBSCRIBE_QOS);
                }
                mqtt.subscribe(topic.as_str()).await?;
                info!("mqtt: subscribed to {}", topic);
            }
            Step::Publish(message) => {
                let id = mqtt
                    .publish(
                        message.topic.as_str(),
                        &message.payload,
                        message.qos,
                        message.retain,
                    )
                    .await?;
                trace!("mqtt: sent packet {} to {}", id, message.topic);
            }
            Step::Ping => mqtt.ping().await?,
        }
    }
}
