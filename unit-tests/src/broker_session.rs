use embassy_futures::block_on;
use embassy_futures::select::{Either, select};
use myrtio_sensor_core::domain::entity::{GREEN, RED};
use myrtio_sensor_core::domain::topics::CONTROL_TOPIC;
use myrtio_sensor_core::mqtt::{
    BrokerSession, FramedLink, Inbound, LinkError, MAX_PROPERTIES, SessionFault,
};
use myrtio_sensor_core::{ControlCommand, Event, Outcome, QoS};
use rust_mqtt::client::client_config::{ClientConfig, MqttVersion};
use rust_mqtt::utils::rng_generator::CountingRng;

use crate::mocks::{BrokerStream, controller};

const BUF_SIZE: usize = 256;

const CONNACK: &[u8] = &[0x20, 0x03, 0x00, 0x00, 0x00];
const PINGRESP: &[u8] = &[0xD0, 0x00];

fn client_config<'a>() -> ClientConfig<'a, MAX_PROPERTIES, CountingRng> {
    let mut config = ClientConfig::new(MqttVersion::MQTTv5, CountingRng(20000));
    config.add_client_id("myrtio-sensor-test");
    config
}

/// QoS 0 PUBLISH on the control topic
fn control_message(payload: &[u8]) -> Vec<u8> {
    let topic = CONTROL_TOPIC.as_bytes();
    let remaining = 2 + topic.len() + 1 + payload.len();
    let mut packet = vec![0x30, u8::try_from(remaining).unwrap()];
    packet.extend_from_slice(&u16::try_from(topic.len()).unwrap().to_be_bytes());
    packet.extend_from_slice(topic);
    // no properties
    packet.push(0x00);
    packet.extend_from_slice(payload);
    packet
}

fn puback(id: u16) -> Vec<u8> {
    let [high, low] = id.to_be_bytes();
    vec![0x40, 0x04, high, low, 0x00, 0x00]
}

fn suback(id: u16) -> Vec<u8> {
    let [high, low] = id.to_be_bytes();
    vec![0x90, 0x04, high, low, 0x00, 0x00]
}

fn expect_message<'a>(inbound: Inbound<'a>) -> (&'a str, &'a [u8]) {
    match inbound {
        Inbound::Message { topic, payload } => (topic, payload),
        other => panic!("expected a message, got {:?}", other),
    }
}

#[test]
fn connect_waits_for_connack() {
    let stream = BrokerStream::default();
    stream.push(CONNACK);
    let link = FramedLink::<_, BUF_SIZE>::new(stream.clone());
    let mut write_buf = [0u8; BUF_SIZE];
    let mut read_buf = [0u8; BUF_SIZE];
    let mut session = BrokerSession::new(&link, &mut write_buf, &mut read_buf, client_config());

    block_on(session.connect()).unwrap();

    let sent = stream.sent();
    assert_eq!(sent[0] >> 4, 1, "first packet is CONNECT");
    assert!(sent.windows(18).any(|w| w == b"myrtio-sensor-test"));
}

#[test]
fn control_message_between_publish_and_puback_is_delivered() {
    let stream = BrokerStream::default();
    stream.push(CONNACK);
    let link = FramedLink::<_, BUF_SIZE>::new(stream.clone());
    let mut write_buf = [0u8; BUF_SIZE];
    let mut read_buf = [0u8; BUF_SIZE];
    let mut session = BrokerSession::new(&link, &mut write_buf, &mut read_buf, client_config());
    let mut controller = controller();

    block_on(async {
        session.connect().await.unwrap();
        let id = session
            .publish("esp/in/temperature", b"23", QoS::AtLeastOnce, false)
            .await
            .unwrap();
        assert_eq!(session.in_flight().pending_publishes(), 1);

        // The broker forwards a control message before acknowledging
        stream.push(&control_message(b"increase"));
        stream.push(&puback(id));

        let (topic, payload) = expect_message(session.next_inbound().await.unwrap());
        let outcome = controller
            .handle(Event::MessageArrived { topic, payload })
            .unwrap();
        assert_eq!(outcome, Outcome::ColorApplied(ControlCommand::Increase));

        assert_eq!(session.next_inbound().await.unwrap(), Inbound::Published(id));
        assert_eq!(session.in_flight().pending_publishes(), 0);
    });

    assert_eq!(controller.led().color(), Some(GREEN));
    assert!(stream.sent().windows(18).any(|w| w == b"esp/in/temperature"));
}

#[test]
fn several_publishes_acknowledged_around_a_message() {
    let stream = BrokerStream::default();
    stream.push(CONNACK);
    let link = FramedLink::<_, BUF_SIZE>::new(stream.clone());
    let mut write_buf = [0u8; BUF_SIZE];
    let mut read_buf = [0u8; BUF_SIZE];
    let mut session = BrokerSession::new(&link, &mut write_buf, &mut read_buf, client_config());

    block_on(async {
        session.connect().await.unwrap();
        let mut ids = Vec::new();
        for topic in ["esp/in/temperature", "esp/in/humidity", "esp/in/light"] {
            ids.push(
                session
                    .publish(topic, b"42", QoS::AtLeastOnce, false)
                    .await
                    .unwrap(),
            );
        }

        stream.push(&puback(ids[0]));
        stream.push(&control_message(b"decrease"));
        stream.push(&puback(ids[1]));
        stream.push(&puback(ids[2]));

        assert_eq!(session.next_inbound().await.unwrap(), Inbound::Published(ids[0]));
        let (_, payload) = expect_message(session.next_inbound().await.unwrap());
        assert_eq!(payload, b"decrease");
        assert_eq!(session.next_inbound().await.unwrap(), Inbound::Published(ids[1]));
        assert_eq!(session.next_inbound().await.unwrap(), Inbound::Published(ids[2]));
        assert!(!session.packet_ready().await.unwrap());
    });
}

#[test]
fn ping_answer_after_message_is_matched() {
    let stream = BrokerStream::default();
    stream.push(CONNACK);
    let link = FramedLink::<_, BUF_SIZE>::new(stream.clone());
    let mut write_buf = [0u8; BUF_SIZE];
    let mut read_buf = [0u8; BUF_SIZE];
    let mut session = BrokerSession::new(&link, &mut write_buf, &mut read_buf, client_config());

    block_on(async {
        session.connect().await.unwrap();
        session.ping().await.unwrap();
        assert!(session.in_flight().ping_pending());

        stream.push(&control_message(b"anything"));
        stream.push(PINGRESP);

        let (topic, payload) = expect_message(session.next_inbound().await.unwrap());
        assert_eq!(topic, CONTROL_TOPIC);
        assert_eq!(payload, b"anything");
        assert_eq!(session.next_inbound().await.unwrap(), Inbound::Pong);

        session.ping().await.unwrap();
    });
}

#[test]
fn unanswered_ping_ends_session() {
    let stream = BrokerStream::default();
    stream.push(CONNACK);
    let link = FramedLink::<_, BUF_SIZE>::new(stream.clone());
    let mut write_buf = [0u8; BUF_SIZE];
    let mut read_buf = [0u8; BUF_SIZE];
    let mut session = BrokerSession::new(&link, &mut write_buf, &mut read_buf, client_config());

    block_on(async {
        session.connect().await.unwrap();
        session.ping().await.unwrap();

        let result = session.ping().await;
        assert!(matches!(result, Err(SessionFault::KeepAliveTimeout)));
    });
}

#[test]
fn subscription_is_acknowledged() {
    let stream = BrokerStream::default();
    stream.push(CONNACK);
    let link = FramedLink::<_, BUF_SIZE>::new(stream.clone());
    let mut write_buf = [0u8; BUF_SIZE];
    let mut read_buf = [0u8; BUF_SIZE];
    let mut session = BrokerSession::new(&link, &mut write_buf, &mut read_buf, client_config());

    block_on(async {
        session.connect().await.unwrap();
        let id = session.subscribe(CONTROL_TOPIC).await.unwrap();
        stream.push(&suback(id));

        assert_eq!(session.next_inbound().await.unwrap(), Inbound::Subscribed(id));
    });
    assert!(stream.sent().windows(16).any(|w| w == CONTROL_TOPIC.as_bytes()));
}

#[test]
fn unknown_puback_is_not_an_error() {
    let stream = BrokerStream::default();
    stream.push(CONNACK);
    let link = FramedLink::<_, BUF_SIZE>::new(stream.clone());
    let mut write_buf = [0u8; BUF_SIZE];
    let mut read_buf = [0u8; BUF_SIZE];
    let mut session = BrokerSession::new(&link, &mut write_buf, &mut read_buf, client_config());

    block_on(async {
        session.connect().await.unwrap();
        stream.push(&puback(77));

        assert_eq!(session.next_inbound().await.unwrap(), Inbound::Unmatched);
    });
}

#[test]
fn split_packet_is_kept_across_fills() {
    let stream = BrokerStream::default();
    stream.push(CONNACK);
    let link = FramedLink::<_, BUF_SIZE>::new(stream.clone());
    let mut write_buf = [0u8; BUF_SIZE];
    let mut read_buf = [0u8; BUF_SIZE];
    let mut session = BrokerSession::new(&link, &mut write_buf, &mut read_buf, client_config());
    let packet = control_message(b"decrease");

    block_on(async {
        session.connect().await.unwrap();

        stream.push(&packet[..3]);
        session.fill().await.unwrap();
        assert!(!session.packet_ready().await.unwrap());

        stream.push(&packet[3..]);
        session.fill().await.unwrap();
        assert!(session.packet_ready().await.unwrap());

        let (_, payload) = expect_message(session.next_inbound().await.unwrap());
        assert_eq!(payload, b"decrease");
    });
}

#[test]
fn fill_dropped_while_waiting_loses_no_bytes() {
    let stream = BrokerStream::default();
    stream.push(CONNACK);
    let link = FramedLink::<_, BUF_SIZE>::new(stream.clone());
    let mut write_buf = [0u8; BUF_SIZE];
    let mut read_buf = [0u8; BUF_SIZE];
    let mut session = BrokerSession::new(&link, &mut write_buf, &mut read_buf, client_config());
    let packet = control_message(b"decrease");
    let mut controller = controller();

    block_on(async {
        session.connect().await.unwrap();
        stream.push(&packet[..5]);
        session.fill().await.unwrap();

        // A queued publish wins the race against the waiting fill
        match select(session.fill(), async {}).await {
            Either::First(_) => panic!("fill finished without data"),
            Either::Second(()) => {}
        }
        session
            .publish("esp/in/light", b"7", QoS::AtLeastOnce, false)
            .await
            .unwrap();

        stream.push(&packet[5..]);
        let (topic, payload) = expect_message(session.next_inbound().await.unwrap());
        controller
            .handle(Event::MessageArrived { topic, payload })
            .unwrap();
    });

    assert_eq!(controller.led().color(), Some(RED));
}

#[test]
fn closed_stream_ends_session() {
    let stream = BrokerStream::default();
    stream.push(CONNACK);
    let link = FramedLink::<_, BUF_SIZE>::new(stream.clone());
    let mut write_buf = [0u8; BUF_SIZE];
    let mut read_buf = [0u8; BUF_SIZE];
    let mut session = BrokerSession::new(&link, &mut write_buf, &mut read_buf, client_config());

    block_on(async {
        session.connect().await.unwrap();
        stream.close();

        let result = session.fill().await;
        assert!(matches!(
            result,
            Err(SessionFault::Link(LinkError::Closed))
        ));
    });
}

#[test]
fn oversized_packet_is_rejected() {
    let stream = BrokerStream::default();
    let link = FramedLink::<_, 16>::new(stream.clone());
    let packet = control_message(b"increase");

    block_on(async {
        stream.push(&packet);
        while link.fill().await.is_ok() {}
        assert_eq!(link.packet_ready().await, Err(LinkError::Overflow));
    });
}
