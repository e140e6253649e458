use core::net::Ipv4Addr;

use myrtio_sensor_core::app::SessionState;
use myrtio_sensor_core::domain::topics::CONTROL_TOPIC;
use myrtio_sensor_core::{ControlCommand, Event, Outcome, QoS, ReconnectPolicy, Rgb};

use crate::mocks::{TRUST_ANCHOR, TestController, controller, controller_with};

const ADDRESS: Event<'static> = Event::AddressAcquired {
    address: Ipv4Addr::new(192, 168, 1, 42),
};

fn control(payload: &'static [u8]) -> Event<'static> {
    Event::MessageArrived {
        topic: CONTROL_TOPIC,
        payload,
    }
}

fn bring_up(controller: &mut TestController) {
    controller.handle(Event::LinkStarted).unwrap();
    controller.handle(ADDRESS).unwrap();
    controller.handle(Event::ClientConnected).unwrap();
}

// -----------------------------------------------------------------------------
// Network lifecycle
// -----------------------------------------------------------------------------

#[test]
fn link_started_requests_connect() {
    let mut controller = controller();

    assert_eq!(
        controller.handle(Event::LinkStarted),
        Ok(Outcome::ConnectRequested)
    );
    assert_eq!(controller.link().connects, 1);
    assert_eq!(controller.link().reconnects, 0);
}

#[test]
fn every_disconnect_reconnects_immediately() {
    let mut controller = controller();
    controller.handle(Event::LinkStarted).unwrap();

    for attempt in 1..=50 {
        assert_eq!(
            controller.handle(Event::LinkDisconnected),
            Ok(Outcome::ReconnectRequested { attempt })
        );
    }
    assert_eq!(controller.link().reconnects, 50);
}

#[test]
fn limited_policy_stops_reconnecting() {
    let mut controller = controller_with(ReconnectPolicy::Limited(2));

    assert!(matches!(
        controller.handle(Event::LinkDisconnected),
        Ok(Outcome::ReconnectRequested { attempt: 1 })
    ));
    assert!(matches!(
        controller.handle(Event::LinkDisconnected),
        Ok(Outcome::ReconnectRequested { attempt: 2 })
    ));
    let outcome = controller.handle(Event::LinkDisconnected).unwrap();

    assert_eq!(outcome, Outcome::ReconnectSuppressed { attempts: 2 });
    assert!(outcome.is_warning());
    assert_eq!(controller.link().reconnects, 2);
}

#[test]
fn acquired_address_resets_reconnect_budget() {
    let mut controller = controller_with(ReconnectPolicy::Limited(1));

    controller.handle(Event::LinkDisconnected).unwrap();
    controller.handle(ADDRESS).unwrap();

    assert_eq!(
        controller.handle(Event::LinkDisconnected),
        Ok(Outcome::ReconnectRequested { attempt: 1 })
    );
}

// -----------------------------------------------------------------------------
// Messaging lifecycle
// -----------------------------------------------------------------------------

#[test]
fn address_acquired_starts_client_with_session_config() {
    let mut controller = controller();

    assert_eq!(controller.handle(ADDRESS), Ok(Outcome::ClientStarted));

    let messaging = controller.messaging();
    assert_eq!(messaging.inits.len(), 1);
    assert_eq!(messaging.starts, 1);

    let session = &messaging.inits[0];
    assert_eq!(session.broker.uri.as_str(), "mqtts://broker.example.com");
    assert_eq!(session.broker.host.as_str(), "broker.example.com");
    assert_eq!(session.broker.port, 8883);
    assert_eq!(session.broker.username.as_str(), "sensor");
    assert_eq!(session.broker.password.as_str(), "secret");
    assert_eq!(session.trust_anchor, TRUST_ANCHOR);
    assert_eq!(controller.state(), SessionState::Initialized);
}

#[test]
fn connected_client_subscribes_to_control_topic_at_most_once() {
    let mut controller = controller();
    controller.handle(ADDRESS).unwrap();

    assert_eq!(
        controller.handle(Event::ClientConnected),
        Ok(Outcome::Subscribed)
    );
    assert_eq!(
        controller.messaging().subscriptions,
        vec![(CONTROL_TOPIC.to_owned(), QoS::AtMostOnce)]
    );
    assert_eq!(controller.state(), SessionState::Connected);
}

#[test]
fn client_error_is_only_logged() {
    let mut controller = controller();
    bring_up(&mut controller);

    assert_eq!(
        controller.handle(Event::ClientError),
        Ok(Outcome::ClientErrorLogged)
    );
    assert_eq!(controller.state(), SessionState::Error);
    assert_eq!(controller.messaging().inits.len(), 1);
    assert_eq!(controller.link().reconnects, 0);
    assert_eq!(controller.led().color(), None);
}

#[test]
fn client_disconnect_is_a_no_op() {
    let mut controller = controller();
    bring_up(&mut controller);

    assert_eq!(
        controller.handle(Event::ClientDisconnected),
        Ok(Outcome::Ignored)
    );
    assert_eq!(controller.state(), SessionState::Disconnected);
    assert_eq!(controller.messaging().starts, 1);
}

#[cfg(not(feature = "single-session"))]
#[test]
fn second_address_reinitializes_client_without_release() {
    let mut controller = controller();
    bring_up(&mut controller);

    let outcome = controller.handle(ADDRESS).unwrap();

    assert_eq!(outcome, Outcome::ClientReinitialized { clients: 2 });
    assert!(outcome.is_warning());
    assert_eq!(controller.clients(), 2);
    assert_eq!(controller.messaging().inits.len(), 2);
    assert_eq!(controller.messaging().starts, 2);
}

#[cfg(feature = "single-session")]
#[test]
fn second_address_keeps_existing_client() {
    let mut controller = controller();
    bring_up(&mut controller);

    assert_eq!(controller.handle(ADDRESS), Ok(Outcome::ClientReused));
    assert_eq!(controller.clients(), 1);
    assert_eq!(controller.messaging().inits.len(), 1);
}

// -----------------------------------------------------------------------------
// Control messages
// -----------------------------------------------------------------------------

#[test]
fn increase_turns_led_green() {
    let mut controller = controller();
    bring_up(&mut controller);

    assert_eq!(
        controller.handle(control(b"increase")),
        Ok(Outcome::ColorApplied(ControlCommand::Increase))
    );
    assert_eq!(controller.led().strip().frame[0], Rgb::new(0, 255, 0));
    assert_eq!(controller.led().strip().refreshes, 1);
}

#[test]
fn decrease_turns_led_red() {
    let mut controller = controller();
    bring_up(&mut controller);

    controller.handle(control(b"decrease")).unwrap();

    assert_eq!(controller.led().strip().frame[0], Rgb::new(255, 0, 0));
    assert_eq!(controller.led().color(), Some(Rgb::new(255, 0, 0)));
    assert_eq!(controller.led().strip().refreshes, 1);
}

#[test]
fn unknown_payload_turns_led_blue_with_warning() {
    let mut controller = controller();
    bring_up(&mut controller);

    let outcome = controller.handle(control(b"stop")).unwrap();

    assert_eq!(outcome, Outcome::ColorApplied(ControlCommand::Unknown));
    assert!(outcome.is_warning());
    assert_eq!(controller.led().strip().frame[0], Rgb::new(0, 0, 255));
    assert_eq!(controller.led().strip().refreshes, 1);
}

#[test]
fn messages_on_other_topics_leave_led_untouched() {
    let mut controller = controller();
    bring_up(&mut controller);
    controller.handle(control(b"decrease")).unwrap();

    for topic in ["home/temperature/set", "home/humidity", "esp/in/temperature", ""] {
        assert_eq!(
            controller.handle(Event::MessageArrived {
                topic,
                payload: b"increase",
            }),
            Ok(Outcome::Ignored)
        );
    }

    assert_eq!(controller.led().color(), Some(Rgb::new(255, 0, 0)));
    assert_eq!(controller.led().strip().refreshes, 1);
}

#[test]
fn last_control_message_wins() {
    let mut controller = controller();
    bring_up(&mut controller);

    controller.handle(control(b"increase")).unwrap();
    controller.handle(control(b"garbage")).unwrap();
    controller.handle(control(b"decrease")).unwrap();

    assert_eq!(controller.led().color(), Some(Rgb::new(255, 0, 0)));
    assert_eq!(controller.led().strip().refreshes, 3);
}

#[test]
fn binary_payload_is_unknown() {
    let mut controller = controller();

    assert_eq!(
        controller.handle(control(&[0xff, 0x00, 0xfe])),
        Ok(Outcome::ColorApplied(ControlCommand::Unknown))
    );
    assert_eq!(controller.led().color(), Some(Rgb::new(0, 0, 255)));
}
