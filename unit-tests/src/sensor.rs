use embassy_time::Duration;
use myrtio_sensor_core::app::{PublishReport, SENSOR_PERIOD, publish_reading};
use myrtio_sensor_core::domain::topics::{HUMIDITY_TOPIC, LIGHT_TOPIC, TEMPERATURE_TOPIC};
use myrtio_sensor_core::{QoS, Sampler, SensorReading};

use crate::mocks::{RecordingPublisher, ScriptedEntropy, XorShift};

#[test]
fn period_is_five_seconds() {
    assert_eq!(SENSOR_PERIOD, Duration::from_millis(5000));
}

#[test]
fn samples_stay_in_range() {
    let mut sampler = Sampler::new(XorShift(0x1234_5678));

    for _ in 0..10_000 {
        let reading = sampler.sample();
        assert!((10..=60).contains(&reading.temperature), "{:?}", reading);
        assert!(reading.humidity <= 100, "{:?}", reading);
        assert!(reading.light <= 100, "{:?}", reading);
    }
}

#[test]
fn samples_reach_range_bounds() {
    // temperature, humidity, light
    let mut sampler = Sampler::new(ScriptedEntropy::new(&[0, 0, 0, 50, 100, 100]));

    assert_eq!(
        sampler.sample(),
        SensorReading {
            temperature: 10,
            humidity: 0,
            light: 0
        }
    );
    assert_eq!(
        sampler.sample(),
        SensorReading {
            temperature: 60,
            humidity: 100,
            light: 100
        }
    );
}

#[test]
fn cycle_publishes_one_message_per_topic() {
    let mut publisher = RecordingPublisher::connected();
    let reading = SensorReading {
        temperature: 23,
        humidity: 0,
        light: 100,
    };

    let report = publish_reading(&mut publisher, &reading);

    assert_eq!(
        report,
        PublishReport {
            published: 3,
            dropped: 0
        }
    );
    let sent: Vec<(&str, &[u8])> = publisher
        .messages
        .iter()
        .map(|m| (m.topic.as_str(), m.payload.as_slice()))
        .collect();
    assert_eq!(
        sent,
        vec![
            (TEMPERATURE_TOPIC, b"23".as_slice()),
            (HUMIDITY_TOPIC, b"0".as_slice()),
            (LIGHT_TOPIC, b"100".as_slice()),
        ]
    );
    for message in &publisher.messages {
        assert_eq!(message.qos, QoS::AtLeastOnce);
        assert!(!message.retain);
    }
}

#[test]
fn published_payloads_parse_back_within_range() {
    let mut sampler = Sampler::new(XorShift(42));
    let mut publisher = RecordingPublisher::connected();

    for _ in 0..100 {
        let reading = sampler.sample();
        publish_reading(&mut publisher, &reading);
    }

    assert_eq!(publisher.messages.len(), 300);
    for message in &publisher.messages {
        let text = core::str::from_utf8(&message.payload).unwrap();
        assert!(text.len() <= 15);
        let value: i64 = text.parse().unwrap();
        let range = match message.topic.as_str() {
            TEMPERATURE_TOPIC => 10..=60,
            HUMIDITY_TOPIC | LIGHT_TOPIC => 0..=100,
            other => panic!("unexpected topic {}", other),
        };
        assert!(range.contains(&value), "{} = {}", message.topic, value);
    }
}

#[test]
fn publishing_before_connection_drops_silently() {
    let mut publisher = RecordingPublisher::default();
    let reading = SensorReading {
        temperature: 30,
        humidity: 50,
        light: 70,
    };

    let report = publish_reading(&mut publisher, &reading);

    assert_eq!(
        report,
        PublishReport {
            published: 0,
            dropped: 3
        }
    );
    assert!(publisher.messages.is_empty());
}
