use myrtio_sensor_core::domain::entity::{BLUE, GREEN, RED};
use myrtio_sensor_core::domain::error::LedError;
use myrtio_sensor_core::{ControlCommand, LedIndicator, Rgb};

use crate::mocks::{FailingStrip, RecordingStrip};

#[test]
fn exact_payloads_map_to_commands() {
    assert_eq!(ControlCommand::from_payload(b"increase"), ControlCommand::Increase);
    assert_eq!(ControlCommand::from_payload(b"decrease"), ControlCommand::Decrease);
}

#[test]
fn near_misses_are_unknown() {
    let payloads: [&[u8]; 9] = [
        b"",
        b"inc",
        b"increas",
        b"increase ",
        b" increase",
        b"Increase",
        b"DECREASE",
        b"decreased",
        b"increase\0",
    ];

    for payload in payloads {
        assert_eq!(
            ControlCommand::from_payload(payload),
            ControlCommand::Unknown,
            "payload {:?}",
            payload
        );
    }
}

#[test]
fn command_colors() {
    assert_eq!(ControlCommand::Increase.color(), GREEN);
    assert_eq!(ControlCommand::Decrease.color(), RED);
    assert_eq!(ControlCommand::Unknown.color(), BLUE);
    assert_eq!(GREEN, Rgb::new(0, 255, 0));
    assert_eq!(RED, Rgb::new(255, 0, 0));
    assert_eq!(BLUE, Rgb::new(0, 0, 255));
}

#[test]
fn indicator_writes_pixel_zero_and_refreshes() {
    let mut led = LedIndicator::new(RecordingStrip::default());

    led.set_color(GREEN).unwrap();

    assert_eq!(led.strip().frame[0], GREEN);
    assert_eq!(led.strip().refreshes, 1);
    assert_eq!(led.color(), Some(GREEN));
}

#[test]
fn indicator_clear_resets_color() {
    let mut led = LedIndicator::new(RecordingStrip::default());
    led.set_color(RED).unwrap();

    led.clear().unwrap();

    assert_eq!(led.strip().frame[0], Rgb::default());
    assert_eq!(led.strip().clears, 1);
    assert_eq!(led.color(), None);
}

#[test]
fn indicator_clear_reports_driver_failure() {
    let mut led = LedIndicator::new(FailingStrip);

    assert_eq!(led.clear(), Err(LedError::Write));
    assert_eq!(led.set_color(GREEN), Err(LedError::Write));
    assert_eq!(led.color(), None);
}
