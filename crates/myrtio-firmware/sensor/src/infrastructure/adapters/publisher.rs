use core::sync::atomic::Ordering;

use heapless::Vec;
use myrtio_sensor_core::QoS;
use myrtio_sensor_core::domain::error::PortError;
use myrtio_sensor_core::domain::ports::Publisher;

use crate::infrastructure::types::{OUTBOX, OutboundMessage, SESSION_CONNECTED, Topic};

/// Queues messages for the MQTT session task.
///
/// Messages are only accepted while a session is connected, everything else
/// is rejected right away and never retried.
pub(crate) struct OutboxPublisher;

impl Publisher for OutboxPublisher {
    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(), PortError> {
        if !SESSION_CONNECTED.load(Ordering::Acquire) {
            return Err(PortError::NotConnected);
        }
        let message = OutboundMessage {
            topic: Topic::try_from(topic).map_err(|()| PortError::TooLarge)?,
            payload: Vec::from_slice(payload).map_err(|()| PortError::TooLarge)?,
            qos,
            retain,
        };
        OUTBOX.try_send(message).map_err(|_| PortError::QueueFull)
    }
}
