use myrtio_sensor_core::QoS;
use myrtio_sensor_core::domain::config::SessionConfig;
use myrtio_sensor_core::domain::error::PortError;
use myrtio_sensor_core::domain::ports::MessagingClient;

use crate::infrastructure::types::{SESSION_COMMANDS, SessionCommand, Topic};

/// Messaging client backed by the MQTT session task
#[derive(Default)]
pub(crate) struct MessagingAdapter {
    pending: Option<SessionConfig>,
}

impl MessagingClient for MessagingAdapter {
    fn init(&mut self, session: SessionConfig) -> Result<(), PortError> {
        self.pending = Some(session);
        Ok(())
    }

    fn start(&mut self) -> Result<(), PortError> {
        let session = self.pending.take().ok_or(PortError::NotInitialized)?;
        SESSION_COMMANDS
            .try_send(SessionCommand::Start(session))
            .map_err(|_| PortError::QueueFull)
    }

    fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<(), PortError> {
        let topic = Topic::try_from(topic).map_err(|()| PortError::TooLarge)?;
        SESSION_COMMANDS
            .try_send(SessionCommand::Subscribe { topic, qos })
            .map_err(|_| PortError::QueueFull)
    }
}
