use myrtio_sensor_core::domain::error::PortError;
use myrtio_sensor_core::domain::ports::LinkControl;

use crate::infrastructure::types::{LINK_REQUESTS, LinkRequest};

/// Forwards association requests to the Wi-Fi task.
///
/// The task only waits for a request while the station is down, so a newer
/// request simply replaces one that was not picked up yet.
pub(crate) struct LinkRequester;

impl LinkControl for LinkRequester {
    fn connect(&mut self) -> Result<(), PortError> {
        LINK_REQUESTS.signal(LinkRequest::Connect);
        Ok(())
    }

    fn reconnect(&mut self) -> Result<(), PortError> {
        LINK_REQUESTS.signal(LinkRequest::Reconnect);
        Ok(())
    }
}
