use log::{debug, error};

use crate::infrastructure::types::{EVENTS, SensorController};

/// Single owner of the event controller
///
/// Events from the Wi-Fi, DHCP and MQTT tasks are handled one at a time, in
/// the order they were queued.
#[embassy_executor::task]
pub(crate) async fn controller_task(mut controller: SensorController) {
    loop {
        let event = EVENTS.receive().await;
        match controller.handle(event.as_event()) {
            Ok(outcome) => debug!("controller: {:?} -> {:?}", event, outcome),
            Err(e) => error!("controller: failed to handle {:?}: {}", event, e),
        }
    }
}
