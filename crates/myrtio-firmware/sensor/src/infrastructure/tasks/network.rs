use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{AuthMethod, ClientConfig, ModeConfig, WifiController, WifiDevice, WifiEvent};
use log::{debug, info, warn};
use myrtio_sensor_core::WifiConfig;

use crate::infrastructure::types::{EVENTS, LINK_REQUESTS, OwnedEvent};

/// How often the address watcher looks at the DHCP state
const ADDRESS_POLL: Duration = Duration::from_millis(250);

/// Background task owning the Wi-Fi station
///
/// Starts the station, then associates only when the controller asks for it.
/// Every failed attempt and every lost association is reported back as a
/// disconnect, so the controller alone decides whether to try again.
#[embassy_executor::task]
pub(crate) async fn wifi_connection_task(mut controller: WifiController<'static>, wifi: WifiConfig) {
    let client_config = if wifi.password.is_empty() {
        ClientConfig::default()
            .with_ssid(wifi.ssid.as_str().into())
            .with_auth_method(AuthMethod::None)
    } else {
        ClientConfig::default()
            .with_ssid(wifi.ssid.as_str().into())
            .with_password(wifi.password.as_str().into())
    };
    let mode_config = ModeConfig::Client(client_config);
    controller.set_config(&mode_config).unwrap();
    controller.start_async().await.unwrap();
    info!("network: station started");
    EVENTS.send(OwnedEvent::LinkStarted).await;

    loop {
        let request = LINK_REQUESTS.wait().await;
        debug!("network: {:?} requested", request);

        match controller.connect_async().await {
            Ok(()) => {
                info!("network: connected to {}", wifi.ssid);
                controller.wait_for_event(WifiEvent::StaDisconnected).await;
            }
            Err(e) => warn!("network: error connecting: {:?}", e),
        }
        EVENTS.send(OwnedEvent::LinkDisconnected).await;
    }
}

/// Background task for running the network stack
#[embassy_executor::task]
pub(crate) async fn network_runner_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await;
}

/// Reports every DHCP lease to the controller.
///
/// The stack drops its address when the link goes down, so each
/// reassociation produces a new report.
#[embassy_executor::task]
pub(crate) async fn address_watch_task(stack: Stack<'static>) {
    loop {
        let address = loop {
            if let Some(config) = stack.config_v4() {
                break config.address.address();
            }
            Timer::after(ADDRESS_POLL).await;
        };
        EVENTS.send(OwnedEvent::AddressAcquired(address)).await;

        while stack.config_v4().is_some() {
            Timer::after(ADDRESS_POLL).await;
        }
        debug!("network: address {} released", address);
    }
}
