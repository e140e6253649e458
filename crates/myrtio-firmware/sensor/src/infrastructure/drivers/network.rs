use core::str::FromStr;

use embassy_net::dns::DnsQueryType;
use embassy_net::{Config, DhcpConfig, IpAddress, Ipv4Address, Runner, Stack, StackResources};
use esp_hal::peripherals::WIFI;
use esp_radio::wifi::{Config as RadioConfig, WifiController, WifiDevice};
use heapless::String;
use log::warn;
use static_cell::make_static;

use super::random::get_seed;
use crate::infrastructure::config::HOSTNAME;

/// DHCP, DNS and the broker socket
const SOCKET_COUNT: usize = 3;

/// Station side of the radio plus the IP stack running on it
pub(crate) struct NetworkParts {
    pub(crate) stack: Stack<'static>,
    pub(crate) runner: Runner<'static, WifiDevice<'static>>,
    pub(crate) controller: WifiController<'static>,
}

/// Bring up the radio and a DHCP client announcing [`HOSTNAME`].
pub(crate) fn init_network_stack(wifi: WIFI<'static>) -> NetworkParts {
    let radio = &*make_static!(esp_radio::init().unwrap());
    let (controller, interfaces) =
        esp_radio::wifi::new(radio, wifi, RadioConfig::default()).unwrap();

    let mut dhcp = DhcpConfig::default();
    dhcp.hostname = String::from_str(HOSTNAME).ok();
    let resources = make_static!(StackResources::<SOCKET_COUNT>::new());
    let (stack, runner) = embassy_net::new(
        interfaces.sta,
        Config::dhcpv4(dhcp),
        resources,
        get_seed(),
    );

    NetworkParts {
        stack,
        runner,
        controller,
    }
}

/// Look up the broker host, which may also be an IPv4 literal.
pub(crate) async fn resolve_host(stack: Stack<'_>, host: &str) -> Option<IpAddress> {
    if let Ok(address) = host.parse::<Ipv4Address>() {
        return Some(IpAddress::Ipv4(address));
    }
    match stack.dns_query(host, DnsQueryType::A).await {
        Ok(addresses) => addresses.first().copied(),
        Err(e) => {
            warn!("network: lookup of {} failed: {:?}", host, e);
            None
        }
    }
}
