mod led_ws2812;
mod network;
mod random;
mod tls;

pub(crate) use led_ws2812::EspLedStrip;
pub(crate) use network::{init_network_stack, resolve_host};
pub(crate) use random::HardwareRng;
pub(crate) use tls::FirmwareClock;
