//! Infrastructure layer - Port implementations
//!
//! Concrete implementations of the core ports on top of the ESP32-C3
//! peripherals, the Wi-Fi radio and the MQTT session task.

pub(crate) mod adapters;
pub(crate) mod config;
pub(crate) mod drivers;
pub(crate) mod tasks;
pub(crate) mod types;
