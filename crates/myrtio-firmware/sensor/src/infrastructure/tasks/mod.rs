pub(crate) mod controller;
pub(crate) mod mqtt_session;
pub(crate) mod network;

pub(crate) use controller::controller_task;
pub(crate) use mqtt_session::mqtt_session_task;
pub(crate) use network::{address_watch_task, network_runner_task, wifi_connection_task};
