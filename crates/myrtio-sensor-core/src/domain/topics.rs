/// Control topic, subscribed with QoS 0
pub const CONTROL_TOPIC: &str = "home/temperature";

pub const TEMPERATURE_TOPIC: &str = "esp/in/temperature";
pub const HUMIDITY_TOPIC: &str = "esp/in/humidity";
pub const LIGHT_TOPIC: &str = "esp/in/light";
