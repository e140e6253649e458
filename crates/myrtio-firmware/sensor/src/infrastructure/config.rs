use myrtio_sensor_core::domain::error::ConfigError;
use myrtio_sensor_core::{BrokerConfig, DeviceConfig, ReconnectPolicy, WifiConfig};

pub(crate) struct WifiSecrets {
    pub ssid: &'static str,
    pub password: &'static str,
}

pub(crate) struct MqttSecrets {
    pub uri: &'static str,
    pub username: &'static str,
    pub password: &'static str,
}

pub(crate) struct FirmwareConfig {
    pub version: &'static str,
    /// Unix time of the build, used as a lower bound for certificate checks
    pub built_at: &'static str,
}

pub(crate) const WIFI: WifiSecrets = WifiSecrets {
    ssid: env!("WIFI_SSID"),
    password: env!("WIFI_PASSWORD"),
};

pub(crate) const MQTT: MqttSecrets = MqttSecrets {
    uri: env!("MQTT_BROKER_URI"),
    username: env!("MQTT_USERNAME"),
    password: env!("MQTT_PASSWORD"),
};

pub(crate) const WIFI_RECONNECT_LIMIT: Option<&str> = option_env!("WIFI_RECONNECT_LIMIT");

pub(crate) const FIRMWARE: FirmwareConfig = FirmwareConfig {
    version: env!("BUILD_VERSION"),
    built_at: env!("BUILD_TIMESTAMP"),
};

/// DER encoded root certificate of the broker
pub(crate) static BROKER_CA: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/broker_ca.der"));

pub(crate) const CLIENT_ID_PREFIX: &str = "myrtio-sensor";
pub(crate) const HOSTNAME: &str = "myrtio-sensor";

/// Number of pixels on the indicator strip
pub(crate) const LED_COUNT: usize = 1;

/// Build the device configuration from the compiled-in secrets.
pub(crate) fn load_device_config() -> Result<DeviceConfig, ConfigError> {
    Ok(DeviceConfig {
        wifi: WifiConfig::new(WIFI.ssid, WIFI.password)?,
        broker: BrokerConfig::new(MQTT.uri, MQTT.username, MQTT.password)?,
        trust_anchor: BROKER_CA,
        reconnect: ReconnectPolicy::from_limit(WIFI_RECONNECT_LIMIT)?,
    })
}

/// Hardware id derived from the factory MAC address
pub(crate) fn hardware_id() -> u32 {
    let mac = esp_hal::efuse::Efuse::mac_address();
    u32::from_be_bytes([mac[2], mac[3], mac[4], mac[5]])
}

#[macro_export]
macro_rules! led_gpio {
    ($p:expr) => {
        $p.GPIO8
    };
}
