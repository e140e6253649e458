use heapless::String;

use super::error::ConfigError;

const TLS_SCHEME: &str = "mqtts://";
pub const DEFAULT_TLS_PORT: u16 = 8883;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiConfig {
    pub ssid: String<32>,
    pub password: String<64>,
}

impl WifiConfig {
    pub fn new(ssid: &str, password: &str) -> Result<Self, ConfigError> {
        if ssid.is_empty() {
            return Err(ConfigError::MissingSsid);
        }
        Ok(Self {
            ssid: bounded(ssid, "Wi-Fi SSID")?,
            password: bounded(password, "Wi-Fi password")?,
        })
    }
}

/// Broker endpoint and credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerConfig {
    pub uri: String<128>,
    pub host: String<64>,
    pub port: u16,
    pub username: String<32>,
    pub password: String<64>,
}

impl BrokerConfig {
    /// Build the broker configuration from an `mqtts://host[:port][/path]` URI.
    ///
    /// The port defaults to 8883 when omitted.
    pub fn new(uri: &str, username: &str, password: &str) -> Result<Self, ConfigError> {
        let (host, port) = parse_uri(uri)?;
        Ok(Self {
            uri: bounded(uri, "broker URI")?,
            host: bounded(host, "broker host")?,
            port,
            username: bounded(username, "MQTT username")?,
            password: bounded(password, "MQTT password")?,
        })
    }
}

/// What to do when the Wi-Fi link drops.
///
/// Reconnects are always issued immediately, the policy only bounds how many
/// consecutive attempts are made before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconnectPolicy {
    #[default]
    Unlimited,
    /// Give up after this many consecutive attempts without an address
    Limited(u32),
}

impl ReconnectPolicy {
    /// Parse the optional build-time attempt limit. Missing, empty or `0`
    /// means unlimited.
    pub fn from_limit(limit: Option<&str>) -> Result<Self, ConfigError> {
        match limit.map(str::trim) {
            None | Some("" | "0") => Ok(ReconnectPolicy::Unlimited),
            Some(value) => value
                .parse::<u32>()
                .map(ReconnectPolicy::Limited)
                .map_err(|_| ConfigError::InvalidReconnectLimit),
        }
    }

    pub const fn allows(self, attempts: u32) -> bool {
        match self {
            ReconnectPolicy::Unlimited => true,
            ReconnectPolicy::Limited(max) => attempts < max,
        }
    }
}

/// Everything the node needs to know at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    pub wifi: WifiConfig,
    pub broker: BrokerConfig,
    /// DER encoded root certificate of the broker
    pub trust_anchor: &'static [u8],
    pub reconnect: ReconnectPolicy,
}

impl DeviceConfig {
    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            broker: self.broker.clone(),
            trust_anchor: self.trust_anchor,
        }
    }
}

/// Configuration of one messaging session, built on every address acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub broker: BrokerConfig,
    pub trust_anchor: &'static [u8],
}

fn parse_uri(uri: &str) -> Result<(&str, u16), ConfigError> {
    let rest = uri
        .strip_prefix(TLS_SCHEME)
        .ok_or(ConfigError::UnsupportedScheme)?;
    let authority = rest.split('/').next().unwrap_or_default();

    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) => {
            let port = port.parse::<u16>().map_err(|_| ConfigError::InvalidPort)?;
            if port == 0 {
                return Err(ConfigError::InvalidPort);
            }
            (host, port)
        }
        None => (authority, DEFAULT_TLS_PORT),
    };

    if host.is_empty() {
        return Err(ConfigError::MissingHost);
    }
    Ok((host, port))
}

fn bounded<const N: usize>(value: &str, field: &'static str) -> Result<String<N>, ConfigError> {
    let mut out = String::new();
    out.push_str(value).map_err(|()| ConfigError::TooLong(field))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_without_port_uses_tls_default() {
        let (host, port) = parse_uri("mqtts://broker.example.com").unwrap();
        assert_eq!(host, "broker.example.com");
        assert_eq!(port, 8883);
    }

    #[test]
    fn uri_with_port_and_path() {
        let (host, port) = parse_uri("mqtts://10.0.0.2:18883/mqtt").unwrap();
        assert_eq!(host, "10.0.0.2");
        assert_eq!(port, 18883);
    }

    #[test]
    fn plain_mqtt_scheme_is_rejected() {
        assert_eq!(
            parse_uri("mqtt://broker.example.com"),
            Err(ConfigError::UnsupportedScheme)
        );
    }

    #[test]
    fn bad_ports_are_rejected() {
        assert_eq!(parse_uri("mqtts://host:0"), Err(ConfigError::InvalidPort));
        assert_eq!(parse_uri("mqtts://host:99999"), Err(ConfigError::InvalidPort));
        assert_eq!(parse_uri("mqtts://host:abc"), Err(ConfigError::InvalidPort));
    }

    #[test]
    fn empty_host_is_rejected() {
        assert_eq!(parse_uri("mqtts://:8883"), Err(ConfigError::MissingHost));
        assert_eq!(parse_uri("mqtts://"), Err(ConfigError::MissingHost));
    }

    #[test]
    fn bounded_rejects_overflow() {
        let long = "x".repeat(40);
        assert_eq!(
            bounded::<32>(&long, "Wi-Fi SSID"),
            Err(ConfigError::TooLong("Wi-Fi SSID"))
        );
    }

    #[test]
    fn reconnect_limit_parsing() {
        assert_eq!(ReconnectPolicy::from_limit(None), Ok(ReconnectPolicy::Unlimited));
        assert_eq!(ReconnectPolicy::from_limit(Some("0")), Ok(ReconnectPolicy::Unlimited));
        assert_eq!(ReconnectPolicy::from_limit(Some(" 3 ")), Ok(ReconnectPolicy::Limited(3)));
        assert_eq!(
            ReconnectPolicy::from_limit(Some("three")),
            Err(ConfigError::InvalidReconnectLimit)
        );
    }
}
