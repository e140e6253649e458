use embassy_time::Instant;
use embedded_tls::TlsClock;

use crate::infrastructure::config;

/// Wall clock for certificate validity checks.
///
/// There is no RTC, so the build time plus uptime is the best estimate of now.
pub(crate) struct FirmwareClock;

impl TlsClock for FirmwareClock {
    fn now() -> Option<u64> {
        let built_at = config::FIRMWARE.built_at.parse::<u64>().ok()?;
        Some(built_at + Instant::now().as_secs())
    }
}
