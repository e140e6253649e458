use esp_hal::rng::Rng;
use myrtio_sensor_core::domain::ports::Entropy;
use rand_core::{CryptoRng, RngCore};

pub(crate) fn get_seed() -> u64 {
    let rng = Rng::new();
    u64::from(rng.random()) << 32 | u64::from(rng.random())
}

/// Hardware random number generator.
///
/// Feeds the synthetic sensors and the TLS handshake. The generator is only
/// truly random while the radio is running, which is the case for both.
pub(crate) struct HardwareRng {
    rng: Rng,
}

impl HardwareRng {
    pub(crate) fn new() -> Self {
        Self { rng: Rng::new() }
    }
}

impl Entropy for HardwareRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.random()
    }
}

impl RngCore for HardwareRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.random()
    }

    fn next_u64(&mut self) -> u64 {
        u64::from(self.rng.random()) << 32 | u64::from(self.rng.random())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.rng.random().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for HardwareRng {}
