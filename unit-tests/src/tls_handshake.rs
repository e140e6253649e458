use embassy_futures::block_on;
use embedded_tls::{TlsClock, TlsConnection};
use myrtio_sensor_core::ReconnectPolicy;
use myrtio_sensor_core::tls::open_broker_tls;
use rand_core::{CryptoRng, RngCore};

use crate::mocks::{BrokerStream, device_config};

const RECORD_READ_SIZE: usize = 16640;
const RECORD_WRITE_SIZE: usize = 4096;

struct TestClock;

impl TlsClock for TestClock {
    fn now() -> Option<u64> {
        Some(1_760_000_000)
    }
}

/// Deterministic byte source, good enough for a handshake that never completes
struct TestRng(u64);

impl RngCore for TestRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        self.0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for TestRng {}

#[test]
fn handshake_sends_client_hello_with_broker_name() {
    let stream = BrokerStream::default();
    stream.close();
    let session = device_config(ReconnectPolicy::Unlimited).session();
    let mut read_record = vec![0u8; RECORD_READ_SIZE];
    let mut write_record = vec![0u8; RECORD_WRITE_SIZE];
    let mut rng = TestRng(7);

    let mut tls = TlsConnection::new(stream.clone(), &mut read_record, &mut write_record);
    let result = block_on(open_broker_tls::<_, _, TestClock>(&mut tls, &session, &mut rng));

    // The broker hangs up before answering
    assert!(result.is_err());
    let sent = stream.sent();
    assert_eq!(sent[0], 0x16, "first record is a handshake");
    assert!(sent.windows(18).any(|w| w == b"broker.example.com"));
}
