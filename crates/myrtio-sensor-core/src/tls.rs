//! TLS 1.3 handshake with the broker
//!
//! The broker host is sent as SNI and the broker certificate is checked against
//! the embedded trust anchor. The verifier does not walk intermediates, see
//! [`crate::domain::trust`] for the anchors it can use.

use embedded_io_async::{Read, Write};
use embedded_tls::webpki::CertVerifier;
use embedded_tls::{
    Aes128GcmSha256, Certificate, TlsClock, TlsConfig, TlsConnection, TlsContext, TlsError,
};
use rand_core::{CryptoRng, RngCore};

use crate::domain::config::SessionConfig;

pub type BrokerCipherSuite = Aes128GcmSha256;

/// Largest certificate the verifier accepts
pub const MAX_CERT_SIZE: usize = 4096;

/// Certificate verifier checking validity against clock `C`
pub type BrokerVerifier<'a, C> = CertVerifier<'a, BrokerCipherSuite, C, MAX_CERT_SIZE>;

pub fn broker_tls_config(session: &SessionConfig) -> TlsConfig<'_, BrokerCipherSuite> {
    TlsConfig::new()
        .with_server_name(session.broker.host.as_str())
        .with_ca(Certificate::X509(session.trust_anchor))
}

/// Run the handshake on `tls`, verifying the broker with clock `C`.
pub async fn open_broker_tls<'a, S, R, C>(
    tls: &mut TlsConnection<'a, S, BrokerCipherSuite>,
    session: &SessionConfig,
    rng: &mut R,
) -> Result<(), TlsError>
where
    S: Read + Write + 'a,
    R: CryptoRng + RngCore,
    C: TlsClock + 'static,
{
    let config = broker_tls_config(session);
    tls.open::<R, BrokerVerifier<'_, C>>(TlsContext::new(&config, rng))
        .await
}
