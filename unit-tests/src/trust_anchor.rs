use myrtio_sensor_core::domain::error::AnchorError;
use myrtio_sensor_core::domain::trust::{AnchorKey, anchor_key};

const EC_PUBLIC_KEY: &[u8] = &[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x02, 0x01];
const ED25519: &[u8] = &[0x2B, 0x65, 0x70];
const RSA_ENCRYPTION: &[u8] = &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x01];
const ECDSA_WITH_SHA256: &[u8] = &[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x04, 0x03, 0x02];
const SHA256_WITH_RSA: &[u8] = &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x0B];

fn tlv(tag: u8, contents: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    match contents.len() {
        len @ 0..=0x7F => out.push(u8::try_from(len).unwrap()),
        len @ 0x80..=0xFF => out.extend([0x81, u8::try_from(len).unwrap()]),
        len => {
            out.push(0x82);
            out.extend(u16::try_from(len).unwrap().to_be_bytes());
        }
    }
    out.extend_from_slice(contents);
    out
}

fn sequence(parts: &[Vec<u8>]) -> Vec<u8> {
    tlv(0x30, &parts.concat())
}

fn algorithm(oid: &[u8]) -> Vec<u8> {
    sequence(&[tlv(0x06, oid)])
}

fn name(common_name: &str) -> Vec<u8> {
    let attribute = sequence(&[tlv(0x06, &[0x55, 0x04, 0x03]), tlv(0x0C, common_name.as_bytes())]);
    sequence(&[tlv(0x31, &attribute)])
}

/// Self-signed shaped certificate with the given key and signature algorithms
fn certificate(key: &[u8], signature: &[u8], with_version: bool) -> Vec<u8> {
    let mut tbs = Vec::new();
    if with_version {
        tbs.push(tlv(0xA0, &tlv(0x02, &[0x02])));
    }
    tbs.push(tlv(0x02, &[0x01, 0x23, 0x45]));
    tbs.push(algorithm(signature));
    tbs.push(name("Broker CA"));
    tbs.push(sequence(&[
        tlv(0x17, b"250101000000Z"),
        tlv(0x17, b"350101000000Z"),
    ]));
    tbs.push(name("Broker CA"));
    tbs.push(sequence(&[algorithm(key), tlv(0x03, &[0x00; 66])]));

    sequence(&[
        sequence(&tbs),
        algorithm(signature),
        tlv(0x03, &[0x00; 72]),
    ])
}

#[test]
fn ec_anchor_is_accepted() {
    let der = certificate(EC_PUBLIC_KEY, ECDSA_WITH_SHA256, true);
    assert_eq!(anchor_key(&der), Ok(AnchorKey::Ec));
}

#[test]
fn ed25519_anchor_is_accepted() {
    let der = certificate(ED25519, ED25519, true);
    assert_eq!(anchor_key(&der), Ok(AnchorKey::Ed25519));
}

#[test]
fn version_field_is_optional() {
    let der = certificate(EC_PUBLIC_KEY, ECDSA_WITH_SHA256, false);
    assert_eq!(anchor_key(&der), Ok(AnchorKey::Ec));
}

#[test]
fn rsa_anchor_is_rejected() {
    let der = certificate(RSA_ENCRYPTION, SHA256_WITH_RSA, true);
    assert_eq!(anchor_key(&der), Err(AnchorError::UnsupportedKey));
}

#[test]
fn rsa_key_signed_with_ecdsa_is_rejected() {
    let der = certificate(RSA_ENCRYPTION, ECDSA_WITH_SHA256, true);
    assert_eq!(anchor_key(&der), Err(AnchorError::UnsupportedKey));
}

#[test]
fn large_certificate_uses_long_lengths() {
    let der = certificate(EC_PUBLIC_KEY, ECDSA_WITH_SHA256, true);
    assert!(der.len() > 0xFF);
    assert_eq!(der[1], 0x82);
    assert_eq!(anchor_key(&der), Ok(AnchorKey::Ec));
}

#[test]
fn truncated_certificate_is_rejected() {
    let der = certificate(EC_PUBLIC_KEY, ECDSA_WITH_SHA256, true);
    assert_eq!(anchor_key(&der[..der.len() / 2]), Err(AnchorError::Truncated));
    assert_eq!(anchor_key(&[]), Err(AnchorError::Truncated));
}

#[test]
fn pem_text_is_rejected() {
    let pem = b"-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n";
    assert_eq!(anchor_key(pem), Err(AnchorError::Malformed));
}
