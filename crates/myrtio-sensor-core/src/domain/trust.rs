//! Trust anchor checks
//!
//! The TLS verifier checks the broker certificate directly against the
//! embedded anchor, without intermediates, and only understands ECDSA and
//! Ed25519 signatures. The anchor therefore has to be the CA that issued the
//! broker certificate, and its key has to be EC or Ed25519.

use super::error::AnchorError;

const TAG_SEQUENCE: u8 = 0x30;
const TAG_OID: u8 = 0x06;
const TAG_VERSION: u8 = 0xA0;

/// 1.2.840.10045.2.1
const OID_EC_PUBLIC_KEY: &[u8] = &[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x02, 0x01];
/// 1.3.101.112
const OID_ED25519: &[u8] = &[0x2B, 0x65, 0x70];

/// Key type of an accepted trust anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorKey {
    Ec,
    Ed25519,
}

/// Read the subject key algorithm of a DER certificate and reject the ones the
/// broker verifier cannot use.
pub fn anchor_key(certificate: &[u8]) -> Result<AnchorKey, AnchorError> {
    let mut outer = Der(certificate);
    let mut certificate = Der(outer.expect(TAG_SEQUENCE)?);
    let mut tbs = Der(certificate.expect(TAG_SEQUENCE)?);

    if tbs.peek() == Some(TAG_VERSION) {
        tbs.next()?;
    }
    // serial, signature, issuer, validity, subject
    for _ in 0..5 {
        tbs.next()?;
    }

    let mut key_info = Der(tbs.expect(TAG_SEQUENCE)?);
    let mut algorithm = Der(key_info.expect(TAG_SEQUENCE)?);
    match algorithm.expect(TAG_OID)? {
        OID_EC_PUBLIC_KEY => Ok(AnchorKey::Ec),
        OID_ED25519 => Ok(AnchorKey::Ed25519),
        _ => Err(AnchorError::UnsupportedKey),
    }
}

/// Cursor over a run of DER elements
struct Der<'a>(&'a [u8]);

impl<'a> Der<'a> {
    fn peek(&self) -> Option<u8> {
        self.0.first().copied()
    }

    /// Take the next element, returning its tag and contents
    fn next(&mut self) -> Result<(u8, &'a [u8]), AnchorError> {
        let [tag, first, rest @ ..] = self.0 else {
            return Err(AnchorError::Truncated);
        };
        let (len, rest) = if first & 0x80 == 0 {
            (usize::from(*first), rest)
        } else {
            let count = usize::from(first & 0x7F);
            if count == 0 || count > 3 {
                return Err(AnchorError::Malformed);
            }
            if rest.len() < count {
                return Err(AnchorError::Truncated);
            }
            let len = rest[..count]
                .iter()
                .fold(0usize, |len, byte| (len << 8) | usize::from(*byte));
            (len, &rest[count..])
        };
        if rest.len() < len {
            return Err(AnchorError::Truncated);
        }
        let (contents, rest) = rest.split_at(len);
        self.0 = rest;
        Ok((*tag, contents))
    }

    fn expect(&mut self, tag: u8) -> Result<&'a [u8], AnchorError> {
        match self.next()? {
            (found, contents) if found == tag => Ok(contents),
            _ => Err(AnchorError::Malformed),
        }
    }
}
