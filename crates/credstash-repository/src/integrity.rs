//! HMAC-SHA256 integrity tags over stored ciphertext.
//!
//! The repository stores tags opaquely; this module is the collaborator that
//! computes them before `put` and checks them after `get`. A failed check is
//! reported as [`RepositoryError::IntegrityViolation`] and the record is not
//! handed back.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{RepositoryError, Result};
use crate::types::SecretRecord;

type HmacSha256 = Hmac<Sha256>;

/// Computes and verifies integrity tags for records.
pub trait IntegrityVerifier: Send + Sync {
    /// Tag for `record`'s current contents.
    fn compute(&self, record: &SecretRecord) -> String;

    /// Check `record`'s tag against its contents.
    fn verify(&self, record: &SecretRecord) -> Result<()>;

    /// Return `record` with a freshly computed tag.
    fn seal(&self, record: SecretRecord) -> SecretRecord {
        let tag = self.compute(&record);
        record.with_integrity_tag(tag)
    }

    /// Return `record` only if its tag verifies.
    fn verified(&self, record: SecretRecord) -> Result<SecretRecord> {
        self.verify(&record)?;
        Ok(record)
    }
}

/// HMAC-SHA256 over the ciphertext, hex encoded.
///
/// The key is consumed at construction; only the keyed MAC state is kept.
#[derive(Clone)]
pub struct HmacSha256Verifier {
    mac: HmacSha256,
}

impl HmacSha256Verifier {
    /// Build a verifier from raw key material.
    pub fn new(key: Zeroizing<Vec<u8>>) -> Result<Self> {
        if key.is_empty() {
            return Err(RepositoryError::InvalidKey(
                "HMAC key must not be empty".to_string(),
            ));
        }
        let mac = HmacSha256::new_from_slice(&key)
            .map_err(|e| RepositoryError::InvalidKey(e.to_string()))?;
        Ok(Self { mac })
    }

    fn violation(record: &SecretRecord) -> RepositoryError {
        RepositoryError::IntegrityViolation {
            name: record.name.clone(),
            version: record.version.clone(),
        }
    }
}

impl std::fmt::Debug for HmacSha256Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("HmacSha256Verifier([REDACTED])")
    }
}

impl IntegrityVerifier for HmacSha256Verifier {
    fn compute(&self, record: &SecretRecord) -> String {
        let tag = self
            .mac
            .clone()
            .chain_update(record.ciphertext.as_bytes())
            .finalize()
            .into_bytes();
        hex::encode(tag)
    }

    fn verify(&self, record: &SecretRecord) -> Result<()> {
        let expected = hex::decode(&record.integrity_tag).map_err(|_| Self::violation(record))?;
        // verify_slice compares in constant time
        self.mac
            .clone()
            .chain_update(record.ciphertext.as_bytes())
            .verify_slice(&expected)
            .map_err(|_| Self::violation(record))
    }
}
