//! Shared fixtures for the integration tests.

use credstash_repository::{
    version, HmacSha256Verifier, IntegrityVerifier, MemoryTable, SecretRecord, TableRepository,
};
use zeroize::Zeroizing;

/// A repository over a fresh in-memory table.
pub fn memory_repository() -> TableRepository<MemoryTable> {
    TableRepository::new(MemoryTable::new())
}

/// A verifier keyed with fixed test material.
pub fn test_verifier() -> HmacSha256Verifier {
    HmacSha256Verifier::new(Zeroizing::new(b"integration-test-hmac-key".to_vec()))
        .expect("non-empty key")
}

/// A sealed record for version `n` of `name`, as an encrypting caller would build it.
pub fn sealed_record(
    verifier: &impl IntegrityVerifier,
    name: &str,
    n: u64,
    payload: &str,
) -> SecretRecord {
    let record = SecretRecord::new(
        name,
        version::pad(n).expect("version in range"),
        format!("wrapped-{payload}"),
        format!("ciphertext-{payload}"),
        "",
    );
    verifier.seal(record)
}
