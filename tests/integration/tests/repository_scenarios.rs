//! End-to-end repository scenarios through the public API.
//!
//! Writers seal records with the HMAC verifier, store them through the
//! repository, and readers verify what comes back.

use std::collections::HashSet;
use std::sync::Arc;

use credstash_core::TableConfig;
use credstash_integration_tests::{memory_repository, sealed_record, test_verifier};
use credstash_repository::{
    version, DynamoDbTable, IntegrityVerifier, RepositoryError, SecretRecord, SecretRepository,
    SelectOptions, TableRepository,
};

#[tokio::test]
async fn test_versioned_put_get_flow() {
    let repo = memory_repository();

    repo.put(&SecretRecord::new("db/password", "1", "K1", "C1", "T1"))
        .await
        .unwrap();
    let again = repo
        .put(&SecretRecord::new("db/password", "1", "K1b", "C1b", "T1b"))
        .await;
    assert!(matches!(again, Err(RepositoryError::Conflict { .. })));
    assert_eq!(repo.get("db/password").await.unwrap().ciphertext, "C1");

    repo.put(&SecretRecord::new("db/password", "2", "K2", "C2", "T2"))
        .await
        .unwrap();
    assert_eq!(repo.get("db/password").await.unwrap().version, "2");
}

#[tokio::test]
async fn test_sealed_record_verifies_after_get() {
    let repo = memory_repository();
    let verifier = test_verifier();

    let stored = sealed_record(&verifier, "api/token", 1, "alpha");
    repo.put(&stored).await.unwrap();

    let fetched = verifier.verified(repo.get("api/token").await.unwrap()).unwrap();
    assert_eq!(fetched, stored);
}

#[tokio::test]
async fn test_tampered_record_is_integrity_violation() {
    let repo = memory_repository();
    let verifier = test_verifier();

    // A writer that skipped sealing stores a tag that does not match.
    let forged =
        sealed_record(&verifier, "api/token", 1, "alpha").with_integrity_tag("00".repeat(32));
    repo.put(&forged).await.unwrap();

    let fetched = repo.get("api/token").await.unwrap();
    assert!(matches!(
        verifier.verified(fetched),
        Err(RepositoryError::IntegrityViolation { .. })
    ));
}

#[tokio::test]
async fn test_list_covers_every_put() {
    let repo = memory_repository();
    let verifier = test_verifier();

    let names = ["svc/a", "svc/b", "svc/c", "svc/d"];
    let mut puts = 0;
    for (i, name) in names.iter().enumerate() {
        for n in 1..=(i as u64 + 1) {
            repo.put(&sealed_record(&verifier, name, n, "x")).await.unwrap();
            puts += 1;
        }
    }

    let listed = repo.list().await.unwrap();
    assert_eq!(listed.len(), puts);
    assert!(listed.iter().all(SecretRecord::is_identity_only));
    let seen: HashSet<&str> = listed.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(seen, names.into_iter().collect());
}

#[tokio::test]
async fn test_select_limit_returns_newest_padded_versions() {
    let repo = memory_repository();
    let verifier = test_verifier();
    for n in [1, 2, 10, 9, 100] {
        repo.put(&sealed_record(&verifier, "svc", n, "x")).await.unwrap();
    }

    let newest = repo
        .select("svc", &SelectOptions::identity_only().limit(3))
        .await
        .unwrap();
    let versions: Vec<String> = newest.into_iter().map(|r| r.version).collect();
    let expected: Vec<String> = [100, 10, 9]
        .into_iter()
        .map(|n| version::pad(n).unwrap())
        .collect();
    assert_eq!(versions, expected);
}

/// Store `payload` as the next version, retrying when another writer wins the race.
async fn put_next_version<R: SecretRepository + ?Sized>(
    repo: &R,
    verifier: &impl IntegrityVerifier,
    name: &str,
    payload: &str,
) -> String {
    loop {
        let latest = repo.latest_version(name).await.unwrap();
        let next = version::next(latest.as_deref()).unwrap();
        let record = verifier.seal(SecretRecord::new(
            name,
            next.clone(),
            format!("wrapped-{payload}"),
            format!("ciphertext-{payload}"),
            "",
        ));
        match repo.put(&record).await {
            Ok(()) => return next,
            Err(RepositoryError::Conflict { .. }) => continue,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writers_never_overwrite() {
    let repo = Arc::new(memory_repository());
    let writers = 8;

    let handles: Vec<_> = (0..writers)
        .map(|i| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move {
                let verifier = test_verifier();
                put_next_version(repo.as_ref(), &verifier, "shared", &format!("writer-{i}")).await
            })
        })
        .collect();

    let mut versions = HashSet::new();
    for handle in handles {
        versions.insert(handle.await.unwrap());
    }

    // Every writer landed on its own version.
    assert_eq!(versions.len(), writers);
    let all = repo.select("shared", &SelectOptions::new()).await.unwrap();
    assert_eq!(all.len(), writers);

    let verifier = test_verifier();
    for record in all {
        assert!(verifier.verify(&record).is_ok());
    }
    assert_eq!(
        repo.get("shared").await.unwrap().version,
        version::pad(writers as u64).unwrap()
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_version_race_has_single_winner() {
    let repo = Arc::new(memory_repository());

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move {
                let record = sealed_record(&test_verifier(), "contended", 1, &format!("p{i}"));
                repo.put(&record).await
            })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => successes += 1,
            Err(RepositoryError::Conflict { .. }) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(successes, 1);
    assert!(test_verifier()
        .verify(&repo.get("contended").await.unwrap())
        .is_ok());
}

#[tokio::test]
async fn test_delete_then_get_not_found() {
    let repo = memory_repository();
    let verifier = test_verifier();
    let stored = sealed_record(&verifier, "short-lived", 1, "x");
    repo.put(&stored).await.unwrap();

    repo.delete(&stored).await.unwrap();
    assert!(matches!(
        repo.get("short-lived").await,
        Err(RepositoryError::NotFound(_))
    ));
}

/// Runs against DynamoDB Local: `docker run -p 8000:8000 amazon/dynamodb-local`.
#[tokio::test]
#[ignore = "requires DynamoDB Local on localhost:8000"]
async fn test_dynamodb_local_roundtrip() {
    let config = TableConfig {
        name: format!("credstash-it-{}", std::process::id()),
        region: Some("us-east-1".to_string()),
        endpoint_url: Some("http://localhost:8000".to_string()),
        ..TableConfig::default()
    };
    let table = DynamoDbTable::from_config(&config).await;
    table.create_table(1, 1).await.unwrap();

    let repo = TableRepository::new(table);
    let verifier = test_verifier();
    let first = sealed_record(&verifier, "db/password", 1, "one");
    repo.put(&first).await.unwrap();
    assert!(matches!(
        repo.put(&first).await,
        Err(RepositoryError::Conflict { .. })
    ));
    repo.put(&sealed_record(&verifier, "db/password", 2, "two"))
        .await
        .unwrap();

    let latest = verifier.verified(repo.get("db/password").await.unwrap()).unwrap();
    assert_eq!(latest.version, version::pad(2).unwrap());
    assert_eq!(repo.list().await.unwrap().len(), 2);
    assert_eq!(repo.delete_all("db/password").await.unwrap(), 2);
}
