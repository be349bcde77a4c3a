//! Unit tests for the in-process code store

use std::sync::Arc;
use std::time::Duration;

use vc_core::domain::entities::code_entry::{CodePolicy, SetStatus, VerifyStatus};
use vc_core::services::verification::CodeStore;

use crate::cache::LocalCodeStore;
use crate::InfrastructureError;

const KEY: &str = "phone_code:login:15801088210";

fn store() -> LocalCodeStore {
    LocalCodeStore::new(CodePolicy::default(), 100).unwrap()
}

#[test]
fn test_zero_capacity_is_rejected() {
    assert!(matches!(
        LocalCodeStore::new(CodePolicy::default(), 0),
        Err(InfrastructureError::Config(_))
    ));
}

#[tokio::test]
async fn test_verify_absent_key() {
    let store = store();
    assert_eq!(store.verify(KEY, "482913").await.unwrap(), VerifyStatus::NotFound);
}

#[tokio::test(start_paused = true)]
async fn test_set_within_cooldown_keeps_entry() {
    let store = store();
    assert_eq!(store.set(KEY, "482913").await.unwrap(), SetStatus::Ok);

    tokio::time::advance(Duration::from_secs(10)).await;
    assert_eq!(store.set(KEY, "111111").await.unwrap(), SetStatus::TooSoon);

    // Original code still valid with its full budget
    assert_eq!(store.verify(KEY, "111111").await.unwrap(), VerifyStatus::NoMatch);
    assert_eq!(store.verify(KEY, "482913").await.unwrap(), VerifyStatus::Match);
}

#[tokio::test(start_paused = true)]
async fn test_set_after_cooldown_replaces_code_and_attempts() {
    let store = store();
    store.set(KEY, "482913").await.unwrap();
    assert_eq!(store.verify(KEY, "000000").await.unwrap(), VerifyStatus::NoMatch);
    assert_eq!(store.verify(KEY, "000000").await.unwrap(), VerifyStatus::NoMatch);

    tokio::time::advance(Duration::from_secs(61)).await;
    assert_eq!(store.set(KEY, "135790").await.unwrap(), SetStatus::Ok);

    // Fresh budget of three: two misses, then the new code matches
    assert_eq!(store.verify(KEY, "482913").await.unwrap(), VerifyStatus::NoMatch);
    assert_eq!(store.verify(KEY, "000000").await.unwrap(), VerifyStatus::NoMatch);
    assert_eq!(store.verify(KEY, "135790").await.unwrap(), VerifyStatus::Match);
}

#[tokio::test]
async fn test_exhaustion_does_not_decrement_further() {
    let store = store();
    store.set(KEY, "482913").await.unwrap();

    for _ in 0..3 {
        assert_eq!(store.verify(KEY, "000000").await.unwrap(), VerifyStatus::NoMatch);
    }
    for _ in 0..2 {
        assert_eq!(
            store.verify(KEY, "482913").await.unwrap(),
            VerifyStatus::TooManyAttempts
        );
    }
}

#[tokio::test]
async fn test_match_consumes_entry() {
    let store = store();
    store.set(KEY, "482913").await.unwrap();

    assert_eq!(store.verify(KEY, "482913").await.unwrap(), VerifyStatus::Match);
    assert_eq!(store.verify(KEY, "482913").await.unwrap(), VerifyStatus::NotFound);
    assert!(store.is_empty().await);

    // Consumed key accepts a new code without waiting for the cooldown
    assert_eq!(store.set(KEY, "246810").await.unwrap(), SetStatus::Ok);
}

#[tokio::test(start_paused = true)]
async fn test_expired_entry_is_absent() {
    let store = store();
    store.set(KEY, "482913").await.unwrap();

    tokio::time::advance(Duration::from_secs(600)).await;
    assert_eq!(store.verify(KEY, "482913").await.unwrap(), VerifyStatus::NotFound);
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn test_capacity_evicts_least_recently_used() {
    let store = LocalCodeStore::new(CodePolicy::default(), 2).unwrap();
    store.set("k:a", "111111").await.unwrap();
    store.set("k:b", "222222").await.unwrap();
    store.set("k:c", "333333").await.unwrap();

    assert_eq!(store.len().await, 2);
    assert_eq!(store.verify("k:a", "111111").await.unwrap(), VerifyStatus::NotFound);
    assert_eq!(store.verify("k:c", "333333").await.unwrap(), VerifyStatus::Match);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_wrong_codes_spend_exactly_budget() {
    let store = Arc::new(store());
    store.set(KEY, "482913").await.unwrap();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.verify(KEY, "000000").await.unwrap() })
        })
        .collect();

    let mut no_match = 0;
    let mut too_many = 0;
    for handle in handles {
        match handle.await.unwrap() {
            VerifyStatus::NoMatch => no_match += 1,
            VerifyStatus::TooManyAttempts => too_many += 1,
            other => panic!("Unexpected status {:?}", other),
        }
    }
    assert_eq!(no_match, 3);
    assert_eq!(too_many, 7);

    // Even the right code is refused once the budget is spent
    assert_eq!(
        store.verify(KEY, "482913").await.unwrap(),
        VerifyStatus::TooManyAttempts
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sets_create_one_entry() {
    let store = Arc::new(store());

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let store = store.clone();
            let code = format!("{:06}", i);
            tokio::spawn(async move { (code.clone(), store.set(KEY, &code).await.unwrap()) })
        })
        .collect();

    let mut stored = Vec::new();
    for handle in handles {
        let (code, status) = handle.await.unwrap();
        match status {
            SetStatus::Ok => stored.push(code),
            SetStatus::TooSoon => {}
            other => panic!("Unexpected status {:?}", other),
        }
    }
    assert_eq!(stored.len(), 1);

    // The single stored code is the one that verifies
    assert_eq!(store.verify(KEY, &stored[0]).await.unwrap(), VerifyStatus::Match);
}
