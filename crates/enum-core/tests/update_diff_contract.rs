//! Contract Test: Update Computes Minimal Mutations
//!
//! Constraints verified:
//! - Only numbers removed from the set are deleted
//! - Only numbers added to the set are created
//! - Equal sets produce no backend call
//! - Delete phase runs before create phase
//! - Strict-mode abort in the delete phase skips the create phase
//! - Lenient mode merges errors of both phases

mod common;

use common::*;
use enum_core::record::ChangeType;
use enum_core::{EnumConfig, EnumEngine, Error, SyncStatus};

fn engine_with(transport: &MockTransport, config: EnumConfig) -> EnumEngine {
    EnumEngine::new(Box::new(MockTransport::sharing_counters_with(transport)), config)
        .expect("engine construction succeeds")
}

#[tokio::test]
async fn adding_a_number_only_creates_it() {
    let transport = MockTransport::new();
    let engine = engine_with(&transport, minimal_config());

    let report = engine
        .update(Some("111"), None, Some("111"), Some("222"))
        .await
        .unwrap();

    assert_eq!(report.status, SyncStatus::Ok);
    assert!(report.deleted.is_empty());
    assert_eq!(report.created, vec!["222".to_string()]);
    assert!(report.delete.is_none());

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].changes.len(), 1);
    assert_eq!(calls[0].changes[0].name, "2.2.2.e164.arpa.");
    assert_eq!(calls[0].changes[0].changetype, ChangeType::Replace);
}

#[tokio::test]
async fn replacing_numbers_deletes_then_creates() {
    let transport = MockTransport::new();
    let engine = engine_with(&transport, minimal_config());

    let report = engine
        .update(Some("111"), Some("222"), Some("333"), None)
        .await
        .unwrap();

    assert_eq!(report.status, SyncStatus::Ok);
    assert_eq!(report.deleted, vec!["111".to_string(), "222".to_string()]);
    assert_eq!(report.created, vec!["333".to_string()]);

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);

    assert!(calls[0].changes.iter().all(|c| c.changetype == ChangeType::Delete));
    let deleted: Vec<&str> = calls[0].changes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(deleted, vec!["1.1.1.e164.arpa.", "2.2.2.e164.arpa."]);

    assert_eq!(calls[1].changes.len(), 1);
    assert_eq!(calls[1].changes[0].changetype, ChangeType::Replace);
    assert_eq!(calls[1].changes[0].name, "3.3.3.e164.arpa.");
}

#[tokio::test]
async fn equal_sets_make_no_calls() {
    let transport = MockTransport::new();
    let engine = engine_with(&transport, two_endpoint_config());

    // Same numbers, different formatting and order
    let report = engine
        .update(Some("+111"), Some("222"), Some("222"), Some("1-1-1"))
        .await
        .unwrap();

    assert_eq!(report.status, SyncStatus::Ok);
    assert!(report.deleted.is_empty());
    assert!(report.created.is_empty());
    assert_eq!(transport.apply_call_count(), 0);
}

#[tokio::test]
async fn strict_delete_failure_skips_create_phase() {
    let transport = MockTransport::new().failing_for_msisdn("111");
    let engine = engine_with(&transport, minimal_config().with_strict_mode(true));

    let result = engine.update(Some("111"), None, Some("333"), None).await;

    match result {
        Err(Error::StrictMode { operation, .. }) => assert_eq!(operation, "deletion"),
        other => panic!("expected strict-mode deletion error, got {:?}", other),
    }

    let calls = transport.calls();
    assert_eq!(calls.len(), 1, "Create phase must not run after a delete-phase abort");
    assert_eq!(calls[0].changes[0].changetype, ChangeType::Delete);
}

#[tokio::test]
async fn strict_create_failure_after_successful_delete() {
    let transport = MockTransport::new().failing_for_msisdn("333");
    let engine = engine_with(&transport, minimal_config().with_strict_mode(true));

    let err = engine
        .update(Some("111"), None, Some("333"), None)
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("ENUM creation failed: ns1/e164.arpa: "));
    assert_eq!(transport.apply_call_count(), 2);
}

#[tokio::test]
async fn lenient_update_merges_errors_of_both_phases() {
    let transport = MockTransport::new()
        .failing_for_msisdn("111")
        .failing_for_msisdn("333");
    let engine = engine_with(&transport, minimal_config());

    let report = engine
        .update(Some("111"), None, Some("333"), None)
        .await
        .unwrap();

    assert_eq!(report.status, SyncStatus::Partial);
    assert_eq!(report.errors.len(), 2);
    assert!(report.errors.iter().all(|e| e.starts_with("ns1/e164.arpa: ")));

    assert_eq!(report.delete.as_ref().unwrap().status, SyncStatus::Partial);
    assert_eq!(report.create.as_ref().unwrap().status, SyncStatus::Partial);
    assert_eq!(report.deleted, vec!["111".to_string()]);
    assert_eq!(report.created, vec!["333".to_string()]);
}

#[tokio::test]
async fn removing_all_numbers_only_deletes() {
    let transport = MockTransport::new();
    let engine = engine_with(&transport, minimal_config());

    let report = engine.update(Some("111"), None, None, None).await.unwrap();

    assert_eq!(report.deleted, vec!["111".to_string()]);
    assert!(report.created.is_empty());
    assert_eq!(transport.apply_call_count(), 1);
}
