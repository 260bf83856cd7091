mod common;

use common::{RecordingNotifier, submission};
use payledger::application::ledger::LedgerService;
use payledger::domain::record::PaymentStatus;
use payledger::infrastructure::json_file::JsonFileStore;
use std::collections::BTreeSet;

fn file_service(path: &std::path::Path) -> LedgerService {
    LedgerService::new(
        Box::new(JsonFileStore::new(path)),
        Box::new(RecordingNotifier::new().0),
    )
}

#[tokio::test]
async fn test_ledger_survives_service_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("payments.json");

    {
        let service = file_service(&path);
        service
            .submit(submission("TXN1", "alice", "product1"))
            .await
            .unwrap();
        service.approve("TXN1").await.unwrap();
    }

    // A fresh service over the same file sees the approved record.
    let service = file_service(&path);
    assert_eq!(
        service.status_of("TXN1").await.unwrap(),
        Some(PaymentStatus::Approved)
    );
    assert_eq!(
        service.approved_products_for("alice").await.unwrap(),
        BTreeSet::from(["product1".to_string()])
    );
}

#[tokio::test]
async fn test_ledger_file_is_a_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("payments.json");

    let service = file_service(&path);
    service
        .submit(submission("TXN1", "alice", "product1"))
        .await
        .unwrap();
    service
        .submit(submission("TXN2", "bob", "product2"))
        .await
        .unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entries = parsed.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["txn_id"], "TXN1");
    assert_eq!(entries[0]["status"], "pending");
}

#[tokio::test]
async fn test_rewrite_leaves_no_stray_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("payments.json");

    let service = file_service(&path);
    for i in 0..5 {
        service
            .submit(submission(&format!("TXN{i}"), "alice", "product1"))
            .await
            .unwrap();
    }

    // Temp files from the atomic replace are renamed away, not leaked.
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn test_empty_file_reads_as_empty_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("payments.json");
    std::fs::write(&path, "").unwrap();

    let service = file_service(&path);
    assert!(service.records().await.unwrap().is_empty());
}
