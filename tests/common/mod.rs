#![allow(dead_code)]

use async_trait::async_trait;
use payledger::application::ledger::LedgerService;
use payledger::domain::ports::{LedgerStore, Notifier};
use payledger::domain::record::{PaymentRecord, Submission};
use payledger::error::{LedgerError, Result};
use payledger::infrastructure::memory::InMemoryLedgerStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub fn submission(txn_id: &str, account: &str, product: &str) -> Submission {
    Submission {
        txn_id: txn_id.to_string(),
        account: account.to_string(),
        user: account.to_string(),
        product: Some(product.to_string()),
        ss_path: None,
        amount: None,
        course_name: None,
    }
}

pub fn service() -> LedgerService {
    LedgerService::new(
        Box::new(InMemoryLedgerStore::new()),
        Box::new(RecordingNotifier::new().0),
    )
}

/// Captures every dispatched notification as `(event, txn_id)` pairs.
#[derive(Clone)]
pub struct RecordingNotifier {
    pub events: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (Self, Arc<Mutex<Vec<(String, String)>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                events: events.clone(),
            },
            events,
        )
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn payment_submitted(&self, record: &PaymentRecord) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(("submitted".to_string(), record.txn_id.clone()));
        Ok(())
    }

    async fn payment_resolved(&self, record: &PaymentRecord) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push((record.status.to_string(), record.txn_id.clone()));
        Ok(())
    }
}

/// Always fails to deliver, simulating an unreachable operator channel.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn payment_submitted(&self, _record: &PaymentRecord) -> Result<()> {
        Err(LedgerError::Notification("channel down".to_string()))
    }

    async fn payment_resolved(&self, _record: &PaymentRecord) -> Result<()> {
        Err(LedgerError::Notification("channel down".to_string()))
    }
}

/// Wraps an in-memory ledger and fails every rewrite while `broken` is
/// set, simulating a disk write error.
#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: InMemoryLedgerStore,
    pub broken: Arc<AtomicBool>,
}

#[async_trait]
impl LedgerStore for FlakyStore {
    async fn load(&self) -> Result<Vec<PaymentRecord>> {
        self.inner.load().await
    }

    async fn replace(&self, records: &[PaymentRecord]) -> Result<()> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(LedgerError::Persistence(std::io::Error::other(
                "disk full",
            )));
        }
        self.inner.replace(records).await
    }
}
