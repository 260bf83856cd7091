use crate::domain::ports::{LedgerStoreBox, NotifierBox};
use crate::domain::record::{PaymentRecord, PaymentStatus, Submission};
use crate::error::{LedgerError, Result};
use chrono::Utc;
use std::collections::BTreeSet;
use tokio::sync::Mutex;

/// The payment ledger and its approval state machine.
///
/// `LedgerService` is the single owner of ledger mutations. Both approval
/// entry points (authenticated operator action and notification-channel
/// callback) call the same `approve`/`reject` methods here, so the
/// pending check and the full-ledger rewrite happen under one lock and the
/// race between them collapses to first-writer-wins.
pub struct LedgerService {
    store: LedgerStoreBox,
    notifier: NotifierBox,
    /// Serializes load → validate → mutate → persist for every mutation.
    /// Held across storage I/O only, never across notification I/O.
    write_lock: Mutex<()>,
}

impl LedgerService {
    pub fn new(store: LedgerStoreBox, notifier: NotifierBox) -> Self {
        Self {
            store,
            notifier,
            write_lock: Mutex::new(()),
        }
    }

    /// Records a new payment as pending.
    ///
    /// Fails with `DuplicateTransaction` if the id exists in any state.
    /// Persistence failure aborts the whole operation; the submission
    /// notification is fired only after the rewrite has landed and its
    /// failure is logged, not surfaced.
    pub async fn submit(&self, submission: Submission) -> Result<PaymentRecord> {
        let record = {
            let _guard = self.write_lock.lock().await;
            let mut records = self.store.load().await?;

            if records.iter().any(|r| r.txn_id == submission.txn_id) {
                return Err(LedgerError::DuplicateTransaction(submission.txn_id));
            }

            let record = submission.into_record(Utc::now());
            records.push(record.clone());
            self.store.replace(&records).await?;
            record
        };

        if let Err(e) = self.notifier.payment_submitted(&record).await {
            tracing::warn!(txn_id = %record.txn_id, "submission notification failed: {e}");
        }
        Ok(record)
    }

    pub async fn approve(&self, txn_id: &str) -> Result<PaymentRecord> {
        self.resolve(txn_id, PaymentStatus::Approved).await
    }

    pub async fn reject(&self, txn_id: &str) -> Result<PaymentRecord> {
        self.resolve(txn_id, PaymentStatus::Rejected).await
    }

    /// Applies the single allowed transition pending → `target`.
    ///
    /// The pending re-check runs under the write lock immediately before
    /// the mutation, so a concurrent approve+reject on the same id applies
    /// exactly one transition; the loser gets `AlreadyResolved` carrying
    /// the winner's status. The ledger length never changes here, only the
    /// one matching record's status field.
    async fn resolve(&self, txn_id: &str, target: PaymentStatus) -> Result<PaymentRecord> {
        let record = {
            let _guard = self.write_lock.lock().await;
            let mut records = self.store.load().await?;

            let record = records
                .iter_mut()
                .find(|r| r.txn_id == txn_id)
                .ok_or_else(|| LedgerError::NotFound(txn_id.to_string()))?;

            if record.status.is_terminal() {
                return Err(LedgerError::AlreadyResolved {
                    txn_id: txn_id.to_string(),
                    status: record.status,
                });
            }

            record.status = target;
            record.resolved_at = Some(Utc::now());
            let record = record.clone();
            self.store.replace(&records).await?;
            record
        };

        if let Err(e) = self.notifier.payment_resolved(&record).await {
            tracing::warn!(txn_id = %record.txn_id, "resolution notification failed: {e}");
        }
        Ok(record)
    }

    /// Looks up the current status of a transaction. Lock-free snapshot
    /// read; a stale `pending` is corrected by the client's next poll.
    pub async fn status_of(&self, txn_id: &str) -> Result<Option<PaymentStatus>> {
        let records = self.store.load().await?;
        Ok(records
            .iter()
            .find(|r| r.txn_id == txn_id)
            .map(|r| r.status))
    }

    /// Distinct product slugs this account has approved payments for.
    /// Feeds session grant materialization in the hosting layer. Linear
    /// scan, acceptable at manual-approval volumes.
    pub async fn approved_products_for(&self, account: &str) -> Result<BTreeSet<String>> {
        let records = self.store.load().await?;
        Ok(records
            .iter()
            .filter(|r| r.status == PaymentStatus::Approved && r.account == account)
            .map(|r| r.product.clone())
            .collect())
    }

    /// Records still awaiting an operator decision, for the admin listing.
    pub async fn pending(&self) -> Result<Vec<PaymentRecord>> {
        let records = self.store.load().await?;
        Ok(records
            .into_iter()
            .filter(|r| r.status == PaymentStatus::Pending)
            .collect())
    }

    /// The full ledger, in submission order.
    pub async fn records(&self) -> Result<Vec<PaymentRecord>> {
        self.store.load().await
    }
}
