use super::record::PaymentRecord;
use crate::error::Result;
use async_trait::async_trait;

/// Storage port for the ledger. The ledger is persisted as the entire
/// ordered list; `replace` rewrites it wholesale on every mutation.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn load(&self) -> Result<Vec<PaymentRecord>>;
    async fn replace(&self, records: &[PaymentRecord]) -> Result<()>;
}

/// Operator-notification port. Implementations are best-effort: the
/// service never rolls back a persisted transition on a notify error.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Announce a new pending payment, carrying the approve/reject actions.
    async fn payment_submitted(&self, record: &PaymentRecord) -> Result<()>;
    /// Confirm a resolved payment (approved or rejected).
    async fn payment_resolved(&self, record: &PaymentRecord) -> Result<()>;
}

pub type LedgerStoreBox = Box<dyn LedgerStore>;
pub type NotifierBox = Box<dyn Notifier>;
