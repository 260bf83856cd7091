use crate::domain::ports::LedgerStore;
use crate::domain::record::PaymentRecord;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory ledger.
///
/// `Clone` shares the underlying list. Used in tests and for runs where
/// durability does not matter.
#[derive(Default, Clone)]
pub struct InMemoryLedgerStore {
    records: Arc<RwLock<Vec<PaymentRecord>>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn load(&self) -> Result<Vec<PaymentRecord>> {
        let records = self.records.read().await;
        Ok(records.clone())
    }

    async fn replace(&self, records: &[PaymentRecord]) -> Result<()> {
        let mut current = self.records.write().await;
        *current = records.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::Submission;
    use chrono::Utc;

    #[tokio::test]
    async fn test_replace_and_load() {
        let store = InMemoryLedgerStore::new();
        assert!(store.load().await.unwrap().is_empty());

        let record = Submission {
            txn_id: "TXN1".to_string(),
            account: "alice".to_string(),
            user: "Alice".to_string(),
            product: None,
            ss_path: None,
            amount: None,
            course_name: None,
        }
        .into_record(Utc::now());

        store.replace(std::slice::from_ref(&record)).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, vec![record]);
    }
}
