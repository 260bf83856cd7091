use crate::domain::record::PaymentStatus;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Error, Debug)]
pub enum LedgerError {
    /// A record with this transaction id already exists, in any state.
    /// Resubmission is blocked even after the original has been resolved.
    #[error("transaction {0} has already been submitted")]
    DuplicateTransaction(String),

    /// No record with this transaction id exists in the ledger.
    #[error("transaction {0} not found")]
    NotFound(String),

    /// The record exists but is no longer pending. Carries the terminal
    /// status so callers can report which way the race went.
    #[error("transaction {txn_id} already processed ({status})")]
    AlreadyResolved {
        txn_id: String,
        status: PaymentStatus,
    },

    /// Ledger persistence failed. Fatal to the operation: the in-memory
    /// transition is discarded and the caller sees a retryable error.
    #[error("ledger persistence failed: {0}")]
    Persistence(#[from] std::io::Error),

    #[error("ledger serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Notification dispatch failed. Never fatal: the service logs and
    /// swallows this after the transition has been persisted.
    #[error("notification dispatch failed: {0}")]
    Notification(String),
}
