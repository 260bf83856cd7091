use crate::domain::record::PaymentStatus;
use crate::error::LedgerError;
use serde::Serialize;

/// Wire shape for the submission endpoint: `{"status": "submitted"}` on
/// success, `{"status": "duplicate"}` when the id is already in the
/// ledger. Any other error is the hosting layer's problem to surface.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase", tag = "status")]
pub enum SubmitReply {
    Submitted,
    Duplicate,
}

impl SubmitReply {
    pub fn from_result<T>(result: &Result<T, LedgerError>) -> Option<Self> {
        match result {
            Ok(_) => Some(SubmitReply::Submitted),
            Err(LedgerError::DuplicateTransaction(_)) => Some(SubmitReply::Duplicate),
            Err(_) => None,
        }
    }
}

/// Wire shape for the status poll: the record's state, or `"not_found"`
/// for an id the ledger has never seen.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum StatusReply {
    Pending,
    Approved,
    Rejected,
    NotFound,
}

impl From<Option<PaymentStatus>> for StatusReply {
    fn from(status: Option<PaymentStatus>) -> Self {
        match status {
            Some(PaymentStatus::Pending) => StatusReply::Pending,
            Some(PaymentStatus::Approved) => StatusReply::Approved,
            Some(PaymentStatus::Rejected) => StatusReply::Rejected,
            None => StatusReply::NotFound,
        }
    }
}
