use crate::application::ledger::LedgerService;
use crate::domain::record::PaymentStatus;
use crate::error::{LedgerError, Result};

/// Action parsed from a notification-channel callback token. The tokens
/// are the `callback_data` values attached to the inline approval
/// keyboard: `approve_<txn_id>` or `reject_<txn_id>`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum CallbackAction {
    Approve(String),
    Reject(String),
}

impl CallbackAction {
    pub fn parse(token: &str) -> Option<Self> {
        if let Some(txn_id) = token.strip_prefix("approve_") {
            (!txn_id.is_empty()).then(|| CallbackAction::Approve(txn_id.to_string()))
        } else if let Some(txn_id) = token.strip_prefix("reject_") {
            (!txn_id.is_empty()).then(|| CallbackAction::Reject(txn_id.to_string()))
        } else {
            None
        }
    }
}

/// What the callback handler reports back to the operator. The channel
/// acknowledges receipt before the transition is attempted, so none of
/// these are transport errors; only a persistence failure propagates.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CallbackOutcome {
    Applied(PaymentStatus),
    /// Lost the race against the other entry point (or a repeated tap).
    AlreadyProcessed(PaymentStatus),
    UnknownTransaction,
    MalformedToken,
}

/// Applies a callback token against the ledger. Both approval channels
/// converge here on the same service methods, so the dual-trigger race is
/// resolved by the service's write lock, not by this layer.
pub async fn apply_callback(service: &LedgerService, token: &str) -> Result<CallbackOutcome> {
    let Some(action) = CallbackAction::parse(token) else {
        return Ok(CallbackOutcome::MalformedToken);
    };

    let result = match &action {
        CallbackAction::Approve(id) => service.approve(id).await,
        CallbackAction::Reject(id) => service.reject(id).await,
    };

    match result {
        Ok(record) => Ok(CallbackOutcome::Applied(record.status)),
        Err(LedgerError::AlreadyResolved { status, .. }) => {
            Ok(CallbackOutcome::AlreadyProcessed(status))
        }
        Err(LedgerError::NotFound(_)) => Ok(CallbackOutcome::UnknownTransaction),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_approve() {
        assert_eq!(
            CallbackAction::parse("approve_TXN1"),
            Some(CallbackAction::Approve("TXN1".to_string()))
        );
    }

    #[test]
    fn test_parse_reject() {
        assert_eq!(
            CallbackAction::parse("reject_TXN1"),
            Some(CallbackAction::Reject("TXN1".to_string()))
        );
    }

    #[test]
    fn test_parse_preserves_underscores_in_id() {
        // Transaction ids are caller-supplied and may contain underscores.
        assert_eq!(
            CallbackAction::parse("approve_pay_0042_x"),
            Some(CallbackAction::Approve("pay_0042_x".to_string()))
        );
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(CallbackAction::parse("delete_TXN1"), None);
        assert_eq!(CallbackAction::parse("approve_"), None);
        assert_eq!(CallbackAction::parse(""), None);
        assert_eq!(CallbackAction::parse("approveTXN1"), None);
    }
}
