use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product slug assigned to submissions that do not name one. Early
/// storefront deployments sold a single course and omitted the field.
pub const DEFAULT_PRODUCT: &str = "course";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Approved,
    Rejected,
}

impl PaymentStatus {
    /// Approved and rejected are terminal; only pending records may
    /// transition.
    pub fn is_terminal(&self) -> bool {
        *self != PaymentStatus::Pending
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Approved => "approved",
            PaymentStatus::Rejected => "rejected",
        };
        write!(f, "{s}")
    }
}

/// One submitted payment. Created pending, mutated at most once to a
/// terminal status, never deleted.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PaymentRecord {
    /// Unique key across the whole ledger. Caller-supplied; the format is
    /// not validated.
    pub txn_id: String,
    /// Stable account identifier. Grant matching uses this field only;
    /// matching on the display name would let a name collision leak
    /// another account's purchases.
    pub account: String,
    /// Display name, denormalized for operator messages.
    pub user: String,
    pub product: String,
    pub status: PaymentStatus,
    /// Path to the payment-screenshot evidence. Absent for checkout flows
    /// that verify server-side instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ss_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Intake payload for a new payment. Turned into a pending `PaymentRecord`
/// by the ledger service.
#[derive(Debug, Deserialize, Clone)]
pub struct Submission {
    pub txn_id: String,
    pub account: String,
    pub user: String,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub ss_path: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub course_name: Option<String>,
}

impl Submission {
    pub fn into_record(self, submitted_at: DateTime<Utc>) -> PaymentRecord {
        PaymentRecord {
            txn_id: self.txn_id,
            account: self.account,
            user: self.user,
            product: self
                .product
                .unwrap_or_else(|| DEFAULT_PRODUCT.to_string()),
            status: PaymentStatus::Pending,
            ss_path: self.ss_path,
            amount: self.amount,
            course_name: self.course_name,
            submitted_at,
            resolved_at: None,
        }
    }
}
