use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One payer contribution or one debtor share of a transaction.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Share {
    pub user_id: String,
    pub amount: Decimal,
}

impl Share {
    pub fn new(user_id: impl Into<String>, amount: Decimal) -> Self {
        Share {
            user_id: user_id.into(),
            amount,
        }
    }
}

/// A group spending event. Edits produce a new transaction.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Transaction {
    pub id: String,
    pub group_id: String,
    pub description: String,
    pub amount: Decimal,
    pub payers: Vec<Share>,
    pub debtors: Vec<Share>,
    pub created_at: DateTime<Utc>,
}
