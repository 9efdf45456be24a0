use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::errors::ValidationError;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum DebtState {
    Outstanding,
    Settled,
}

impl std::fmt::Display for DebtState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DebtState::Outstanding => "OUTSTANDING",
            DebtState::Settled => "SETTLED",
        };
        write!(f, "{}", s)
    }
}

/// A directed obligation: `from` owes `to` the given amount.
///
/// Settled relations (amount zero) are kept for history and skipped by
/// aggregation.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DebtRelation {
    pub id: String,
    pub transaction_id: String,
    pub group_id: String,
    pub from: String,
    pub to: String,
    pub amount: Decimal,
    /// Time of the originating transaction.
    pub created_at: DateTime<Utc>,
    pub last_remind_at: Option<DateTime<Utc>>,
    pub last_penalty_at: Option<DateTime<Utc>>,
}

impl DebtRelation {
    pub fn new(
        id: impl Into<String>,
        transaction_id: impl Into<String>,
        group_id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        amount: Decimal,
        created_at: DateTime<Utc>,
    ) -> Self {
        DebtRelation {
            id: id.into(),
            transaction_id: transaction_id.into(),
            group_id: group_id.into(),
            from: from.into(),
            to: to.into(),
            amount,
            created_at,
            last_remind_at: None,
            last_penalty_at: None,
        }
    }

    pub fn state(&self) -> DebtState {
        if self.amount > Decimal::ZERO {
            DebtState::Outstanding
        } else {
            DebtState::Settled
        }
    }

    pub fn is_settled(&self) -> bool {
        self.state() == DebtState::Settled
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.from == self.to {
            return Err(ValidationError::SelfLoop(self.id.clone()));
        }
        if self.amount < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount(self.id.clone()));
        }
        Ok(())
    }
}
