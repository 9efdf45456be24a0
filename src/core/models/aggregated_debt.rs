use crate::core::errors::{DebtError, ValidationError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Net balance between two users of a group: `from` owes `to` `amount`.
///
/// Derived on demand, never stored. `relation_ids` lists every non-zero
/// relation between the pair, in either direction, sorted.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AggregatedDebt {
    pub group_id: String,
    pub from: String,
    pub to: String,
    pub amount: Decimal,
    pub relation_ids: Vec<String>,
}

/// What one user is owed and owes across an aggregated view.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Exposure {
    pub owed: Decimal,
    pub owing: Decimal,
}

impl Exposure {
    pub fn from_aggregated(aggregated: &[AggregatedDebt], user_id: &str) -> Result<Self, DebtError> {
        aggregated.iter().try_fold(Exposure::default(), |mut acc, debt| -> Result<Self, DebtError> {
            let total = if debt.to == user_id {
                &mut acc.owed
            } else if debt.from == user_id {
                &mut acc.owing
            } else {
                return Ok(acc);
            };
            *total = total
                .checked_add(debt.amount)
                .ok_or_else(|| ValidationError::AmountOverflow(user_id.to_string()))?;
            Ok(acc)
        })
    }

    pub fn net(&self) -> Decimal {
        self.owed - self.owing
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct GroupBalances {
    pub group_id: String,
    pub balances: Vec<AggregatedDebt>,
    pub total_outstanding: Decimal,
}
