//! Pairwise netting of debt relations.
//!
//! Only opposite-direction debts between the same two users are collapsed.
//! No attempt is made to reroute debts through third parties.

use crate::core::errors::{DebtError, ValidationError};
use crate::core::models::{AggregatedDebt, DebtRelation, Exposure};
use log::debug;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Key of an unordered pair inside one group, with `low < high`.
type PairKey = (String, String, String);

#[derive(Default)]
struct PairBalance {
    /// Positive when `low` owes `high`.
    net: Decimal,
    relation_ids: Vec<String>,
}

fn pair_key(relation: &DebtRelation) -> (PairKey, bool) {
    if relation.from < relation.to {
        ((relation.group_id.clone(), relation.from.clone(), relation.to.clone()), true)
    } else {
        ((relation.group_id.clone(), relation.to.clone(), relation.from.clone()), false)
    }
}

/// Collapses a group's relations into net, non-negative pairwise balances.
///
/// Fails on the first malformed relation. Settled relations are ignored.
/// Output is ordered by group, then the smaller user id, then the larger.
pub fn aggregate(relations: &[DebtRelation]) -> Result<Vec<AggregatedDebt>, DebtError> {
    for relation in relations {
        relation.validate()?;
    }

    let mut pairs: BTreeMap<PairKey, PairBalance> = BTreeMap::new();
    for relation in relations.iter().filter(|r| !r.is_settled()) {
        let (key, low_owes_high) = pair_key(relation);
        let entry = pairs.entry(key).or_default();
        let net = if low_owes_high {
            entry.net.checked_add(relation.amount)
        } else {
            entry.net.checked_sub(relation.amount)
        };
        entry.net = net.ok_or_else(|| ValidationError::AmountOverflow(relation.id.clone()))?;
        entry.relation_ids.push(relation.id.clone());
    }

    let aggregated: Vec<AggregatedDebt> = pairs
        .into_iter()
        .filter(|(_, balance)| !balance.net.is_zero())
        .map(|((group_id, low, high), mut balance)| {
            balance.relation_ids.sort();
            let (from, to) = if balance.net > Decimal::ZERO {
                (low, high)
            } else {
                (high, low)
            };
            AggregatedDebt {
                group_id,
                from,
                to,
                amount: balance.net.abs(),
                relation_ids: balance.relation_ids,
            }
        })
        .collect();

    debug!(
        "Aggregated {} debt relations into {} net balances",
        relations.len(),
        aggregated.len()
    );
    Ok(aggregated)
}

/// Sums what `user_id` is owed and owes after netting.
pub fn total_exposure(relations: &[DebtRelation], user_id: &str) -> Result<Exposure, DebtError> {
    let aggregated = aggregate(relations)?;
    Exposure::from_aggregated(&aggregated, user_id)
}

/// Sum of every net balance in an aggregated view.
pub fn total_outstanding(aggregated: &[AggregatedDebt]) -> Result<Decimal, DebtError> {
    aggregated.iter().try_fold(Decimal::ZERO, |total, debt| {
        total
            .checked_add(debt.amount)
            .ok_or_else(|| DebtError::from(ValidationError::AmountOverflow(debt.group_id.clone())))
    })
}

/// Buckets relations by originating transaction, keeping input order inside each bucket.
pub fn group_by_transaction(relations: &[DebtRelation]) -> BTreeMap<String, Vec<DebtRelation>> {
    let mut grouped: BTreeMap<String, Vec<DebtRelation>> = BTreeMap::new();
    for relation in relations {
        grouped
            .entry(relation.transaction_id.clone())
            .or_default()
            .push(relation.clone());
    }
    grouped
}
