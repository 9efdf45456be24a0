//! Turns a recorded transaction into the debt relations its split implies.

use crate::core::errors::DebtError;
use crate::core::models::{DebtRelation, Share, Transaction};
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashSet;
use uuid::Uuid;

const MAX_DESCRIPTION_LENGTH: usize = 255;
const MAX_TRANSACTION_AMOUNT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

fn validate_description(value: &str) -> Result<(), DebtError> {
    if value.trim().is_empty() {
        return Err(DebtError::invalid_input(
            "description",
            "Invalid description",
            "description cannot be empty",
        ));
    }
    if value.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(DebtError::invalid_input(
            "description",
            "description Too Long",
            format!("description cannot exceed {} characters", MAX_DESCRIPTION_LENGTH),
        ));
    }
    if value.chars().any(|c| c.is_control() || "<>{}[]".contains(c)) {
        return Err(DebtError::invalid_input(
            "description",
            "Invalid description",
            "description contains invalid characters",
        ));
    }
    Ok(())
}

fn validate_amount(amount: Decimal) -> Result<(), DebtError> {
    if amount <= Decimal::ZERO {
        return Err(DebtError::invalid_input(
            "amount",
            "Invalid Amount",
            "Amount must be greater than 0",
        ));
    }
    if amount > MAX_TRANSACTION_AMOUNT {
        return Err(DebtError::invalid_input(
            "amount",
            "Amount Too Large",
            "Amount cannot exceed 1,000,000",
        ));
    }
    if amount.round_dp(2) != amount {
        return Err(DebtError::invalid_input(
            "amount",
            "Invalid Amount",
            "Amount cannot have more than 2 decimal places",
        ));
    }
    Ok(())
}

fn validate_shares(shares: &[Share], total: Decimal) -> Result<(), DebtError> {
    if shares.is_empty() {
        return Err(DebtError::InvalidSplit);
    }
    let mut seen = HashSet::new();
    for share in shares {
        if share.user_id.trim().is_empty() || !seen.insert(share.user_id.as_str()) {
            return Err(DebtError::InvalidSplit);
        }
        if share.amount < Decimal::ZERO {
            return Err(DebtError::InvalidSplit);
        }
    }
    let sum: Decimal = shares.iter().map(|s| s.amount).sum();
    if sum != total {
        return Err(DebtError::InvalidSplit);
    }
    Ok(())
}

pub fn validate_transaction(transaction: &Transaction) -> Result<(), DebtError> {
    validate_description(&transaction.description)?;
    validate_amount(transaction.amount)?;
    validate_shares(&transaction.payers, transaction.amount)?;
    validate_shares(&transaction.debtors, transaction.amount)?;
    Ok(())
}

/// One relation per (debtor, payer) pair of distinct users.
///
/// Each debtor's share is spread over the payers in proportion to what they
/// paid, so the portion owed to payer `p` is `share * paid_p / amount`.
pub fn derive_debt_relations(transaction: &Transaction) -> Result<Vec<DebtRelation>, DebtError> {
    validate_transaction(transaction)?;

    let mut relations = Vec::new();
    for debtor in &transaction.debtors {
        for payer in &transaction.payers {
            if debtor.user_id == payer.user_id {
                continue;
            }
            let portion = debtor.amount * payer.amount / transaction.amount;
            if portion.is_zero() {
                continue;
            }
            relations.push(DebtRelation::new(
                Uuid::new_v4().to_string(),
                transaction.id.clone(),
                transaction.group_id.clone(),
                debtor.user_id.clone(),
                payer.user_id.clone(),
                portion.normalize(),
                transaction.created_at,
            ));
        }
    }

    debug!(
        "Derived {} debt relations from transaction {}",
        relations.len(),
        transaction.id
    );
    Ok(relations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn transaction(amount: Decimal, payers: Vec<Share>, debtors: Vec<Share>) -> Transaction {
        Transaction {
            id: "tx-1".to_string(),
            group_id: "g1".to_string(),
            description: "Dinner".to_string(),
            amount,
            payers,
            debtors,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn single_payer_is_owed_every_other_share() {
        let tx = transaction(
            dec!(90),
            vec![Share::new("A", dec!(90))],
            vec![Share::new("A", dec!(30)), Share::new("B", dec!(30)), Share::new("C", dec!(30))],
        );

        let relations = derive_debt_relations(&tx).unwrap();

        assert_eq!(relations.len(), 2);
        assert!(relations.iter().all(|r| r.to == "A" && r.amount == dec!(30)));
        assert!(relations.iter().all(|r| r.transaction_id == "tx-1" && r.created_at == tx.created_at));
    }

    #[test]
    fn shares_spread_over_payers_proportionally() {
        let tx = transaction(
            dec!(100),
            vec![Share::new("A", dec!(75)), Share::new("B", dec!(25))],
            vec![Share::new("C", dec!(40)), Share::new("D", dec!(60))],
        );

        let relations = derive_debt_relations(&tx).unwrap();
        let owed = |from: &str, to: &str| {
            relations
                .iter()
                .find(|r| r.from == from && r.to == to)
                .map(|r| r.amount)
        };

        assert_eq!(owed("C", "A"), Some(dec!(30)));
        assert_eq!(owed("C", "B"), Some(dec!(10)));
        assert_eq!(owed("D", "A"), Some(dec!(45)));
        assert_eq!(owed("D", "B"), Some(dec!(15)));
    }

    #[test]
    fn zero_share_produces_no_relation() {
        let tx = transaction(
            dec!(50),
            vec![Share::new("A", dec!(50))],
            vec![Share::new("B", dec!(50)), Share::new("C", dec!(0))],
        );
        let relations = derive_debt_relations(&tx).unwrap();
        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0].from, "B");
    }

    #[test]
    fn unbalanced_split_is_rejected() {
        let tx = transaction(
            dec!(50),
            vec![Share::new("A", dec!(50))],
            vec![Share::new("B", dec!(20)), Share::new("C", dec!(20))],
        );
        assert_eq!(derive_debt_relations(&tx), Err(DebtError::InvalidSplit));
    }

    #[test]
    fn duplicate_debtor_is_rejected() {
        let tx = transaction(
            dec!(50),
            vec![Share::new("A", dec!(50))],
            vec![Share::new("B", dec!(25)), Share::new("B", dec!(25))],
        );
        assert_eq!(derive_debt_relations(&tx), Err(DebtError::InvalidSplit));
    }

    #[test]
    fn invalid_amounts_are_rejected() {
        for amount in [dec!(0), dec!(-10), dec!(1000000.01), dec!(10.005)] {
            let tx = transaction(amount, vec![Share::new("A", amount)], vec![Share::new("B", amount)]);
            assert!(matches!(
                derive_debt_relations(&tx),
                Err(DebtError::InvalidInput(field, _)) if field == "amount"
            ));
        }
    }

    #[test]
    fn description_is_validated() {
        let mut tx = transaction(dec!(10), vec![Share::new("A", dec!(10))], vec![Share::new("B", dec!(10))]);
        tx.description = "   ".to_string();
        assert!(matches!(derive_debt_relations(&tx), Err(DebtError::InvalidInput(field, _)) if field == "description"));

        tx.description = "<script>".to_string();
        assert!(matches!(derive_debt_relations(&tx), Err(DebtError::InvalidInput(field, _)) if field == "description"));
    }
}
