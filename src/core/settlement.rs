//! Payment, penalty and reminder transitions on a single debt relation.
//!
//! Every function returns a new relation; persisting it is the caller's job.

use crate::core::errors::{DebtError, ValidationError};
use crate::core::models::DebtRelation;
use chrono::{DateTime, Duration, Utc};
use log::debug;
use rust_decimal::Decimal;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PenaltyPolicy {
    pub grace_period: Duration,
    pub penalty_rate: Decimal,
    pub remind_interval: Duration,
}

impl PenaltyPolicy {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.grace_period <= Duration::zero() {
            return Err(ValidationError::NonPositiveGracePeriod);
        }
        if self.penalty_rate < Decimal::ZERO {
            return Err(ValidationError::NegativePenaltyRate);
        }
        Ok(())
    }
}

/// Decrements the relation by `paid`, which must be in `(0, amount]`.
pub fn apply_payment(relation: &DebtRelation, paid: Decimal) -> Result<DebtRelation, DebtError> {
    relation.validate()?;
    if paid <= Decimal::ZERO || paid > relation.amount {
        return Err(DebtError::InvalidAmount {
            paid,
            outstanding: relation.amount,
        });
    }

    let mut updated = relation.clone();
    updated.amount -= paid;
    debug!(
        "Payment of {} on debt relation {}: {} -> {} ({})",
        paid,
        relation.id,
        relation.amount,
        updated.amount,
        updated.state()
    );
    Ok(updated)
}

/// Adds `amount * penalty_rate` once the grace period since the last
/// penalty (or since the transaction, if none) has elapsed.
///
/// Within the grace period, or on a settled relation, the input is returned
/// unchanged. Callers must persist `last_penalty_at` to keep this from
/// firing twice in one window.
pub fn apply_penalty(
    relation: &DebtRelation,
    now: DateTime<Utc>,
    grace_period: Duration,
    penalty_rate: Decimal,
) -> Result<DebtRelation, DebtError> {
    relation.validate()?;
    if grace_period <= Duration::zero() {
        return Err(ValidationError::NonPositiveGracePeriod.into());
    }
    if penalty_rate < Decimal::ZERO {
        return Err(ValidationError::NegativePenaltyRate.into());
    }

    if relation.is_settled() {
        return Ok(relation.clone());
    }
    let since = relation.last_penalty_at.unwrap_or(relation.created_at);
    if now - since < grace_period {
        return Ok(relation.clone());
    }

    let mut updated = relation.clone();
    updated.amount = relation
        .amount
        .checked_mul(penalty_rate)
        .and_then(|penalty| relation.amount.checked_add(penalty))
        .ok_or_else(|| ValidationError::AmountOverflow(relation.id.clone()))?;
    updated.last_penalty_at = Some(now);
    debug!(
        "Penalty applied to debt relation {}: {} -> {}",
        relation.id, relation.amount, updated.amount
    );
    Ok(updated)
}

pub fn can_remind(relation: &DebtRelation, now: DateTime<Utc>, min_interval: Duration) -> bool {
    match relation.last_remind_at {
        None => true,
        Some(last) => now - last >= min_interval,
    }
}

pub fn mark_reminded(relation: &DebtRelation, now: DateTime<Utc>) -> DebtRelation {
    let mut updated = relation.clone();
    updated.last_remind_at = Some(now);
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::DebtState;
    use rust_decimal_macros::dec;

    fn relation(amount: Decimal, created_at: DateTime<Utc>) -> DebtRelation {
        DebtRelation::new("r1", "tx-1", "g1", "A", "B", amount, created_at)
    }

    #[test]
    fn partial_payment_stays_outstanding() {
        let updated = apply_payment(&relation(dec!(100), Utc::now()), dec!(30)).unwrap();
        assert_eq!(updated.amount, dec!(70));
        assert_eq!(updated.state(), DebtState::Outstanding);
    }

    #[test]
    fn full_payment_settles() {
        let updated = apply_payment(&relation(dec!(70), Utc::now()), dec!(70)).unwrap();
        assert_eq!(updated.amount, dec!(0));
        assert_eq!(updated.state(), DebtState::Settled);
    }

    #[test]
    fn overpayment_is_rejected() {
        let result = apply_payment(&relation(dec!(70), Utc::now()), dec!(70.01));
        assert_eq!(
            result,
            Err(DebtError::InvalidAmount {
                paid: dec!(70.01),
                outstanding: dec!(70)
            })
        );
    }

    #[test]
    fn zero_and_negative_payments_are_rejected() {
        let debt = relation(dec!(70), Utc::now());
        assert!(matches!(apply_payment(&debt, dec!(0)), Err(DebtError::InvalidAmount { .. })));
        assert!(matches!(apply_payment(&debt, dec!(-5)), Err(DebtError::InvalidAmount { .. })));
    }

    #[test]
    fn settled_relation_accepts_no_payment() {
        let debt = relation(dec!(0), Utc::now());
        assert!(matches!(apply_payment(&debt, dec!(1)), Err(DebtError::InvalidAmount { .. })));
    }

    #[test]
    fn penalty_applies_after_grace_period() {
        let now = Utc::now();
        let mut debt = relation(dec!(100), now - Duration::days(10));
        debt.last_penalty_at = Some(now - Duration::hours(25));

        let updated = apply_penalty(&debt, now, Duration::hours(24), dec!(0.05)).unwrap();

        assert_eq!(updated.amount, dec!(105));
        assert_eq!(updated.last_penalty_at, Some(now));
    }

    #[test]
    fn first_penalty_counts_from_transaction_date() {
        let now = Utc::now();
        let fresh = relation(dec!(100), now - Duration::hours(23));
        let stale = relation(dec!(100), now - Duration::hours(24));

        let untouched = apply_penalty(&fresh, now, Duration::hours(24), dec!(0.05)).unwrap();
        let penalised = apply_penalty(&stale, now, Duration::hours(24), dec!(0.05)).unwrap();

        assert_eq!(untouched, fresh);
        assert_eq!(penalised.amount, dec!(105));
    }

    #[test]
    fn second_penalty_in_same_instant_is_noop() {
        let now = Utc::now();
        let debt = relation(dec!(100), now - Duration::days(2));

        let once = apply_penalty(&debt, now, Duration::hours(24), dec!(0.05)).unwrap();
        let twice = apply_penalty(&once, now, Duration::hours(24), dec!(0.05)).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn settled_relation_accrues_no_penalty() {
        let now = Utc::now();
        let debt = relation(dec!(0), now - Duration::days(30));
        let updated = apply_penalty(&debt, now, Duration::hours(24), dec!(0.05)).unwrap();
        assert_eq!(updated, debt);
    }

    #[test]
    fn penalty_settings_are_validated() {
        let now = Utc::now();
        let debt = relation(dec!(100), now - Duration::days(2));
        assert_eq!(
            apply_penalty(&debt, now, Duration::zero(), dec!(0.05)),
            Err(ValidationError::NonPositiveGracePeriod.into())
        );
        assert_eq!(
            apply_penalty(&debt, now, Duration::hours(1), dec!(-0.05)),
            Err(ValidationError::NegativePenaltyRate.into())
        );
    }

    #[test]
    fn penalty_past_decimal_range_is_an_error() {
        let now = Utc::now();
        let debt = relation(Decimal::MAX, now - Duration::days(2));
        assert_eq!(
            apply_penalty(&debt, now, Duration::hours(24), dec!(0.05)),
            Err(ValidationError::AmountOverflow("r1".to_string()).into())
        );
    }

    #[test]
    fn reminder_gated_by_interval() {
        let now = Utc::now();
        let debt = relation(dec!(10), now);
        assert!(can_remind(&debt, now, Duration::days(1)));

        let reminded = mark_reminded(&debt, now - Duration::hours(12));
        assert!(!can_remind(&reminded, now, Duration::days(1)));
        assert!(can_remind(&reminded, now + Duration::hours(12), Duration::days(1)));
    }
}
