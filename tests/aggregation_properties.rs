use chrono::{DateTime, Duration, TimeZone, Utc};
use debtledger::core::models::{DebtRelation, DebtState, Exposure};
use debtledger::{aggregate, apply_payment, apply_penalty};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

const USERS: [&str; 5] = ["ana", "ben", "cho", "dev", "eli"];

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn relation_strategy() -> impl Strategy<Value = (usize, usize, i64)> {
    (0usize..USERS.len(), 1usize..USERS.len(), 0i64..100_000)
        .prop_map(|(from, offset, cents)| (from, (from + offset) % USERS.len(), cents))
}

fn relations_strategy() -> impl Strategy<Value = Vec<DebtRelation>> {
    prop::collection::vec(relation_strategy(), 0..=30).prop_map(|edges| {
        edges
            .into_iter()
            .enumerate()
            .map(|(idx, (from, to, cents))| {
                DebtRelation::new(
                    format!("r{idx}"),
                    format!("tx{}", idx % 4),
                    "g1",
                    USERS[from],
                    USERS[to],
                    Decimal::new(cents, 2),
                    epoch(),
                )
            })
            .collect()
    })
}

/// Signed net per unordered pair, positive when the smaller id owes the larger.
fn raw_pair_nets(relations: &[DebtRelation]) -> BTreeMap<(String, String), Decimal> {
    let mut nets = BTreeMap::new();
    for r in relations {
        let (key, sign) = if r.from < r.to {
            ((r.from.clone(), r.to.clone()), Decimal::ONE)
        } else {
            ((r.to.clone(), r.from.clone()), Decimal::NEGATIVE_ONE)
        };
        *nets.entry(key).or_insert(Decimal::ZERO) += sign * r.amount;
    }
    nets.retain(|_, net| !net.is_zero());
    nets
}

proptest! {
    #[test]
    fn aggregation_conserves_pairwise_nets(relations in relations_strategy()) {
        let aggregated = aggregate(&relations).expect("valid relations");
        let as_relations: Vec<DebtRelation> = aggregated
            .iter()
            .map(|d| DebtRelation::new("agg", "agg", d.group_id.clone(), d.from.clone(), d.to.clone(), d.amount, epoch()))
            .collect();

        prop_assert_eq!(raw_pair_nets(&relations), raw_pair_nets(&as_relations));
        prop_assert!(aggregated.iter().all(|d| d.amount > Decimal::ZERO && d.from != d.to));

        for user in USERS {
            let exposure = Exposure::from_aggregated(&aggregated, user).expect("bounded amounts");
            let raw_net: Decimal = relations
                .iter()
                .map(|r| if r.to == user { r.amount } else if r.from == user { -r.amount } else { Decimal::ZERO })
                .sum();
            prop_assert_eq!(exposure.net(), raw_net);
        }
    }

    #[test]
    fn aggregation_is_idempotent(relations in relations_strategy()) {
        let once = aggregate(&relations).expect("valid relations");
        let reaggregated_input: Vec<DebtRelation> = once
            .iter()
            .enumerate()
            .map(|(idx, d)| DebtRelation::new(format!("a{idx}"), "agg", d.group_id.clone(), d.from.clone(), d.to.clone(), d.amount, epoch()))
            .collect();
        let twice = aggregate(&reaggregated_input).expect("valid relations");

        let edges = |list: &[debtledger::core::models::AggregatedDebt]| {
            list.iter().map(|d| (d.from.clone(), d.to.clone(), d.amount)).collect::<Vec<_>>()
        };
        prop_assert_eq!(edges(&once), edges(&twice));
    }

    #[test]
    fn aggregation_ignores_input_order(
        (relations, shuffled) in relations_strategy()
            .prop_flat_map(|rels| (Just(rels.clone()), Just(rels).prop_shuffle()))
    ) {
        prop_assert_eq!(aggregate(&relations), aggregate(&shuffled));
    }

    #[test]
    fn payments_never_go_negative(owed in 1i64..1_000_000, paid in -1_000i64..1_100_000) {
        let relation = DebtRelation::new("r1", "tx", "g1", "ana", "ben", Decimal::new(owed, 2), epoch());
        match apply_payment(&relation, Decimal::new(paid, 2)) {
            Ok(updated) => {
                prop_assert!(updated.amount >= Decimal::ZERO);
                prop_assert_eq!(updated.amount, relation.amount - Decimal::new(paid, 2));
            }
            Err(_) => {
                prop_assert!(paid <= 0 || paid > owed);
            }
        }

        let settled = apply_payment(&relation, relation.amount).expect("full payment");
        prop_assert_eq!(settled.state(), DebtState::Settled);
    }

    #[test]
    fn immediate_second_penalty_is_noop(owed in 1i64..1_000_000, hours_late in 24i64..1_000, rate_bp in 0i64..10_000) {
        let relation = DebtRelation::new("r1", "tx", "g1", "ana", "ben", Decimal::new(owed, 2), epoch());
        let now = epoch() + Duration::hours(hours_late);
        let rate = Decimal::new(rate_bp, 4);

        let once = apply_penalty(&relation, now, Duration::hours(24), rate).expect("valid penalty");
        let twice = apply_penalty(&once, now, Duration::hours(24), rate).expect("valid penalty");

        prop_assert_eq!(once.last_penalty_at, Some(now));
        prop_assert_eq!(once, twice);
    }
}

#[test]
fn netting_scenarios() {
    let rel = |id: &str, from: &str, to: &str, amount: i64| {
        DebtRelation::new(id, "tx", "g1", from, to, Decimal::from(amount), epoch())
    };

    let netted = aggregate(&[rel("r1", "A", "B", 100), rel("r2", "B", "A", 40)]).unwrap();
    assert_eq!(netted.len(), 1);
    assert_eq!((netted[0].from.as_str(), netted[0].to.as_str()), ("A", "B"));
    assert_eq!(netted[0].amount, Decimal::from(60));

    let cancelled = aggregate(&[rel("r1", "A", "B", 50), rel("r2", "B", "A", 50)]).unwrap();
    assert!(cancelled.is_empty());
}
