use crate::constants::{
    BALANCES_QUERIED, DEBT_CLEARED, EXPOSURE_QUERIED, PAYMENT_RECORDED, PENALTIES_APPLIED, REMINDER_SENT,
    TRANSACTION_RECORDED, TRANSACTIONS_QUERIED,
};
use crate::core::aggregator::{aggregate, group_by_transaction, total_outstanding};
use crate::core::derivation::derive_debt_relations;
use crate::core::errors::DebtError;
use crate::core::models::{AppLog, DebtRelation, Exposure, GroupAudit, GroupBalances, Share, Transaction};
use crate::core::reputation::ReputationHook;
use crate::core::settlement::{PenaltyPolicy, apply_payment, apply_penalty, can_remind, mark_reminded};
use crate::infrastructure::cache::Cache;
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::DebtStorage;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde_json::json;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Orchestrates the pure ledger functions over the storage, cache, logging
/// and reputation ports.
///
/// Read-modify-write sequences are not serialized here: two concurrent
/// payments on one relation resolve last-writer-wins.
pub struct DebtService<L: LoggingService, S: DebtStorage, C: Cache, R: ReputationHook> {
    storage: S,
    logging: L,
    cache: C,
    reputation: R,
    policy: PenaltyPolicy,
    balance_cache_ttl: std::time::Duration,
}

impl<L: LoggingService, S: DebtStorage, C: Cache, R: ReputationHook> DebtService<L, S, C, R> {
    pub fn new(
        storage: S,
        logging: L,
        cache: C,
        reputation: R,
        policy: PenaltyPolicy,
        balance_cache_ttl: std::time::Duration,
    ) -> Self {
        info!("Initializing DebtService");
        DebtService {
            storage,
            logging,
            cache,
            reputation,
            policy,
            balance_cache_ttl,
        }
    }

    pub fn policy(&self) -> &PenaltyPolicy {
        &self.policy
    }

    fn validate_id(field: &str, value: &str) -> Result<(), DebtError> {
        if value.trim().is_empty() {
            return Err(DebtError::invalid_input(
                field,
                format!("Invalid {}", field),
                format!("{} cannot be empty", field),
            ));
        }
        Ok(())
    }

    async fn log_and_audit(
        &self,
        group_id: Option<&str>,
        action: &str,
        log_details: serde_json::Value,
        user_id: Option<&str>,
    ) -> Result<(), DebtError> {
        self.logging.log_action(action, log_details.clone(), user_id).await?;
        if let Some(gid) = group_id {
            self.storage
                .save_group_audit(GroupAudit {
                    id: Uuid::new_v4().to_string(),
                    group_id: gid.to_string(),
                    action: action.to_string(),
                    user_id: user_id.map(String::from),
                    details: serde_json::from_value(log_details).unwrap_or_default(),
                    timestamp: Utc::now(),
                })
                .await?;
        }
        Ok(())
    }

    async fn find_relation(&self, group_id: &str, relation_id: &str) -> Result<DebtRelation, DebtError> {
        self.storage
            .get_debt_relation(group_id, relation_id)
            .await?
            .ok_or_else(|| DebtError::DebtRelationNotFound(relation_id.to_string()))
    }

    pub async fn record_transaction(
        &self,
        group_id: &str,
        description: String,
        amount: Decimal,
        payers: Vec<Share>,
        debtors: Vec<Share>,
        created_by: &str,
    ) -> Result<(Transaction, Vec<DebtRelation>), DebtError> {
        Self::validate_id("group_id", group_id)?;
        info!(
            "Recording transaction in group {} by user {} for amount {}",
            group_id, created_by, amount
        );

        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            group_id: group_id.to_string(),
            description,
            amount,
            payers,
            debtors,
            created_at: Utc::now(),
        };
        let relations = derive_debt_relations(&transaction).inspect_err(|e| {
            warn!("Rejected transaction in group {}: {}", group_id, e);
        })?;

        self.storage
            .save_transaction_with_relations(transaction.clone(), relations.clone())
            .await?;
        self.cache.invalidate_group_balances(group_id).await?;

        self.log_and_audit(
            Some(group_id),
            TRANSACTION_RECORDED,
            json!({
                "transaction_id": transaction.id,
                "group_id": group_id,
                "description": transaction.description,
                "amount": transaction.amount,
                "relation_count": relations.len()
            }),
            Some(created_by),
        )
        .await?;

        Ok((transaction, relations))
    }

    pub async fn get_transaction(&self, transaction_id: &str) -> Result<Transaction, DebtError> {
        self.storage
            .get_transaction(transaction_id)
            .await?
            .ok_or_else(|| DebtError::TransactionNotFound(transaction_id.to_string()))
    }

    pub async fn list_transactions(&self, group_id: &str, queried_by: Option<&str>) -> Result<Vec<Transaction>, DebtError> {
        let transactions = self.storage.list_transactions(group_id).await?;
        self.log_and_audit(
            None,
            TRANSACTIONS_QUERIED,
            json!({ "group_id": group_id, "count": transactions.len() }),
            queried_by,
        )
        .await?;
        Ok(transactions)
    }

    /// Net pairwise balance table of a group, served from cache while fresh.
    ///
    /// A table computed while a write invalidated the group is returned but
    /// not cached.
    pub async fn get_group_balances(&self, group_id: &str) -> Result<GroupBalances, DebtError> {
        if let Some(balances) = self.cache.get_group_balances(group_id).await? {
            debug!("Serving cached balances for group {}", group_id);
            return Ok(balances);
        }

        let generation = self.cache.group_balances_generation(group_id).await?;
        let relations = self.storage.list_debt_relations(group_id).await?;
        let balances = aggregate(&relations)?;
        let response = GroupBalances {
            group_id: group_id.to_string(),
            total_outstanding: total_outstanding(&balances)?,
            balances,
        };

        let cached = self
            .cache
            .save_group_balances(group_id, &response, self.balance_cache_ttl, generation)
            .await?;
        if !cached {
            debug!("Balances of group {} changed while aggregating, not caching", group_id);
        }

        self.log_and_audit(
            None,
            BALANCES_QUERIED,
            json!({ "group_id": group_id, "pair_count": response.balances.len() }),
            None,
        )
        .await?;

        Ok(response)
    }

    pub async fn get_user_exposure(&self, group_id: &str, user_id: &str) -> Result<Exposure, DebtError> {
        let balances = self.get_group_balances(group_id).await?;
        let exposure = Exposure::from_aggregated(&balances.balances, user_id)?;
        self.log_and_audit(
            None,
            EXPOSURE_QUERIED,
            json!({ "group_id": group_id, "user_id": user_id }),
            Some(user_id),
        )
        .await?;
        Ok(exposure)
    }

    pub async fn get_relations_by_transaction(
        &self,
        group_id: &str,
    ) -> Result<BTreeMap<String, Vec<DebtRelation>>, DebtError> {
        let relations = self.storage.list_debt_relations(group_id).await?;
        Ok(group_by_transaction(&relations))
    }

    pub async fn record_payment(
        &self,
        group_id: &str,
        relation_id: &str,
        amount: Decimal,
        recorded_by: &str,
    ) -> Result<DebtRelation, DebtError> {
        info!(
            "Recording payment of {} on debt relation {} in group {}",
            amount, relation_id, group_id
        );
        let relation = self.find_relation(group_id, relation_id).await?;
        let updated = apply_payment(&relation, amount).inspect_err(|e| {
            warn!("Rejected payment on debt relation {}: {}", relation_id, e);
        })?;

        self.storage.save_debt_relations(vec![updated.clone()]).await?;
        self.cache.invalidate_group_balances(group_id).await?;

        self.log_and_audit(
            Some(group_id),
            PAYMENT_RECORDED,
            json!({
                "relation_id": relation_id,
                "paid": amount,
                "remaining": updated.amount,
                "state": updated.state().to_string()
            }),
            Some(recorded_by),
        )
        .await?;

        Ok(updated)
    }

    /// Removes a relation outright, the user's explicit "clear debt" action.
    pub async fn clear_debt(&self, group_id: &str, relation_id: &str, cleared_by: &str) -> Result<(), DebtError> {
        info!("Clearing debt relation {} in group {}", relation_id, group_id);
        let relation = self.find_relation(group_id, relation_id).await?;
        if !self.storage.delete_debt_relation(group_id, relation_id).await? {
            return Err(DebtError::DebtRelationNotFound(relation_id.to_string()));
        }
        self.cache.invalidate_group_balances(group_id).await?;

        self.log_and_audit(
            Some(group_id),
            DEBT_CLEARED,
            json!({
                "relation_id": relation_id,
                "from": relation.from,
                "to": relation.to,
                "amount": relation.amount
            }),
            Some(cleared_by),
        )
        .await?;
        Ok(())
    }

    /// Applies the configured penalty to every eligible relation of the
    /// group and returns the ones that changed.
    pub async fn apply_penalties(
        &self,
        group_id: &str,
        now: DateTime<Utc>,
        applied_by: Option<&str>,
    ) -> Result<Vec<DebtRelation>, DebtError> {
        let relations = self.storage.list_debt_relations(group_id).await?;
        let mut penalised = Vec::new();
        for relation in relations.iter().filter(|r| !r.is_settled()) {
            let updated = apply_penalty(relation, now, self.policy.grace_period, self.policy.penalty_rate)?;
            if updated != *relation {
                penalised.push(updated);
            }
        }

        if penalised.is_empty() {
            debug!("No debt relations in group {} are due a penalty", group_id);
            return Ok(penalised);
        }

        info!("Applying penalties to {} debt relations in group {}", penalised.len(), group_id);
        self.storage.save_debt_relations(penalised.clone()).await?;
        self.cache.invalidate_group_balances(group_id).await?;

        self.log_and_audit(
            Some(group_id),
            PENALTIES_APPLIED,
            json!({
                "relation_ids": penalised.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
                "penalty_rate": self.policy.penalty_rate
            }),
            applied_by,
        )
        .await?;

        Ok(penalised)
    }

    /// Stamps a reminder on the relation if the reminder interval allows it.
    ///
    /// Returns whether a reminder should go out; delivery is up to the caller.
    pub async fn send_reminder(
        &self,
        group_id: &str,
        relation_id: &str,
        now: DateTime<Utc>,
        sent_by: &str,
    ) -> Result<bool, DebtError> {
        let relation = self.find_relation(group_id, relation_id).await?;
        if relation.is_settled() {
            debug!("Debt relation {} is settled, no reminder", relation_id);
            return Ok(false);
        }
        if !can_remind(&relation, now, self.policy.remind_interval) {
            debug!("Debt relation {} was reminded too recently", relation_id);
            return Ok(false);
        }

        let reminded = mark_reminded(&relation, now);
        self.storage.save_debt_relations(vec![reminded]).await?;
        self.reputation.on_reminder_sent(&relation.from, &relation.to).await?;

        self.log_and_audit(
            Some(group_id),
            REMINDER_SENT,
            json!({
                "relation_id": relation_id,
                "debtor_id": relation.from,
                "creditor_id": relation.to,
                "amount": relation.amount
            }),
            Some(sent_by),
        )
        .await?;

        Ok(true)
    }

    pub async fn get_group_audits(&self, group_id: &str) -> Result<Vec<GroupAudit>, DebtError> {
        self.storage.get_group_audits(group_id).await
    }

    pub async fn get_app_logs(&self) -> Result<Vec<AppLog>, DebtError> {
        self.logging.get_logs().await
    }
}
