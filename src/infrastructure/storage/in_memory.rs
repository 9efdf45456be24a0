use crate::core::errors::DebtError;
use crate::core::models::{DebtRelation, GroupAudit, Transaction};
use crate::infrastructure::storage::DebtStorage;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Relations are kept per group, keyed by id, so listing order is stable.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    transactions: Arc<RwLock<HashMap<String, Transaction>>>,
    debt_relations: Arc<RwLock<HashMap<String, BTreeMap<String, DebtRelation>>>>,
    group_audits: Arc<RwLock<HashMap<String, Vec<GroupAudit>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage::default()
    }
}

#[async_trait]
impl DebtStorage for InMemoryStorage {
    async fn save_transaction_with_relations(
        &self,
        transaction: Transaction,
        relations: Vec<DebtRelation>,
    ) -> Result<(), DebtError> {
        let mut transactions = self.transactions.write().await;
        let mut debt_relations = self.debt_relations.write().await;
        if let Some(stray) = relations.iter().find(|r| r.transaction_id != transaction.id) {
            return Err(DebtError::StorageError(format!(
                "Debt relation {} does not belong to transaction {}",
                stray.id, transaction.id
            )));
        }
        for relation in relations {
            debt_relations
                .entry(relation.group_id.clone())
                .or_default()
                .insert(relation.id.clone(), relation);
        }
        transactions.insert(transaction.id.clone(), transaction);
        Ok(())
    }

    async fn get_transaction(&self, transaction_id: &str) -> Result<Option<Transaction>, DebtError> {
        let transactions = self.transactions.read().await;
        Ok(transactions.get(transaction_id).cloned())
    }

    async fn list_transactions(&self, group_id: &str) -> Result<Vec<Transaction>, DebtError> {
        let transactions = self.transactions.read().await;
        let mut listed: Vec<Transaction> = transactions
            .values()
            .filter(|t| t.group_id == group_id)
            .cloned()
            .collect();
        listed.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(listed)
    }

    async fn save_debt_relations(&self, relations: Vec<DebtRelation>) -> Result<(), DebtError> {
        let mut debt_relations = self.debt_relations.write().await;
        for relation in relations {
            debt_relations
                .entry(relation.group_id.clone())
                .or_default()
                .insert(relation.id.clone(), relation);
        }
        Ok(())
    }

    async fn get_debt_relation(&self, group_id: &str, relation_id: &str) -> Result<Option<DebtRelation>, DebtError> {
        let debt_relations = self.debt_relations.read().await;
        Ok(debt_relations
            .get(group_id)
            .and_then(|relations| relations.get(relation_id).cloned()))
    }

    async fn list_debt_relations(&self, group_id: &str) -> Result<Vec<DebtRelation>, DebtError> {
        let debt_relations = self.debt_relations.read().await;
        Ok(debt_relations
            .get(group_id)
            .map(|relations| relations.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn delete_debt_relation(&self, group_id: &str, relation_id: &str) -> Result<bool, DebtError> {
        let mut debt_relations = self.debt_relations.write().await;
        Ok(debt_relations
            .get_mut(group_id)
            .and_then(|relations| relations.remove(relation_id))
            .is_some())
    }

    async fn save_group_audit(&self, audit: GroupAudit) -> Result<(), DebtError> {
        let mut group_audits = self.group_audits.write().await;
        group_audits
            .entry(audit.group_id.clone())
            .or_insert_with(Vec::new)
            .push(audit);
        Ok(())
    }

    async fn get_group_audits(&self, group_id: &str) -> Result<Vec<GroupAudit>, DebtError> {
        let group_audits = self.group_audits.read().await;
        Ok(group_audits.get(group_id).cloned().unwrap_or_default())
    }
}
