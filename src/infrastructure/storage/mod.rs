use crate::core::errors::DebtError;
use crate::core::models::{DebtRelation, GroupAudit, Transaction};
use async_trait::async_trait;

/// Persistence gateway for transactions and debt relations.
///
/// `save_transaction_with_relations` and `save_debt_relations` must be
/// applied atomically by implementations.
#[async_trait]
pub trait DebtStorage: Send + Sync {
    async fn save_transaction_with_relations(
        &self,
        transaction: Transaction,
        relations: Vec<DebtRelation>,
    ) -> Result<(), DebtError>;
    async fn get_transaction(&self, transaction_id: &str) -> Result<Option<Transaction>, DebtError>;
    async fn list_transactions(&self, group_id: &str) -> Result<Vec<Transaction>, DebtError>;
    async fn save_debt_relations(&self, relations: Vec<DebtRelation>) -> Result<(), DebtError>;
    async fn get_debt_relation(&self, group_id: &str, relation_id: &str) -> Result<Option<DebtRelation>, DebtError>;
    async fn list_debt_relations(&self, group_id: &str) -> Result<Vec<DebtRelation>, DebtError>;
    async fn delete_debt_relation(&self, group_id: &str, relation_id: &str) -> Result<bool, DebtError>;
    async fn save_group_audit(&self, audit: GroupAudit) -> Result<(), DebtError>;
    async fn get_group_audits(&self, group_id: &str) -> Result<Vec<GroupAudit>, DebtError>;
}

pub mod in_memory;
