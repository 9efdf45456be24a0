pub mod cache_keys;
pub mod in_memory;

use crate::core::errors::DebtError;
use crate::core::models::GroupBalances;
use async_trait::async_trait;

#[async_trait]
pub trait Cache: Send + Sync {
    async fn get_group_balances(&self, group_id: &str) -> Result<Option<GroupBalances>, DebtError>;
    /// Counter bumped by every invalidation of the group.
    async fn group_balances_generation(&self, group_id: &str) -> Result<u64, DebtError>;
    /// Stores the table only if the group's generation still equals
    /// `generation`. Returns whether it was stored.
    async fn save_group_balances(
        &self,
        group_id: &str,
        balances: &GroupBalances,
        ttl: std::time::Duration,
        generation: u64,
    ) -> Result<bool, DebtError>;
    async fn invalidate_group_balances(&self, group_id: &str) -> Result<(), DebtError>;
}
