use crate::core::errors::DebtError;
use crate::core::models::GroupBalances;
use crate::infrastructure::cache::Cache;
use crate::infrastructure::cache::cache_keys::group_balances_key;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, (GroupBalances, DateTime<Utc>)>,
    generations: HashMap<String, u64>,
}

#[derive(Clone, Default)]
pub struct InMemoryCache {
    state: Arc<RwLock<CacheState>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        InMemoryCache::default()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get_group_balances(&self, group_id: &str) -> Result<Option<GroupBalances>, DebtError> {
        let state = self.state.read().await;
        let key = group_balances_key(group_id);
        Ok(state
            .entries
            .get(&key)
            .filter(|(_, expiry)| *expiry > Utc::now())
            .map(|(balances, _)| balances.clone()))
    }

    async fn group_balances_generation(&self, group_id: &str) -> Result<u64, DebtError> {
        let state = self.state.read().await;
        Ok(state
            .generations
            .get(&group_balances_key(group_id))
            .copied()
            .unwrap_or_default())
    }

    async fn save_group_balances(
        &self,
        group_id: &str,
        balances: &GroupBalances,
        ttl: std::time::Duration,
        generation: u64,
    ) -> Result<bool, DebtError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| DebtError::CacheError(format!("Failed to convert TTL: {}", e)))?;
        let expiry = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| DebtError::CacheError(format!("TTL of {} is out of range", ttl)))?;

        let key = group_balances_key(group_id);
        let mut state = self.state.write().await;
        if state.generations.get(&key).copied().unwrap_or_default() != generation {
            return Ok(false);
        }
        state.entries.insert(key, (balances.clone(), expiry));
        Ok(true)
    }

    async fn invalidate_group_balances(&self, group_id: &str) -> Result<(), DebtError> {
        let key = group_balances_key(group_id);
        let mut state = self.state.write().await;
        state.entries.remove(&key);
        *state.generations.entry(key).or_default() += 1;
        let now = Utc::now();
        state.entries.retain(|_, (_, expiry)| *expiry > now);
        Ok(())
    }
}
