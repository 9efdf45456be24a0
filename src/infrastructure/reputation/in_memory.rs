use crate::constants::{REMINDER_EXPERIENCE_REWARD, REMINDER_TRUST_PENALTY};
use crate::core::errors::DebtError;
use crate::core::models::UserStanding;
use crate::core::reputation::ReputationHook;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryReputation {
    standings: Arc<RwLock<HashMap<String, UserStanding>>>,
}

impl InMemoryReputation {
    pub fn new() -> Self {
        InMemoryReputation::default()
    }

    /// Standing of a user, zeroed if they were never touched.
    pub async fn standing(&self, user_id: &str) -> UserStanding {
        let standings = self.standings.read().await;
        standings.get(user_id).cloned().unwrap_or_else(|| UserStanding {
            user_id: user_id.to_string(),
            ..UserStanding::default()
        })
    }
}

#[async_trait]
impl ReputationHook for InMemoryReputation {
    async fn on_reminder_sent(&self, debtor_id: &str, creditor_id: &str) -> Result<(), DebtError> {
        let mut standings = self.standings.write().await;
        let creditor = standings
            .entry(creditor_id.to_string())
            .or_insert_with(|| UserStanding {
                user_id: creditor_id.to_string(),
                ..UserStanding::default()
            });
        creditor.experience += REMINDER_EXPERIENCE_REWARD;

        let debtor = standings
            .entry(debtor_id.to_string())
            .or_insert_with(|| UserStanding {
                user_id: debtor_id.to_string(),
                ..UserStanding::default()
            });
        debtor.trust_level -= REMINDER_TRUST_PENALTY;
        Ok(())
    }
}
