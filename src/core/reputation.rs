use crate::core::errors::DebtError;
use async_trait::async_trait;

/// Side effects of a reminder that has gone out, kept apart from the ledger.
#[async_trait]
pub trait ReputationHook: Send + Sync {
    async fn on_reminder_sent(&self, debtor_id: &str, creditor_id: &str) -> Result<(), DebtError>;
}

/// Hook for deployments without experience or trust scores.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoReputation;

#[async_trait]
impl ReputationHook for NoReputation {
    async fn on_reminder_sent(&self, _debtor_id: &str, _creditor_id: &str) -> Result<(), DebtError> {
        Ok(())
    }
}
