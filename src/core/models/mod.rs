pub mod aggregated_debt;
pub mod audit;
pub mod debt_relation;
pub mod standing;
pub mod transaction;

pub use aggregated_debt::{AggregatedDebt, Exposure, GroupBalances};
pub use audit::{AppLog, GroupAudit};
pub use debt_relation::{DebtRelation, DebtState};
pub use standing::UserStanding;
pub use transaction::{Share, Transaction};
