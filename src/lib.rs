pub mod api;
pub mod config;
pub mod constants;
pub mod core;
pub mod infrastructure;

pub use crate::core::aggregator::{aggregate, total_exposure};
pub use crate::core::errors::{DebtError, ValidationError};
pub use crate::core::services::DebtService;
pub use crate::core::settlement::{PenaltyPolicy, apply_payment, apply_penalty, can_remind};

#[cfg(test)]
mod tests;
