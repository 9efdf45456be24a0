use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

/// A malformed debt relation or penalty setting.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ValidationError {
    #[error("Debt relation {0} has the same debtor and creditor")]
    SelfLoop(String),
    #[error("Debt relation {0} has a negative amount")]
    NegativeAmount(String),
    #[error("Grace period must be positive")]
    NonPositiveGracePeriod,
    #[error("Penalty rate must not be negative")]
    NegativePenaltyRate,
    #[error("Amount of {0} is too large to represent")]
    AmountOverflow(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DebtError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Invalid payment amount {paid}: outstanding amount is {outstanding}")]
    InvalidAmount { paid: Decimal, outstanding: Decimal },
    #[error("Invalid split amounts")]
    InvalidSplit,
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),
    #[error("Transaction {0} not found")]
    TransactionNotFound(String),
    #[error("Debt relation {0} not found")]
    DebtRelationNotFound(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Logging error: {0}")]
    LoggingError(String),
    #[error("Cache error: {0}")]
    CacheError(String),
}

impl DebtError {
    pub(crate) fn invalid_input(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        DebtError::InvalidInput(
            field.to_string(),
            FieldError {
                field: field.to_string(),
                title: title.into(),
                description: description.into(),
            },
        )
    }
}
