use axum::{Json, http::StatusCode, response::IntoResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::core::errors::DebtError;
use crate::core::models::{DebtRelation, Share, Transaction};

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
pub struct RecordTransactionRequest {
    pub description: String,
    pub amount: Decimal,
    pub payers: Vec<Share>,
    pub debtors: Vec<Share>,
    pub created_by_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RecordPaymentRequest {
    pub amount: Decimal,
    pub recorded_by_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ClearDebtRequest {
    pub cleared_by_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SendReminderRequest {
    pub sent_by_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ApplyPenaltiesRequest {
    pub applied_by_id: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct RecordTransactionResponse {
    pub transaction: Transaction,
    pub relations: Vec<DebtRelation>,
}

#[derive(Serialize, ToSchema)]
pub struct RelationsByTransactionResponse {
    pub transactions: BTreeMap<String, Vec<DebtRelation>>,
}

#[derive(Serialize, ToSchema)]
pub struct ReminderResponse {
    pub sent: bool,
}

// Error response struct
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for DebtError to implement IntoResponse
pub struct ApiError(pub DebtError);

impl From<DebtError> for ApiError {
    fn from(err: DebtError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            DebtError::Validation(_)
            | DebtError::InvalidAmount { .. }
            | DebtError::InvalidSplit
            | DebtError::InvalidInput(..) => StatusCode::BAD_REQUEST,
            DebtError::TransactionNotFound(_) | DebtError::DebtRelationNotFound(_) => StatusCode::NOT_FOUND,
            DebtError::StorageError(_) | DebtError::LoggingError(_) | DebtError::CacheError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let error_message = match &self.0 {
            DebtError::InvalidInput(field, detail) => {
                format!("Invalid input for {}: {}", field, detail.description)
            }
            other => other.to_string(),
        };
        (status, Json(ErrorResponse { error: error_message })).into_response()
    }
}
