use crate::{
    api::models::*,
    core::{
        models::{AppLog, DebtRelation, Exposure, GroupAudit, GroupBalances, Transaction},
        services::DebtService,
    },
    infrastructure::{
        cache::in_memory::InMemoryCache, logging::in_memory::InMemoryLogging,
        reputation::in_memory::InMemoryReputation, storage::in_memory::InMemoryStorage,
    },
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use std::sync::Arc;

pub type AppService = DebtService<InMemoryLogging, InMemoryStorage, InMemoryCache, InMemoryReputation>;

// Define API routes
pub fn api_routes(service: Arc<AppService>) -> Router {
    Router::new()
        .route(
            "/groups/{group_id}/transactions",
            post(record_transaction).get(list_transactions),
        )
        .route("/groups/{group_id}/balances", get(get_group_balances))
        .route("/groups/{group_id}/users/{user_id}/exposure", get(get_user_exposure))
        .route("/groups/{group_id}/relations", get(get_relations_by_transaction))
        .route(
            "/groups/{group_id}/relations/{relation_id}/payments",
            post(record_payment),
        )
        .route("/groups/{group_id}/relations/{relation_id}/clear", post(clear_debt))
        .route("/groups/{group_id}/relations/{relation_id}/remind", post(send_reminder))
        .route("/groups/{group_id}/penalties", post(apply_penalties))
        .route("/groups/{group_id}/audits", get(get_group_audits))
        .route("/logs", get(get_app_logs))
        .with_state(service)
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/transactions",
    request_body = RecordTransactionRequest,
    params(
        ("group_id" = String, Path, description = "Group the transaction belongs to")
    ),
    responses(
        (status = 201, description = "Transaction recorded", body = RecordTransactionResponse),
        (status = 400, description = "Invalid transaction or split", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn record_transaction(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
    Json(req): Json<RecordTransactionRequest>,
) -> Result<(StatusCode, Json<RecordTransactionResponse>), ApiError> {
    let (transaction, relations) = service
        .record_transaction(
            &group_id,
            req.description,
            req.amount,
            req.payers,
            req.debtors,
            &req.created_by_id,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RecordTransactionResponse { transaction, relations }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/transactions",
    params(
        ("group_id" = String, Path, description = "Group to list")
    ),
    responses(
        (status = 200, description = "Transactions of the group, oldest first", body = Vec<Transaction>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn list_transactions(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let transactions = service.list_transactions(&group_id, None).await?;
    Ok(Json(transactions))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/balances",
    params(
        ("group_id" = String, Path, description = "Group to aggregate")
    ),
    responses(
        (status = 200, description = "Net pairwise balances", body = GroupBalances),
        (status = 400, description = "Malformed debt relation in storage", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn get_group_balances(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupBalances>, ApiError> {
    let balances = service.get_group_balances(&group_id).await?;
    Ok(Json(balances))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/users/{user_id}/exposure",
    params(
        ("group_id" = String, Path, description = "Group to aggregate"),
        ("user_id" = String, Path, description = "User to summarise")
    ),
    responses(
        (status = 200, description = "Amounts the user is owed and owes", body = Exposure),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn get_user_exposure(
    State(service): State<Arc<AppService>>,
    Path((group_id, user_id)): Path<(String, String)>,
) -> Result<Json<Exposure>, ApiError> {
    let exposure = service.get_user_exposure(&group_id, &user_id).await?;
    Ok(Json(exposure))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/relations",
    params(
        ("group_id" = String, Path, description = "Group to list")
    ),
    responses(
        (status = 200, description = "Debt relations keyed by transaction", body = RelationsByTransactionResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn get_relations_by_transaction(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
) -> Result<Json<RelationsByTransactionResponse>, ApiError> {
    let transactions = service.get_relations_by_transaction(&group_id).await?;
    Ok(Json(RelationsByTransactionResponse { transactions }))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/relations/{relation_id}/payments",
    request_body = RecordPaymentRequest,
    params(
        ("group_id" = String, Path, description = "Group of the debt"),
        ("relation_id" = String, Path, description = "Debt relation being paid")
    ),
    responses(
        (status = 200, description = "Payment applied", body = DebtRelation),
        (status = 400, description = "Payment out of bounds", body = ErrorResponse),
        (status = 404, description = "Debt relation not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn record_payment(
    State(service): State<Arc<AppService>>,
    Path((group_id, relation_id)): Path<(String, String)>,
    Json(req): Json<RecordPaymentRequest>,
) -> Result<Json<DebtRelation>, ApiError> {
    let relation = service
        .record_payment(&group_id, &relation_id, req.amount, &req.recorded_by_id)
        .await?;
    Ok(Json(relation))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/relations/{relation_id}/clear",
    request_body = ClearDebtRequest,
    params(
        ("group_id" = String, Path, description = "Group of the debt"),
        ("relation_id" = String, Path, description = "Debt relation to remove")
    ),
    responses(
        (status = 200, description = "Debt cleared"),
        (status = 404, description = "Debt relation not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn clear_debt(
    State(service): State<Arc<AppService>>,
    Path((group_id, relation_id)): Path<(String, String)>,
    Json(req): Json<ClearDebtRequest>,
) -> Result<StatusCode, ApiError> {
    service.clear_debt(&group_id, &relation_id, &req.cleared_by_id).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/relations/{relation_id}/remind",
    request_body = SendReminderRequest,
    params(
        ("group_id" = String, Path, description = "Group of the debt"),
        ("relation_id" = String, Path, description = "Debt relation to remind about")
    ),
    responses(
        (status = 200, description = "Whether a reminder is due", body = ReminderResponse),
        (status = 404, description = "Debt relation not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn send_reminder(
    State(service): State<Arc<AppService>>,
    Path((group_id, relation_id)): Path<(String, String)>,
    Json(req): Json<SendReminderRequest>,
) -> Result<Json<ReminderResponse>, ApiError> {
    let sent = service
        .send_reminder(&group_id, &relation_id, Utc::now(), &req.sent_by_id)
        .await?;
    Ok(Json(ReminderResponse { sent }))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/penalties",
    request_body = ApplyPenaltiesRequest,
    params(
        ("group_id" = String, Path, description = "Group to sweep")
    ),
    responses(
        (status = 200, description = "Relations that accrued a penalty", body = Vec<DebtRelation>),
        (status = 400, description = "Malformed debt relation in storage", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn apply_penalties(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
    Json(req): Json<ApplyPenaltiesRequest>,
) -> Result<Json<Vec<DebtRelation>>, ApiError> {
    let penalised = service
        .apply_penalties(&group_id, Utc::now(), req.applied_by_id.as_deref())
        .await?;
    Ok(Json(penalised))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/audits",
    params(
        ("group_id" = String, Path, description = "Group to inspect")
    ),
    responses(
        (status = 200, description = "Audit trail of the group", body = Vec<GroupAudit>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn get_group_audits(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<GroupAudit>>, ApiError> {
    let audits = service.get_group_audits(&group_id).await?;
    Ok(Json(audits))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    responses(
        (status = 200, description = "Application action log", body = Vec<AppLog>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn get_app_logs(State(service): State<Arc<AppService>>) -> Result<Json<Vec<AppLog>>, ApiError> {
    let logs = service.get_app_logs().await?;
    Ok(Json(logs))
}
