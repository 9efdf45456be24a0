use utoipa::OpenApi;

use crate::{
    api::models::{
        ApplyPenaltiesRequest, ClearDebtRequest, ErrorResponse, RecordPaymentRequest, RecordTransactionRequest,
        RecordTransactionResponse, RelationsByTransactionResponse, ReminderResponse, SendReminderRequest,
    },
    core::models::{
        AggregatedDebt, AppLog, DebtRelation, DebtState, Exposure, GroupAudit, GroupBalances, Share, Transaction,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::record_transaction,
        super::handlers::list_transactions,
        super::handlers::get_group_balances,
        super::handlers::get_user_exposure,
        super::handlers::get_relations_by_transaction,
        super::handlers::record_payment,
        super::handlers::clear_debt,
        super::handlers::send_reminder,
        super::handlers::apply_penalties,
        super::handlers::get_group_audits,
        super::handlers::get_app_logs
    ),
    components(schemas(
        RecordTransactionRequest,
        RecordTransactionResponse,
        RecordPaymentRequest,
        ClearDebtRequest,
        SendReminderRequest,
        ApplyPenaltiesRequest,
        RelationsByTransactionResponse,
        ReminderResponse,
        ErrorResponse,
        Share,
        Transaction,
        DebtRelation,
        DebtState,
        AggregatedDebt,
        Exposure,
        GroupBalances,
        AppLog,
        GroupAudit
    )),
    info(
        title = "Debt Ledger API",
        description = "API for netting group debts and tracking their settlement",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
