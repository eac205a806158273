use std::sync::Arc;

use axum::{
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use ledgerly_core::{AccountId, MovementId};
use ledgerly_infra::{RecordMovement, StatementError, TransferFunds};
use ledgerly_statements::MovementKind;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::AccountContext;

pub fn router() -> Router {
    Router::new()
        .route("/balance", get(get_balance))
        .route("/deposit", post(deposit))
        .route("/withdraw", post(withdraw))
        .route("/transfers/:user_id", post(transfer))
        .route("/:statement_id", get(get_statement))
}

pub async fn get_balance(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(account): Extension<AccountContext>,
) -> axum::response::Response {
    match services.get_balance(account.account_id()).await {
        Ok(statement) => (StatusCode::OK, Json(dto::BalanceResponse::from(&statement))).into_response(),
        Err(e) => errors::statement_error_to_response(e),
    }
}

pub async fn deposit(
    services: Extension<Arc<AppServices>>,
    account: Extension<AccountContext>,
    body: Result<Json<dto::MovementRequest>, JsonRejection>,
) -> axum::response::Response {
    record(services, account, MovementKind::Deposit, body).await
}

pub async fn withdraw(
    services: Extension<Arc<AppServices>>,
    account: Extension<AccountContext>,
    body: Result<Json<dto::MovementRequest>, JsonRejection>,
) -> axum::response::Response {
    record(services, account, MovementKind::Withdrawal, body).await
}

async fn record(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(account): Extension<AccountContext>,
    kind: MovementKind,
    body: Result<Json<dto::MovementRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return invalid_body(rejection),
    };

    let cmd = RecordMovement {
        account_id: account.account_id(),
        kind,
        amount: body.amount,
        description: body.description,
    };

    match services.record_movement(cmd).await {
        Ok(m) => (StatusCode::CREATED, Json(dto::MovementResponse::from(&m))).into_response(),
        Err(e) => errors::statement_error_to_response(e),
    }
}

pub async fn transfer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(account): Extension<AccountContext>,
    Path(user_id): Path<String>,
    body: Result<Json<dto::MovementRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return invalid_body(rejection),
    };
    // An id that is not even a UUID cannot name an existing account.
    let receiver = match user_id.parse::<AccountId>() {
        Ok(id) => id,
        Err(_) => return errors::statement_error_to_response(StatementError::ReceiverNotFound),
    };

    let cmd = TransferFunds {
        sender: account.account_id(),
        receiver,
        amount: body.amount,
        description: body.description,
    };

    match services.transfer(cmd).await {
        Ok(m) => (StatusCode::CREATED, Json(dto::MovementResponse::from(&m))).into_response(),
        Err(e) => errors::statement_error_to_response(e),
    }
}

pub async fn get_statement(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(account): Extension<AccountContext>,
    Path(statement_id): Path<String>,
) -> axum::response::Response {
    let id = match statement_id.parse::<MovementId>() {
        Ok(id) => id,
        Err(_) => return errors::statement_error_to_response(StatementError::StatementNotFound),
    };

    match services.get_statement(account.account_id(), id).await {
        Ok(m) => (StatusCode::OK, Json(dto::MovementResponse::from(&m))).into_response(),
        Err(e) => errors::statement_error_to_response(e),
    }
}

fn invalid_body(rejection: JsonRejection) -> axum::response::Response {
    errors::json_error(StatusCode::BAD_REQUEST, "validation_error", rejection.body_text())
}
