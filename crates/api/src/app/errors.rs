use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use ledgerly_infra::{ErrorCategory, StatementError};

pub fn statement_error_to_response(err: StatementError) -> axum::response::Response {
    let status = match err.category() {
        ErrorCategory::NotFound => StatusCode::NOT_FOUND,
        ErrorCategory::Rejected | ErrorCategory::Invalid => StatusCode::BAD_REQUEST,
        ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let code = match &err {
        StatementError::AccountNotFound => "account_not_found",
        StatementError::ReceiverNotFound => "receiver_not_found",
        StatementError::StatementNotFound => "statement_not_found",
        StatementError::InsufficientFunds { .. } => "insufficient_funds",
        StatementError::InvalidInput(_) => "validation_error",
        StatementError::Store(_) => "store_error",
    };
    json_error(status, code, err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
