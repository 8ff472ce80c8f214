//! Transfer routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use tally_db::{LedgerError, LedgerRepository};
use tally_shared::AccountId;

/// Creates the transfers router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/transfers", post(create_transfer))
}

/// Request body for a transfer.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// Source account.
    pub from_id: AccountId,
    /// Destination account.
    pub to_id: AccountId,
    /// Amount to move. Must be positive.
    pub amount: Decimal,
}

/// POST /transfers - Move funds between two accounts atomically.
async fn create_transfer(
    State(state): State<AppState>,
    Json(payload): Json<TransferRequest>,
) -> impl IntoResponse {
    let repo = LedgerRepository::new((*state.db).clone());

    match repo
        .transfer(payload.from_id, payload.to_id, payload.amount)
        .await
    {
        Ok(outcome) => {
            info!(
                from_id = %outcome.from.account_id,
                to_id = %outcome.to.account_id,
                amount = %payload.amount,
                "Transfer completed"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "from_id": outcome.from.account_id,
                    "from_balance": outcome.from.balance.to_string(),
                    "to_id": outcome.to.account_id,
                    "to_balance": outcome.to.balance.to_string()
                })),
            )
                .into_response()
        }
        Err(LedgerError::InvalidInput(e)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_input",
                "message": e.to_string()
            })),
        )
            .into_response(),
        Err(LedgerError::AccountNotFound(id)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "account_not_found",
                "message": format!("Account {id} does not exist")
            })),
        )
            .into_response(),
        Err(e @ LedgerError::InsufficientFunds { .. }) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "insufficient_funds",
                "message": e.to_string()
            })),
        )
            .into_response(),
        Err(LedgerError::Database(e)) => {
            error!(
                error = %e,
                from_id = %payload.from_id,
                to_id = %payload.to_id,
                "Database error during transfer"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use sea_orm::DatabaseConnection;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let state = AppState {
            db: Arc::new(DatabaseConnection::Disconnected),
        };
        Router::new().merge(routes()).with_state(state)
    }

    async fn post_transfer(body: &'static str) -> axum::response::Response {
        test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/transfers")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_transfer_to_self_is_invalid_input() {
        // Must be rejected as bad input, not as insufficient funds.
        let response = post_transfer(r#"{"from_id": 5, "to_id": 5, "amount": "10.00"}"#).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "invalid_input");
    }

    #[tokio::test]
    async fn test_transfer_rejects_zero_amount() {
        let response = post_transfer(r#"{"from_id": 1, "to_id": 2, "amount": "0"}"#).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "invalid_input");
    }

    #[tokio::test]
    async fn test_transfer_rejects_negative_amount() {
        let response = post_transfer(r#"{"from_id": 1, "to_id": 2, "amount": "-2.50"}"#).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "invalid_input");
    }

    #[tokio::test]
    async fn test_transfer_rejects_non_positive_source() {
        let response = post_transfer(r#"{"from_id": 0, "to_id": 2, "amount": "1.00"}"#).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "invalid_input");
    }

    #[tokio::test]
    async fn test_transfer_store_failure_is_internal_error() {
        // A fully valid body against an unreachable store: 500 with no
        // cause leaked into the body.
        let response = post_transfer(r#"{"from_id": 1, "to_id": 2, "amount": "5.00"}"#).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert_eq!(json["error"], "internal_error");
        assert_eq!(json["message"], "An error occurred");
    }

    #[tokio::test]
    async fn test_transfer_rejects_missing_field() {
        let response = post_transfer(r#"{"from_id": 1, "amount": "1.00"}"#).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_transfer_rejects_get() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/transfers")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
