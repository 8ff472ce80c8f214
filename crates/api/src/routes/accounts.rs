//! Account balance routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use tally_db::{LedgerError, LedgerRepository};
use tally_shared::AccountId;

/// Creates the accounts router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts/{account_id}/balance", get(get_balance))
        .route("/accounts/{account_id}/refill", post(adjust_balance))
        .route("/accounts/{account_id}/withdraw", post(adjust_balance))
}

/// Request body for refill and withdraw.
#[derive(Debug, Deserialize)]
pub struct AdjustBalanceRequest {
    /// Signed amount to apply. Positive credits the account, negative
    /// debits it.
    pub amount: Decimal,
}

/// GET /accounts/{account_id}/balance - Current balance of one account.
async fn get_balance(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
) -> impl IntoResponse {
    let repo = LedgerRepository::new((*state.db).clone());

    match repo.get_balance(account_id).await {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(json!({
                "id": snapshot.account_id,
                "balance": snapshot.balance.to_string()
            })),
        )
            .into_response(),
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
            error!(error = %e, account_id = %account_id, "Database error reading balance");
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

/// POST /accounts/{account_id}/refill and /accounts/{account_id}/withdraw.
///
/// Both routes share this handler. The amount is applied as given, so a
/// withdraw request carries a negative amount.
async fn adjust_balance(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
    Json(payload): Json<AdjustBalanceRequest>,
) -> impl IntoResponse {
    let repo = LedgerRepository::new((*state.db).clone());

    match repo.adjust_balance(account_id, payload.amount).await {
        Ok(snapshot) => {
            info!(
                account_id = %snapshot.account_id,
                amount = %payload.amount,
                "Balance adjusted"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "id": snapshot.account_id,
                    "balance": snapshot.balance.to_string()
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
            error!(error = %e, account_id = %account_id, "Database error adjusting balance");
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

    /// A disconnected handle drives two kinds of paths: validation
    /// rejections, which never reach the store, and store failures, which
    /// fail at the first query.
    fn test_app() -> Router {
        let state = AppState {
            db: Arc::new(DatabaseConnection::Disconnected),
        };
        Router::new().merge(routes()).with_state(state)
    }

    async fn response_json(response: axum::response::Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_get_balance_rejects_zero_id() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/accounts/0/balance")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "invalid_input");
    }

    #[tokio::test]
    async fn test_get_balance_rejects_negative_id() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/accounts/-3/balance")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "invalid_input");
    }

    #[tokio::test]
    async fn test_get_balance_rejects_non_numeric_id() {
        // Rejected by path deserialization before the handler runs.
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/accounts/abc/balance")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_refill_rejects_zero_id() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/accounts/0/refill")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"amount": "5.00"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "invalid_input");
    }

    #[tokio::test]
    async fn test_withdraw_rejects_negative_id() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/accounts/-1/withdraw")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"amount": "-5.00"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "invalid_input");
    }

    #[tokio::test]
    async fn test_get_balance_store_failure_is_internal_error() {
        // A valid id against an unreachable store: 500 with no cause
        // leaked into the body.
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/accounts/1/balance")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert_eq!(json["error"], "internal_error");
        assert_eq!(json["message"], "An error occurred");
    }

    #[tokio::test]
    async fn test_refill_store_failure_is_internal_error() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/accounts/1/refill")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"amount": "5.00"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert_eq!(json["error"], "internal_error");
    }

    #[tokio::test]
    async fn test_adjust_rejects_missing_amount_field() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/accounts/1/refill")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_adjust_rejects_malformed_json() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/accounts/1/refill")
                    .header("Content-Type", "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_adjust_requires_json_content_type() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/accounts/1/refill")
                    .body(Body::from(r#"{"amount": "5.00"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_balance_rejects_post() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/accounts/1/balance")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
