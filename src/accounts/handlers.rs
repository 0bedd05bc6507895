use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{
    AccountEnvelope, AccountListResponse, ConnectionInfoResponse, CreateAccountRequest,
    DeleteAccountRequest, UpdateAccountRequest,
};
use super::services;
use crate::error::ApiError;
use crate::state::AppState;

pub fn info_routes() -> Router<AppState> {
    Router::new().route("/info", get(connection_info))
}

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/accounts",
            get(list_accounts)
                .post(create_account)
                .put(update_account)
                .delete(delete_account),
        )
        .route("/accounts/:id", get(get_account))
}

#[instrument(skip(state))]
async fn connection_info(
    State(state): State<AppState>,
) -> Result<Json<ConnectionInfoResponse>, ApiError> {
    let data = services::connection_info(&state).await?;
    Ok(Json(ConnectionInfoResponse {
        success: true,
        data,
    }))
}

#[instrument(skip(state, body))]
async fn create_account(
    State(state): State<AppState>,
    Json(body): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountEnvelope>), ApiError> {
    let account = services::create_account(&state, body.id, body.balance).await?;
    Ok((
        StatusCode::CREATED,
        Json(AccountEnvelope {
            success: true,
            message: Some("Account created successfully".to_string()),
            data: account,
        }),
    ))
}

#[instrument(skip(state))]
async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<AccountListResponse>, ApiError> {
    let accounts = services::list_accounts(&state).await?;
    Ok(Json(AccountListResponse {
        success: true,
        count: accounts.len(),
        data: accounts,
    }))
}

#[instrument(skip(state))]
async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AccountEnvelope>, ApiError> {
    let account = services::get_account(&state, &id).await?;
    Ok(Json(AccountEnvelope {
        success: true,
        message: None,
        data: account,
    }))
}

#[instrument(skip(state, body))]
async fn update_account(
    State(state): State<AppState>,
    Json(body): Json<UpdateAccountRequest>,
) -> Result<Json<AccountEnvelope>, ApiError> {
    let account = services::update_account(&state, body.id, body.balance).await?;
    Ok(Json(AccountEnvelope {
        success: true,
        message: Some("Account updated successfully".to_string()),
        data: account,
    }))
}

#[instrument(skip(state, body))]
async fn delete_account(
    State(state): State<AppState>,
    Json(body): Json<DeleteAccountRequest>,
) -> Result<Json<AccountEnvelope>, ApiError> {
    let account = services::delete_account(&state, body.id).await?;
    Ok(Json(AccountEnvelope {
        success: true,
        message: Some("Account deleted successfully".to_string()),
        data: account,
    }))
}
