// src/handlers/parties.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    common::error::AppError, config::AppState, db::PartyRepository, models::party::Party,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePartyPayload {
    #[validate(length(min = 1, message = "The name is required."))]
    pub name: String,

    #[validate(length(min = 1, message = "The state is required."))]
    pub state: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub gstin: String,
}

// Sellers and receivers share the payload and the logic; only the backing
// repository differs. The return type is concrete so the opaque type does
// not capture the repository borrow (edition 2024 capture rules).
async fn create(
    repo: &PartyRepository,
    payload: CreatePartyPayload,
) -> Result<(StatusCode, Json<Party>), AppError> {
    payload.validate()?;

    let party = repo
        .create(&payload.name, &payload.state, &payload.address, &payload.gstin)
        .await?;

    tracing::info!(kind = repo.kind().label(), id = party.id, "party created");
    Ok((StatusCode::CREATED, Json(party)))
}

pub async fn list_sellers(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.sellers.list().await?))
}

pub async fn create_seller(
    State(state): State<AppState>,
    Json(payload): Json<CreatePartyPayload>,
) -> Result<impl IntoResponse, AppError> {
    create(&state.sellers, payload).await
}

pub async fn delete_seller(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.sellers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_receivers(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.receivers.list().await?))
}

pub async fn create_receiver(
    State(state): State<AppState>,
    Json(payload): Json<CreatePartyPayload>,
) -> Result<impl IntoResponse, AppError> {
    create(&state.receivers, payload).await
}

pub async fn delete_receiver(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.receivers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
