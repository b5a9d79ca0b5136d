// src/handlers/products.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::{common::error::AppError, config::AppState};

fn validate_gst_rate(rate: &Decimal) -> Result<(), ValidationError> {
    if rate.is_sign_negative() || *rate > Decimal::ONE_HUNDRED {
        let mut err = ValidationError::new("range");
        err.message = Some("The GST rate must be between 0 and 100.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "The name is required."))]
    pub name: String,

    #[serde(default)]
    pub hsn: String,

    #[serde(default)]
    pub unit: String,

    #[validate(custom(function = "validate_gst_rate"))]
    pub gst_rate: Decimal,
}

pub async fn list_products(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.products.list().await?))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = state
        .products
        .create(&payload.name, &payload.hsn, &payload.unit, payload.gst_rate)
        .await?;

    tracing::info!(id = product.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.products.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
