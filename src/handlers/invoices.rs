// src/handlers/invoices.rs

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use super::validate_not_negative;
use crate::{
    common::error::AppError, config::AppState, services::invoice_service::LineSubmission,
};

#[derive(Debug, Deserialize, Validate)]
pub struct InvoiceLinePayload {
    pub product_id: i64,

    // Blank form fields arrive as omitted values and default to zero; a
    // zero rate or qty marks the row as empty and it is skipped downstream.
    #[serde(default)]
    #[validate(custom(function = "validate_not_negative"))]
    pub rate: Decimal,

    #[serde(default)]
    #[validate(custom(function = "validate_not_negative"))]
    pub qty: Decimal,

    #[serde(default)]
    #[validate(custom(function = "validate_not_negative"))]
    pub discount: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoicePayload {
    pub invoice_no: Option<String>,

    #[validate(length(min = 1, message = "The date is required (YYYY-MM-DD)."))]
    pub date: String,

    pub seller_id: i64,
    pub receiver_id: i64,

    #[validate(nested)]
    pub items: Vec<InvoiceLinePayload>,
}

/// `GET /` — every invoice header, newest first.
pub async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.invoice_service.list_invoices().await?))
}

pub async fn create_invoice(
    State(state): State<AppState>,
    Json(payload): Json<CreateInvoicePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let lines: Vec<LineSubmission> = payload
        .items
        .iter()
        .map(|item| LineSubmission {
            product_id: item.product_id,
            rate: item.rate,
            qty: item.qty,
            discount: item.discount,
        })
        .collect();

    let invoice = state
        .invoice_service
        .create_invoice(
            payload.invoice_no,
            &payload.date,
            payload.seller_id,
            payload.receiver_id,
            &lines,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(invoice)))
}

/// `GET /pdf/{id}` — renders the invoice and serves it as a download.
pub async fn download_pdf(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let rendered = state.pdf_service.generate_invoice_pdf(id).await?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", rendered.filename),
        ),
    ];

    Ok((headers, rendered.bytes).into_response())
}
