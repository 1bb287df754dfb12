// src/handlers/invoices.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        dashboard::InvoiceStats,
        invoice::{InvoiceDetail, InvoiceRequest, PreviewTotals},
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct YearQuery {
    /// Ano da numeração; padrão: ano corrente
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AmountQuery {
    #[param(value_type = f64, example = 1200.8)]
    pub amount: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreviewPayload {
    #[schema(value_type = f64, example = 120.0)]
    pub total_ttc: Decimal,
}

// POST /api/invoices
#[utoipa::path(
    post,
    path = "/api/invoices",
    tag = "Faturas",
    request_body = InvoiceRequest,
    responses(
        (status = 201, description = "Fatura criada", body = InvoiceDetail),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Produto não encontrado"),
        (status = 422, description = "Estoque insuficiente")
    )
)]
pub async fn create_invoice(
    State(app_state): State<AppState>,
    Json(payload): Json<InvoiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.invoice_service.create_invoice(payload).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

// GET /api/invoices?year=
#[utoipa::path(
    get,
    path = "/api/invoices",
    tag = "Faturas",
    params(YearQuery),
    responses(
        (status = 200, description = "Faturas do ano, mais recentes primeiro", body = [InvoiceDetail])
    )
)]
pub async fn list_invoices(
    State(app_state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> Result<impl IntoResponse, AppError> {
    let invoices = app_state.invoice_service.list_invoices(query.year).await?;
    Ok((StatusCode::OK, Json(invoices)))
}

// GET /api/invoices/years
#[utoipa::path(
    get,
    path = "/api/invoices/years",
    tag = "Faturas",
    responses(
        (status = 200, description = "Anos com faturas (sempre inclui o corrente)", body = [i32])
    )
)]
pub async fn available_years(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let years = app_state.invoice_service.available_years().await?;
    Ok((StatusCode::OK, Json(years)))
}

// GET /api/invoices/stats?year=
#[utoipa::path(
    get,
    path = "/api/invoices/stats",
    tag = "Faturas",
    params(YearQuery),
    responses(
        (status = 200, description = "Indicadores do ano", body = InvoiceStats)
    )
)]
pub async fn year_stats(
    State(app_state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> Result<impl IntoResponse, AppError> {
    let year = query
        .year
        .unwrap_or_else(|| app_state.invoice_service.current_year());
    let stats = app_state.dashboard_service.year_stats(year).await?;
    Ok((StatusCode::OK, Json(stats)))
}

// POST /api/invoices/preview
#[utoipa::path(
    post,
    path = "/api/invoices/preview",
    tag = "Faturas",
    request_body = PreviewPayload,
    responses(
        (status = 200, description = "HT, TVA e valor por extenso a partir do TTC", body = PreviewTotals),
        (status = 400, description = "Valor negativo ou acima do máximo")
    )
)]
pub async fn preview_totals(
    State(app_state): State<AppState>,
    Json(payload): Json<PreviewPayload>,
) -> Result<impl IntoResponse, AppError> {
    let preview = app_state.invoice_service.preview_totals(payload.total_ttc)?;
    Ok((StatusCode::OK, Json(preview)))
}

// GET /api/amount-in-words?amount=
#[utoipa::path(
    get,
    path = "/api/amount-in-words",
    tag = "Faturas",
    params(AmountQuery),
    responses(
        (status = 200, description = "Cláusula legal com o valor por extenso", body = String),
        (status = 400, description = "Valor negativo ou acima do máximo")
    )
)]
pub async fn amount_in_words(
    State(app_state): State<AppState>,
    Query(query): Query<AmountQuery>,
) -> Result<impl IntoResponse, AppError> {
    let text = app_state.invoice_service.render_amount_in_words(query.amount)?;
    Ok((StatusCode::OK, Json(serde_json::json!({ "text": text }))))
}

// GET /api/invoices/{id}
#[utoipa::path(
    get,
    path = "/api/invoices/{id}",
    tag = "Faturas",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses(
        (status = 200, description = "Fatura com itens", body = InvoiceDetail),
        (status = 404, description = "Fatura não encontrada")
    )
)]
pub async fn get_invoice(
    State(app_state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.invoice_service.get_invoice(invoice_id).await?;
    Ok((StatusCode::OK, Json(detail)))
}

// PUT /api/invoices/{id}
#[utoipa::path(
    put,
    path = "/api/invoices/{id}",
    tag = "Faturas",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    request_body = InvoiceRequest,
    responses(
        (status = 200, description = "Fatura atualizada (itens substituídos)", body = InvoiceDetail),
        (status = 404, description = "Fatura ou produto não encontrado"),
        (status = 409, description = "Fatura cancelada"),
        (status = 422, description = "Estoque insuficiente")
    )
)]
pub async fn update_invoice(
    State(app_state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
    Json(payload): Json<InvoiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state
        .invoice_service
        .update_invoice(invoice_id, payload)
        .await?;
    Ok((StatusCode::OK, Json(detail)))
}

// DELETE /api/invoices/{id}
#[utoipa::path(
    delete,
    path = "/api/invoices/{id}",
    tag = "Faturas",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses(
        (status = 200, description = "Fatura cancelada e estoque devolvido", body = InvoiceDetail),
        (status = 404, description = "Fatura não encontrada"),
        (status = 409, description = "Fatura já cancelada")
    )
)]
pub async fn cancel_invoice(
    State(app_state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.invoice_service.cancel_invoice(invoice_id).await?;
    Ok((StatusCode::OK, Json(detail)))
}
