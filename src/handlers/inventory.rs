// src/handlers/inventory.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, validation::validate_not_negative},
    config::AppState,
    models::inventory::{InventoryStats, NewProduct, ProductView},
};

// ---
// Payload: CreateProduct
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "A referência é obrigatória."))]
    #[schema(example = "REF-001")]
    pub reference: String,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = f64, example = 62.5)]
    pub buying_price: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = f64, example = 85.0)]
    pub selling_price: Decimal,

    // Sem estoque inicial, assume 0
    #[validate(range(min = 0, message = "O estoque inicial não pode ser negativo."))]
    #[serde(default)]
    pub initial_stock: i32,

    #[validate(range(min = 0, message = "O estoque mínimo não pode ser negativo."))]
    #[serde(default)]
    pub min_stock_level: i32,
}

// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Produtos",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = ProductView),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Referência já cadastrada")
    )
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .inventory_service
        .create_product(NewProduct {
            reference: payload.reference,
            name: payload.name,
            buying_price: payload.buying_price,
            selling_price: payload.selling_price,
            initial_stock: payload.initial_stock,
            min_stock_level: payload.min_stock_level,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

// GET /api/products/stats
#[utoipa::path(
    get,
    path = "/api/products/stats",
    tag = "Produtos",
    responses(
        (status = 200, description = "Total de produtos e quantos estão com estoque baixo", body = InventoryStats)
    )
)]
pub async fn inventory_stats(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.inventory_service.inventory_stats().await?;
    Ok((StatusCode::OK, Json(stats)))
}

// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Produtos",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto com alerta de estoque baixo", body = ProductView),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.inventory_service.get_product(product_id).await?;
    Ok((StatusCode::OK, Json(product)))
}

// ---
// Payload: AddStock (entrada manual)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddStockPayload {
    #[validate(range(min = 1, message = "A quantidade deve ser pelo menos 1."))]
    #[schema(example = 24)]
    pub quantity: i32,
}

// POST /api/products/{id}/stock
#[utoipa::path(
    post,
    path = "/api/products/{id}/stock",
    tag = "Produtos",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = AddStockPayload,
    responses(
        (status = 200, description = "Saldo atualizado", body = ProductView),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn add_stock(
    State(app_state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<AddStockPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .inventory_service
        .add_stock(product_id, payload.quantity)
        .await?;

    Ok((StatusCode::OK, Json(product)))
}
