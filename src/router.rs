// src/router.rs

use axum::{
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{config::AppState, docs::ApiDoc, handlers};

pub fn app(app_state: AppState) -> Router {
    let invoice_routes = Router::new()
        .route("/"
               ,post(handlers::invoices::create_invoice)
               .get(handlers::invoices::list_invoices)
        )
        .route("/years", get(handlers::invoices::available_years))
        .route("/stats", get(handlers::invoices::year_stats))
        .route("/preview", post(handlers::invoices::preview_totals))
        .route("/{id}"
               ,get(handlers::invoices::get_invoice)
               .put(handlers::invoices::update_invoice)
               .delete(handlers::invoices::cancel_invoice)
        );

    let product_routes = Router::new()
        .route("/", post(handlers::inventory::create_product))
        .route("/stats", get(handlers::inventory::inventory_stats))
        .route("/{id}", get(handlers::inventory::get_product))
        .route("/{id}/stock", post(handlers::inventory::add_stock));

    let client_routes = Router::new()
        .route("/", post(handlers::clients::create_client))
        .route("/{id}", get(handlers::clients::get_client));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/amount-in-words", get(handlers::invoices::amount_in_words))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api/invoices", invoice_routes)
        .nest("/api/products", product_routes)
        .nest("/api/clients", client_routes)
        .with_state(app_state)
}
