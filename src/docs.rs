// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "facture", description = "Faturamento com controle de estoque, numeração anual e TVA 20%"),
    paths(
        // --- Faturas ---
        handlers::invoices::create_invoice,
        handlers::invoices::list_invoices,
        handlers::invoices::available_years,
        handlers::invoices::year_stats,
        handlers::invoices::preview_totals,
        handlers::invoices::amount_in_words,
        handlers::invoices::get_invoice,
        handlers::invoices::update_invoice,
        handlers::invoices::cancel_invoice,

        // --- Produtos ---
        handlers::inventory::create_product,
        handlers::inventory::inventory_stats,
        handlers::inventory::get_product,
        handlers::inventory::add_stock,

        // --- Clientes ---
        handlers::clients::create_client,
        handlers::clients::get_client,
    ),
    components(
        schemas(
            // --- Faturas ---
            models::invoice::PaymentMethod,
            models::invoice::Invoice,
            models::invoice::InvoiceItem,
            models::invoice::InvoiceDetail,
            models::invoice::InvoiceRequest,
            models::invoice::InvoiceItemRequest,
            models::invoice::PreviewTotals,

            // --- Estoque ---
            models::inventory::Product,
            models::inventory::ProductView,
            models::inventory::InventoryStats,

            // --- Clientes ---
            models::client::Client,

            // --- DASHBOARD ---
            models::dashboard::MonthlyRevenue,
            models::dashboard::ClientStat,
            models::dashboard::ProductStat,
            models::dashboard::InvoiceStats,

            // --- Payloads ---
            handlers::invoices::PreviewPayload,
            handlers::inventory::CreateProductPayload,
            handlers::inventory::AddStockPayload,
            handlers::clients::CreateClientPayload,
        )
    ),
    tags(
        (name = "Faturas", description = "Emissão, edição e cancelamento de faturas"),
        (name = "Produtos", description = "Catálogo e saldo de estoque"),
        (name = "Clientes", description = "Cadastro de clientes (ICE)")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/invoices",
            "/api/invoices/{id}",
            "/api/invoices/preview",
            "/api/amount-in-words",
            "/api/products/{id}/stock",
            "/api/products/stats",
            "/api/clients",
        ] {
            assert!(doc.paths.paths.contains_key(path), "faltando: {}", path);
        }
    }
}
