// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::inventory::InventoryStats;

// 1. Faturamento por mês (sempre 12 entradas)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    #[schema(example = "Fév")]
    pub month: String,
    pub revenue: Decimal,
}

// 2. Melhores clientes do ano
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientStat {
    pub name: String,
    pub total_spend: Decimal,
    pub invoice_count: i64,
}

// 3. Curva ABC (Top Produtos, pela descrição impressa)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductStat {
    pub name: String,
    pub quantity_sold: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceStats {
    pub year: i32,
    pub total_revenue: Decimal,
    // Lucro = total da linha - (preço de compra congelado * quantidade)
    pub total_net_profit: Decimal,
    pub total_invoices: i64,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub top_clients: Vec<ClientStat>,
    pub top_products: Vec<ProductStat>,
    // Retrato do catálogo no momento da consulta (não depende do ano)
    pub inventory: InventoryStats,
}
