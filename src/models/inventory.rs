// src/models/inventory.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Produtos (catálogo + saldo) ---
// O saldo (current_stock) só muda pelo StockLedger, dentro de uma transação.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(example = "REF-001")]
    pub reference: String,
    #[schema(example = "Ciment CPJ 45 - sac 50kg")]
    pub name: String,
    #[schema(example = "62.50")]
    pub buying_price: Decimal,
    // Preço de venda com imposto (TTC)
    #[schema(example = "85.00")]
    pub selling_price: Decimal,
    #[schema(example = 120)]
    pub current_stock: i32,
    #[schema(example = 10)]
    pub min_stock_level: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.min_stock_level
    }
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub reference: String,
    pub name: String,
    pub buying_price: Decimal,
    pub selling_price: Decimal,
    pub initial_stock: i32,
    pub min_stock_level: i32,
}

/// Produto como o frontend o vê, com o alerta de estoque baixo já calculado.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub low_stock: bool,
}

/// Resumo do catálogo: quantos produtos existem e quantos estão no mínimo ou abaixo dele.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    #[schema(example = 42)]
    pub total_products: i64,
    #[schema(example = 3)]
    pub low_stock_count: i64,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let low_stock = product.is_low_stock();
        Self { product, low_stock }
    }
}
