// src/services/inventory_service.rs

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{finish, Store},
    models::inventory::{InventoryStats, NewProduct, ProductView},
    services::stock_ledger::StockLedger,
};

#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn Store>,
    stock_ledger: StockLedger,
}

impl InventoryService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            stock_ledger: StockLedger::new(),
        }
    }

    // --- CREATE PRODUCT ---
    pub async fn create_product(&self, product: NewProduct) -> Result<ProductView, AppError> {
        let product = normalize(product)?;

        let mut session = self.store.begin().await?;
        let result = session.insert_product(&product).await;
        let created = finish(session, result).await?;

        tracing::info!(
            product_id = %created.id,
            reference = %created.reference,
            stock = created.current_stock,
            "produto criado"
        );
        Ok(created.into())
    }

    pub async fn get_product(&self, product_id: Uuid) -> Result<ProductView, AppError> {
        let mut session = self.store.begin().await?;
        let result = session
            .get_product(product_id)
            .await
            .and_then(|found| found.ok_or(AppError::ProductNotFound(product_id)));
        let product = finish(session, result).await?;
        Ok(product.into())
    }

    pub async fn inventory_stats(&self) -> Result<InventoryStats, AppError> {
        let mut session = self.store.begin().await?;
        let result = session.inventory_stats().await;
        finish(session, result).await
    }

    // --- ADD STOCK (ENTRADA) ---
    // Mesmo caminho do estorno de fatura: o saldo só muda pelo StockLedger.
    pub async fn add_stock(&self, product_id: Uuid, quantity: i32) -> Result<ProductView, AppError> {
        if quantity < 1 {
            return Err(AppError::field(
                "quantity",
                "range",
                "A quantidade deve ser pelo menos 1.",
            ));
        }

        let mut session = self.store.begin().await?;
        let result = self
            .stock_ledger
            .increase(session.as_mut(), product_id, quantity)
            .await;
        let product = finish(session, result).await?;

        tracing::info!(%product_id, quantity, new_stock = product.current_stock, "entrada de estoque registrada");
        Ok(product.into())
    }
}

fn normalize(mut product: NewProduct) -> Result<NewProduct, AppError> {
    product.reference = product.reference.trim().to_string();
    product.name = product.name.trim().to_string();

    if product.reference.is_empty() {
        return Err(AppError::field("reference", "required", "A referência é obrigatória."));
    }
    if product.name.is_empty() {
        return Err(AppError::field("name", "required", "O nome é obrigatório."));
    }
    if product.buying_price < Decimal::ZERO {
        return Err(AppError::field("buyingPrice", "range", "O valor não pode ser negativo."));
    }
    if product.selling_price < Decimal::ZERO {
        return Err(AppError::field("sellingPrice", "range", "O valor não pode ser negativo."));
    }
    if product.initial_stock < 0 {
        return Err(AppError::field("initialStock", "range", "O estoque inicial não pode ser negativo."));
    }
    if product.min_stock_level < 0 {
        return Err(AppError::field("minStockLevel", "range", "O estoque mínimo não pode ser negativo."));
    }
    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product() -> NewProduct {
        NewProduct {
            reference: " REF-001 ".into(),
            name: "Ciment".into(),
            buying_price: dec!(62.50),
            selling_price: dec!(85.00),
            initial_stock: 10,
            min_stock_level: 2,
        }
    }

    #[test]
    fn normalize_trims_and_accepts_valid_product() {
        let product = normalize(product()).unwrap();
        assert_eq!(product.reference, "REF-001");
    }

    #[test]
    fn normalize_rejects_blank_reference_and_negative_values() {
        let mut blank = product();
        blank.reference = "   ".into();
        assert!(matches!(normalize(blank), Err(AppError::ValidationError(_))));

        let mut negative = product();
        negative.selling_price = dec!(-1);
        assert!(matches!(normalize(negative), Err(AppError::ValidationError(_))));

        let mut negative_stock = product();
        negative_stock.initial_stock = -3;
        assert!(normalize(negative_stock).is_err());
    }
}
