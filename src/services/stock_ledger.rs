// src/services/stock_ledger.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::Session,
    models::inventory::Product,
};

/// Movimentações de saldo. Sempre dentro da sessão da operação que as pediu:
/// uma falha posterior na mesma operação desfaz tudo o que foi movido aqui.
#[derive(Clone, Default)]
pub struct StockLedger;

impl StockLedger {
    pub fn new() -> Self {
        Self
    }

    /// Baixa de estoque (venda). Retorna o produto como estava antes da baixa,
    /// que serve de "foto" para a linha da fatura.
    pub async fn decrease(
        &self,
        session: &mut dyn Session,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Product, AppError> {
        let product = session
            .get_product(product_id)
            .await?
            .ok_or(AppError::ProductNotFound(product_id))?;

        if quantity > product.current_stock {
            return Err(AppError::InsufficientStock {
                product: product.name.clone(),
                requested: quantity,
                available: product.current_stock,
            });
        }

        let new_stock = product.current_stock - quantity;
        session.persist_stock_level(product_id, new_stock).await?;

        tracing::debug!(%product_id, quantity, new_stock, "baixa de estoque");
        Ok(product)
    }

    /// Estorno (edição ou cancelamento). Sem limite superior.
    pub async fn increase(
        &self,
        session: &mut dyn Session,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Product, AppError> {
        let mut product = session
            .get_product(product_id)
            .await?
            .ok_or(AppError::ProductNotFound(product_id))?;

        let new_stock = product
            .current_stock
            .checked_add(quantity)
            .ok_or_else(|| anyhow::anyhow!("estoque de '{}' excede o limite", product.name))?;
        session.persist_stock_level(product_id, new_stock).await?;

        tracing::debug!(%product_id, quantity, new_stock, "entrada de estoque");
        product.current_stock = new_stock;
        Ok(product)
    }
}
