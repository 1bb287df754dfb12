// src/db/inventory_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::inventory::{InventoryStats, NewProduct, Product},
};

#[derive(Clone, Default)]
pub struct InventoryRepository;

impl InventoryRepository {
    pub fn new() -> Self {
        Self
    }

    /// Lê o produto com `FOR UPDATE`: dois pedidos concorrentes sobre o mesmo
    /// produto ficam em fila até o commit/rollback do primeiro.
    pub async fn get_product_for_update<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE id = $1 FOR UPDATE",
        )
            .bind(product_id)
            .fetch_optional(executor)
            .await?;

        Ok(product)
    }

    pub async fn update_stock_level<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        new_stock: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE products SET current_stock = $1, updated_at = NOW() WHERE id = $2",
        )
            .bind(new_stock)
            .bind(product_id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ProductNotFound(product_id));
        }
        Ok(())
    }

    /// Cria um produto de catálogo já com o saldo inicial.
    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        product: &NewProduct,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (reference, name, buying_price, selling_price, current_stock, min_stock_level)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
            .bind(&product.reference)
            .bind(&product.name)
            .bind(product.buying_price)
            .bind(product.selling_price)
            .bind(product.initial_stock)
            .bind(product.min_stock_level)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::ReferenceAlreadyExists(product.reference.clone());
                    }
                }
                e.into()
            })
    }

    /// Mesma regra de `Product::is_low_stock`: saldo menor ou igual ao mínimo.
    pub async fn get_stats<'e, E>(&self, executor: E) -> Result<InventoryStats, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stats = sqlx::query_as::<_, InventoryStats>(
            r#"
            SELECT
                COUNT(*) AS total_products,
                COUNT(*) FILTER (WHERE current_stock <= min_stock_level) AS low_stock_count
            FROM products
            "#,
        )
            .fetch_one(executor)
            .await?;

        Ok(stats)
    }
}
