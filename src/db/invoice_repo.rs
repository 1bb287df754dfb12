// src/db/invoice_repo.rs

use sqlx::{types::Json, Executor, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::invoice::{Invoice, InvoiceFields, InvoiceItem, NewInvoice, NewInvoiceItem},
};

#[derive(Clone, Default)]
pub struct InvoiceRepository;

impl InvoiceRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  SEQUÊNCIA
    // =========================================================================

    /// Trava consultiva por ano, liberada no fim da transação.
    /// Um `FOR UPDATE` não bloquearia inserções de linhas novas, por isso a trava.
    pub async fn lock_year<'e, E>(&self, executor: E, year: i32) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext('invoices.sequence'), $1)")
            .bind(year)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn last_sequence<'e, E>(&self, executor: E, year: i32) -> Result<Option<i32>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Canceladas contam: um número nunca é reutilizado
        let last = sqlx::query_scalar::<_, i32>(
            "SELECT sequence_number FROM invoices WHERE year = $1 ORDER BY sequence_number DESC LIMIT 1",
        )
            .bind(year)
            .fetch_optional(executor)
            .await?;

        Ok(last)
    }

    // =========================================================================
    //  CABEÇALHO
    // =========================================================================

    pub async fn find_for_update<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
    ) -> Result<Option<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = $1 FOR UPDATE")
            .bind(invoice_id)
            .fetch_optional(executor)
            .await?;

        Ok(invoice)
    }

    pub async fn create_invoice<'e, E>(
        &self,
        executor: E,
        invoice: &NewInvoice,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let fields = &invoice.fields;
        let created = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (
                year, sequence_number, custom_display_id, invoice_date,
                client_name, client_city, client_tax_id,
                total_ht, total_tax, total_ttc, total_in_words, payment
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
            .bind(invoice.year)
            .bind(invoice.sequence_number)
            .bind(fields.custom_display_id.as_deref())
            .bind(fields.invoice_date)
            .bind(&fields.client_name)
            .bind(&fields.client_city)
            .bind(&fields.client_tax_id)
            .bind(fields.totals.ht)
            .bind(fields.totals.tax)
            .bind(fields.totals.ttc)
            .bind(&fields.total_in_words)
            .bind(Json(&fields.payment))
            .fetch_one(executor)
            .await?;

        Ok(created)
    }

    // Ano e sequência nunca mudam numa edição.
    pub async fn update_invoice<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
        fields: &InvoiceFields,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET custom_display_id = $1, invoice_date = $2,
                client_name = $3, client_city = $4, client_tax_id = $5,
                total_ht = $6, total_tax = $7, total_ttc = $8,
                total_in_words = $9, payment = $10, updated_at = NOW()
            WHERE id = $11
            RETURNING *
            "#,
        )
            .bind(fields.custom_display_id.as_deref())
            .bind(fields.invoice_date)
            .bind(&fields.client_name)
            .bind(&fields.client_city)
            .bind(&fields.client_tax_id)
            .bind(fields.totals.ht)
            .bind(fields.totals.tax)
            .bind(fields.totals.ttc)
            .bind(&fields.total_in_words)
            .bind(Json(&fields.payment))
            .bind(invoice_id)
            .fetch_optional(executor)
            .await?;

        updated.ok_or(AppError::InvoiceNotFound(invoice_id))
    }

    pub async fn mark_cancelled<'e, E>(&self, executor: E, invoice_id: Uuid) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cancelled = sqlx::query_as::<_, Invoice>(
            "UPDATE invoices SET cancelled_at = NOW(), updated_at = NOW() WHERE id = $1 RETURNING *",
        )
            .bind(invoice_id)
            .fetch_optional(executor)
            .await?;

        cancelled.ok_or(AppError::InvoiceNotFound(invoice_id))
    }

    pub async fn list_by_year<'e, E>(&self, executor: E, year: i32) -> Result<Vec<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT * FROM invoices
            WHERE year = $1 AND cancelled_at IS NULL
            ORDER BY created_at DESC, sequence_number DESC
            "#,
        )
            .bind(year)
            .fetch_all(executor)
            .await?;

        Ok(invoices)
    }

    pub async fn list_years<'e, E>(&self, executor: E) -> Result<Vec<i32>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let years = sqlx::query_scalar::<_, i32>("SELECT DISTINCT year FROM invoices ORDER BY year DESC")
            .fetch_all(executor)
            .await?;

        Ok(years)
    }

    // =========================================================================
    //  ITENS
    // =========================================================================

    pub async fn list_items<'e, E>(&self, executor: E, invoice_id: Uuid) -> Result<Vec<InvoiceItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, InvoiceItem>(
            "SELECT * FROM invoice_items WHERE invoice_id = $1 ORDER BY position ASC",
        )
            .bind(invoice_id)
            .fetch_all(executor)
            .await?;

        Ok(items)
    }

    pub async fn add_item<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
        item: &NewInvoiceItem,
    ) -> Result<InvoiceItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let created = sqlx::query_as::<_, InvoiceItem>(
            r#"
            INSERT INTO invoice_items (
                invoice_id, product_id, position, description,
                quantity, buying_price, unit_price, line_total
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
            .bind(invoice_id)
            .bind(item.product_id)
            .bind(item.position)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(item.buying_price)
            .bind(item.unit_price)
            .bind(item.line_total)
            .fetch_one(executor)
            .await?;

        Ok(created)
    }

    pub async fn delete_items<'e, E>(&self, executor: E, invoice_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM invoice_items WHERE invoice_id = $1")
            .bind(invoice_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn list_items_for_year<'e, E>(&self, executor: E, year: i32) -> Result<Vec<InvoiceItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, InvoiceItem>(
            r#"
            SELECT ii.* FROM invoice_items ii
            JOIN invoices i ON ii.invoice_id = i.id
            WHERE i.year = $1 AND i.cancelled_at IS NULL
            ORDER BY i.sequence_number ASC, ii.position ASC
            "#,
        )
            .bind(year)
            .fetch_all(executor)
            .await?;

        Ok(items)
    }
}
