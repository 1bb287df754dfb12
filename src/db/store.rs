// src/db/store.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        client::{Client, NewClient},
        inventory::{InventoryStats, NewProduct, Product},
        invoice::{Invoice, InvoiceFields, InvoiceItem, NewInvoice, NewInvoiceItem},
    },
};

/// Fábrica de sessões. Cada chamada de serviço abre exatamente uma sessão.
#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn Session>, AppError>;
}

/// Uma unidade atômica sobre o banco. Nada do que for escrito aqui é visível
/// fora dela antes do `commit`; `rollback` (ou o drop) descarta tudo.
#[async_trait]
pub trait Session: Send {
    // --- Catálogo ---

    /// Lê o produto travando a linha até o fim da sessão.
    async fn get_product(&mut self, product_id: Uuid) -> Result<Option<Product>, AppError>;

    async fn persist_stock_level(&mut self, product_id: Uuid, new_stock: i32) -> Result<(), AppError>;

    async fn insert_product(&mut self, product: &NewProduct) -> Result<Product, AppError>;

    async fn inventory_stats(&mut self) -> Result<InventoryStats, AppError>;

    // --- Clientes ---

    async fn insert_client(&mut self, client: &NewClient) -> Result<Client, AppError>;

    async fn get_client(&mut self, client_id: Uuid) -> Result<Option<Client>, AppError>;

    // --- Faturas ---

    /// Última sequência do ano, incluindo faturas canceladas.
    /// Serializa alocadores concorrentes do mesmo ano até o fim da sessão.
    async fn last_sequence(&mut self, year: i32) -> Result<Option<i32>, AppError>;

    /// Lê o cabeçalho travando a linha até o fim da sessão.
    async fn find_invoice(&mut self, invoice_id: Uuid) -> Result<Option<Invoice>, AppError>;

    async fn insert_invoice(&mut self, invoice: &NewInvoice) -> Result<Invoice, AppError>;

    async fn update_invoice(&mut self, invoice_id: Uuid, fields: &InvoiceFields) -> Result<Invoice, AppError>;

    async fn mark_cancelled(&mut self, invoice_id: Uuid) -> Result<Invoice, AppError>;

    async fn list_items(&mut self, invoice_id: Uuid) -> Result<Vec<InvoiceItem>, AppError>;

    async fn insert_item(&mut self, invoice_id: Uuid, item: &NewInvoiceItem) -> Result<InvoiceItem, AppError>;

    async fn delete_items(&mut self, invoice_id: Uuid) -> Result<(), AppError>;

    /// Faturas não canceladas do ano, mais recentes primeiro.
    async fn list_invoices(&mut self, year: i32) -> Result<Vec<Invoice>, AppError>;

    async fn list_years(&mut self) -> Result<Vec<i32>, AppError>;

    /// Itens das faturas não canceladas do ano.
    async fn list_items_for_year(&mut self, year: i32) -> Result<Vec<InvoiceItem>, AppError>;

    // --- Fronteira da transação ---

    async fn commit(self: Box<Self>) -> Result<(), AppError>;

    async fn rollback(self: Box<Self>) -> Result<(), AppError>;
}

/// Fecha a sessão conforme o resultado: commit no sucesso, rollback explícito no erro.
/// O erro original é sempre o que sobe; uma falha no rollback só é registrada.
pub async fn finish<T>(session: Box<dyn Session>, result: Result<T, AppError>) -> Result<T, AppError> {
    match result {
        Ok(value) => {
            session.commit().await?;
            Ok(value)
        }
        Err(err) => {
            tracing::warn!(error = %err, "operação abortada, desfazendo a transação");
            if let Err(rollback_err) = session.rollback().await {
                tracing::error!(error = %rollback_err, "falha ao desfazer a transação");
            }
            Err(err)
        }
    }
}
