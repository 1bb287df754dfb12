// src/db/pg_store.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ClientRepository, InventoryRepository, InvoiceRepository, Session, Store},
    models::{
        client::{Client, NewClient},
        inventory::{InventoryStats, NewProduct, Product},
        invoice::{Invoice, InvoiceFields, InvoiceItem, NewInvoice, NewInvoiceItem},
    },
};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    inventory_repo: InventoryRepository,
    invoice_repo: InvoiceRepository,
    client_repo: ClientRepository,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            inventory_repo: InventoryRepository::new(),
            invoice_repo: InvoiceRepository::new(),
            client_repo: ClientRepository::new(),
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> Result<Box<dyn Session>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgSession {
            tx,
            inventory_repo: self.inventory_repo.clone(),
            invoice_repo: self.invoice_repo.clone(),
            client_repo: self.client_repo.clone(),
        }))
    }
}

/// Sessão = uma transação do Postgres. Se for descartada sem commit, o sqlx faz rollback.
pub struct PgSession {
    tx: Transaction<'static, Postgres>,
    inventory_repo: InventoryRepository,
    invoice_repo: InvoiceRepository,
    client_repo: ClientRepository,
}

#[async_trait]
impl Session for PgSession {
    async fn get_product(&mut self, product_id: Uuid) -> Result<Option<Product>, AppError> {
        self.inventory_repo.get_product_for_update(&mut *self.tx, product_id).await
    }

    async fn persist_stock_level(&mut self, product_id: Uuid, new_stock: i32) -> Result<(), AppError> {
        self.inventory_repo.update_stock_level(&mut *self.tx, product_id, new_stock).await
    }

    async fn insert_product(&mut self, product: &NewProduct) -> Result<Product, AppError> {
        self.inventory_repo.create_product(&mut *self.tx, product).await
    }

    async fn inventory_stats(&mut self) -> Result<InventoryStats, AppError> {
        self.inventory_repo.get_stats(&mut *self.tx).await
    }

    async fn insert_client(&mut self, client: &NewClient) -> Result<Client, AppError> {
        self.client_repo.create_client(&mut *self.tx, client).await
    }

    async fn get_client(&mut self, client_id: Uuid) -> Result<Option<Client>, AppError> {
        self.client_repo.find_by_id(&mut *self.tx, client_id).await
    }

    async fn last_sequence(&mut self, year: i32) -> Result<Option<i32>, AppError> {
        self.invoice_repo.lock_year(&mut *self.tx, year).await?;
        self.invoice_repo.last_sequence(&mut *self.tx, year).await
    }

    async fn find_invoice(&mut self, invoice_id: Uuid) -> Result<Option<Invoice>, AppError> {
        self.invoice_repo.find_for_update(&mut *self.tx, invoice_id).await
    }

    async fn insert_invoice(&mut self, invoice: &NewInvoice) -> Result<Invoice, AppError> {
        self.invoice_repo.create_invoice(&mut *self.tx, invoice).await
    }

    async fn update_invoice(&mut self, invoice_id: Uuid, fields: &InvoiceFields) -> Result<Invoice, AppError> {
        self.invoice_repo.update_invoice(&mut *self.tx, invoice_id, fields).await
    }

    async fn mark_cancelled(&mut self, invoice_id: Uuid) -> Result<Invoice, AppError> {
        self.invoice_repo.mark_cancelled(&mut *self.tx, invoice_id).await
    }

    async fn list_items(&mut self, invoice_id: Uuid) -> Result<Vec<InvoiceItem>, AppError> {
        self.invoice_repo.list_items(&mut *self.tx, invoice_id).await
    }

    async fn insert_item(&mut self, invoice_id: Uuid, item: &NewInvoiceItem) -> Result<InvoiceItem, AppError> {
        self.invoice_repo.add_item(&mut *self.tx, invoice_id, item).await
    }

    async fn delete_items(&mut self, invoice_id: Uuid) -> Result<(), AppError> {
        self.invoice_repo.delete_items(&mut *self.tx, invoice_id).await
    }

    async fn list_invoices(&mut self, year: i32) -> Result<Vec<Invoice>, AppError> {
        self.invoice_repo.list_by_year(&mut *self.tx, year).await
    }

    async fn list_years(&mut self) -> Result<Vec<i32>, AppError> {
        self.invoice_repo.list_years(&mut *self.tx).await
    }

    async fn list_items_for_year(&mut self, year: i32) -> Result<Vec<InvoiceItem>, AppError> {
        self.invoice_repo.list_items_for_year(&mut *self.tx, year).await
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let session = *self;
        session.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), AppError> {
        let session = *self;
        session.tx.rollback().await?;
        Ok(())
    }
}
