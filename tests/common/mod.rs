// tests/common/mod.rs
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use facture::{
    common::error::AppError,
    config::AppState,
    db::{Session, Store},
    models::{
        client::{Client, NewClient},
        inventory::{InventoryStats, NewProduct, Product},
        invoice::{
            Invoice, InvoiceFields, InvoiceItem, InvoiceItemRequest, InvoiceRequest, NewInvoice,
            NewInvoiceItem, PaymentMethod,
        },
    },
};

#[derive(Clone, Default)]
pub struct MemoryState {
    pub products: HashMap<Uuid, Product>,
    pub clients: HashMap<Uuid, Client>,
    pub invoices: HashMap<Uuid, Invoice>,
    pub items: Vec<InvoiceItem>,
}

/// Store em memória: cada sessão trabalha numa cópia privada e segura o
/// lock exclusivo até o commit/rollback (serializável).
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    fail_item_inserts: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Faz o próximo `insert_item` falhar como se o banco tivesse caído.
    pub fn fail_item_inserts(&self, enabled: bool) {
        self.fail_item_inserts.store(enabled, Ordering::SeqCst);
    }

    pub async fn seed_product(&self, reference: &str, buying: Decimal, selling: Decimal, stock: i32) -> Product {
        let product = Product {
            id: Uuid::new_v4(),
            reference: reference.to_string(),
            name: format!("Produit {}", reference),
            buying_price: buying,
            selling_price: selling,
            current_stock: stock,
            min_stock_level: 2,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.state.lock().await.products.insert(product.id, product.clone());
        product
    }

    pub async fn stock_of(&self, product_id: Uuid) -> i32 {
        self.state.lock().await.products[&product_id].current_stock
    }

    pub async fn invoice_count(&self) -> usize {
        self.state.lock().await.invoices.len()
    }

    pub async fn item_count(&self) -> usize {
        self.state.lock().await.items.len()
    }

    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn Session>, AppError> {
        let guard = self.state.clone().lock_owned().await;
        let work = guard.clone();
        Ok(Box::new(MemorySession {
            guard,
            work,
            fail_item_inserts: self.fail_item_inserts.clone(),
        }))
    }
}

struct MemorySession {
    guard: OwnedMutexGuard<MemoryState>,
    work: MemoryState,
    fail_item_inserts: Arc<AtomicBool>,
}

#[async_trait]
impl Session for MemorySession {
    async fn get_product(&mut self, product_id: Uuid) -> Result<Option<Product>, AppError> {
        Ok(self.work.products.get(&product_id).cloned())
    }

    async fn persist_stock_level(&mut self, product_id: Uuid, new_stock: i32) -> Result<(), AppError> {
        if new_stock < 0 {
            return Err(anyhow::anyhow!("violação de CHECK (current_stock >= 0)").into());
        }
        let product = self
            .work
            .products
            .get_mut(&product_id)
            .ok_or(AppError::ProductNotFound(product_id))?;
        product.current_stock = new_stock;
        product.updated_at = Utc::now();
        Ok(())
    }

    async fn insert_product(&mut self, product: &NewProduct) -> Result<Product, AppError> {
        if self.work.products.values().any(|p| p.reference == product.reference) {
            return Err(AppError::ReferenceAlreadyExists(product.reference.clone()));
        }
        let created = Product {
            id: Uuid::new_v4(),
            reference: product.reference.clone(),
            name: product.name.clone(),
            buying_price: product.buying_price,
            selling_price: product.selling_price,
            current_stock: product.initial_stock,
            min_stock_level: product.min_stock_level,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.work.products.insert(created.id, created.clone());
        Ok(created)
    }

    async fn inventory_stats(&mut self) -> Result<InventoryStats, AppError> {
        let products = &self.work.products;
        Ok(InventoryStats {
            total_products: products.len() as i64,
            low_stock_count: products.values().filter(|p| p.is_low_stock()).count() as i64,
        })
    }

    async fn insert_client(&mut self, client: &NewClient) -> Result<Client, AppError> {
        if self.work.clients.values().any(|c| c.tax_id == client.tax_id) {
            return Err(AppError::TaxIdAlreadyExists(client.tax_id.clone()));
        }
        let created = Client {
            id: Uuid::new_v4(),
            name: client.name.clone(),
            tax_id: client.tax_id.clone(),
            city: client.city.clone(),
            address: client.address.clone(),
            phone: client.phone.clone(),
            email: client.email.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.work.clients.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_client(&mut self, client_id: Uuid) -> Result<Option<Client>, AppError> {
        Ok(self.work.clients.get(&client_id).cloned())
    }

    async fn last_sequence(&mut self, year: i32) -> Result<Option<i32>, AppError> {
        Ok(self
            .work
            .invoices
            .values()
            .filter(|invoice| invoice.year == year)
            .map(|invoice| invoice.sequence_number)
            .max())
    }

    async fn find_invoice(&mut self, invoice_id: Uuid) -> Result<Option<Invoice>, AppError> {
        Ok(self.work.invoices.get(&invoice_id).cloned())
    }

    async fn insert_invoice(&mut self, invoice: &NewInvoice) -> Result<Invoice, AppError> {
        let taken = self
            .work
            .invoices
            .values()
            .any(|i| i.year == invoice.year && i.sequence_number == invoice.sequence_number);
        if taken {
            return Err(anyhow::anyhow!("violação de UNIQUE (year, sequence_number)").into());
        }

        let fields = &invoice.fields;
        let created = Invoice {
            id: Uuid::new_v4(),
            year: invoice.year,
            sequence_number: invoice.sequence_number,
            custom_display_id: fields.custom_display_id.clone(),
            invoice_date: fields.invoice_date,
            client_name: fields.client_name.clone(),
            client_city: fields.client_city.clone(),
            client_tax_id: fields.client_tax_id.clone(),
            total_ht: fields.totals.ht,
            total_tax: fields.totals.tax,
            total_ttc: fields.totals.ttc,
            total_in_words: fields.total_in_words.clone(),
            payment: fields.payment.clone(),
            cancelled_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.work.invoices.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_invoice(&mut self, invoice_id: Uuid, fields: &InvoiceFields) -> Result<Invoice, AppError> {
        let invoice = self
            .work
            .invoices
            .get_mut(&invoice_id)
            .ok_or(AppError::InvoiceNotFound(invoice_id))?;
        invoice.custom_display_id = fields.custom_display_id.clone();
        invoice.invoice_date = fields.invoice_date;
        invoice.client_name = fields.client_name.clone();
        invoice.client_city = fields.client_city.clone();
        invoice.client_tax_id = fields.client_tax_id.clone();
        invoice.total_ht = fields.totals.ht;
        invoice.total_tax = fields.totals.tax;
        invoice.total_ttc = fields.totals.ttc;
        invoice.total_in_words = fields.total_in_words.clone();
        invoice.payment = fields.payment.clone();
        invoice.updated_at = Utc::now();
        Ok(invoice.clone())
    }

    async fn mark_cancelled(&mut self, invoice_id: Uuid) -> Result<Invoice, AppError> {
        let invoice = self
            .work
            .invoices
            .get_mut(&invoice_id)
            .ok_or(AppError::InvoiceNotFound(invoice_id))?;
        invoice.cancelled_at = Some(Utc::now());
        Ok(invoice.clone())
    }

    async fn list_items(&mut self, invoice_id: Uuid) -> Result<Vec<InvoiceItem>, AppError> {
        let mut items: Vec<InvoiceItem> = self
            .work
            .items
            .iter()
            .filter(|item| item.invoice_id == invoice_id)
            .cloned()
            .collect();
        items.sort_by_key(|item| item.position);
        Ok(items)
    }

    async fn insert_item(&mut self, invoice_id: Uuid, item: &NewInvoiceItem) -> Result<InvoiceItem, AppError> {
        if self.fail_item_inserts.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError(sqlx::Error::PoolClosed));
        }
        let created = InvoiceItem {
            id: Uuid::new_v4(),
            invoice_id,
            product_id: item.product_id,
            position: item.position,
            description: item.description.clone(),
            quantity: item.quantity,
            buying_price: item.buying_price,
            unit_price: item.unit_price,
            line_total: item.line_total,
        };
        self.work.items.push(created.clone());
        Ok(created)
    }

    async fn delete_items(&mut self, invoice_id: Uuid) -> Result<(), AppError> {
        self.work.items.retain(|item| item.invoice_id != invoice_id);
        Ok(())
    }

    async fn list_invoices(&mut self, year: i32) -> Result<Vec<Invoice>, AppError> {
        let mut invoices: Vec<Invoice> = self
            .work
            .invoices
            .values()
            .filter(|invoice| invoice.year == year && !invoice.is_cancelled())
            .cloned()
            .collect();
        invoices.sort_by(|a, b| b.sequence_number.cmp(&a.sequence_number));
        Ok(invoices)
    }

    async fn list_years(&mut self) -> Result<Vec<i32>, AppError> {
        let mut years: Vec<i32> = self.work.invoices.values().map(|invoice| invoice.year).collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        Ok(years)
    }

    async fn list_items_for_year(&mut self, year: i32) -> Result<Vec<InvoiceItem>, AppError> {
        let live: Vec<Uuid> = self
            .work
            .invoices
            .values()
            .filter(|invoice| invoice.year == year && !invoice.is_cancelled())
            .map(|invoice| invoice.id)
            .collect();
        Ok(self
            .work
            .items
            .iter()
            .filter(|item| live.contains(&item.invoice_id))
            .cloned()
            .collect())
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let MemorySession { mut guard, work, .. } = *self;
        *guard = work;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), AppError> {
        // A cópia de trabalho é descartada; o estado guardado fica intacto
        Ok(())
    }
}

pub fn clock_2024() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 11, 20).unwrap()
}

pub fn clock_2025() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
}

pub fn app_state(store: &MemoryStore) -> AppState {
    AppState::with_clock(Arc::new(store.clone()), clock_2025)
}

pub fn item(product_id: Uuid, quantity: i32, unit_price: Decimal) -> InvoiceItemRequest {
    InvoiceItemRequest {
        product_id,
        description: String::new(),
        quantity,
        unit_price,
    }
}

pub fn request(items: Vec<InvoiceItemRequest>) -> InvoiceRequest {
    InvoiceRequest {
        date: "15-01-2025".into(),
        custom_display_id: None,
        client_name: "Société Atlas SARL".into(),
        client_city: "Casablanca".into(),
        client_tax_id: "001234567000089".into(),
        payment: PaymentMethod::Cash,
        items,
    }
}
