// src/services/invoice_service.rs

use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        date_format,
        error::AppError,
        validation::{check_tax_id, MAX_AMOUNT},
    },
    db::{finish, Session, Store},
    models::invoice::{
        InvoiceDetail, InvoiceFields, InvoiceItem, InvoiceItemRequest, InvoiceRequest,
        NewInvoice, NewInvoiceItem, PreviewTotals, Totals,
    },
    services::{
        french_words::legal_clause,
        sequence::next_sequence,
        stock_ledger::StockLedger,
        totals::{compute_totals, line_total, round2, sum_lines},
    },
};

/// Gerente do ciclo de vida da fatura: cada operação é uma única transação,
/// tudo ou nada (estoque, numeração, cabeçalho e itens).
#[derive(Clone)]
pub struct InvoiceService {
    store: Arc<dyn Store>,
    stock_ledger: StockLedger,
    today: fn() -> NaiveDate,
}

/// Pedido já validado e precificado, antes de abrir a sessão.
struct Prepared {
    invoice_date: NaiveDate,
    prices: Vec<LinePrice>,
    totals: Totals,
    total_in_words: String,
}

struct LinePrice {
    unit_price: Decimal,
    line_total: Decimal,
}

impl InvoiceService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_clock(store, || Local::now().date_naive())
    }

    /// O relógio decide o ano da numeração.
    pub fn with_clock(store: Arc<dyn Store>, today: fn() -> NaiveDate) -> Self {
        Self {
            store,
            stock_ledger: StockLedger::new(),
            today,
        }
    }

    pub fn current_year(&self) -> i32 {
        (self.today)().year()
    }

    // --- CREATE ---
    pub async fn create_invoice(&self, request: InvoiceRequest) -> Result<InvoiceDetail, AppError> {
        // Validação e cálculo antes de abrir a transação
        let prepared = prepare(&request)?;
        let year = self.current_year();

        let mut session = self.store.begin().await?;
        let result = self
            .create_in_session(session.as_mut(), year, &prepared, &request)
            .await;
        let detail = finish(session, result).await?;

        tracing::info!(
            invoice_id = %detail.header.id,
            display_id = %detail.display_id,
            total_ttc = %detail.header.total_ttc,
            items = detail.items.len(),
            "fatura criada"
        );
        Ok(detail)
    }

    async fn create_in_session(
        &self,
        session: &mut dyn Session,
        year: i32,
        prepared: &Prepared,
        request: &InvoiceRequest,
    ) -> Result<InvoiceDetail, AppError> {
        // 1. Baixa de estoque + foto dos produtos
        let lines = self.consume_items(session, &request.items, &prepared.prices).await?;

        // 2. Cabeçalho (totais já calculados)
        let fields = compose_fields(request, prepared);

        // 3. Numeração (na mesma transação do INSERT)
        let sequence_number = next_sequence(session, year).await?;

        // 4. Grava cabeçalho e itens
        let header = session
            .insert_invoice(&NewInvoice { year, sequence_number, fields })
            .await?;
        let items = persist_items(session, header.id, &lines).await?;

        Ok(InvoiceDetail::new(header, items))
    }

    // --- UPDATE (substituição completa dos itens) ---
    pub async fn update_invoice(
        &self,
        invoice_id: Uuid,
        request: InvoiceRequest,
    ) -> Result<InvoiceDetail, AppError> {
        let prepared = prepare(&request)?;

        let mut session = self.store.begin().await?;
        let result = self
            .update_in_session(session.as_mut(), invoice_id, &prepared, &request)
            .await;
        let detail = finish(session, result).await?;

        tracing::info!(
            invoice_id = %invoice_id,
            display_id = %detail.display_id,
            total_ttc = %detail.header.total_ttc,
            items = detail.items.len(),
            "fatura atualizada"
        );
        Ok(detail)
    }

    async fn update_in_session(
        &self,
        session: &mut dyn Session,
        invoice_id: Uuid,
        prepared: &Prepared,
        request: &InvoiceRequest,
    ) -> Result<InvoiceDetail, AppError> {
        // 1. Fatura atual (travada)
        let current = session
            .find_invoice(invoice_id)
            .await?
            .ok_or(AppError::InvoiceNotFound(invoice_id))?;
        if current.is_cancelled() {
            return Err(AppError::InvoiceCancelled(invoice_id));
        }

        // 2. Devolve ao estoque o que os itens antigos consumiram
        let old_items = session.list_items(invoice_id).await?;
        self.restore_items(session, &old_items).await?;

        // 3. Descarta os itens antigos
        session.delete_items(invoice_id).await?;

        // 4. Aplica os novos itens
        let lines = self.consume_items(session, &request.items, &prepared.prices).await?;
        let fields = compose_fields(request, prepared);

        // 5. Grava (ano e sequência ficam como estão)
        let header = session.update_invoice(invoice_id, &fields).await?;
        let items = persist_items(session, header.id, &lines).await?;

        Ok(InvoiceDetail::new(header, items))
    }

    // --- CANCEL ---
    /// Devolve o estoque e marca a fatura como cancelada. A linha fica, para
    /// que o número nunca seja reutilizado.
    pub async fn cancel_invoice(&self, invoice_id: Uuid) -> Result<InvoiceDetail, AppError> {
        let mut session = self.store.begin().await?;
        let result = self.cancel_in_session(session.as_mut(), invoice_id).await;
        let detail = finish(session, result).await?;

        tracing::info!(invoice_id = %invoice_id, display_id = %detail.display_id, "fatura cancelada");
        Ok(detail)
    }

    async fn cancel_in_session(
        &self,
        session: &mut dyn Session,
        invoice_id: Uuid,
    ) -> Result<InvoiceDetail, AppError> {
        let current = session
            .find_invoice(invoice_id)
            .await?
            .ok_or(AppError::InvoiceNotFound(invoice_id))?;
        if current.is_cancelled() {
            return Err(AppError::InvoiceCancelled(invoice_id));
        }

        let items = session.list_items(invoice_id).await?;
        self.restore_items(session, &items).await?;

        let header = session.mark_cancelled(invoice_id).await?;
        Ok(InvoiceDetail::new(header, items))
    }

    // --- LEITURAS ---
    pub async fn get_invoice(&self, invoice_id: Uuid) -> Result<InvoiceDetail, AppError> {
        let mut session = self.store.begin().await?;
        let result = load_detail(session.as_mut(), invoice_id).await;
        finish(session, result).await
    }

    pub async fn list_invoices(&self, year: Option<i32>) -> Result<Vec<InvoiceDetail>, AppError> {
        let year = year.unwrap_or_else(|| self.current_year());

        let mut session = self.store.begin().await?;
        let result = list_details(session.as_mut(), year).await;
        finish(session, result).await
    }

    /// Anos com faturas, do mais recente ao mais antigo; o ano corrente sempre aparece.
    pub async fn available_years(&self) -> Result<Vec<i32>, AppError> {
        let mut session = self.store.begin().await?;
        let result = session.list_years().await;
        let mut years = finish(session, result).await?;

        let current = self.current_year();
        if !years.contains(&current) {
            years.push(current);
        }
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        Ok(years)
    }

    // --- PRÉVIA (sem banco) ---
    pub fn preview_totals(&self, total_ttc: Decimal) -> Result<PreviewTotals, AppError> {
        let totals = compute_totals(check_amount("totalTtc", total_ttc)?);
        Ok(PreviewTotals {
            total_ht: totals.ht,
            total_tax: totals.tax,
            total_ttc: totals.ttc,
            total_in_words: clause_for("totalTtc", totals.ttc)?,
        })
    }

    pub fn render_amount_in_words(&self, amount: Decimal) -> Result<String, AppError> {
        clause_for("amount", check_amount("amount", amount)?)
    }

    // --- Estoque ---

    async fn consume_items(
        &self,
        session: &mut dyn Session,
        items: &[InvoiceItemRequest],
        prices: &[LinePrice],
    ) -> Result<Vec<NewInvoiceItem>, AppError> {
        let mut lines = Vec::with_capacity(items.len());

        for (index, (item, price)) in items.iter().zip(prices).enumerate() {
            // Qualquer falha aqui derruba a transação inteira
            let product = self
                .stock_ledger
                .decrease(session, item.product_id, item.quantity)
                .await?;

            let description = match item.description.trim() {
                "" => product.name.clone(),
                text => text.to_string(),
            };

            lines.push(NewInvoiceItem {
                product_id: product.id,
                position: index as i32 + 1,
                description,
                quantity: item.quantity,
                buying_price: product.buying_price,
                unit_price: price.unit_price,
                line_total: price.line_total,
            });
        }

        Ok(lines)
    }

    async fn restore_items(&self, session: &mut dyn Session, items: &[InvoiceItem]) -> Result<(), AppError> {
        for item in items {
            self.stock_ledger
                .increase(session, item.product_id, item.quantity)
                .await?;
        }
        Ok(())
    }
}

/// Checagens que não dependem do banco: data, ICE, campos obrigatórios e
/// limites dos valores. Nada aqui abre sessão.
fn prepare(request: &InvoiceRequest) -> Result<Prepared, AppError> {
    let invoice_date = date_format::parse(&request.date)
        .ok_or_else(|| AppError::InvalidDate(request.date.clone()))?;
    check_tax_id(&request.client_tax_id).map_err(AppError::InvalidTaxId)?;
    request.validate()?;

    // `length(min = 1)` aceita só espaços
    if request.client_name.trim().is_empty() {
        return Err(AppError::field("clientName", "required", "O nome do cliente é obrigatório."));
    }
    if request.client_city.trim().is_empty() {
        return Err(AppError::field("clientCity", "required", "A cidade do cliente é obrigatória."));
    }

    let prices = price_items(&request.items)?;
    let sum = sum_lines(prices.iter().map(|price| price.line_total))
        .filter(|sum| *sum <= MAX_AMOUNT)
        .ok_or_else(|| AppError::field("items", "range", "O total da fatura excede o máximo permitido."))?;
    let totals = compute_totals(sum);
    let total_in_words = clause_for("items", totals.ttc)?;

    Ok(Prepared {
        invoice_date,
        prices,
        totals,
        total_in_words,
    })
}

/// Preço unitário com 2 casas (como a coluna o guarda) e total da linha a partir dele.
fn price_items(items: &[InvoiceItemRequest]) -> Result<Vec<LinePrice>, AppError> {
    items
        .iter()
        .map(|item| {
            let unit_price = round2(item.unit_price);
            let line_total = line_total(item.quantity, unit_price)
                .filter(|total| *total <= MAX_AMOUNT)
                .ok_or_else(|| {
                    AppError::field("items", "range", "O total da linha excede o máximo permitido.")
                })?;
            Ok(LinePrice { unit_price, line_total })
        })
        .collect()
}

fn check_amount(field: &'static str, amount: Decimal) -> Result<Decimal, AppError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AppError::field(field, "range", "O valor não pode ser negativo."));
    }
    if amount > MAX_AMOUNT {
        return Err(AppError::field(field, "range", "O valor excede o máximo permitido."));
    }
    Ok(amount)
}

fn clause_for(field: &'static str, amount: Decimal) -> Result<String, AppError> {
    legal_clause(amount)
        .ok_or_else(|| AppError::field(field, "range", "O valor excede o máximo permitido."))
}

fn compose_fields(request: &InvoiceRequest, prepared: &Prepared) -> InvoiceFields {
    let custom_display_id = request
        .custom_display_id
        .as_deref()
        .map(str::trim)
        .filter(|custom| !custom.is_empty())
        .map(str::to_string);

    InvoiceFields {
        custom_display_id,
        invoice_date: prepared.invoice_date,
        client_name: request.client_name.trim().to_string(),
        client_city: request.client_city.trim().to_string(),
        client_tax_id: request.client_tax_id.trim().to_string(),
        totals: prepared.totals,
        total_in_words: prepared.total_in_words.clone(),
        payment: request.payment.clone(),
    }
}

async fn persist_items(
    session: &mut dyn Session,
    invoice_id: Uuid,
    lines: &[NewInvoiceItem],
) -> Result<Vec<InvoiceItem>, AppError> {
    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        items.push(session.insert_item(invoice_id, line).await?);
    }
    Ok(items)
}

async fn load_detail(session: &mut dyn Session, invoice_id: Uuid) -> Result<InvoiceDetail, AppError> {
    let header = session
        .find_invoice(invoice_id)
        .await?
        .ok_or(AppError::InvoiceNotFound(invoice_id))?;
    let items = session.list_items(invoice_id).await?;
    Ok(InvoiceDetail::new(header, items))
}

async fn list_details(session: &mut dyn Session, year: i32) -> Result<Vec<InvoiceDetail>, AppError> {
    let headers = session.list_invoices(year).await?;
    let mut details = Vec::with_capacity(headers.len());
    for header in headers {
        let items = session.list_items(header.id).await?;
        details.push(InvoiceDetail::new(header, items));
    }
    Ok(details)
}
