// src/models/invoice.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::{date_format, validation::validate_unit_price};

// --- Pagamento ---
// O discriminante ("method") escolhe a variante; não inferimos pelo preenchimento dos campos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "method", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[serde(rename = "ESPECE")]
    Cash,
    Cheque {
        number: String,
        bank: String,
        city: String,
        #[serde(default)]
        reference: Option<String>,
    },
    Effet {
        city: String,
        #[serde(rename = "dueDate", with = "date_format")]
        #[schema(value_type = String, example = "30-04-2025")]
        due_date: NaiveDate,
        bank: String,
        #[serde(default)]
        reference: Option<String>,
    },
}

fn validate_payment(payment: &PaymentMethod) -> Result<(), ValidationError> {
    let missing = match payment {
        PaymentMethod::Cash => None,
        PaymentMethod::Cheque { number, bank, .. } if number.trim().is_empty() || bank.trim().is_empty() => {
            Some("O número e o banco do cheque são obrigatórios.")
        }
        PaymentMethod::Effet { bank, city, .. } if bank.trim().is_empty() || city.trim().is_empty() => {
            Some("O banco e a cidade do effet são obrigatórios.")
        }
        _ => None,
    };

    match missing {
        Some(message) => {
            let mut err = ValidationError::new("required");
            err.message = Some(message.into());
            Err(err)
        }
        None => Ok(()),
    }
}

/// Número exibido: sequência com 4 dígitos, " - ", ano. Aparece nos documentos impressos.
pub fn formatted_id(sequence_number: i32, year: i32) -> String {
    format!("{:04} - {}", sequence_number, year)
}

// --- Cabeçalho da fatura ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    #[schema(example = 2025)]
    pub year: i32,
    #[schema(example = 7)]
    pub sequence_number: i32,
    pub custom_display_id: Option<String>,

    #[serde(rename = "date", with = "date_format")]
    #[schema(value_type = String, example = "15-01-2025")]
    pub invoice_date: NaiveDate,

    // Cópia do cliente no momento da emissão
    pub client_name: String,
    pub client_city: String,
    pub client_tax_id: String,

    #[schema(example = "100.00")]
    pub total_ht: Decimal,
    #[schema(example = "20.00")]
    pub total_tax: Decimal,
    #[schema(example = "120.00")]
    pub total_ttc: Decimal,
    pub total_in_words: String,

    #[sqlx(json)]
    pub payment: PaymentMethod,

    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    pub fn formatted_id(&self) -> String {
        formatted_id(self.sequence_number, self.year)
    }

    /// O número personalizado só muda a exibição, nunca a sequência.
    pub fn display_id(&self) -> String {
        match self.custom_display_id.as_deref().map(str::trim) {
            Some(custom) if !custom.is_empty() => custom.to_string(),
            _ => self.formatted_id(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled_at.is_some()
    }
}

// --- Linha da fatura ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub product_id: Uuid,
    pub position: i32,
    pub description: String,
    #[schema(example = 3)]
    pub quantity: i32,
    // Preço de compra no momento da venda (para o cálculo de lucro)
    pub buying_price: Decimal,
    #[schema(example = "40.00")]
    pub unit_price: Decimal,
    #[schema(example = "120.00")]
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub ht: Decimal,
    pub tax: Decimal,
    pub ttc: Decimal,
}

/// Prévia dos totais enquanto a fatura é digitada.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreviewTotals {
    pub total_ht: Decimal,
    pub total_tax: Decimal,
    pub total_ttc: Decimal,
    pub total_in_words: String,
}

/// Campos graváveis do cabeçalho (criação e edição).
#[derive(Debug, Clone)]
pub struct InvoiceFields {
    pub custom_display_id: Option<String>,
    pub invoice_date: NaiveDate,
    pub client_name: String,
    pub client_city: String,
    pub client_tax_id: String,
    pub totals: Totals,
    pub total_in_words: String,
    pub payment: PaymentMethod,
}

#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub year: i32,
    pub sequence_number: i32,
    pub fields: InvoiceFields,
}

#[derive(Debug, Clone)]
pub struct NewInvoiceItem {
    pub product_id: Uuid,
    pub position: i32,
    pub description: String,
    pub quantity: i32,
    pub buying_price: Decimal,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub header: Invoice,
    #[schema(example = "0007 - 2025")]
    pub display_id: String,
    #[schema(example = "0007 - 2025")]
    pub formatted_id: String,
    pub items: Vec<InvoiceItem>,
}

impl InvoiceDetail {
    pub fn new(header: Invoice, items: Vec<InvoiceItem>) -> Self {
        Self {
            display_id: header.display_id(),
            formatted_id: header.formatted_id(),
            header,
            items,
        }
    }
}

// --- Pedido de criação / edição ---
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    // DD-MM-AAAA; validado pelo serviço (InvalidDate)
    #[schema(example = "15-01-2025")]
    pub date: String,

    #[validate(length(max = 32, message = "O número personalizado é longo demais."))]
    pub custom_display_id: Option<String>,

    #[validate(length(min = 1, message = "O nome do cliente é obrigatório."))]
    pub client_name: String,

    #[validate(length(min = 1, message = "A cidade do cliente é obrigatória."))]
    pub client_city: String,

    // Comprimento validado pelo serviço (InvalidTaxId)
    #[schema(example = "001234567000089")]
    pub client_tax_id: String,

    #[validate(custom(function = "validate_payment"))]
    pub payment: PaymentMethod,

    #[validate(length(min = 1, message = "A fatura precisa de pelo menos um item."), nested)]
    pub items: Vec<InvoiceItemRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItemRequest {
    pub product_id: Uuid,

    // Vazio = usa o nome do produto
    #[serde(default)]
    pub description: String,

    #[validate(range(min = 1, message = "A quantidade deve ser pelo menos 1."))]
    pub quantity: i32,

    // Arredondado a 2 casas pelo serviço antes do cálculo da linha
    #[validate(custom(function = "validate_unit_price"))]
    pub unit_price: Decimal,
}
