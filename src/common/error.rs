use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;
use validator::{ValidationErrors, ValidationErrorsKind};

// Nosso tipo de erro, agora com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Data inválida '{0}': formato esperado DD-MM-AAAA")]
    InvalidDate(String),

    #[error("O ICE deve conter exatamente 15 caracteres (recebido: {0})")]
    InvalidTaxId(usize),

    #[error("Produto não encontrado: {0}")]
    ProductNotFound(Uuid),

    #[error("Fatura não encontrada: {0}")]
    InvoiceNotFound(Uuid),

    #[error("Cliente não encontrado: {0}")]
    ClientNotFound(Uuid),

    #[error("A fatura {0} já foi cancelada")]
    InvoiceCancelled(Uuid),

    #[error("Estoque insuficiente para '{product}' (solicitado: {requested}, disponível: {available})")]
    InsufficientStock {
        product: String,
        requested: i32,
        available: i32,
    },

    #[error("Já existe um produto com a referência '{0}'")]
    ReferenceAlreadyExists(String),

    #[error("Já existe um cliente com o ICE '{0}'")]
    TaxIdAlreadyExists(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

/// Classificação usada pelo chamador para decidir o que mostrar.
/// Nenhuma delas é repetida automaticamente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Validation,
    NotFound,
    InsufficientStock,
    Conflict,
    Persistence,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::ValidationError(_) | AppError::InvalidDate(_) | AppError::InvalidTaxId(_) => {
                ErrorKind::Validation
            }
            AppError::ProductNotFound(_)
            | AppError::InvoiceNotFound(_)
            | AppError::ClientNotFound(_) => ErrorKind::NotFound,
            AppError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            AppError::InvoiceCancelled(_)
            | AppError::ReferenceAlreadyExists(_)
            | AppError::TaxIdAlreadyExists(_) => ErrorKind::Conflict,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => ErrorKind::Persistence,
        }
    }

    /// Erro único de validação atribuído a um campo, no mesmo formato do `validator`.
    pub fn field(field: &'static str, code: &'static str, message: &'static str) -> Self {
        let mut error = validator::ValidationError::new(code);
        error.message = Some(message.into());
        let mut errors = validator::ValidationErrors::new();
        errors.add(field, error);
        AppError::ValidationError(errors)
    }
}

/// Achata os erros do `validator`, incluindo structs e listas aninhadas,
/// em caminhos como `items[0].quantity`.
fn collect_details(errors: &ValidationErrors, prefix: &str, details: &mut BTreeMap<String, Vec<String>>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages = field_errors.iter().map(|e| match &e.message {
                    Some(m) => m.to_string(),
                    None => e.code.to_string(),
                });
                details.entry(path).or_default().extend(messages);
            }
            ValidationErrorsKind::Struct(inner) => collect_details(inner, &path, details),
            ValidationErrorsKind::List(entries) => {
                for (index, inner) in entries {
                    collect_details(inner, &format!("{}[{}]", path, index), details);
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = match kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InsufficientStock => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = BTreeMap::new();
                collect_details(&errors, "", &mut details);
                json!({
                    "error": "Um ou mais campos são inválidos.",
                    "kind": kind,
                    "details": details,
                })
            }
            AppError::InsufficientStock { ref product, requested, available } => json!({
                "error": self.to_string(),
                "kind": kind,
                "product": product,
                "requested": requested,
                "available": available,
            }),
            // O `tracing` loga a mensagem detalhada; o cliente recebe uma genérica.
            ref e if kind == ErrorKind::Persistence => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                json!({ "error": "Ocorreu um erro inesperado.", "kind": kind })
            }
            e => json!({ "error": e.to_string(), "kind": kind }),
        };

        (status, Json(body)).into_response()
    }
}
