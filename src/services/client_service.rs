// src/services/client_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::{error::AppError, validation::check_tax_id},
    db::{finish, Store},
    models::client::{Client, NewClient},
};

#[derive(Clone)]
pub struct ClientService {
    store: Arc<dyn Store>,
}

impl ClientService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create_client(&self, client: NewClient) -> Result<Client, AppError> {
        let client = normalize(client)?;

        let mut session = self.store.begin().await?;
        let result = session.insert_client(&client).await;
        let created = finish(session, result).await?;

        tracing::info!(client_id = %created.id, tax_id = %created.tax_id, "cliente criado");
        Ok(created)
    }

    pub async fn get_client(&self, client_id: Uuid) -> Result<Client, AppError> {
        let mut session = self.store.begin().await?;
        let result = session
            .get_client(client_id)
            .await
            .and_then(|found| found.ok_or(AppError::ClientNotFound(client_id)));
        finish(session, result).await
    }
}

fn normalize(client: NewClient) -> Result<NewClient, AppError> {
    let name = client.name.trim().to_string();
    let city = client.city.trim().to_string();
    if name.is_empty() {
        return Err(AppError::field("name", "required", "O nome do cliente é obrigatório."));
    }
    if city.is_empty() {
        return Err(AppError::field("city", "required", "A cidade do cliente é obrigatória."));
    }
    check_tax_id(&client.tax_id).map_err(AppError::InvalidTaxId)?;

    // Opcionais em branco viram NULL
    let optional = |value: Option<String>| {
        value
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    };

    Ok(NewClient {
        name,
        city,
        tax_id: client.tax_id.trim().to_string(),
        address: optional(client.address),
        phone: optional(client.phone),
        email: optional(client.email),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(tax_id: &str) -> NewClient {
        NewClient {
            name: " Atlas SARL ".into(),
            tax_id: tax_id.into(),
            city: "Casablanca".into(),
            address: Some("  ".into()),
            phone: Some(" 0522000000 ".into()),
            email: None,
        }
    }

    #[test]
    fn tax_id_length_is_enforced() {
        assert!(matches!(normalize(client("12345")), Err(AppError::InvalidTaxId(5))));
        assert!(matches!(
            normalize(client("0012345670000891")),
            Err(AppError::InvalidTaxId(16))
        ));
    }

    #[test]
    fn blank_optionals_become_none() {
        let normalized = normalize(client(" 001234567000089 ")).unwrap();
        assert_eq!(normalized.name, "Atlas SARL");
        assert_eq!(normalized.tax_id, "001234567000089");
        assert_eq!(normalized.address, None);
        assert_eq!(normalized.phone.as_deref(), Some("0522000000"));
    }
}
