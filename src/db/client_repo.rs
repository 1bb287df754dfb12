// src/db/client_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::client::{Client, NewClient},
};

#[derive(Clone, Default)]
pub struct ClientRepository;

impl ClientRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create_client<'e, E>(
        &self,
        executor: E,
        client: &NewClient,
    ) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (name, tax_id, city, address, phone, email)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
            .bind(&client.name)
            .bind(&client.tax_id)
            .bind(&client.city)
            .bind(client.address.as_deref())
            .bind(client.phone.as_deref())
            .bind(client.email.as_deref())
            .fetch_one(executor)
            .await
            .map_err(|e| {
                // Violação de chave única no ICE vira um erro de conflito amigável
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::TaxIdAlreadyExists(client.tax_id.clone());
                    }
                }
                e.into()
            })
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
    ) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(client_id)
            .fetch_optional(executor)
            .await?;

        Ok(client)
    }
}
