// src/config.rs

use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    db::{PgStore, Store},
    services::{
        client_service::ClientService, dashboard_service::DashboardService,
        inventory_service::InventoryService, invoice_service::InvoiceService,
    },
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub server_addr: SocketAddr,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

        let max_connections = optional_var("DATABASE_MAX_CONNECTIONS")?
            .map(|raw| raw.parse::<u32>())
            .transpose()
            .context("DATABASE_MAX_CONNECTIONS inválida")?
            .unwrap_or(5);

        let acquire_timeout_secs = optional_var("DATABASE_ACQUIRE_TIMEOUT_SECS")?
            .map(|raw| raw.parse::<u64>())
            .transpose()
            .context("DATABASE_ACQUIRE_TIMEOUT_SECS inválida")?
            .unwrap_or(3);

        let server_addr = optional_var("SERVER_ADDR")?
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse::<SocketAddr>()
            .context("SERVER_ADDR inválido")?;

        Ok(Self {
            database_url,
            max_connections,
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
            server_addr,
        })
    }
}

fn optional_var(name: &str) -> anyhow::Result<Option<String>> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(err).with_context(|| format!("{} inválida", name)),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub invoice_service: InvoiceService,
    pub inventory_service: InventoryService,
    pub client_service: ClientService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect(&settings.database_url)
            .await
            .context("falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        sqlx::migrate!()
            .run(&db_pool)
            .await
            .context("falha ao rodar as migrações do banco de dados")?;

        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

        Ok(Self::from_store(Arc::new(PgStore::new(db_pool))))
    }

    /// Monta o gráfico de dependências sobre qualquer `Store`.
    pub fn from_store(store: Arc<dyn Store>) -> Self {
        Self {
            invoice_service: InvoiceService::new(store.clone()),
            inventory_service: InventoryService::new(store.clone()),
            client_service: ClientService::new(store.clone()),
            dashboard_service: DashboardService::new(store.clone()),
            store,
        }
    }

    /// Igual a `from_store`, com o relógio da numeração injetado.
    pub fn with_clock(store: Arc<dyn Store>, today: fn() -> chrono::NaiveDate) -> Self {
        let mut state = Self::from_store(store.clone());
        state.invoice_service = InvoiceService::with_clock(store, today);
        state
    }
}
