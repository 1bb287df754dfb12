//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use facture::{
    config::{AppState, Settings},
    router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Inicializa o logger antes de tudo
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let settings = Settings::from_env()?;
    let app_state = AppState::new(&settings).await?;

    let app = router::app(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(settings.server_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
