mod handlers;
mod pages;

use anyhow::Context;
use dynaform::{Config, FormConfiguration};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::handlers::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,dynaform=debug,tower_http=debug")),
        )
        .init();

    let settings_path =
        std::env::var("DYNAFORM_CONFIG").unwrap_or_else(|_| "dynaform.toml".to_string());
    let settings = Config::load(&settings_path)?;

    let form = FormConfiguration::load(&settings.form.path)?;
    info!(
        path = %settings.form.path,
        fields = form.len(),
        "loaded form configuration"
    );

    let addr = settings.bind_addr();
    let state = AppState::new(form, settings)?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
