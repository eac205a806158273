use anyhow::Context;

use ledgerly_infra::config::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ledgerly_observability::init();

    let config = ServiceConfig::from_env().context("invalid configuration")?;
    let app = ledgerly_api::app::build_app_from_config(&config)
        .await
        .context("failed to wire ledger services")?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
