//! API сервер оценки риска ожирения

use anyhow::Context;

use obesity_risk::{
    api::{self, AppState},
    config::ServiceConfig,
    RiskPredictor,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Инициализация логирования
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ServiceConfig::from_env()?;

    // Артефакты загружаются один раз и дальше только читаются
    let predictor = RiskPredictor::init_shared(&config).with_context(|| {
        format!(
            "failed to load artifacts {} and {}",
            config.pipeline_path.display(),
            config.model_path.display()
        )
    })?;

    let app = api::router(AppState { predictor });

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("Server listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
