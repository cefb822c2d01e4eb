use std::sync::Arc;

use innova_backend::{
    config::{get_config, init_config, LogFormat},
    database::memory::InMemoryAssessmentRepository,
    routes,
    utils::time::SystemClock,
    AppState,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_config()?;
    let config = get_config();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    let repository = Arc::new(InMemoryAssessmentRepository::new());
    let app_state = AppState::new(config, repository, Arc::new(SystemClock));

    let app = routes::router(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let listener = TcpListener::bind(&config.server_address).await?;
    info!(
        "Listening on {} (max {} questions per draft)",
        listener.local_addr()?,
        config.max_questions_per_draft
    );
    axum::serve(listener, app).await?;

    Ok(())
}
