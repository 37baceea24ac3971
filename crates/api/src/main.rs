use std::sync::Arc;

use taskwise_api::{build_router, state::AppState};
use taskwise_config::Settings;
use taskwise_db::{connect, indexes::ensure_indexes};
use taskwise_services::jobs::UrlRefreshJob;
use tokio_cron_scheduler::JobScheduler;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (silently ignore if missing)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "taskwise_api=debug,taskwise_services=debug,taskwise_db=debug,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config
    let settings = Settings::load()?;
    info!(
        "Starting TaskWise API on {}:{}",
        settings.app.host, settings.app.port
    );

    // Connect to MongoDB
    let db = connect(&settings).await?;

    // Ensure indexes
    ensure_indexes(&db).await?;

    // Build app state
    let app_state = AppState::new(db.clone(), settings.clone());

    // Presigned URL refresh job
    if settings.jobs.url_refresh_enabled {
        let scheduler = JobScheduler::new().await?;
        let job = Arc::new(UrlRefreshJob::new(&db, Arc::clone(&app_state.storage)));
        job.schedule(&scheduler, &settings.jobs.url_refresh_cron)
            .await?;
        scheduler.start().await?;
        info!(cron = %settings.jobs.url_refresh_cron, "URL refresh job scheduled");
    }

    // Build router
    let app = build_router(app_state);

    // Start server
    let addr = format!("{}:{}", settings.app.host, settings.app.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
