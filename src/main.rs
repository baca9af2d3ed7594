use anyhow::Context;
use cinefeed::api::{self, AppState};
use cinefeed::shared::config::AppConfig;
use cinefeed::shared::database::Database;
use cinefeed::shared::utils::logger::init_logger;
use cinefeed::{log_info, AppServices};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logger();

    let config = AppConfig::from_env().context("invalid configuration")?;

    let database = Database::new().context("database connection failed")?;
    database.run_migrations().context("migrations failed")?;

    let services = AppServices::build(&config, database.pool())
        .context("service construction failed")?;

    tokio::spawn(services.scheduler.clone().run());

    let app = api::router(AppState {
        jobs: services.jobs.clone(),
    });

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;
    log_info!("Listening on {}", config.server.bind_addr);

    axum::serve(listener, app).await.context("server exited")?;
    Ok(())
}
