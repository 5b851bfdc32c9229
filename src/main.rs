// mailtrack - mail-tracking dashboard server
// Entry point and server setup

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mailtrack::app::{self, AppState};
use mailtrack::config::Config;
use mailtrack::{api, database};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailtrack=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting mailtrack server");

    let config = Config::from_env();
    let pool = database::create_pool(&config.db_path)
        .await
        .context("failed to open the database")?;
    let state = AppState::new(pool);

    tracing::info!("Listening on http://{}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(app::json_config())
            .app_data(app::query_config())
            .configure(api::configure)
    })
    .bind(&config.bind_addr)
    .with_context(|| format!("failed to bind {}", config.bind_addr))?
    .run()
    .await?;

    Ok(())
}
