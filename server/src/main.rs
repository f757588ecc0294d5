// bazaar/server/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use bazaar::config::{AppConfig, StorageBackend};
use bazaar::seed::seed_demo_catalog;
use bazaar::services::auth_service::{Argon2Hasher, CredentialHasher};
use bazaar::services::session_service::spawn_session_pruner;
use bazaar::state::AppState;
use bazaar::storage::{MemoryStorage, PgStorage, Storage};
use bazaar::web::configure_app_routes;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE);

  if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
    builder.json().init();
  } else {
    builder.init();
  }
}

async fn build_storage(config: &AppConfig) -> anyhow::Result<Arc<dyn Storage>> {
  match config.storage_backend {
    StorageBackend::Postgres => {
      let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for postgres storage")?;
      let storage = PgStorage::connect(url).await.context("Failed to connect to the database")?;
      storage.ensure_schema().await.context("Failed to apply database schema")?;
      Ok(Arc::new(storage))
    }
    StorageBackend::Memory => {
      tracing::warn!("Using in-memory storage; data is lost on shutdown.");
      Ok(Arc::new(MemoryStorage::new()))
    }
  }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();
  init_tracing();
  tracing::info!("Starting Bazaar server...");

  let config = AppConfig::from_env().context("Failed to load application configuration")?;
  let storage = build_storage(&config).await?;
  let hasher: Arc<dyn CredentialHasher> = Arc::new(
    Argon2Hasher::new(config.hash_memory_kib, config.hash_iterations, config.hash_parallelism)
      .context("Invalid password hashing parameters")?,
  );

  if config.seed_db {
    seed_demo_catalog(storage.as_ref(), hasher.as_ref(), &config.seed_seller_password)
      .await
      .context("Failed to seed the demo catalog")?;
  }

  spawn_session_pruner(storage.clone(), Duration::from_secs(config.session_prune_interval_secs));

  let bind_addr = (config.server_host.clone(), config.server_port);
  let app_state = AppState::new(storage, hasher, config);

  tracing::info!("Binding server to {}:{}...", bind_addr.0, bind_addr.1);
  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(bind_addr)?
  .run()
  .await?;

  Ok(())
}
