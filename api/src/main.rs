use actix_web::{web, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use log::info;

use idn_api::config::load_config;
use idn_api::{create_app, AppState, Collaborators};
use idn_core::services::{CacheServiceTrait, SessionPinStore};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting idonow API server");

    let config = load_config().context("failed to load configuration")?;
    let bind_address = config.server.bind_address();
    info!("Environment: {}, binding to {}", config.environment, bind_address);

    let infra = idn_infra::initialize(&config)
        .await
        .context("failed to initialize infrastructure")?;

    let collaborators = Collaborators::from_infrastructure(&infra);
    // Pins written before a restart must not validate afterwards
    SessionPinStore::<dyn CacheServiceTrait>::evict_all(collaborators.cache.as_ref())
        .await
        .context("failed to clear session pins")?;

    let state = web::Data::new(
        AppState::assemble(collaborators, &config).context("failed to assemble services")?,
    );

    let mut server = HttpServer::new(move || create_app(state.clone()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;

    infra.shutdown().await;
    info!("Server stopped");
    Ok(())
}
