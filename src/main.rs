mod config;
mod error;
mod handlers;
mod models;
mod repositories;
mod routes;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use error::{AppError, AppResult};
use handlers::health::not_found;
use repositories::{SqliteStore, Store};
use routes::api;
use services::{DigestService, EmailService, PriceWatchService, SearchService};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub search: SearchService,
    pub digest: DigestService,
    pub watches: PriceWatchService,
    pub store: Option<Arc<dyn Store>>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Config, store: Option<Arc<dyn Store>>) -> AppResult<Self> {
        let search = SearchService::from_settings(&config.search)?;
        let email = EmailService::new(config.email.clone())?;
        let digest = DigestService::new(search.clone(), email.clone(), config.jobs.clone());
        let watches = PriceWatchService::new(
            search.provider().clone(),
            search.normalizer().clone(),
            email,
            config.jobs.clone(),
        );

        Ok(Self {
            config,
            search,
            digest,
            watches,
            store,
            start_time: Instant::now(),
        })
    }

    /// Writes and jobs need the store; without it the server is misconfigured.
    pub fn require_store(&self) -> AppResult<&dyn Store> {
        self.store
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Server not configured".to_string()))
    }
}

fn open_store(config: &Config) -> Option<Arc<dyn Store>> {
    if config.store.path.is_empty() {
        warn!("STORE_PATH is empty; subscriptions, clicks and watches are disabled");
        return None;
    }
    match SqliteStore::open(&config.store.path) {
        Ok(store) => {
            info!("Store opened at {}", config.store.path);
            Some(Arc::new(store))
        }
        Err(e) => {
            error!("Failed to open store: {}", e);
            None
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if config.search.api_key.is_empty() {
        warn!("SEARCH_API_KEY is not set; searches will return no results");
    }
    if config.email.api_key.is_empty() {
        warn!("EMAIL_API_KEY is not set; digests and alerts will not be sent");
    }

    let store = open_store(&config);
    let state = match AppState::new(config.clone(), store) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize services: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting campus deals service on {}", config.bind_addr());

    let payload_limit = config.server.max_json_payload_size;
    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(api::json_config(payload_limit))
            .app_data(web::PayloadConfig::new(payload_limit))
            .wrap(cors)
            .wrap(Logger::default())
            .service(api::config())
            .default_service(web::route().to(not_found))
    })
    .bind(config.bind_addr())?;

    info!("Server started successfully at http://{}", config.bind_addr());

    server.workers(config.server.workers).run().await
}
