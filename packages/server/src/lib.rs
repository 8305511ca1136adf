#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the epidemic dashboard.
//!
//! Serves four JSON queries (daily series, region totals, summary figures,
//! map payload) under `/api` and the dashboard frontend as static files.
//! Every request reloads the case data and recomputes; the only shared
//! state is the record source handle and the region name table, both
//! read-only.

pub mod config;
mod handlers;
pub mod queries;

use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use epi_dash_geography_models::RegionNameTable;
use epi_dash_record::{CsvFileSource, RecordSource};

pub use config::ServerConfig;

/// Shared application state.
pub struct AppState {
    /// Where case records are loaded from on each request.
    pub source: Arc<dyn RecordSource>,
    /// Local name to map identifier table.
    pub regions: Arc<RegionNameTable>,
}

/// Registers the `/api` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/daily_data", web::get().to(handlers::daily_data))
            .route("/region_data", web::get().to(handlers::region_data))
            .route("/summary_data", web::get().to(handlers::summary_data))
            .route("/map_data", web::get().to(handlers::map_data)),
    );
}

/// Loads the region table named by `config`, or the built-in Hong Kong
/// table if none is configured.
///
/// # Errors
///
/// Returns an `std::io::Error` if a configured table cannot be read or
/// parsed.
pub fn load_region_table(config: &ServerConfig) -> std::io::Result<RegionNameTable> {
    match &config.region_table_path {
        Some(path) => {
            log::info!("Loading region table from {}", path.display());
            RegionNameTable::load(path).map_err(std::io::Error::other)
        }
        None => Ok(RegionNameTable::hong_kong()),
    }
}

/// Starts the dashboard API server.
///
/// Builds the shared state from `config` and runs the Actix-Web HTTP
/// server until shutdown. The caller provides the async runtime (e.g. via
/// `#[actix_web::main]`) and initializes logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the region table cannot be
/// loaded, or the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let regions = load_region_table(&config)?;
    log::info!(
        "Using region table '{}' ({} regions)",
        regions.id(),
        regions.len()
    );

    let source = CsvFileSource::new(&config.data_path);
    if !source.path().exists() {
        log::warn!(
            "Data file {} does not exist yet; queries will fail until it does",
            source.path().display()
        );
    }
    log::info!("Serving case data from {}", source.describe());

    let state = web::Data::new(AppState {
        source: Arc::new(source),
        regions: Arc::new(regions),
    });

    let static_dir = config.static_dir.clone();

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
            // Serve the dashboard frontend
            .service(Files::new("/", &static_dir).index_file("index.html"))
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await
}
