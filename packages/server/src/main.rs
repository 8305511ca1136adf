#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone entry point for the epidemic dashboard server.
//!
//! Configuration comes from the environment (`BIND_ADDR`, `PORT`,
//! `DATA_PATH`, `REGION_TABLE_PATH`, `STATIC_DIR`).

use epi_dash_server::{ServerConfig, run_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    run_server(ServerConfig::from_env()).await
}
