//! Server configuration from environment variables.

use std::path::PathBuf;

/// Default case data file, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "data/cases.csv";

/// Default directory for the dashboard frontend.
pub const DEFAULT_STATIC_DIR: &str = "app/dist";

/// Settings needed to start the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind (`BIND_ADDR`).
    pub bind_addr: String,
    /// Port to bind (`PORT`).
    pub port: u16,
    /// Case record CSV file (`DATA_PATH`).
    pub data_path: PathBuf,
    /// Optional region table TOML (`REGION_TABLE_PATH`). The built-in Hong
    /// Kong table is used when unset.
    pub region_table_path: Option<PathBuf>,
    /// Frontend files served at `/` (`STATIC_DIR`).
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            region_table_path: None,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment, falling back
    /// to defaults for anything unset. An unparseable `PORT` is ignored.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            data_path: lookup("DATA_PATH").map_or(defaults.data_path, PathBuf::from),
            region_table_path: lookup("REGION_TABLE_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            static_dir: lookup("STATIC_DIR").map_or(defaults.static_dir, PathBuf::from),
        }
    }
}
