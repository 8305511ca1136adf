#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line tool for the epidemic dashboard.
//!
//! * `report` prints the daily and regional statistics for a data file.
//! * `export` re-writes a data file with the canonical column names.
//! * `serve` starts the dashboard API server.
//!
//! Flags override the matching environment variables read by the server
//! (`DATA_PATH`, `BIND_ADDR`, `PORT`, `REGION_TABLE_PATH`, `STATIC_DIR`).

mod report;

use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use epi_dash_record::csv_source::write_csv;
use epi_dash_record::{CsvFileSource, RecordSource};
use epi_dash_server::{ServerConfig, run_server};

use crate::report::ReportOptions;

#[derive(Parser)]
#[command(name = "epi_dash", about = "Epidemic dashboard toolchain")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print daily and regional statistics for a case data file
    Report {
        /// Case data CSV (defaults to `DATA_PATH` or `data/cases.csv`)
        #[arg(long)]
        data: Option<PathBuf>,
        /// Number of leading days to list
        #[arg(long, default_value_t = 20)]
        head: usize,
        /// Number of regions in the top list
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
    /// Re-write a case data file using canonical column names
    Export {
        /// Case data CSV (defaults to `DATA_PATH` or `data/cases.csv`)
        #[arg(long)]
        data: Option<PathBuf>,
        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Start the dashboard API server
    Serve {
        /// Case data CSV
        #[arg(long)]
        data: Option<PathBuf>,
        /// Bind address
        #[arg(long)]
        bind: Option<String>,
        /// Port
        #[arg(long)]
        port: Option<u16>,
        /// Region table TOML (built-in Hong Kong table when omitted)
        #[arg(long)]
        regions: Option<PathBuf>,
        /// Directory of frontend files served at `/`
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();
    let env_config = ServerConfig::from_env();

    match cli.command {
        Commands::Report { data, head, top } => {
            let source = CsvFileSource::new(data.unwrap_or(env_config.data_path));
            log::info!("Loading case data from {}", source.describe());
            let store = source.load()?;
            let mut text = String::new();
            report::render(
                &store,
                ReportOptions {
                    head_days: head,
                    top_regions: top,
                },
                &mut text,
            )?;
            print!("{text}");
        }
        Commands::Export { data, output } => {
            let source = CsvFileSource::new(data.unwrap_or(env_config.data_path));
            let store = source.load()?;
            match output {
                Some(path) => {
                    write_csv(&store, BufWriter::new(File::create(&path)?))?;
                    log::info!("Wrote {} records to {}", store.len(), path.display());
                }
                None => {
                    let stdout = std::io::stdout();
                    let mut lock = stdout.lock();
                    write_csv(&store, &mut lock)?;
                    lock.flush()?;
                }
            }
        }
        Commands::Serve {
            data,
            bind,
            port,
            regions,
            static_dir,
        } => {
            let config = ServerConfig {
                bind_addr: bind.unwrap_or(env_config.bind_addr),
                port: port.unwrap_or(env_config.port),
                data_path: data.unwrap_or(env_config.data_path),
                region_table_path: regions.or(env_config.region_table_path),
                static_dir: static_dir.unwrap_or(env_config.static_dir),
            };
            actix_web::rt::System::new().block_on(run_server(config))?;
        }
    }

    Ok(())
}
