use std::path::PathBuf;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_DATA_FILE: &str = "harvest_records.csv";
pub const DATA_FILE_ENV: &str = "OLIVE_HARVEST_DATA";
const DEFAULT_LOG_FILTER: &str = "olive_harvest=info";

/// Settings of one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// CSV file holding the harvest table.
    pub data_file: PathBuf,
    /// Render reports as JSON instead of text tables.
    pub json: bool,
}

/// Logs go to stderr, filtered by `RUST_LOG`, so stdout only carries reports.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
