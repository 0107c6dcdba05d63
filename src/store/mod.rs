pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use anyhow::Result;
use disk::CsvSeriesStore;
use tracing::debug;

/// Opens the CSV store in the configured (or platform default) data directory.
pub fn open_default(config: &AppConfig) -> Result<CsvSeriesStore> {
    let dir = config.default_data_path()?;
    debug!("Using cache directory {}", dir.display());
    Ok(CsvSeriesStore::new(dir))
}
