use crate::core::cache::SeriesStore;
use crate::core::series::{SeriesCache, SeriesKind, canonical_year_key};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

pub const YEAR_COLUMN: &str = "year";

/// One two-column CSV file per series: the year key and the series value.
pub struct CsvSeriesStore {
    dir: PathBuf,
}

impl CsvSeriesStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, kind: SeriesKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    fn read(&self, kind: SeriesKind, path: &Path) -> Result<SeriesCache> {
        // Rows with a wrong field count must reach the skip branch below
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Failed to open cache file: {}", path.display()))?;

        let mut cache = SeriesCache::new();
        for (line, record) in reader.records().enumerate() {
            let record = record
                .with_context(|| format!("Failed to read cache file: {}", path.display()))?;
            let year = record.get(0).and_then(canonical_year_key);
            let value = record.get(1).and_then(|v| v.trim().parse::<f64>().ok());
            match (year, value) {
                (Some(year), Some(value)) if record.len() == 2 && value.is_finite() => {
                    if !cache.insert(year.clone(), value) {
                        debug!(%kind, year = %year, "Duplicate cached year, keeping first row");
                    }
                }
                _ => warn!(%kind, row = line + 1, "Skipping malformed cache row"),
            }
        }
        Ok(cache)
    }
}

#[async_trait]
impl SeriesStore for CsvSeriesStore {
    async fn load(&self, kind: SeriesKind) -> Result<SeriesCache> {
        let path = self.path_for(kind);
        if !path.exists() {
            debug!(%kind, path = %path.display(), "No cache file yet");
            return Ok(SeriesCache::new());
        }
        let cache = self.read(kind, &path)?;
        debug!(%kind, rows = cache.len(), path = %path.display(), "Cache file LOAD");
        Ok(cache)
    }

    async fn save(&self, kind: SeriesKind, cache: &SeriesCache) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory: {}", self.dir.display()))?;

        let path = self.path_for(kind);
        let staged = NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("Failed to create temp file in {}", self.dir.display()))?;
        {
            let mut writer = csv::Writer::from_writer(staged.as_file());
            writer.write_record([YEAR_COLUMN, kind.value_column()])?;
            for (year, value) in cache.iter() {
                writer.write_record([year.to_string(), value.to_string()])?;
            }
            writer
                .flush()
                .with_context(|| format!("Failed to write cache file: {}", path.display()))?;
        }
        // The previous file stays intact until the new one is complete
        staged
            .persist(&path)
            .with_context(|| format!("Failed to replace cache file: {}", path.display()))?;

        debug!(%kind, rows = cache.len(), path = %path.display(), "Cache file SAVE");
        Ok(())
    }
}
