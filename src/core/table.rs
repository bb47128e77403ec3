//! Persisted indicator table (CSV) with an explicit, invalidatable cache.
use super::row::IndicatorRow;
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Data-access object shared by the refresh and dashboard entry points.
pub struct TableStore {
    path: PathBuf,
    cached: RwLock<Option<Arc<Vec<IndicatorRow>>>>,
}

impl TableStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cached: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the table with `rows`. The file is swapped in only after a complete write.
    pub fn write(&self, rows: &[IndicatorRow]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let tmp_path = self.path.with_extension("csv.tmp");
        let res: Result<()> = (|| {
            let mut writer = csv::Writer::from_path(&tmp_path)?;
            for row in rows {
                writer.serialize(row)?;
            }
            // serialize() only emits the header alongside the first record
            if rows.is_empty() {
                writer.write_record(HEADER)?;
            }
            writer.flush()?;
            Ok(())
        })();

        if let Err(e) = res {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e).with_context(|| format!("Failed to write table: {}", self.path.display()));
        }

        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace table: {}", self.path.display()))?;
        debug!(rows = rows.len(), path = %self.path.display(), "Table written");

        self.invalidate()
    }

    /// Returns the table, reading it on first use. A missing file is an empty table.
    pub fn load(&self) -> Result<Arc<Vec<IndicatorRow>>> {
        {
            let cached = self
                .cached
                .read()
                .map_err(|_| anyhow!("Table cache lock poisoned"))?;
            if let Some(rows) = cached.as_ref() {
                debug!("Table cache HIT");
                return Ok(Arc::clone(rows));
            }
        }

        debug!("Table cache MISS");
        let rows = Arc::new(self.read_rows()?);
        let mut cached = self
            .cached
            .write()
            .map_err(|_| anyhow!("Table cache lock poisoned"))?;
        *cached = Some(Arc::clone(&rows));
        Ok(rows)
    }

    pub fn invalidate(&self) -> Result<()> {
        let mut cached = self
            .cached
            .write()
            .map_err(|_| anyhow!("Table cache lock poisoned"))?;
        *cached = None;
        Ok(())
    }

    pub fn reload(&self) -> Result<Arc<Vec<IndicatorRow>>> {
        self.invalidate()?;
        self.load()
    }

    pub fn last_modified(&self) -> Option<DateTime<Local>> {
        std::fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Local>::from)
    }

    fn read_rows(&self) -> Result<Vec<IndicatorRow>> {
        if !self.path.exists() {
            warn!(path = %self.path.display(), "Indicator table not found, treating as empty");
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Failed to open table: {}", self.path.display()))?;
        let rows = reader
            .deserialize()
            .collect::<Result<Vec<IndicatorRow>, csv::Error>>()
            .with_context(|| format!("Failed to parse table: {}", self.path.display()))?;
        debug!(rows = rows.len(), "Table loaded");
        Ok(rows)
    }
}

const HEADER: [&str; 7] = [
    "country",
    "year",
    "population",
    "gdp_per_capita_usd",
    "gdp_growth_pct",
    "unemployment_pct",
    "labor_force_total",
];

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_rows() -> Vec<IndicatorRow> {
        vec![
            IndicatorRow {
                population: Some(10_298_252.0),
                gdp_per_capita_usd: Some(22_242.406_940_577_8),
                gdp_growth_pct: Some(-8.3),
                unemployment_pct: Some(6.8),
                labor_force_total: None,
                ..IndicatorRow::empty("Portugal", 2020)
            },
            IndicatorRow::empty("Portugal", 2024),
            IndicatorRow {
                unemployment_pct: Some(0.1 + 0.2),
                ..IndicatorRow::empty("Spain", 1996)
            },
        ]
    }

    #[test]
    fn test_write_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = TableStore::new(dir.path().join("table.csv"));
        let rows = sample_rows();

        store.write(&rows).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.as_slice(), rows.as_slice());
    }

    #[test]
    fn test_written_file_has_header_and_empty_missing_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.csv");
        let store = TableStore::new(&path);

        store.write(&[IndicatorRow::empty("Spain", 2001)]).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();

        assert_eq!(lines.next().unwrap(), HEADER.join(","));
        assert_eq!(lines.next().unwrap(), "Spain,2001,,,,,");
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_write_empty_table_keeps_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.csv");
        let store = TableStore::new(&path);

        store.write(&[]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), HEADER.join(","));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_write_overwrites_previous_table() {
        let dir = tempdir().unwrap();
        let store = TableStore::new(dir.path().join("nested").join("table.csv"));

        store.write(&sample_rows()).unwrap();
        let replacement = vec![IndicatorRow::empty("Spain", 2000)];
        store.write(&replacement).unwrap();

        assert_eq!(store.load().unwrap().as_slice(), replacement.as_slice());
    }

    #[test]
    fn test_missing_file_loads_as_empty() {
        let dir = tempdir().unwrap();
        let store = TableStore::new(dir.path().join("absent.csv"));

        assert!(store.load().unwrap().is_empty());
        assert!(store.last_modified().is_none());
    }

    #[test]
    fn test_cache_serves_until_reloaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.csv");
        let store = TableStore::new(&path);
        store.write(&sample_rows()).unwrap();

        let first = store.load().unwrap();
        assert_eq!(first.len(), 3);

        // Another writer replaces the file behind the store's back.
        let other = TableStore::new(&path);
        other.write(&[IndicatorRow::empty("Spain", 2000)]).unwrap();

        assert_eq!(store.load().unwrap().len(), 3);
        assert_eq!(store.reload().unwrap().len(), 1);
        assert!(store.last_modified().is_some());
    }
}
