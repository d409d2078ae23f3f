//! FileSink - appends fixes to a JSON-lines file

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use contracts::{ContractError, LocationFix, LocationSink};
use tracing::{debug, instrument};

/// Configuration for FileSink
#[derive(Debug, Clone)]
pub struct FileSinkConfig {
    /// Output file
    pub path: PathBuf,
    /// Keep existing content
    pub append: bool,
}

impl FileSinkConfig {
    /// Create config from params map; `path` is required
    pub fn from_params(params: &HashMap<String, String>) -> Option<Self> {
        let path = params.get("path").map(PathBuf::from)?;
        let append = params
            .get("append")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));
        Some(Self { path, append })
    }
}

/// Sink that writes one JSON object per fix
pub struct FileSink {
    name: String,
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileSink {
    /// Create a new FileSink, creating parent directories as needed
    pub fn new(name: impl Into<String>, config: FileSinkConfig) -> std::io::Result<Self> {
        if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(config.append)
            .truncate(!config.append)
            .open(&config.path)?;

        Ok(Self {
            name: name.into(),
            path: config.path,
            writer: BufWriter::new(file),
        })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> std::io::Result<Self> {
        let config = FileSinkConfig::from_params(params).ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "missing 'path' param")
        })?;
        Self::new(name, config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&mut self, fix: &LocationFix) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.writer, fix)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        self.writer.write_all(b"\n")
    }
}

impl LocationSink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "file_sink_enable", skip(self), fields(path = %self.path.display()))]
    async fn enable_simulation(&mut self) -> Result<(), ContractError> {
        debug!(sink = %self.name, "recording fixes");
        Ok(())
    }

    #[instrument(name = "file_sink_disable", skip(self), fields(path = %self.path.display()))]
    async fn disable_simulation(&mut self) -> Result<(), ContractError> {
        self.writer
            .flush()
            .map_err(|e| ContractError::sink_disable(&self.name, e.to_string()))
    }

    async fn publish(&mut self, fix: &LocationFix) -> Result<(), ContractError> {
        self.write_line(fix)
            .map_err(|e| ContractError::sink_publish(&self.name, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::Coordinate;
    use std::time::Duration;
    use tempfile::tempdir;

    fn params(path: &Path, append: bool) -> HashMap<String, String> {
        let mut params = HashMap::new();
        params.insert("path".to_string(), path.display().to_string());
        if append {
            params.insert("append".to_string(), "true".to_string());
        }
        params
    }

    #[tokio::test]
    async fn test_file_sink_writes_json_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("fixes.jsonl");
        let mut sink = FileSink::from_params("file", &params(&path, false)).unwrap();

        sink.enable_simulation().await.unwrap();
        for i in 0..3 {
            let fix = LocationFix::new(
                Coordinate::new(35.0 + i as f64 * 0.000_007, 139.0),
                Duration::from_secs(i),
            );
            sink.publish(&fix).await.unwrap();
        }
        sink.disable_simulation().await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["provider"], "mock_provider");
        assert_eq!(lines[0]["coordinate"]["latitude"], 35.0);
        assert_eq!(lines[2]["elapsed_ms"], 2000);
    }

    #[tokio::test]
    async fn test_file_sink_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fixes.jsonl");
        let fix = LocationFix::new(Coordinate::new(1.0, 2.0), Duration::ZERO);

        for _ in 0..2 {
            let mut sink = FileSink::from_params("file", &params(&path, true)).unwrap();
            sink.publish(&fix).await.unwrap();
            sink.disable_simulation().await.unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_file_sink_requires_path() {
        let result = FileSink::from_params("file", &HashMap::new());
        assert!(result.is_err());
    }
}
