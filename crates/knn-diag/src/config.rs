use knn_diag_core::{KnnError, KnnResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::Level;

/// Where the four input files live and which k values to evaluate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub data_dir: PathBuf,
    pub data_file: String,
    pub correct_labels_file: String,
    pub learning_data_file: String,
    pub learning_labels_file: String,
    pub k_min: usize,
    pub k_max: usize,
    pub log_level: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            data_dir: PathBuf::from("."),
            data_file: "Data.csv".to_string(),
            correct_labels_file: "Correct_Data_Labels.csv".to_string(),
            learning_data_file: "Learning_Data.csv".to_string(),
            learning_labels_file: "Learning_Data_Labels.csv".to_string(),
            k_min: 3,
            k_max: 15,
            log_level: "info".to_string(),
        }
    }
}

impl RunConfig {
    /// Defaults with every input file resolved against `dir`.
    pub fn in_dir<P: Into<PathBuf>>(dir: P) -> Self {
        RunConfig {
            data_dir: dir.into(),
            ..RunConfig::default()
        }
    }

    /// Read a JSON config; missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> KnnResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| KnnError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config: RunConfig =
            serde_json::from_str(&json).map_err(|e| KnnError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`RunConfig::from_json_file`], but a missing file means defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> KnnResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_json_file(path)
        } else {
            Ok(RunConfig::default())
        }
    }

    pub fn validate(&self) -> KnnResult<()> {
        if self.k_min == 0 {
            return Err(KnnError::Config("k_min must be at least 1".into()));
        }
        if self.k_min > self.k_max {
            return Err(KnnError::Config(format!(
                "k_min ({}) is greater than k_max ({})",
                self.k_min, self.k_max
            )));
        }
        self.level()?;
        Ok(())
    }

    pub fn level(&self) -> KnnResult<Level> {
        Level::from_str(&self.log_level)
            .map_err(|_| KnnError::Config(format!("unknown log level {:?}", self.log_level)))
    }

    pub fn k_range(&self) -> RangeInclusive<usize> {
        self.k_min..=self.k_max
    }

    pub fn data_path(&self) -> PathBuf {
        self.data_dir.join(&self.data_file)
    }

    pub fn correct_labels_path(&self) -> PathBuf {
        self.data_dir.join(&self.correct_labels_file)
    }

    pub fn learning_data_path(&self) -> PathBuf {
        self.data_dir.join(&self.learning_data_file)
    }

    pub fn learning_labels_path(&self) -> PathBuf {
        self.data_dir.join(&self.learning_labels_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.k_range(), 3..=15);
        assert_eq!(config.data_path(), Path::new("./Data.csv"));
        assert_eq!(config.level().unwrap(), Level::INFO);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("knn-diag.json");
        fs::write(&path, r#"{ "data_dir": "/data", "k_max": 9, "log_level": "debug" }"#).unwrap();

        let config = RunConfig::from_json_file(&path).unwrap();
        assert_eq!(config.k_range(), 3..=9);
        assert_eq!(config.learning_labels_path(), Path::new("/data/Learning_Data_Labels.csv"));
        assert_eq!(config.level().unwrap(), Level::DEBUG);
    }

    #[test]
    fn test_invalid_values() {
        let config = RunConfig { k_min: 0, ..RunConfig::default() };
        assert!(matches!(config.validate(), Err(KnnError::Config(_))));

        let config = RunConfig { k_min: 8, k_max: 4, ..RunConfig::default() };
        assert!(matches!(config.validate(), Err(KnnError::Config(_))));

        let config = RunConfig { log_level: "chatty".into(), ..RunConfig::default() };
        assert!(matches!(config.validate(), Err(KnnError::Config(_))));
    }

    #[test]
    fn test_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ k_min: ").unwrap();
        assert!(matches!(RunConfig::from_json_file(&path), Err(KnnError::Config(_))));
    }

    #[test]
    fn test_missing_file_means_defaults() {
        let dir = TempDir::new().unwrap();
        let config = RunConfig::load_or_default(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, RunConfig::default());
    }
}
