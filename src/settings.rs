use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One billable line item for the month.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(default)]
pub struct Task {
    pub name: String,
    pub hour: i32,
}

/// The monthly billing configuration, loaded once at startup and read-only
/// afterwards. Field names follow the `settings.json` schema; absent fields
/// fall back to their zero values rather than failing the parse.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub name: String,
    #[serde(rename = "hourlyPay")]
    pub hourly_pay: i32,
    pub year: i32,
    pub month: u32,
    pub tasks: Vec<Task>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                return Err(SettingsError::NotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(source) => return Err(source.into()),
        };
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Total hours across all tasks.
    pub fn hour_sum(&self) -> i32 {
        self.tasks.iter().map(|task| task.hour).sum()
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("IO Error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("Error decoding settings: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn write_settings(dir: &tempfile::TempDir, json: &str) -> PathBuf {
        let path = dir.path().join("settings.json");
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn full_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(
            &dir,
            r#"{
                "name": "Tanaka",
                "hourlyPay": 3000,
                "year": 2024,
                "month": 12,
                "tasks": [
                    {"name": "API設計", "hour": 12},
                    {"name": "実装", "hour": 30}
                ]
            }"#,
        );

        let settings = Settings::load(&path).unwrap();
        assert_eq!(
            settings,
            Settings {
                name: "Tanaka".to_string(),
                hourly_pay: 3000,
                year: 2024,
                month: 12,
                tasks: vec![
                    Task {
                        name: "API設計".to_string(),
                        hour: 12,
                    },
                    Task {
                        name: "実装".to_string(),
                        hour: 30,
                    },
                ],
            }
        );
        assert_eq!(settings.hour_sum(), 42);
    }

    #[test]
    fn missing_fields_default_to_zero_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(&dir, r#"{"name": "Tanaka"}"#);

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.hourly_pay, 0);
        assert_eq!(settings.year, 0);
        assert_eq!(settings.month, 0);
        assert!(settings.tasks.is_empty());
        assert_eq!(settings.hour_sum(), 0);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-settings.json");

        match Settings::load(&path) {
            Err(SettingsError::NotFound { path: reported }) => {
                assert_eq!(reported, path)
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(&dir, "{\"name\": ");

        assert!(matches!(
            Settings::load(&path),
            Err(SettingsError::Parse { .. })
        ));
    }
}
