use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::vision::{detector::DetectParams, recognizer::RecognizerParams};

const CONFIG_PATH: &str = "facemark.config";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub camera_index: i32,
    pub cascade_path: PathBuf,
    /// confidence distances below this mark attendance, lower is more similar
    pub confidence_threshold: f64,
    pub capture_detect: DetectParams,
    pub recognition_detect: DetectParams,
    pub recognizer: RecognizerParams,
    pub training_dir: PathBuf,
    pub model_path: PathBuf,
    pub database_path: PathBuf,
    pub student_ledger: PathBuf,
    pub attendance_ledger: PathBuf,
}

impl Config {
    /// uses Self::load(), Self::generate(), and Self::save() to guarantee a valid configuration is obtained
    pub fn new() -> Self {
        match Self::load(Path::new(CONFIG_PATH)) {
            Ok(config) => {
                tracing::info!("configuration loaded from {}", CONFIG_PATH);
                config
            }
            Err(error) => {
                tracing::warn!("failed to load configuration\n{}", error);
                let config = Self::generate();
                if let Err(error) = config.save(Path::new(CONFIG_PATH)) {
                    tracing::warn!("failed to save generated config\n{}", error);
                }
                config
            }
        }
    }

    fn save(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }

    fn load(path: &Path) -> anyhow::Result<Self> {
        Ok(serde_json::from_slice(&std::fs::read(path)?)?)
    }

    fn generate() -> Self {
        Self {
            camera_index: 0,
            cascade_path: PathBuf::from("haarcascade_frontalface_default.xml"),
            confidence_threshold: 50.0,
            capture_detect: DetectParams::capture(),
            recognition_detect: DetectParams::recognition(),
            recognizer: RecognizerParams::default(),
            training_dir: PathBuf::from("TrainingImage"),
            model_path: PathBuf::from("TrainingImageLabel/recognizer.yml"),
            database_path: PathBuf::from("attendance_system.db"),
            student_ledger: PathBuf::from("StudentDetails/StudentDetails.csv"),
            attendance_ledger: PathBuf::from("Attendance/Attendance.csv"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Config;

    #[test]
    fn configuration_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facemark.config");
        let config = Config::generate();
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn loading_a_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(&dir.path().join("absent.config")).is_err());
    }
}
