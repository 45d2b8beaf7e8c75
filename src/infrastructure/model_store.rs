use crate::application::ml::{ARTIFACT_FORMAT_VERSION, TrainedModel};
use crate::domain::errors::ModelError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Deserialize)]
struct ArtifactHeader {
    format_version: u32,
}

/// JSON file holding one [`TrainedModel`].
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, model: &TrainedModel) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create model directory {:?}", parent))?;
            }
        }

        let content = serde_json::to_string(model).context("Failed to serialize model")?;

        // Atomic write: temp file then rename
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, content).context("Failed to write temp model file")?;
        fs::rename(&temp_path, &self.path).context("Failed to rename model file")?;

        info!("Saved model artifact to {:?}", self.path);
        Ok(())
    }

    pub fn load(&self) -> Result<TrainedModel, ModelError> {
        if !self.path.exists() {
            return Err(ModelError::ArtifactNotFound {
                path: self.path.clone(),
            });
        }

        let content = fs::read_to_string(&self.path).map_err(|e| self.unreadable(e))?;

        let header: ArtifactHeader = serde_json::from_str(&content).map_err(|e| self.unreadable(e))?;
        if header.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ModelError::UnsupportedArtifactVersion {
                found: header.format_version,
                expected: ARTIFACT_FORMAT_VERSION,
            });
        }

        let model: TrainedModel = serde_json::from_str(&content).map_err(|e| self.unreadable(e))?;
        info!(
            "Loaded model artifact from {:?} (trained {}, {} features)",
            self.path,
            model.trained_at().format("%Y-%m-%d %H:%M:%S UTC"),
            model.schema().feature_names().len()
        );
        Ok(model)
    }

    fn unreadable(&self, err: impl std::fmt::Display) -> ModelError {
        ModelError::ArtifactUnreadable {
            path: self.path.clone(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("underwriter-store-{}", Uuid::new_v4()))
            .join(name)
    }

    #[test]
    fn test_missing_artifact() {
        let store = ModelStore::new(scratch_path("absent.json"));
        assert!(matches!(
            store.load(),
            Err(ModelError::ArtifactNotFound { .. })
        ));
    }

    #[test]
    fn test_version_is_checked_before_decoding() {
        let path = scratch_path("old.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"format_version": 0, "ensemble": "pickled"}"#).unwrap();

        match ModelStore::new(&path).load() {
            Err(ModelError::UnsupportedArtifactVersion { found, expected }) => {
                assert_eq!(found, 0);
                assert_eq!(expected, ARTIFACT_FORMAT_VERSION);
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_garbage_is_unreadable() {
        let path = scratch_path("garbage.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            ModelStore::new(&path).load(),
            Err(ModelError::ArtifactUnreadable { .. })
        ));
        fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
