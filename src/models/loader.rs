//! Model definition loader
//!
//! Reads model metadata from JSON files, one model per `*.json` file in a
//! directory. Malformed or inconsistent definitions fail the whole load.

use std::fs;
use std::path::{Path, PathBuf};

use super::meta::ModelMeta;
use crate::error::{ModelError, ModelResult};

/// Loads model definitions from disk
pub struct ModelLoader {
    dir: PathBuf,
}

impl ModelLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Loads every definition, ordered by file name
    pub fn load_all(&self) -> ModelResult<Vec<ModelMeta>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            ModelError::Io(format!(
                "Failed to read model directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| ModelError::Io(format!("Failed to read directory entry: {}", e)))?
                .path();

            // Skip non-JSON files
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            paths.push(path);
        }
        paths.sort();

        paths.iter().map(|p| Self::load_file(p)).collect()
    }

    /// Loads a single definition file
    pub fn load_file(path: &Path) -> ModelResult<ModelMeta> {
        let malformed = |reason: String| ModelError::InvalidModelMeta {
            model: path.display().to_string(),
            reason,
        };

        let content = fs::read_to_string(path)
            .map_err(|e| ModelError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

        let meta: ModelMeta =
            serde_json::from_str(&content).map_err(|e| malformed(format!("Invalid JSON: {}", e)))?;

        meta.validate_structure()?;
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_loads_json_files_only() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b_post.json", r#"{"name": "Post", "fields": [{"name": "title", "kind": "text"}]}"#);
        write(&dir, "a_user.json", r#"{"name": "User", "fields": [{"name": "email", "kind": "email"}]}"#);
        write(&dir, "notes.txt", "not a model");

        let models = ModelLoader::new(dir.path()).load_all().unwrap();
        let names: Vec<&str> = models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["User", "Post"]);
    }

    #[test]
    fn test_malformed_json_fails() {
        let dir = TempDir::new().unwrap();
        write(&dir, "post.json", "{ not json");

        let err = ModelLoader::new(dir.path()).load_all().unwrap_err();
        assert!(matches!(err, ModelError::InvalidModelMeta { .. }));
    }

    #[test]
    fn test_inconsistent_definition_fails() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "post.json",
            r#"{"name": "Post", "primary_key": "id", "fields": [{"name": "title", "kind": "text"}]}"#,
        );

        assert!(ModelLoader::new(dir.path()).load_all().is_err());
    }

    #[test]
    fn test_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let err = ModelLoader::new(dir.path().join("nope")).load_all().unwrap_err();
        assert!(matches!(err, ModelError::Io(_)));
    }
}
