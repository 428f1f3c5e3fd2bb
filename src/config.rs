//! Model configuration: which remote artifacts each servable model needs

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

/// included default registry
static MODELS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/models.json"));

/// Artifact locations for one servable model
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub singularity_image_url: String,
    pub weights_url: String,
}

/// Read-only map from model name to its configuration.
///
/// Built once at startup and handed to the orchestrator; never mutated.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct ModelRegistry {
    models: HashMap<String, ModelConfig>,
}

impl ModelRegistry {
    /// Registry bundled with the binary
    pub fn bundled() -> Self {
        serde_json::from_str(MODELS).expect("bundled model registry is valid JSON")
    }

    /// Load a registry from a user-supplied JSON file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("can't read model registry at {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("can't parse model registry at {}", path.display()))
    }

    pub fn lookup(&self, model_name: &str) -> Option<&ModelConfig> {
        self.models.get(model_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_registry_resolves_known_models() {
        let registry = ModelRegistry::bundled();
        let config = registry.lookup("llama-2-7b").unwrap();
        assert!(config.weights_url.ends_with("llama-2-7b.tar.gz"));
    }

    #[test]
    fn unknown_model_is_not_found() {
        let registry = ModelRegistry::bundled();
        assert!(registry.lookup("no-such-model").is_none());
    }

    #[test]
    fn registry_loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models.json");
        fs::write(
            &path,
            r#"{"tiny": {"singularity_image_url": "https://example.com/tiny.sif",
                        "weights_url": "https://example.com/tiny.tar.gz"}}"#,
        )
        .unwrap();

        let registry = ModelRegistry::from_file(&path).unwrap();
        assert!(registry.lookup("tiny").is_some());
    }

    #[test]
    fn malformed_registry_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models.json");
        fs::write(&path, "not json").unwrap();

        assert!(ModelRegistry::from_file(&path).is_err());
    }
}
