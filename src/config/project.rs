use super::{backend::BackendConfig, types::BackendType, Settings};

/// Everything the generator needs for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    pub project_name: String,
    pub backend_type: BackendType,
    pub description: String,
    pub backend_config: BackendConfig,
    pub settings: Settings,
}

impl ProjectConfig {
    /// Wraps a backend configuration, taking the backend type from it.
    pub fn new(
        project_name: impl Into<String>,
        description: impl Into<String>,
        backend_config: BackendConfig,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            backend_type: backend_config.backend_type(),
            description: description.into(),
            backend_config,
            settings: Settings::default(),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Default configuration used when the caller never attaches one.
    pub fn default_for(project_name: &str, backend_type: BackendType) -> Self {
        let description = format!("MCP server exposing a {backend_type} backend");
        let backend_config =
            BackendConfig::new(backend_type, project_name, description.clone());
        Self::new(project_name, description, backend_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_takes_backend_type_from_backend_config() {
        let backend = BackendConfig::new(BackendType::Api, "test-project", "Test API");
        let config = ProjectConfig::new("test-project", "Test API", backend);
        assert_eq!(config.backend_type, BackendType::Api);
    }

    #[test]
    fn default_for_describes_the_backend() {
        let config = ProjectConfig::default_for("fs", BackendType::Filesystem);
        assert_eq!(config.project_name, "fs");
        assert!(config.description.contains("filesystem"));
        assert!(config.backend_config.parameters().is_empty());
    }
}
