//! Project file loading

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::types::Settings;
use crate::{
    constants::CONFIG_EXTENSIONS,
    error::{Error, Result},
    ext::PathExt,
};

/// Project file contents. Every field may be overridden on the command line.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectFileV1 {
    pub project_name: Option<String>,
    pub backend_type: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub parameters: IndexMap<String, Value>,
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "schemaVersion")]
pub enum ProjectFile {
    #[serde(rename = "v1")]
    V1(ProjectFileV1),
}

impl ProjectFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let display = path.to_str_checked()?.to_string();

        if !path.is_file() {
            return Err(Error::ConfigNotFound { path: display });
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .filter(|e| CONFIG_EXTENSIONS.contains(&e.as_str()))
            .ok_or_else(|| Error::UnsupportedConfigFormat { path: display.clone() })?;

        let content = std::fs::read_to_string(path)?;
        log::debug!("Loading project file {display}");

        let parsed = match extension.as_str() {
            "json" => serde_json::from_str(&content).map_err(|e| e.to_string()),
            _ => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
        };

        parsed.map_err(|reason| Error::ConfigParse { path: display, reason })
    }

    pub fn into_v1(self) -> ProjectFileV1 {
        let ProjectFile::V1(file) = self;
        file
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Transport;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn loads_yaml_project_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("project.yaml");
        fs::write(
            &path,
            r#"schemaVersion: v1
project_name: github-proxy
backend_type: api
description: GitHub proxy
parameters:
  base_url: https://api.github.com
  rate_limit_requests_per_minute: 30
settings:
  transport: sse
"#,
        )
        .unwrap();

        let file = ProjectFile::load(&path).unwrap().into_v1();
        assert_eq!(file.project_name.as_deref(), Some("github-proxy"));
        assert_eq!(file.backend_type.as_deref(), Some("api"));
        assert_eq!(file.parameters["rate_limit_requests_per_minute"], 30);
        assert_eq!(file.settings.transport, Transport::Sse);
    }

    #[test]
    fn loads_json_project_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("project.json");
        fs::write(
            &path,
            r#"{
                "schemaVersion": "v1",
                "backend_type": "filesystem",
                "parameters": {"read_only": true}
            }"#,
        )
        .unwrap();

        let file = ProjectFile::load(&path).unwrap().into_v1();
        assert_eq!(file.backend_type.as_deref(), Some("filesystem"));
        assert_eq!(file.parameters["read_only"], true);
        assert!(file.project_name.is_none());
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let err = ProjectFile::load(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("project.toml");
        fs::write(&path, "schemaVersion = 'v1'").unwrap();
        let err = ProjectFile::load(&path).unwrap_err();
        assert!(matches!(err, Error::UnsupportedConfigFormat { .. }));
    }

    #[test]
    fn missing_schema_version_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("project.yml");
        fs::write(&path, "backend_type: api\n").unwrap();
        let err = ProjectFile::load(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }
}
