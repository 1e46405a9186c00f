//! Local filesystem backend: sandboxed file reads, writes and search.

use serde_json::{json, Value};

use super::{resolve_parameters, Backend, Parameters, ResourceHandlers, ToolSpec};
use crate::{config::BackendConfig, error::Result};

const AIOFILES: &str = "aiofiles>=23.0.0";

#[derive(Debug, Clone)]
pub struct FilesystemBackend {
    config: BackendConfig,
    parameters: Parameters,
}

impl FilesystemBackend {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let parameters = resolve_parameters(&config, &Self::schema(), |_| Vec::new())?;
        Ok(Self { config, parameters })
    }

    pub fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "allowed_paths": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Directories the server may access",
                    "default": ["./data"]
                },
                "read_only": {
                    "type": "boolean",
                    "description": "Disable the write_file tool",
                    "default": false
                },
                "max_file_size": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Largest file in bytes the server reads or writes",
                    "default": 10485760
                },
                "allowed_extensions": {
                    "type": "array",
                    "items": {"type": "string", "pattern": "^\\."},
                    "description": "File extensions the server may touch; empty allows all",
                    "default": [
                        ".txt", ".md", ".json", ".yaml", ".yml", ".csv", ".py", ".js",
                        ".html", ".css", ".xml", ".log"
                    ]
                }
            }
        })
    }
}

impl Backend for FilesystemBackend {
    fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameter_schema(&self) -> Value {
        Self::schema()
    }

    fn dependencies(&self) -> Vec<String> {
        vec![AIOFILES.to_string()]
    }

    fn stdlib_imports(&self) -> Vec<&'static str> {
        vec!["from pathlib import Path", "from urllib.parse import unquote, urlparse"]
    }

    fn package_imports(&self) -> Vec<&'static str> {
        vec!["import aiofiles"]
    }

    fn tools(&self) -> Vec<ToolSpec> {
        vec![
            ToolSpec::new(
                "read_file",
                "Read the contents of a text file",
                json!({
                    "type": "object",
                    "properties": {
                        "path": {"type": "string", "description": "Path of the file to read"}
                    },
                    "required": ["path"]
                }),
                "filesystem/tools/read_file.py.j2",
            ),
            ToolSpec::new(
                "write_file",
                "Write text to a file, creating parent directories as needed",
                json!({
                    "type": "object",
                    "properties": {
                        "path": {"type": "string", "description": "Path of the file to write"},
                        "content": {"type": "string", "description": "Text to write"}
                    },
                    "required": ["path", "content"]
                }),
                "filesystem/tools/write_file.py.j2",
            )
            .enabled_if("not read_only"),
            ToolSpec::new(
                "list_directory",
                "List the entries of a directory",
                json!({
                    "type": "object",
                    "properties": {
                        "path": {"type": "string", "description": "Directory to list"}
                    }
                }),
                "filesystem/tools/list_directory.py.j2",
            ),
            ToolSpec::new(
                "search_files",
                "Find files matching a glob pattern",
                json!({
                    "type": "object",
                    "properties": {
                        "pattern": {"type": "string", "description": "Glob pattern such as *.md"},
                        "path": {"type": "string", "description": "Directory to search from"},
                        "max_results": {
                            "type": "integer",
                            "description": "Maximum number of matches",
                            "default": 100
                        }
                    },
                    "required": ["pattern"]
                }),
                "filesystem/tools/search_files.py.j2",
            ),
            ToolSpec::new(
                "get_file_info",
                "Show size, type and timestamps of a file or directory",
                json!({
                    "type": "object",
                    "properties": {
                        "path": {"type": "string", "description": "Path to inspect"}
                    },
                    "required": ["path"]
                }),
                "filesystem/tools/get_file_info.py.j2",
            ),
        ]
    }

    fn resources(&self) -> Option<ResourceHandlers> {
        Some(ResourceHandlers {
            list_template: "filesystem/resources/list.py.j2",
            read_template: "filesystem/resources/read.py.j2",
            description: "Every allowed file is exposed as a `file://` resource.",
        })
    }
}
