//! Generated configuration files that are serialized rather than templated.

use std::path::Path;

use serde::Serialize;
use serde_json::json;

use crate::{
    backends::Parameters,
    config::{BackendType, LogLevel, ProjectConfig, Transport},
    constants::layout,
    error::Result,
    ext::PathExt,
};

#[derive(Serialize)]
struct ServerSection<'a> {
    transport: Transport,
    host: &'a str,
    port: u16,
    log_level: LogLevel,
}

#[derive(Serialize)]
struct ConfigFile<'a> {
    project_name: &'a str,
    description: &'a str,
    backend_type: BackendType,
    server: ServerSection<'a>,
    parameters: &'a Parameters,
}

/// `config/config.yaml`: the settings the project was generated with.
pub fn config_yaml(config: &ProjectConfig, parameters: &Parameters) -> Result<String> {
    let file = ConfigFile {
        project_name: &config.project_name,
        description: &config.description,
        backend_type: config.backend_type,
        server: ServerSection {
            transport: config.settings.transport,
            host: &config.settings.host,
            port: config.settings.port,
            log_level: config.settings.log_level,
        },
        parameters,
    };
    Ok(serde_yaml::to_string(&file)?)
}

/// `config/claude_desktop_config.json`: registers the server with the desktop client.
pub fn desktop_config(config: &ProjectConfig, project_root: &Path) -> Result<String> {
    let server_path = project_root.to_absolute()?.join(layout::SERVER_FILE);
    let mut servers = serde_json::Map::new();
    servers.insert(
        config.project_name.clone(),
        json!({
            "command": "python",
            "args": [server_path.to_str_checked()?],
            "env": {"LOG_LEVEL": config.settings.log_level.to_string()}
        }),
    );
    let document = json!({ "mcpServers": servers });
    let mut rendered = serde_json::to_string_pretty(&document)?;
    rendered.push('\n');
    Ok(rendered)
}
