//! SQL database backend built on SQLAlchemy's async engine.

use serde_json::{json, Value};
use url::Url;

use super::{
    resolve_parameters, string_parameter, Backend, EnvVar, Parameters, ResourceHandlers, ToolSpec,
};
use crate::{
    config::{BackendConfig, BackendType},
    error::{Error, Result},
};

const SQLALCHEMY: &str = "sqlalchemy>=2.0.0";
const SQLITE_DATABASE: &str = "./data.db";

/// A database dialect with its async driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Sqlite,
    Postgresql,
    Mysql,
}

impl Dialect {
    fn parse(tag: &str) -> Option<Self> {
        match tag {
            "sqlite" => Some(Dialect::Sqlite),
            "postgresql" => Some(Dialect::Postgresql),
            "mysql" => Some(Dialect::Mysql),
            _ => None,
        }
    }

    fn scheme(&self) -> &'static str {
        match self {
            Dialect::Sqlite => "sqlite+aiosqlite",
            Dialect::Postgresql => "postgresql+asyncpg",
            Dialect::Mysql => "mysql+aiomysql",
        }
    }

    fn driver(&self) -> &'static str {
        match self {
            Dialect::Sqlite => "aiosqlite>=0.19.0",
            Dialect::Postgresql => "asyncpg>=0.28.0",
            Dialect::Mysql => "aiomysql>=0.2.0",
        }
    }

    fn default_port(&self) -> Option<u16> {
        match self {
            Dialect::Sqlite => None,
            Dialect::Postgresql => Some(5432),
            Dialect::Mysql => Some(3306),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseBackend {
    config: BackendConfig,
    parameters: Parameters,
    dialect: Dialect,
}

impl DatabaseBackend {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let mut parameters = resolve_parameters(&config, &Self::schema(), |resolved| {
            let server_based = resolved.get("db_type").and_then(Value::as_str) != Some("sqlite");
            if server_based && !resolved.contains_key("database_url") {
                vec!["host", "database", "username"]
            } else {
                Vec::new()
            }
        })?;

        let tag = string_parameter(BackendType::Database, &parameters, "db_type")?;
        let dialect = Dialect::parse(tag)
            .ok_or_else(|| invalid("db_type", format!("'{tag}' is not supported")))?;

        if dialect == Dialect::Sqlite && !parameters.contains_key("database") {
            parameters.insert("database".to_string(), json!(SQLITE_DATABASE));
        }
        if let Some(port) = dialect.default_port() {
            parameters.entry("port").or_insert_with(|| json!(port));
        }

        let connection_url = connection_url(dialect, &parameters)?;
        parameters.insert("connection_url".to_string(), json!(connection_url));

        Ok(Self { config, parameters, dialect })
    }

    pub fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "db_type": {
                    "type": "string",
                    "enum": ["sqlite", "postgresql", "mysql"],
                    "description": "Database dialect",
                    "default": "sqlite"
                },
                "database": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Database name, or the file path for sqlite"
                },
                "host": {"type": "string", "minLength": 1, "description": "Database server host"},
                "port": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 65535,
                    "description": "Database server port"
                },
                "username": {"type": "string", "minLength": 1, "description": "Database user"},
                "database_url": {
                    "type": "string",
                    "description": "Full SQLAlchemy URL; replaces host, port, database and username"
                },
                "pool_size": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Connection pool size",
                    "default": 5
                },
                "query_timeout": {
                    "type": "number",
                    "exclusiveMinimum": 0,
                    "description": "Query timeout in seconds",
                    "default": 30
                },
                "max_rows": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Most rows returned by a single query",
                    "default": 1000
                },
                "read_only": {
                    "type": "boolean",
                    "description": "Reject statements that modify data",
                    "default": false
                }
            }
        })
    }

    pub fn connection_url(&self) -> &str {
        self.parameters.get("connection_url").and_then(Value::as_str).unwrap_or_default()
    }
}

fn invalid(field: &str, reason: String) -> Error {
    Error::InvalidParameter {
        backend: BackendType::Database.to_string(),
        field: field.to_string(),
        reason,
    }
}

/// SQLAlchemy URL for the resolved parameters. The password never appears in
/// it; the generated server reads `DB_PASSWORD` at runtime.
fn connection_url(dialect: Dialect, parameters: &Parameters) -> Result<String> {
    let get = |field: &str| string_parameter(BackendType::Database, parameters, field);

    if let Some(raw) = parameters.get("database_url").and_then(Value::as_str) {
        Url::parse(raw)
            .map_err(|e| invalid("database_url", format!("'{raw}' is not a URL ({e})")))?;
        return Ok(raw.to_string());
    }

    let database = get("database")?;
    if dialect == Dialect::Sqlite {
        return Ok(format!("{}:///{database}", dialect.scheme()));
    }

    let host = get("host")?;
    let port = parameters
        .get("port")
        .and_then(Value::as_u64)
        .or(dialect.default_port().map(u64::from));
    let authority = match port {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    let mut url = Url::parse(&format!("{}://{authority}", dialect.scheme()))
        .map_err(|e| invalid("host", format!("'{host}' is not a valid host ({e})")))?;
    url.set_username(get("username")?)
        .map_err(|_| invalid("username", "cannot be placed in a URL".to_string()))?;
    url.set_path(&format!("/{database}"));
    Ok(url.to_string())
}

impl Backend for DatabaseBackend {
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
        vec![SQLALCHEMY.to_string(), self.dialect.driver().to_string()]
    }

    fn stdlib_imports(&self) -> Vec<&'static str> {
        vec!["import re"]
    }

    fn package_imports(&self) -> Vec<&'static str> {
        vec![
            "from sqlalchemy import inspect, text",
            "from sqlalchemy.engine import make_url",
            "from sqlalchemy.ext.asyncio import create_async_engine",
        ]
    }

    fn tools(&self) -> Vec<ToolSpec> {
        vec![
            ToolSpec::new(
                "execute_query",
                "Run a SQL statement and return the resulting rows",
                json!({
                    "type": "object",
                    "properties": {
                        "query": {"type": "string", "description": "SQL statement to run"},
                        "parameters": {
                            "type": "object",
                            "description": "Bound statement parameters"
                        }
                    },
                    "required": ["query"]
                }),
                "database/tools/execute_query.py.j2",
            ),
            ToolSpec::new(
                "list_tables",
                "List the tables in the database",
                json!({"type": "object", "properties": {}}),
                "database/tools/list_tables.py.j2",
            ),
            ToolSpec::new(
                "describe_table",
                "Show the columns of a table",
                json!({
                    "type": "object",
                    "properties": {
                        "table_name": {"type": "string", "description": "Table to describe"}
                    },
                    "required": ["table_name"]
                }),
                "database/tools/describe_table.py.j2",
            ),
        ]
    }

    fn resources(&self) -> Option<ResourceHandlers> {
        Some(ResourceHandlers {
            list_template: "database/resources/list.py.j2",
            read_template: "database/resources/read.py.j2",
            description:
                "Every table is exposed as a `table://<name>` resource returning its rows.",
        })
    }

    fn env_vars(&self) -> Vec<EnvVar> {
        let mut vars = vec![EnvVar::new(
            "DATABASE_URL",
            "Overrides the configured connection URL",
            self.connection_url(),
        )];
        if self.dialect != Dialect::Sqlite {
            vars.push(EnvVar::new("DB_PASSWORD", "Database password", "your-password-here"));
        }
        vars
    }
}
