//! Backend implementations and the capability trait they share.
//!
//! A backend describes what a generated server does: its parameters, tools,
//! resources and dependencies. Rendering is provided by the trait so every
//! backend goes through the same templates for the protocol surface.

pub mod api;
pub mod database;
pub mod filesystem;
pub mod registry;

use std::ops::Deref;

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;
use serde_json::{json, Value};

pub use api::ApiBackend;
pub use database::DatabaseBackend;
pub use filesystem::FilesystemBackend;
pub use registry::{BackendEntry, BackendRegistry};

use crate::{
    config::{BackendConfig, BackendType, ProjectConfig, Settings},
    constants::{SCHEMA_FIELD, SERVER_MODULE, SERVER_SYMBOL},
    error::{Error, Result},
    renderer::TemplateRenderer,
    template::SERVER_TEMPLATE,
    validation::validate_parameters,
};

/// Backend parameters after defaults are applied and checks have passed.
pub type Parameters = serde_json::Map<String, Value>;

/// A tool exposed by a generated server.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    /// Registered template holding the handler body, written at zero indentation.
    pub template: &'static str,
    /// Extra variables for the body template.
    pub context: Value,
    /// Expression over the resolved parameters; the tool is emitted only when it holds.
    pub enabled_if: &'static str,
}

impl ToolSpec {
    pub fn new(
        name: &'static str,
        description: &'static str,
        input_schema: Value,
        template: &'static str,
    ) -> Self {
        Self {
            name,
            description,
            input_schema,
            template,
            context: json!({}),
            enabled_if: "",
        }
    }

    pub fn enabled_if(mut self, expression: &'static str) -> Self {
        self.enabled_if = expression;
        self
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = context;
        self
    }
}

/// Templates for the resource handlers of backends that expose resources.
#[derive(Debug, Clone, Copy)]
pub struct ResourceHandlers {
    pub list_template: &'static str,
    pub read_template: &'static str,
    pub description: &'static str,
}

/// An environment variable read by the generated server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvVar {
    pub name: String,
    pub description: String,
    pub example: String,
}

impl EnvVar {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        example: impl Into<String>,
    ) -> Self {
        Self { name: name.into(), description: description.into(), example: example.into() }
    }
}

/// A tool with its handler body rendered.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedTool {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    pub body: String,
}

/// Project-level values the server template needs besides the backend.
#[derive(Debug, Clone, Copy)]
pub struct ServerOptions<'a> {
    pub project_name: &'a str,
    pub description: &'a str,
    pub settings: &'a Settings,
}

static DEFAULT_SETTINGS: std::sync::LazyLock<Settings> =
    std::sync::LazyLock::new(Settings::default);

impl<'a> ServerOptions<'a> {
    pub fn for_backend(config: &'a BackendConfig) -> Self {
        Self {
            project_name: config.project_name(),
            description: config.description(),
            settings: &DEFAULT_SETTINGS,
        }
    }

    pub fn for_project(config: &'a ProjectConfig) -> Self {
        Self {
            project_name: &config.project_name,
            description: &config.description,
            settings: &config.settings,
        }
    }
}

/// Capabilities every backend provides.
pub trait Backend {
    fn config(&self) -> &BackendConfig;

    /// Parameters with defaults applied, as the templates see them.
    fn parameters(&self) -> &Parameters;

    /// JSON schema of the accepted parameters, including defaults.
    fn parameter_schema(&self) -> Value;

    /// Dependencies the generated server needs for this backend.
    fn dependencies(&self) -> Vec<String>;

    /// Standard library imports the rendered code relies on.
    fn stdlib_imports(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Third-party imports, provided by [`Backend::dependencies`].
    fn package_imports(&self) -> Vec<&'static str> {
        Vec::new()
    }

    fn tools(&self) -> Vec<ToolSpec>;

    fn resources(&self) -> Option<ResourceHandlers> {
        None
    }

    fn env_vars(&self) -> Vec<EnvVar> {
        Vec::new()
    }

    fn backend_type(&self) -> BackendType {
        self.config().backend_type()
    }

    /// Name of a per-backend template such as `filesystem/init.py.j2`.
    fn template_name(&self, part: &str) -> String {
        format!("{}/{part}.py.j2", self.backend_type())
    }

    fn parameter_context(&self) -> Value {
        Value::Object(self.parameters().clone())
    }

    /// Renders a registered template, tagging failures with this backend.
    fn render_part(
        &self,
        engine: &dyn TemplateRenderer,
        template: &str,
        context: &Value,
    ) -> Result<String> {
        engine.render_template(template, context).map_err(|source| Error::Render {
            backend: self.backend_type().to_string(),
            template: template.to_string(),
            source,
        })
    }

    /// Initialisation snippet: configuration constants and client setup.
    fn get_init_code(&self, engine: &dyn TemplateRenderer) -> Result<String> {
        let code =
            self.render_part(engine, &self.template_name("init"), &self.parameter_context())?;
        Ok(code.trim_end().to_string())
    }

    /// Module-level helper functions used by the handler bodies.
    fn get_helpers_code(&self, engine: &dyn TemplateRenderer) -> Result<String> {
        let code =
            self.render_part(engine, &self.template_name("helpers"), &self.parameter_context())?;
        Ok(code.trim_end().to_string())
    }

    /// Tools whose `enabled_if` holds for the resolved parameters.
    fn enabled_tools(&self, engine: &dyn TemplateRenderer) -> Result<Vec<ToolSpec>> {
        let context = self.parameter_context();
        let mut enabled = Vec::new();
        for tool in self.tools() {
            let keep = engine.execute_expression(tool.enabled_if, &context).map_err(
                |source| Error::Render {
                    backend: self.backend_type().to_string(),
                    template: format!("{} (enabled_if)", tool.name),
                    source,
                },
            )?;
            if keep {
                enabled.push(tool);
            } else {
                debug!("Skipping tool '{}' for backend '{}'", tool.name, self.backend_type());
            }
        }
        Ok(enabled)
    }

    fn render_tools(&self, engine: &dyn TemplateRenderer) -> Result<Vec<RenderedTool>> {
        let base = self.parameters();
        self.enabled_tools(engine)?
            .into_iter()
            .map(|tool| {
                let mut context = base.clone();
                if let Value::Object(extra) = &tool.context {
                    context.extend(extra.clone());
                }
                let body = self.render_part(engine, tool.template, &Value::Object(context))?;
                Ok(RenderedTool {
                    name: tool.name,
                    description: tool.description,
                    input_schema: tool.input_schema,
                    body: body.trim_end().to_string(),
                })
            })
            .collect()
    }

    /// Full context shared by every project template.
    fn template_context(
        &self,
        engine: &dyn TemplateRenderer,
        options: &ServerOptions<'_>,
    ) -> Result<Value> {
        let resources = match self.resources() {
            Some(handlers) => {
                let context = self.parameter_context();
                json!({
                    "list_body": self.render_part(engine, handlers.list_template, &context)?,
                    "read_body": self.render_part(engine, handlers.read_template, &context)?,
                    "description": handlers.description,
                })
            }
            None => Value::Null,
        };
        let settings = options.settings;

        Ok(json!({
            "project_name": options.project_name,
            "description": options.description,
            "backend_type": self.backend_type().as_str(),
            "server_symbol": SERVER_SYMBOL,
            "server_module": SERVER_MODULE,
            "schema_field": SCHEMA_FIELD,
            "transport": settings.transport.to_string(),
            "host": settings.host,
            "port": settings.port,
            "log_level": settings.log_level.to_string(),
            "stdlib_imports": self.stdlib_imports(),
            "package_imports": self.package_imports(),
            "init_code": self.get_init_code(engine)?,
            "helpers": self.get_helpers_code(engine)?,
            "tools": self.render_tools(engine)?,
            "resources": resources,
            "env_vars": self.env_vars(),
            "parameters": self.parameter_context(),
        }))
    }

    /// Renders `server.py` from an already built template context.
    fn render_server(&self, engine: &dyn TemplateRenderer, context: &Value) -> Result<String> {
        self.render_part(engine, SERVER_TEMPLATE, context)
    }

    /// Complete source of the server entry point with default settings.
    fn generate_server_code(&self, engine: &dyn TemplateRenderer) -> Result<String> {
        self.generate_server_code_with(engine, &ServerOptions::for_backend(self.config()))
    }

    fn generate_server_code_with(
        &self,
        engine: &dyn TemplateRenderer,
        options: &ServerOptions<'_>,
    ) -> Result<String> {
        let context = self.template_context(engine, options)?;
        self.render_server(engine, &context)
    }
}

/// The closed set of backends, one variant per registered tag.
#[derive(Debug)]
pub enum AnyBackend {
    Filesystem(FilesystemBackend),
    Api(ApiBackend),
    Database(DatabaseBackend),
}

impl AnyBackend {
    pub fn as_backend(&self) -> &(dyn Backend + 'static) {
        match self {
            AnyBackend::Filesystem(backend) => backend,
            AnyBackend::Api(backend) => backend,
            AnyBackend::Database(backend) => backend,
        }
    }
}

impl Deref for AnyBackend {
    type Target = dyn Backend;

    fn deref(&self) -> &Self::Target {
        self.as_backend()
    }
}

/// Applies schema defaults to the caller's parameters and checks them.
///
/// Null values count as unset. `required` lists the parameters that must be
/// present once defaults are applied.
pub(crate) fn resolve_parameters(
    config: &BackendConfig,
    schema: &Value,
    required: impl Fn(&Parameters) -> Vec<&'static str>,
) -> Result<Parameters> {
    let backend = config.backend_type().to_string();
    let supplied: IndexMap<String, Value> = config
        .parameters()
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    validate_parameters(&backend, schema, &supplied)?;

    let mut resolved = Parameters::new();
    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        for (key, property) in properties {
            if let Some(default) = property.get("default") {
                resolved.insert(key.clone(), default.clone());
            }
        }
    }
    resolved.extend(supplied);

    if let Some(field) = required(&resolved).into_iter().find(|f| !resolved.contains_key(*f))
    {
        return Err(Error::MissingParameter { backend, field: field.to_string() });
    }

    Ok(resolved)
}

/// Reads a string parameter that `resolve_parameters` guaranteed to exist.
pub(crate) fn string_parameter<'p>(
    backend: BackendType,
    parameters: &'p Parameters,
    field: &str,
) -> Result<&'p str> {
    parameters.get(field).and_then(Value::as_str).ok_or_else(|| Error::MissingParameter {
        backend: backend.to_string(),
        field: field.to_string(),
    })
}
