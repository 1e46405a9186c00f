use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::types::BackendType;

/// Declarative configuration of a single backend.
///
/// Built once, then only read. Parameter keys and shapes are checked by the
/// backend consuming the configuration, not here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackendConfig {
    backend_type: BackendType,
    project_name: String,
    description: String,
    dependencies: Vec<String>,
    parameters: IndexMap<String, Value>,
}

impl BackendConfig {
    pub fn new(
        backend_type: BackendType,
        project_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            backend_type,
            project_name: project_name.into(),
            description: description.into(),
            dependencies: Vec::new(),
            parameters: IndexMap::new(),
        }
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies.extend(dependencies.into_iter().map(Into::into));
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    pub fn with_parameters(mut self, parameters: IndexMap<String, Value>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    pub fn backend_type(&self) -> BackendType {
        self.backend_type
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Caller-supplied dependency specifiers, in the order given.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn parameters(&self) -> &IndexMap<String, Value> {
        &self.parameters
    }
}
