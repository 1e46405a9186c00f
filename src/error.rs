use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}.")]
    Io(#[from] std::io::Error),

    #[error("Failed to write '{}'. Original error: {source}", path.display())]
    Write { path: PathBuf, source: std::io::Error },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to parse project file '{path}'. Original error: {reason}")]
    ConfigParse { path: String, reason: String },

    #[error("Project file '{path}' not found.")]
    ConfigNotFound { path: String },

    #[error("Unsupported project file format '{path}'. Expected .yaml, .yml or .json.")]
    UnsupportedConfigFormat { path: String },

    /// The backend tag is not present in the registry.
    #[error("Unknown backend type '{backend}'. Available backends: {available}.")]
    UnknownBackend { backend: String, available: String },

    #[error("Backend type mismatch: project declares '{expected}' but the backend configuration is '{found}'.")]
    BackendMismatch { expected: String, found: String },

    /// A parameter the backend template cannot render without.
    #[error("Configuration error: backend '{backend}' requires parameter '{field}'.")]
    MissingParameter { backend: String, field: String },

    #[error("Configuration error: backend '{backend}' parameter '{field}' is invalid: {reason}.")]
    InvalidParameter { backend: String, field: String, reason: String },

    #[error("Project name mismatch: generator creates '{expected}' but the configuration names '{found}'.")]
    ProjectNameMismatch { expected: String, found: String },

    #[error("No project name given. Pass NAME or set project_name in the project file.")]
    MissingProjectName,

    #[error("Invalid project name '{name}'. Use 1-50 letters, digits, '-' or '_', not starting or ending with '-' or '_'.")]
    InvalidProjectName { name: String },

    #[error("Invalid parameter assignment '{0}'. Expected KEY=VALUE.")]
    InvalidAssignment(String),

    #[error("Failed to load template '{name}'. Original error: {source}")]
    Template { name: String, source: minijinja::Error },

    /// Template construction or evaluation failed for a backend.
    #[error("Failed to render '{template}' for backend '{backend}'. Original error: {source}")]
    Render { backend: String, template: String, source: minijinja::Error },

    /// The rendered Python source failed the layout check.
    #[error("Generated file '{file}' is not valid Python (line {line}): {message}.")]
    Syntax { file: String, line: usize, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience type alias for Results with the crate error as the error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Whether the error stems from the supplied configuration rather than
    /// from rendering or the filesystem.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::ConfigParse { .. }
                | Error::ConfigNotFound { .. }
                | Error::UnsupportedConfigFormat { .. }
                | Error::UnknownBackend { .. }
                | Error::BackendMismatch { .. }
                | Error::ProjectNameMismatch { .. }
                | Error::MissingProjectName
                | Error::MissingParameter { .. }
                | Error::InvalidParameter { .. }
                | Error::InvalidProjectName { .. }
                | Error::InvalidAssignment(_)
        )
    }
}

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1.
/// Configuration errors get a pointer to `modelctx list`.
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    if err.is_configuration() {
        eprintln!("Run `modelctx list` to see the available backends and their parameters.");
    }
    std::process::exit(crate::constants::exit_codes::FAILURE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameter_names_backend_and_field() {
        let err = Error::MissingParameter {
            backend: "database".to_string(),
            field: "host".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("database"));
        assert!(message.contains("host"));
        assert!(err.is_configuration());
    }

    #[test]
    fn io_errors_are_not_configuration_errors() {
        let err = Error::from(std::io::Error::other("disk full"));
        assert!(!err.is_configuration());
    }
}
