use std::sync::LazyLock;

use indexmap::IndexMap;
use log::warn;
use regex::Regex;
use serde_json::Value;

use crate::{
    constants::MAX_PROJECT_NAME_LEN,
    error::{Error, Result},
};

static PROJECT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9_-]*[A-Za-z0-9])?$")
        .expect("project name pattern is valid")
});

/// Checks whether `name` can be used as a project directory name.
///
/// Accepts ASCII letters and digits with internal `-` or `_`, at most
/// 50 characters long.
///
/// ```
/// use modelctx::validation::validate_project_name;
///
/// assert!(validate_project_name("my-project"));
/// assert!(!validate_project_name("-invalid"));
/// ```
pub fn validate_project_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().count() <= MAX_PROJECT_NAME_LEN
        && PROJECT_NAME.is_match(name)
}

/// Validate backend parameters against the backend's JSON schema.
///
/// Each declared property is validated on its own so the error can name the
/// offending field. Keys the schema does not declare are passed through with a
/// warning.
pub fn validate_parameters(
    backend: &str,
    schema: &Value,
    parameters: &IndexMap<String, Value>,
) -> Result<()> {
    let properties = schema.get("properties").and_then(Value::as_object);

    for (field, value) in parameters {
        let Some(property_schema) = properties.and_then(|p| p.get(field)) else {
            warn!("Backend '{backend}' does not use parameter '{field}'; keeping it as-is");
            continue;
        };

        let validator = jsonschema::validator_for(property_schema).map_err(|e| {
            Error::Other(anyhow::anyhow!(
                "Invalid schema for '{backend}' parameter '{field}': {e}"
            ))
        })?;

        let errors: Vec<String> =
            validator.iter_errors(value).map(|error| error.to_string()).collect();

        if !errors.is_empty() {
            return Err(Error::InvalidParameter {
                backend: backend.to_string(),
                field: field.clone(),
                reason: errors.join("; "),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_valid_project_names() {
        for name in ["my-project", "test_server", "api123", "a", "A1-b_2"] {
            assert!(validate_project_name(name), "expected '{name}' to be valid");
        }
    }

    #[test]
    fn rejects_invalid_project_names() {
        let too_long = "a".repeat(51);
        for name in ["", "-invalid", "invalid-", too_long.as_str(), "invalid name"] {
            assert!(!validate_project_name(name), "expected '{name}' to be invalid");
        }
    }

    #[test]
    fn accepts_names_at_the_length_limit() {
        assert!(validate_project_name(&"a".repeat(50)));
    }

    #[test]
    fn rejects_tabs_and_punctuation() {
        assert!(!validate_project_name("tab\tname"));
        assert!(!validate_project_name("dots.not.allowed"));
        assert!(!validate_project_name("slash/name"));
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "read_only": {"type": "boolean", "default": false},
                "max_file_size": {"type": "integer", "minimum": 1}
            }
        })
    }

    #[test]
    fn validate_parameters_accepts_matching_values() {
        let mut params = IndexMap::new();
        params.insert("read_only".to_string(), json!(true));
        params.insert("max_file_size".to_string(), json!(1024));
        assert!(validate_parameters("filesystem", &schema(), &params).is_ok());
    }

    #[test]
    fn validate_parameters_names_the_failing_field() {
        let mut params = IndexMap::new();
        params.insert("max_file_size".to_string(), json!(0));
        let err = validate_parameters("filesystem", &schema(), &params).unwrap_err();
        match err {
            Error::InvalidParameter { backend, field, .. } => {
                assert_eq!(backend, "filesystem");
                assert_eq!(field, "max_file_size");
            }
            other => panic!("Expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn validate_parameters_ignores_unknown_keys() {
        let mut params = IndexMap::new();
        params.insert("unused".to_string(), json!("value"));
        assert!(validate_parameters("filesystem", &schema(), &params).is_ok());
    }
}
