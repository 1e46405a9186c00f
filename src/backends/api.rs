//! REST API backend: proxies HTTP calls to a configured base URL.

use serde_json::{json, Value};
use url::Url;

use super::{resolve_parameters, string_parameter, Backend, EnvVar, Parameters, ToolSpec};
use crate::{
    config::{BackendConfig, BackendType},
    error::{Error, Result},
};

const HTTPX: &str = "httpx>=0.24.0";
const REQUEST_TEMPLATE: &str = "api/tools/request.py.j2";

#[derive(Debug, Clone)]
pub struct ApiBackend {
    config: BackendConfig,
    parameters: Parameters,
}

impl ApiBackend {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let parameters = resolve_parameters(&config, &Self::schema(), |_| vec!["base_url"])?;
        check_base_url(string_parameter(BackendType::Api, &parameters, "base_url")?)?;
        Ok(Self { config, parameters })
    }

    pub fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "base_url": {
                    "type": "string",
                    "description": "Root URL every endpoint is resolved against",
                    "default": "https://api.example.com"
                },
                "auth_type": {
                    "type": "string",
                    "enum": ["none", "bearer", "api_key", "basic"],
                    "description": "How requests authenticate",
                    "default": "bearer"
                },
                "api_key_header": {
                    "type": "string",
                    "description": "Header carrying the key when auth_type is api_key",
                    "default": "X-API-Key"
                },
                "rate_limit_requests_per_minute": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Client-side request budget",
                    "default": 60
                },
                "request_timeout": {
                    "type": "number",
                    "exclusiveMinimum": 0,
                    "description": "Timeout in seconds for each request",
                    "default": 30
                },
                "allowed_methods": {
                    "type": "array",
                    "items": {"type": "string", "enum": ["GET", "POST", "PUT", "PATCH", "DELETE"]},
                    "uniqueItems": true,
                    "description": "HTTP methods exposed as tools; api_get is always exposed",
                    "default": ["GET", "POST", "PUT", "DELETE"]
                },
                "default_headers": {
                    "type": "object",
                    "additionalProperties": {"type": "string"},
                    "description": "Headers sent with every request",
                    "default": {}
                }
            }
        })
    }

    fn auth_type(&self) -> &str {
        self.parameters.get("auth_type").and_then(Value::as_str).unwrap_or("none")
    }
}

fn check_base_url(raw: &str) -> Result<()> {
    let invalid = |reason: String| Error::InvalidParameter {
        backend: BackendType::Api.to_string(),
        field: "base_url".to_string(),
        reason,
    };
    let url = Url::parse(raw).map_err(|e| invalid(format!("'{raw}' is not a URL ({e})")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(format!("scheme '{scheme}' is not http or https"))),
    }
}

fn request_tool(
    name: &'static str,
    description: &'static str,
    method: &'static str,
    enabled_if: &'static str,
) -> ToolSpec {
    let has_body = matches!(method, "POST" | "PUT" | "PATCH");
    let mut properties = json!({
        "endpoint": {"type": "string", "description": "Path relative to the base URL"},
        "params": {"type": "object", "description": "Query string parameters"}
    });
    if has_body {
        properties["data"] = json!({"type": "object", "description": "JSON request body"});
    }

    ToolSpec::new(
        name,
        description,
        json!({"type": "object", "properties": properties, "required": ["endpoint"]}),
        REQUEST_TEMPLATE,
    )
    .with_context(json!({"method": method, "has_body": has_body}))
    .enabled_if(enabled_if)
}

impl Backend for ApiBackend {
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
        vec![HTTPX.to_string()]
    }

    fn stdlib_imports(&self) -> Vec<&'static str> {
        vec!["import time", "from collections import deque"]
    }

    fn package_imports(&self) -> Vec<&'static str> {
        vec!["import httpx"]
    }

    fn tools(&self) -> Vec<ToolSpec> {
        vec![
            request_tool("api_get", "Send a GET request", "GET", ""),
            request_tool(
                "api_post",
                "Send a POST request with a JSON body",
                "POST",
                "'POST' in allowed_methods",
            ),
            request_tool(
                "api_put",
                "Send a PUT request with a JSON body",
                "PUT",
                "'PUT' in allowed_methods",
            ),
            request_tool(
                "api_patch",
                "Send a PATCH request with a JSON body",
                "PATCH",
                "'PATCH' in allowed_methods",
            ),
            request_tool(
                "api_delete",
                "Send a DELETE request",
                "DELETE",
                "'DELETE' in allowed_methods",
            ),
        ]
    }

    fn env_vars(&self) -> Vec<EnvVar> {
        let base_url =
            self.parameters.get("base_url").and_then(Value::as_str).unwrap_or_default();
        let mut vars =
            vec![EnvVar::new("API_BASE_URL", "Overrides the configured base URL", base_url)];
        match self.auth_type() {
            "bearer" => vars.push(EnvVar::new("API_TOKEN", "Bearer token", "your-token-here")),
            "api_key" => vars.push(EnvVar::new("API_KEY", "API key", "your-api-key-here")),
            "basic" => {
                vars.push(EnvVar::new("API_USERNAME", "Basic auth user", "username"));
                vars.push(EnvVar::new("API_PASSWORD", "Basic auth password", "password"));
            }
            _ => {}
        }
        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::get_template_engine;

    fn config() -> BackendConfig {
        BackendConfig::new(BackendType::Api, "test-project", "Test API")
    }

    #[test]
    fn default_methods_expose_four_tools() {
        let engine = get_template_engine().unwrap();
        let api = ApiBackend::new(config()).unwrap();
        let names: Vec<_> = api.enabled_tools(&engine).unwrap().iter().map(|t| t.name).collect();
        assert_eq!(names, ["api_get", "api_post", "api_put", "api_delete"]);
    }

    #[test]
    fn allowed_methods_select_tools() {
        let engine = get_template_engine().unwrap();
        let api =
            ApiBackend::new(config().with_parameter("allowed_methods", json!(["GET", "PATCH"])))
                .unwrap();
        let code = api.generate_server_code(&engine).unwrap();
        assert!(code.contains("name == \"api_get\""));
        assert!(code.contains("name == \"api_patch\""));
        assert!(!code.contains("name == \"api_post\""));
        assert!(code.contains(r#""PATCH","#));
    }

    #[test]
    fn get_is_exposed_whatever_the_allowed_methods() {
        let engine = get_template_engine().unwrap();
        let api = ApiBackend::new(config().with_parameter("allowed_methods", json!(["POST"])))
            .unwrap();
        let names: Vec<_> = api.enabled_tools(&engine).unwrap().iter().map(|t| t.name).collect();
        assert_eq!(names, ["api_get", "api_post"]);
    }

    #[test]
    fn server_imports_httpx_and_exposes_the_server_symbol() {
        let engine = get_template_engine().unwrap();
        let api = ApiBackend::new(config()).unwrap();
        let code = api.generate_server_code(&engine).unwrap();
        assert!(code.contains("import httpx"));
        assert!(code.contains("\nserver = Server("));
        assert!(code.contains("@server.list_tools()"));
        assert!(code.contains("@server.call_tool()"));
    }

    #[test]
    fn auth_type_drives_headers_and_env() {
        let engine = get_template_engine().unwrap();
        let api = ApiBackend::new(
            config()
                .with_parameter("auth_type", json!("api_key"))
                .with_parameter("api_key_header", json!("X-Token")),
        )
        .unwrap();
        let init = api.get_init_code(&engine).unwrap();
        assert!(init.contains(r#"headers["X-Token"] = api_key"#));
        let names: Vec<_> = api.env_vars().into_iter().map(|v| v.name).collect();
        assert_eq!(names, ["API_BASE_URL", "API_KEY"]);
    }

    #[test]
    fn base_url_must_be_http() {
        let err = ApiBackend::new(config().with_parameter("base_url", json!("ftp://example.com")))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { ref field, .. } if field == "base_url"));

        let err =
            ApiBackend::new(config().with_parameter("base_url", json!("not a url"))).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test]
    fn unknown_auth_type_is_rejected() {
        let err =
            ApiBackend::new(config().with_parameter("auth_type", json!("oauth"))).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { ref field, .. } if field == "auth_type"));
    }
}
