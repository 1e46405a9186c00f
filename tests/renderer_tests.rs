#[cfg(test)]
mod tests {
    use modelctx::renderer::{MiniJinjaRenderer, TemplateRenderer};
    use modelctx::template::{get_template_engine, ENV_EXAMPLE_TEMPLATE, README_TEMPLATE};
    use serde_json::json;
    use test_log::test;

    fn render(template: &str, context: serde_json::Value) -> String {
        let mut renderer = MiniJinjaRenderer::new();
        renderer.add_template("inline.j2", template).unwrap();
        renderer.render_template("inline.j2", &context).unwrap()
    }

    fn test_template(template: &str, expected: &str) {
        assert_eq!(render(template, json!({})), expected);
    }

    #[test]
    fn test_snake_case_filter() {
        test_template("{{ 'test-project' | snake_case }}", "test_project");
    }

    #[test]
    fn test_title_case_filter() {
        test_template("{{ 'test_project' | title_case }}", "Test Project");
    }

    #[test]
    fn test_py_filter_inline() {
        test_template(
            r#"{{ {"read_only": false, "limit": none, "paths": ["./data"]} | py }}"#,
            r#"{"read_only": False, "limit": None, "paths": ["./data"]}"#,
        );
    }

    #[test]
    fn test_py_filter_indented() {
        let context = json!({"schema": {"type": "object", "required": ["path"]}});
        assert_eq!(
            render("x = {{ schema | py(4) }}", context),
            "x = {\n        \"type\": \"object\",\n        \"required\": [\"path\"],\n    }"
        );
    }

    #[test]
    fn test_indent_to_filter_normalises_width() {
        let context = json!({"body": "return 1\n"});
        assert_eq!(render("{{ body | indent_to(12) }}", context), "            return 1");
    }

    #[test]
    fn test_readme_lists_tools() {
        let engine = get_template_engine().unwrap();
        let context = json!({
            "project_name": "notes",
            "description": "Notes server",
            "backend_type": "filesystem",
            "server_module": "server",
            "transport": "stdio",
            "host": "localhost",
            "port": 8000,
            "tools": [{"name": "read_file", "description": "Read a file"}],
            "resources": null,
            "env_vars": [],
            "parameters": {},
        });
        let readme = engine.render_template(README_TEMPLATE, &context).unwrap();
        assert!(readme.starts_with("# Notes\n"));
        assert!(readme.contains("`notes` is an MCP server"));
        assert!(readme.contains("read_file"));
    }

    #[test]
    fn test_env_example_lists_variables() {
        let engine = get_template_engine().unwrap();
        let context = json!({
            "project_name": "remote",
            "log_level": "INFO",
            "transport": "stdio",
            "host": "localhost",
            "port": 8000,
            "env_vars": [
                {"name": "API_TOKEN", "description": "Bearer token", "example": "changeme"}
            ],
        });
        let env = engine.render_template(ENV_EXAMPLE_TEMPLATE, &context).unwrap();
        assert!(env.contains("API_TOKEN=changeme"));
    }
}
