use super::filters::*;
use crate::renderer::interface::TemplateRenderer;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde_json::json;

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
    /// Default context that will be merged with any provided context
    default_context: serde_json::Value,
}

impl MiniJinjaRenderer {
    /// Creates a new MiniJinjaRenderer tuned for emitting source code.
    ///
    /// Block tags swallow their own line, nothing is auto-escaped and
    /// referencing an undefined variable is an error.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);

        let default_context = json!({
            "generator": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            }
        });

        env.add_filter("py", py_literal_filter);
        env.add_filter("indent_to", indent_to);
        env.add_filter("snake_case", to_snake_case);
        env.add_filter("title_case", to_title_case);

        Self { env, default_context }
    }

    /// Merge the default context with the provided context
    fn merged_context(&self, context: &serde_json::Value) -> serde_json::Value {
        if let (Some(default_obj), Some(context_obj)) =
            (self.default_context.as_object(), context.as_object())
        {
            let mut result = default_obj.clone();
            for (key, value) in context_obj {
                result.insert(key.clone(), value.clone());
            }
            json!(result)
        } else {
            // If either isn't an object, just use the provided context
            context.clone()
        }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn add_template(&mut self, name: &str, template: &str) -> Result<(), minijinja::Error> {
        // Normalize the template name for cross-platform compatibility
        let normalized_name = name.replace("\\", "/");
        self.env.add_template_owned(normalized_name, template.to_string())
    }

    fn render_template(
        &self,
        name: &str,
        context: &serde_json::Value,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(self.merged_context(context))
    }

    fn execute_expression(
        &self,
        expr_str: &str,
        context: &serde_json::Value,
    ) -> Result<bool, minijinja::Error> {
        // Only compile the expression if it's not empty
        if expr_str.is_empty() {
            return Ok(true);
        }
        let expr = self.env.compile_expression(expr_str)?;
        Ok(expr.eval(context)?.is_true())
    }
}
