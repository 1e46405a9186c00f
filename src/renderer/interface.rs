/// Trait for template rendering engines.
///
/// Errors are returned as raw `minijinja::Error`s so callers can attach the
/// backend and template that failed.
pub trait TemplateRenderer {
    /// Adds a template to the renderer's template collection.
    ///
    /// # Arguments
    /// * `name` - Name to identify the template
    /// * `template` - Template content as string
    fn add_template(&mut self, name: &str, template: &str) -> Result<(), minijinja::Error>;

    /// Renders a previously registered template by name.
    fn render_template(
        &self,
        name: &str,
        context: &serde_json::Value,
    ) -> Result<String, minijinja::Error>;

    /// Executes a template expression and returns whether it evaluates to true.
    /// An empty expression is always true.
    fn execute_expression(
        &self,
        expr: &str,
        context: &serde_json::Value,
    ) -> Result<bool, minijinja::Error>;
}
