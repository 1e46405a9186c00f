use minijinja::{Error, ErrorKind, Value};

// Case conversions used by the templates for identifiers and headings
pub use cruet::case::{snake::to_snake_case, title::to_title_case};

const INDENT_STEP: usize = 4;

/// Renders a JSON value as a Python literal.
///
/// `true`/`false`/`null` become `True`/`False`/`None`; strings use JSON escaping,
/// which Python accepts as-is. With `indent` set, non-empty objects and arrays
/// holding containers are spread over several lines, with the closing bracket
/// at `indent` columns.
///
/// ```
/// use modelctx::renderer::filters::to_python_literal;
/// use serde_json::json;
///
/// assert_eq!(to_python_literal(&json!({"flag": true}), None), r#"{"flag": True}"#);
/// ```
pub fn to_python_literal(value: &serde_json::Value, indent: Option<usize>) -> String {
    use serde_json::Value as Json;

    match value {
        Json::Null => "None".to_string(),
        Json::Bool(true) => "True".to_string(),
        Json::Bool(false) => "False".to_string(),
        Json::Number(n) => n.to_string(),
        Json::String(s) => quote(s),
        Json::Array(items) => {
            let nested = items.iter().any(|v| v.is_object() || v.is_array());
            match indent {
                Some(base) if nested => {
                    let inner = " ".repeat(base + INDENT_STEP);
                    let mut out = String::from("[\n");
                    for item in items {
                        out.push_str(&inner);
                        out.push_str(&to_python_literal(item, Some(base + INDENT_STEP)));
                        out.push_str(",\n");
                    }
                    out.push_str(&" ".repeat(base));
                    out.push(']');
                    out
                }
                _ => {
                    let parts: Vec<String> =
                        items.iter().map(|v| to_python_literal(v, None)).collect();
                    format!("[{}]", parts.join(", "))
                }
            }
        }
        Json::Object(map) => match indent {
            Some(base) if !map.is_empty() => {
                let inner = " ".repeat(base + INDENT_STEP);
                let mut out = String::from("{\n");
                for (key, item) in map {
                    out.push_str(&inner);
                    out.push_str(&quote(key));
                    out.push_str(": ");
                    out.push_str(&to_python_literal(item, Some(base + INDENT_STEP)));
                    out.push_str(",\n");
                }
                out.push_str(&" ".repeat(base));
                out.push('}');
                out
            }
            _ => {
                let parts: Vec<String> = map
                    .iter()
                    .map(|(k, v)| format!("{}: {}", quote(k), to_python_literal(v, None)))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }
        },
    }
}

fn quote(s: &str) -> String {
    // Serializing a str cannot fail.
    serde_json::to_string(s).unwrap_or_else(|_| format!("{s:?}"))
}

/// `py` template filter, see [`to_python_literal`].
pub fn py_literal_filter(value: Value, indent: Option<usize>) -> Result<String, Error> {
    let json = serde_json::to_value(&value).map_err(|e| {
        Error::new(ErrorKind::InvalidOperation, format!("cannot render as Python: {e}"))
    })?;
    Ok(to_python_literal(&json, indent))
}

/// Indents every non-blank line of `value` by exactly `width` spaces.
///
/// Trailing newlines are dropped so the surrounding template decides where the
/// block ends. Blank lines stay empty.
pub fn indent_to(value: String, width: usize) -> String {
    let prefix = " ".repeat(width);
    value
        .trim_end_matches('\n')
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
