//! Placeholder rendering for subject and body templates.
//!
//! Templates use `{{ name }}` placeholders substituted from a JSON
//! context. A name missing from the context renders as an empty string,
//! which is the forgiving behavior template authors expect from a
//! preview. An opening `{{` with no closing `}}` is a hard error so the
//! admin surfaces the typo instead of mailing it.

use serde_json::{Map, Value};
use thiserror::Error;

/// Rendering context: named values substituted into placeholders.
pub type RenderContext = Map<String, Value>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("unterminated placeholder starting at byte {0}")]
    UnterminatedPlaceholder(usize),
}

/// Render a template string against a context.
pub fn render(template: &str, context: &RenderContext) -> Result<String, RenderError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut consumed = 0;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            return Err(RenderError::UnterminatedPlaceholder(consumed + start));
        };

        let name = after_open[..end].trim();
        if let Some(value) = context.get(name) {
            push_value(&mut out, value);
        }

        let advance = start + 2 + end + 2;
        consumed += advance;
        rest = &rest[advance..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Parse `key=value` pairs into a context. Used by the console front end
/// and the preview context box in the GUI.
pub fn context_from_pairs<'a>(pairs: impl IntoIterator<Item = &'a str>) -> RenderContext {
    let mut context = RenderContext::new();
    for pair in pairs {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        match pair.split_once('=') {
            Some((key, value)) => {
                context.insert(
                    key.trim().to_string(),
                    Value::String(value.trim().to_string()),
                );
            }
            None => {
                context.insert(pair.to_string(), Value::Bool(true));
            }
        }
    }
    context
}

fn push_value(out: &mut String, value: &Value) {
    match value {
        Value::String(s) => out.push_str(s),
        Value::Null => {}
        other => out.push_str(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> RenderContext {
        let mut map = RenderContext::new();
        map.insert("hello".to_string(), json!("*HELLO*"));
        map.insert("world".to_string(), json!("*WORLD*"));
        map.insert("count".to_string(), json!(3));
        map
    }

    #[test]
    fn substitutes_placeholders() {
        let rendered = render("Test 1 Subject {{ hello }}", &context()).unwrap();
        assert_eq!(rendered, "Test 1 Subject *HELLO*");
    }

    #[test]
    fn whitespace_inside_placeholders_is_tolerated() {
        let rendered = render("{{hello}} and {{  world  }}", &context()).unwrap();
        assert_eq!(rendered, "*HELLO* and *WORLD*");
    }

    #[test]
    fn missing_names_render_empty() {
        let rendered = render("Dear {{ name }},", &context()).unwrap();
        assert_eq!(rendered, "Dear ,");
    }

    #[test]
    fn non_string_values_are_stringified() {
        let rendered = render("{{ count }} items", &context()).unwrap();
        assert_eq!(rendered, "3 items");
    }

    #[test]
    fn unterminated_placeholder_is_an_error() {
        let err = render("hello {{ world", &context()).unwrap_err();
        assert_eq!(err, RenderError::UnterminatedPlaceholder(6));
    }

    #[test]
    fn plain_text_passes_through() {
        let rendered = render("no placeholders here", &context()).unwrap();
        assert_eq!(rendered, "no placeholders here");
    }

    #[test]
    fn pairs_parse_into_a_context() {
        let context = context_from_pairs(["user=Ada", "beta", " plan = pro "]);
        assert_eq!(context.get("user"), Some(&json!("Ada")));
        assert_eq!(context.get("beta"), Some(&json!(true)));
        assert_eq!(context.get("plan"), Some(&json!("pro")));
    }
}
