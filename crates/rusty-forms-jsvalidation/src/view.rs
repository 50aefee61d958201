// File: src/view.rs
// Purpose: Render a ValidatorSpecification into page markup with Maud

use crate::error::Result;
use crate::specification::ValidatorSpecification;
use maud::{html, Markup, PreEscaped};
use std::collections::HashMap;
use std::sync::Arc;

/// Identifier of the builtin view
pub const DEFAULT_VIEW: &str = "jsvalidation::bootstrap";

/// Turns a specification into markup
pub trait View: Send + Sync {
    fn render(&self, specification: &ValidatorSpecification) -> Result<Markup>;
}

/// Embeds the specification as a JSON `<script>` block keyed by form selector
///
/// Output: `<script type="application/json" data-jsvalidation="form" data-view="...">{...}</script>`
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptView;

impl View for ScriptView {
    fn render(&self, specification: &ValidatorSpecification) -> Result<Markup> {
        let json = escape_script_json(&specification.to_json()?);

        Ok(html! {
            script type="application/json"
                data-jsvalidation=(specification.selector())
                data-view=(specification.view_template()) {
                (PreEscaped(json))
            }
        })
    }
}

/// Escape characters that could close the script element early
///
/// `<`, `>` and `&` only occur inside JSON strings, where `\u00XX` is a
/// valid replacement.
fn escape_script_json(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

/// View templates by identifier
#[derive(Clone)]
pub struct ViewRegistry {
    views: HashMap<String, Arc<dyn View>>,
}

impl Default for ViewRegistry {
    fn default() -> Self {
        let mut views: HashMap<String, Arc<dyn View>> = HashMap::new();
        views.insert(DEFAULT_VIEW.to_string(), Arc::new(ScriptView));
        Self { views }
    }
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a view
    pub fn register(&mut self, id: impl Into<String>, view: Arc<dyn View>) {
        self.views.insert(id.into(), view);
    }

    /// Find a view, falling back to the builtin one
    pub fn resolve(&self, id: &str) -> Arc<dyn View> {
        if let Some(view) = self.views.get(id) {
            return view.clone();
        }

        tracing::debug!("View {} not registered, using {}", id, DEFAULT_VIEW);
        self.views
            .get(DEFAULT_VIEW)
            .cloned()
            .unwrap_or_else(|| Arc::new(ScriptView))
    }

    pub fn render(&self, specification: &ValidatorSpecification) -> Result<Markup> {
        self.resolve(specification.view_template()).render(specification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specification::{FieldValidation, RuleSpec};
    use std::collections::BTreeMap;

    fn spec_with_message(message: &str, view: &str) -> ValidatorSpecification {
        ValidatorSpecification::new(
            vec![FieldValidation {
                field_name: "bio".to_string(),
                rules: vec![RuleSpec::new("max", vec!["200".to_string()], false)],
                messages: BTreeMap::from([("max".to_string(), message.to_string())]),
                display_name: "bio".to_string(),
            }],
            None,
            false,
            "#profile".to_string(),
            view.to_string(),
        )
    }

    #[test]
    fn test_script_view_output() {
        let spec = spec_with_message("Too long.", DEFAULT_VIEW);
        let html = ScriptView.render(&spec).unwrap().into_string();

        assert!(html.starts_with(
            r##"<script type="application/json" data-jsvalidation="#profile" data-view="jsvalidation::bootstrap">"##
        ));
        assert!(html.contains(r#""ruleName":"max""#));
        assert!(html.ends_with("</script>"));
    }

    #[test]
    fn test_script_view_escapes_closing_tag() {
        let spec = spec_with_message("</script><script>alert(1)</script>", DEFAULT_VIEW);
        let html = ScriptView.render(&spec).unwrap().into_string();

        assert_eq!(html.matches("</script>").count(), 1);
        assert!(html.contains("\\u003c/script\\u003e"));
    }

    struct FieldList;

    impl View for FieldList {
        fn render(&self, specification: &ValidatorSpecification) -> Result<Markup> {
            Ok(html! {
                ul {
                    @for field in specification.fields() {
                        li { (field.field_name) }
                    }
                }
            })
        }
    }

    #[test]
    fn test_registry_resolves_custom_and_falls_back() {
        let mut views = ViewRegistry::new();
        views.register("app::fields", Arc::new(FieldList));

        let custom = views.render(&spec_with_message("x", "app::fields")).unwrap();
        assert_eq!(custom.into_string(), "<ul><li>bio</li></ul>");

        let fallback = views.render(&spec_with_message("x", "missing::view")).unwrap();
        assert!(fallback.into_string().starts_with("<script"));
    }
}
