//! Built-in form element renderers.

use crate::core::context::RenderContext;
use crate::core::plugin::{InputStyle, RenderInput, Renderer};
use crate::core::types::{Attribs, Value};
use crate::plugins::kinds::RendererKind;
use crate::plugins::registry::TypeRegistry;
use std::sync::Arc;

/// Register built-in renderers.
pub fn register(registry: &mut TypeRegistry<RendererKind>) {
    registry.register(FormText::TYPE_NAME, "Single-line text input", |_| {
        Ok(Box::new(FormText::default()))
    });
    registry.register(FormPassword::TYPE_NAME, "Password input, value never echoed", |_| {
        Ok(Box::new(FormPassword::default()))
    });
    registry.register(FormHidden::TYPE_NAME, "Hidden input", |_| {
        Ok(Box::new(FormHidden::default()))
    });
    registry.register(FormTextarea::TYPE_NAME, "Multi-line text area", |_| {
        Ok(Box::new(FormTextarea::default()))
    });
    registry.register(FormCheckbox::TYPE_NAME, "Checkbox posting 0 or 1", |_| {
        Ok(Box::new(FormCheckbox::default()))
    });
    registry.register(FormSelect::TYPE_NAME, "Drop-down list of choices", |_| {
        Ok(Box::new(FormSelect::default()))
    });
    registry.register(FormRadio::TYPE_NAME, "Radio button group of choices", |_| {
        Ok(Box::new(FormRadio::default()))
    });
    registry.register(PlainSpan::TYPE_NAME, "Read-only value in a span", |_| {
        Ok(Box::new(PlainSpan::default()))
    });
}

/// Split the element id out of the attributes, deriving it from the name when absent.
fn split_id(view: &RenderContext, name: &str, attribs: &Attribs) -> (String, Attribs) {
    let mut rest = attribs.clone();
    let id = match rest.shift_remove("id") {
        Some(id) if !id.is_blank() => id.to_text(),
        _ => view.id_from_name(name),
    };
    (id, rest)
}

/// `<input type="..." name="..." id="..." value="..." ...>`
fn input_tag(view: &RenderContext, kind: &str, input: &RenderInput<'_>, value: Option<&Value>) -> String {
    let (id, attribs) = split_id(view, input.name, input.attribs);
    let mut out = format!(
        "<input type=\"{}\" name=\"{}\" id=\"{}\"",
        kind,
        view.escape(input.name),
        view.escape(&id)
    );
    if let Some(value) = value {
        out.push_str(&format!(" value=\"{}\"", view.escape(&value.to_text())));
    }
    out.push_str(&view.html_attribs(&attribs));
    out.push_str(view.tag_close());
    out
}

macro_rules! input_renderer {
    ($(#[$meta:meta])* $name:ident, $type_name:literal, $kind:literal, $echo:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default)]
        pub struct $name {
            view: Arc<RenderContext>,
        }

        impl $name {
            /// Canonical type name.
            pub const TYPE_NAME: &'static str = $type_name;
        }

        impl Renderer for $name {
            fn type_name(&self) -> &str {
                Self::TYPE_NAME
            }

            fn set_view(&mut self, view: Arc<RenderContext>) {
                self.view = view;
            }

            fn render(&self, input: &RenderInput<'_>) -> String {
                let value = if $echo { Some(input.value) } else { None };
                input_tag(&self.view, $kind, input, value)
            }
        }
    };
}

input_renderer!(
    /// Single-line text input.
    FormText,
    "view::FormText",
    "text",
    true
);

input_renderer!(
    /// Password input; the value is never written into the markup.
    FormPassword,
    "view::FormPassword",
    "password",
    false
);

input_renderer!(
    /// Hidden input.
    FormHidden,
    "view::FormHidden",
    "hidden",
    true
);

/// Multi-line text area, 24 rows by 80 columns unless overridden.
#[derive(Debug, Clone, Default)]
pub struct FormTextarea {
    view: Arc<RenderContext>,
}

impl FormTextarea {
    /// Canonical type name.
    pub const TYPE_NAME: &'static str = "view::FormTextarea";
}

impl Renderer for FormTextarea {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn set_view(&mut self, view: Arc<RenderContext>) {
        self.view = view;
    }

    fn render(&self, input: &RenderInput<'_>) -> String {
        let (id, mut attribs) = split_id(&self.view, input.name, input.attribs);
        attribs.entry("rows".to_string()).or_insert(Value::from(24));
        attribs.entry("cols".to_string()).or_insert(Value::from(80));
        format!(
            "<textarea name=\"{}\" id=\"{}\"{}>{}</textarea>",
            self.view.escape(input.name),
            self.view.escape(&id),
            self.view.html_attribs(&attribs),
            self.view.escape(&input.value.to_text())
        )
    }
}

/// Checkbox preceded by a hidden `0` so an unchecked box still posts a value.
#[derive(Debug, Clone, Default)]
pub struct FormCheckbox {
    view: Arc<RenderContext>,
}

impl FormCheckbox {
    /// Canonical type name.
    pub const TYPE_NAME: &'static str = "view::FormCheckbox";
}

impl Renderer for FormCheckbox {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn set_view(&mut self, view: Arc<RenderContext>) {
        self.view = view;
    }

    fn input_style(&self) -> InputStyle {
        InputStyle::Checkbox
    }

    fn render(&self, input: &RenderInput<'_>) -> String {
        let hidden = format!(
            "<input type=\"hidden\" name=\"{}\" value=\"0\"{}",
            self.view.escape(input.name),
            self.view.tag_close()
        );
        hidden + &input_tag(&self.view, "checkbox", input, Some(input.value))
    }
}

/// Drop-down list; the option matching the value is selected.
#[derive(Debug, Clone, Default)]
pub struct FormSelect {
    view: Arc<RenderContext>,
}

impl FormSelect {
    /// Canonical type name.
    pub const TYPE_NAME: &'static str = "view::FormSelect";
}

/// Whether a choice key matches the current value (or one of a list of values).
fn is_selected(key: &str, value: &Value) -> bool {
    let key = Value::from(key);
    match value {
        Value::List(items) => items.iter().any(|item| !item.is_null() && item.loose_eq(&key)),
        Value::Null => false,
        other => other.loose_eq(&key),
    }
}

impl Renderer for FormSelect {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn set_view(&mut self, view: Arc<RenderContext>) {
        self.view = view;
    }

    fn input_style(&self) -> InputStyle {
        InputStyle::Choice
    }

    fn render(&self, input: &RenderInput<'_>) -> String {
        let (id, attribs) = split_id(&self.view, input.name, input.attribs);
        let mut out = format!(
            "<select name=\"{}\" id=\"{}\"{}>\n",
            self.view.escape(input.name),
            self.view.escape(&id),
            self.view.html_attribs(&attribs)
        );
        for (key, label) in input.choices.into_iter().flatten() {
            let selected = if is_selected(key, input.value) {
                " selected=\"selected\""
            } else {
                ""
            };
            out.push_str(&format!(
                "    <option value=\"{}\"{}>{}</option>\n",
                self.view.escape(key),
                selected,
                self.view.escape(label)
            ));
        }
        out.push_str("</select>");
        out
    }
}

/// Radio button group, one labelled input per choice.
#[derive(Debug, Clone, Default)]
pub struct FormRadio {
    view: Arc<RenderContext>,
}

impl FormRadio {
    /// Canonical type name.
    pub const TYPE_NAME: &'static str = "view::FormRadio";
}

impl Renderer for FormRadio {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn set_view(&mut self, view: Arc<RenderContext>) {
        self.view = view;
    }

    fn input_style(&self) -> InputStyle {
        InputStyle::Choice
    }

    fn render(&self, input: &RenderInput<'_>) -> String {
        let (id, attribs) = split_id(&self.view, input.name, input.attribs);
        let listsep = match input.listsep {
            Some(sep) => sep.to_string(),
            None => self.view.listsep(),
        };
        let attribs = self.view.html_attribs(&attribs);

        let radios: Vec<String> = input
            .choices
            .into_iter()
            .flatten()
            .map(|(key, label)| {
                let option_id = format!("{}-{}", id, self.view.id_from_name(key));
                let checked = if is_selected(key, input.value) {
                    " checked=\"checked\""
                } else {
                    ""
                };
                format!(
                    "<label for=\"{id}\"><input type=\"radio\" name=\"{name}\" id=\"{id}\" value=\"{value}\"{checked}{attribs}{close}{label}</label>",
                    id = self.view.escape(&option_id),
                    name = self.view.escape(input.name),
                    value = self.view.escape(key),
                    checked = checked,
                    attribs = attribs,
                    close = self.view.tag_close(),
                    label = self.view.escape(label),
                )
            })
            .collect();
        radios.join(&listsep)
    }
}

/// Read-only value wrapped in a `<span>`.
#[derive(Debug, Clone, Default)]
pub struct PlainSpan {
    view: Arc<RenderContext>,
}

impl PlainSpan {
    /// Canonical type name.
    pub const TYPE_NAME: &'static str = "view::PlainSpan";
}

impl Renderer for PlainSpan {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn set_view(&mut self, view: Arc<RenderContext>) {
        self.view = view;
    }

    fn render(&self, input: &RenderInput<'_>) -> String {
        format!(
            "<span{}>{}</span>",
            self.view.html_attribs(input.attribs),
            self.view.escape(&input.value.to_text())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::Doctype;
    use crate::core::types::Choices;

    fn render(renderer: &dyn Renderer, value: Value, attribs: Attribs, choices: Option<&Choices>) -> String {
        renderer.render(&RenderInput {
            name: "color",
            value: &value,
            attribs: &attribs,
            choices,
            listsep: Some(" "),
        })
    }

    fn choices() -> Choices {
        let mut choices = Choices::new();
        choices.insert("r".to_string(), "Red".to_string());
        choices.insert("g".to_string(), "Green".to_string());
        choices
    }

    #[test]
    fn test_form_text() {
        let html = render(&FormText::default(), Value::from("a&b"), Attribs::new(), None);
        assert_eq!(html, r#"<input type="text" name="color" id="color" value="a&amp;b">"#);
    }

    #[test]
    fn test_xhtml_and_custom_id() {
        let mut renderer = FormHidden::default();
        renderer.set_view(Arc::new(RenderContext::new(Doctype::Xhtml)));
        let mut attribs = Attribs::new();
        attribs.insert("id".to_string(), Value::from("c1"));
        attribs.insert("class".to_string(), Value::from("x"));
        let html = render(&renderer, Value::from(3), attribs, None);
        assert_eq!(html, r#"<input type="hidden" name="color" id="c1" value="3" class="x" />"#);
    }

    #[test]
    fn test_password_hides_value() {
        let html = render(&FormPassword::default(), Value::from("secret"), Attribs::new(), None);
        assert!(!html.contains("secret"));
    }

    #[test]
    fn test_textarea() {
        let mut attribs = Attribs::new();
        attribs.insert("rows".to_string(), Value::from(3));
        let html = render(&FormTextarea::default(), Value::from("<p>"), attribs, None);
        assert_eq!(
            html,
            r#"<textarea name="color" id="color" rows="3" cols="80">&lt;p&gt;</textarea>"#
        );
    }

    #[test]
    fn test_checkbox() {
        let mut attribs = Attribs::new();
        attribs.insert("checked".to_string(), Value::from("checked"));
        let html = render(&FormCheckbox::default(), Value::from(1), attribs, None);
        assert_eq!(
            html,
            r#"<input type="hidden" name="color" value="0"><input type="checkbox" name="color" id="color" value="1" checked="checked">"#
        );
        assert_eq!(FormCheckbox::default().input_style(), InputStyle::Checkbox);
    }

    #[test]
    fn test_select() {
        let choices = choices();
        let html = render(&FormSelect::default(), Value::from("g"), Attribs::new(), Some(&choices));
        assert!(html.starts_with(r#"<select name="color" id="color">"#));
        assert!(html.contains(r#"<option value="r">Red</option>"#));
        assert!(html.contains(r#"<option value="g" selected="selected">Green</option>"#));
        assert!(html.ends_with("</select>"));
    }

    #[test]
    fn test_radio() {
        let choices = choices();
        let html = render(&FormRadio::default(), Value::from("r"), Attribs::new(), Some(&choices));
        assert_eq!(
            html,
            concat!(
                r#"<label for="color-r"><input type="radio" name="color" id="color-r" value="r" checked="checked">Red</label>"#,
                " ",
                r#"<label for="color-g"><input type="radio" name="color" id="color-g" value="g">Green</label>"#
            )
        );
    }

    #[test]
    fn test_plain_span() {
        let mut attribs = Attribs::new();
        attribs.insert("class".to_string(), Value::from("ro"));
        let html = render(&PlainSpan::default(), Value::from("<x>"), attribs, None);
        assert_eq!(html, r#"<span class="ro">&lt;x&gt;</span>"#);
    }
}
