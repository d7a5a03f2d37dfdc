//! Rendering context.
//!
//! Renderers do not decide escaping or markup dialect themselves; the
//! collection that builds them binds a shared [`RenderContext`] which
//! provides those helpers.

use crate::core::types::{Attribs, Value};
use serde::{Deserialize, Serialize};

/// Markup dialect, deciding how void elements are closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Doctype {
    /// `<input ...>`
    #[default]
    Html5,
    /// `<input ... />`
    Xhtml,
}

/// Shared helpers bound into every renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderContext {
    /// Markup dialect.
    pub doctype: Doctype,
    /// Separator placed between radio options when none is configured.
    pub default_listsep: Option<String>,
}

impl RenderContext {
    /// Create a context for the given dialect.
    pub fn new(doctype: Doctype) -> Self {
        Self {
            doctype,
            default_listsep: None,
        }
    }

    /// Escape text for use in element content and attribute values.
    pub fn escape(&self, text: &str) -> String {
        let mut escaped = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#039;"),
                _ => escaped.push(c),
            }
        }
        escaped
    }

    /// Closing of a void element for the current dialect.
    pub fn tag_close(&self) -> &'static str {
        match self.doctype {
            Doctype::Html5 => ">",
            Doctype::Xhtml => " />",
        }
    }

    /// Separator between radio options.
    pub fn listsep(&self) -> String {
        match &self.default_listsep {
            Some(sep) => sep.clone(),
            None => format!("<br{}\n", self.tag_close()),
        }
    }

    /// Serialize attributes as ` key="value"` pairs, in order.
    ///
    /// `true` renders as `key="key"`; `false` and null are omitted; lists
    /// are space-joined (class lists).
    pub fn html_attribs(&self, attribs: &Attribs) -> String {
        let mut out = String::new();
        for (key, value) in attribs {
            let text = match value {
                Value::Null | Value::Boolean(false) => continue,
                Value::Boolean(true) => key.clone(),
                Value::List(items) => items.iter().map(Value::to_text).collect::<Vec<_>>().join(" "),
                other => other.to_text(),
            };
            out.push(' ');
            out.push_str(&self.escape(key));
            out.push_str("=\"");
            out.push_str(&self.escape(&text));
            out.push('"');
        }
        out
    }

    /// Element id derived from an element name (`tags[]` → `tags`, `a[b]` → `a-b`).
    pub fn id_from_name(&self, name: &str) -> String {
        name.replace("[]", "").replace('[', "-").replace(']', "")
    }
}
