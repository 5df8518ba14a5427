//! Minimal string-interpolation templates for page rendering.
//!
//! `{{ name }}` placeholders are replaced from a context map; `{{ name? }}`
//! renders as empty when the variable is unset. Deliberately lighter than a
//! template engine: the site has five views and no control flow.

use std::collections::HashMap;

use thiserror::Error;

/// Template rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A required variable was absent from the context.
    #[error("missing required variable: {0}")]
    MissingVariable(String),

    /// Malformed placeholder syntax.
    #[error("invalid template syntax: {0}")]
    InvalidSyntax(String),
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Variables available to one render.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
}

impl TemplateContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Builder-style insert.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a variable value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

/// Render `template`, replacing every `{{ name }}` placeholder from `context`.
pub fn render(template: &str, context: &TemplateContext) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or_else(|| TemplateError::InvalidSyntax("unclosed '{{'".to_string()))?;

        let name = after[..end].trim();
        let (name, optional) = match name.strip_suffix('?') {
            Some(stripped) => (stripped.trim_end(), true),
            None => (name, false),
        };

        match context.get(name) {
            Some(value) => out.push_str(value),
            None if optional => {}
            None => return Err(TemplateError::MissingVariable(name.to_string())),
        }

        rest = &after[end + 2..];
    }

    out.push_str(rest);
    Ok(out)
}
