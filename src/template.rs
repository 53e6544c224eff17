//! Template interpolation for YAML pipeline configs
//!
//! Handles `{{ env.NAME }}` and `{{ vars.name }}` placeholders in configuration
//! text. The context is assembled by the caller (the CLI snapshots the process
//! environment); nothing in here reads the environment on its own.

use crate::error::{Error, Result};
use crate::types::StringMap;
use regex::Regex;
use std::sync::LazyLock;

/// Regex for matching template variables: {{ root.name }}
static TEMPLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*)\s*\}\}").unwrap()
});

/// Context for template interpolation
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    /// Environment snapshot, addressed as `env.NAME`
    pub env: StringMap,
    /// Caller-provided variables, addressed as `vars.name`
    pub vars: StringMap,
}

impl TemplateContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context from an environment snapshot
    pub fn with_env<I, K, V>(env: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            env: env.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            vars: StringMap::new(),
        }
    }

    /// Set a single variable
    pub fn set_var(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Parse and set a `key=value` pair
    pub fn set_var_pair(&mut self, pair: &str) -> Result<&mut Self> {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| Error::template(format!("Expected key=value, got '{pair}'")))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::template(format!("Empty variable name in '{pair}'")));
        }
        Ok(self.set_var(key, value))
    }

    /// Get a value by path (e.g., "env.AWS_REGION")
    ///
    /// A bare name without a root is looked up in `vars` first, then `env`.
    pub fn get(&self, path: &str) -> Option<&str> {
        match path.split_once('.') {
            Some(("env", name)) => self.env.get(name).map(String::as_str),
            Some(("vars", name)) => self.vars.get(name).map(String::as_str),
            Some(_) => None,
            None => self
                .vars
                .get(path)
                .or_else(|| self.env.get(path))
                .map(String::as_str),
        }
    }
}

/// Render a template string with the given context
pub fn render(template: &str, ctx: &TemplateContext) -> Result<String> {
    let mut result = template.to_string();
    let mut errors = Vec::new();

    for cap in TEMPLATE_REGEX.captures_iter(template) {
        let full_match = cap.get(0).unwrap().as_str();
        let var_path = cap.get(1).unwrap().as_str();

        match ctx.get(var_path) {
            Some(value) => {
                result = result.replace(full_match, value);
            }
            None => {
                if !errors.iter().any(|e| e == var_path) {
                    errors.push(var_path.to_string());
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(result)
    } else {
        Err(Error::undefined_var(errors.join(", ")))
    }
}
