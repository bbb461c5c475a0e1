//! Action parameters merged from the query string and the JSON body.

use gateway_core::{Error, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Named action parameters. Body fields win over query parameters.
#[derive(Debug, Clone, Default)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges query parameters with a JSON body object.
    pub fn merge(query: HashMap<String, String>, body: Option<Map<String, Value>>) -> Self {
        let mut params: Map<String, Value> = query
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        if let Some(body) = body {
            params.extend(body);
        }
        Self(params)
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    /// Scalar parameter as trimmed text; blank counts as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        let text = match self.value(name)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        (!text.is_empty()).then_some(text)
    }

    /// First present parameter among aliases.
    pub fn text_of(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|name| self.text(name))
    }

    pub fn require(&self, name: &str) -> Result<String> {
        self.text(name).ok_or_else(|| Error::missing_param(name))
    }

    /// Like [`Params::require`], accepting any alias and reporting the first.
    pub fn require_of(&self, names: &[&str]) -> Result<String> {
        self.text_of(names)
            .ok_or_else(|| Error::missing_param(names.first().copied().unwrap_or("parameter")))
    }

    /// Lenient boolean: `true`, `"true"`, `"1"`, `1`.
    pub fn flag(&self, name: &str) -> bool {
        match self.value(name) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(Value::String(s)) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
            _ => false,
        }
    }

    /// Free-form value rendered for a sheet cell: objects and arrays as JSON.
    pub fn cell_text(&self, name: &str) -> String {
        match self.value(name) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Object(_)) | Some(Value::Array(_)) => self.0[name].to_string(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    /// The whole parameter set as a JSON object.
    pub fn as_object(&self) -> Value {
        Value::Object(self.0.clone())
    }
}
