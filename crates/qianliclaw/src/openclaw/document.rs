//! Typed wrapper around the untyped OpenClaw config.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Returned when a JSON value other than an object is offered as a config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("config must be a JSON object, got {0}")]
pub struct NotAnObject(pub &'static str);

/// The OpenClaw config: a JSON object with arbitrary contents.
///
/// Only the paths the console reads have accessors. Everything else is kept
/// as plain JSON and written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument(Map<String, Value>);

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// `agents.defaults.workspace`, trimmed. `None` when absent, not a string or blank.
    pub fn default_workspace(&self) -> Option<&str> {
        let Some(Value::Object(agents)) = self.0.get("agents") else {
            return None;
        };
        let Some(Value::Object(defaults)) = agents.get("defaults") else {
            return None;
        };
        match defaults.get("workspace") {
            Some(Value::String(workspace)) => {
                let workspace = workspace.trim();
                (!workspace.is_empty()).then_some(workspace)
            }
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for ConfigDocument {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for ConfigDocument {
    type Error = NotAnObject;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(NotAnObject(json_kind(&other))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> ConfigDocument {
        ConfigDocument::try_from(value).unwrap()
    }

    #[test]
    fn test_rejects_non_objects() {
        assert_eq!(
            ConfigDocument::try_from(json!([1, 2])),
            Err(NotAnObject("an array"))
        );
        assert_eq!(ConfigDocument::try_from(json!("x")), Err(NotAnObject("a string")));
        assert_eq!(ConfigDocument::try_from(Value::Null), Err(NotAnObject("null")));
    }

    #[test]
    fn test_default_workspace_present() {
        let config = doc(json!({ "agents": { "defaults": { "workspace": "  ~/clawd  " } } }));
        assert_eq!(config.default_workspace(), Some("~/clawd"));
    }

    #[test]
    fn test_default_workspace_missing_or_wrong_type() {
        let cases = [
            json!({}),
            json!({ "agents": [] }),
            json!({ "agents": { "defaults": "x" } }),
            json!({ "agents": { "defaults": {} } }),
            json!({ "agents": { "defaults": { "workspace": 7 } } }),
            json!({ "agents": { "defaults": { "workspace": null } } }),
            json!({ "agents": { "defaults": { "workspace": "   " } } }),
        ];
        for case in cases {
            assert_eq!(doc(case.clone()).default_workspace(), None, "case: {case}");
        }
    }

    #[test]
    fn test_serializes_transparently() {
        let config = doc(json!({ "gateway": { "port": 18789 } }));
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({ "gateway": { "port": 18789 } })
        );
    }
}
