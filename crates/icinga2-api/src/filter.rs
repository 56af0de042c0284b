use serde::Serialize;
use serde_json::{Map, Value};

/// A server-side filter expression plus the variables it references.
///
/// Flattened into request payloads as `filter` and (when non-empty)
/// `filter_vars`:
///
/// ```
/// use icinga2_api::Filter;
///
/// let filter = Filter::new("host.vars.os == os").var("os", "Linux");
/// assert_eq!(
///     serde_json::to_value(&filter).unwrap(),
///     serde_json::json!({"filter": "host.vars.os == os", "filter_vars": {"os": "Linux"}}),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filter {
    #[serde(rename = "filter")]
    expression: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    filter_vars: Map<String, Value>,
}

impl Filter {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            filter_vars: Map::new(),
        }
    }

    /// Bind a variable referenced by the expression.
    pub fn var(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter_vars.insert(name.into(), value.into());
        self
    }

    /// Replace all bound variables at once.
    pub fn with_vars(mut self, vars: Map<String, Value>) -> Self {
        self.filter_vars = vars;
        self
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn vars(&self) -> &Map<String, Value> {
        &self.filter_vars
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.expression.trim().is_empty()
    }
}

impl From<&str> for Filter {
    fn from(expression: &str) -> Self {
        Self::new(expression)
    }
}

impl From<String> for Filter {
    fn from(expression: String) -> Self {
        Self::new(expression)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn vars_are_omitted_when_empty() {
        let filter = Filter::new(r#"match("web*", host.name)"#);
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({"filter": r#"match("web*", host.name)"#})
        );
    }

    #[test]
    fn blank_expressions_are_detected() {
        assert!(Filter::new("  ").is_blank());
        assert!(!Filter::from("host.name == \"a\"").is_blank());
    }
}
