//! Shared helpers for command handlers.

use std::path::Path;

use serde_json::{Map, Value};

use icinga2_api::Filter;

use crate::cli::{FilterArgs, RequiredFilterArgs};
use crate::error::CliError;

/// Build a filter from `--filter` / `--filter-var`, if a filter was given.
pub fn optional_filter(args: FilterArgs) -> Option<Filter> {
    args.filter
        .map(|expression| with_vars(Filter::new(expression), args.filter_vars))
}

pub fn required_filter(args: RequiredFilterArgs) -> Filter {
    with_vars(Filter::new(args.filter), args.filter_vars)
}

fn with_vars(filter: Filter, vars: Vec<(String, Value)>) -> Filter {
    vars.into_iter()
        .fold(filter, |filter, (name, value)| filter.var(name, value))
}

/// Read and parse a JSON object file for `--from-file` flags.
pub fn read_json_object(path: &Path) -> Result<Map<String, Value>, CliError> {
    let contents = std::fs::read_to_string(path)?;
    match serde_json::from_str(&contents)? {
        Value::Object(map) => Ok(map),
        other => Err(CliError::Validation {
            message: format!(
                "{}: expected a JSON object, got {}",
                path.display(),
                type_name(&other)
            ),
        }),
    }
}

/// Merge a `--from-file` object with `--attr` pairs; pairs win.
pub fn collect_attrs(
    from_file: Option<&Path>,
    pairs: Vec<(String, Value)>,
) -> Result<Map<String, Value>, CliError> {
    let mut attrs = match from_file {
        Some(path) => read_json_object(path)?,
        None => Map::new(),
    };
    attrs.extend(pairs);
    Ok(attrs)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
