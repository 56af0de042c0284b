//! Output formatting: JSON, compact JSON, YAML.
//!
//! Responses stay loosely typed (`serde_json::Value`), so every format is
//! a straight serde rendering.

use std::io::{self, Write};

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Render any serializable value in the chosen format.
pub fn render<T: Serialize + ?Sized>(format: OutputFormat, data: &T) -> Result<String, CliError> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
    };
    Ok(rendered)
}

/// Print rendered output to stdout.
pub fn print_output(output: &str) -> Result<(), CliError> {
    if output.is_empty() {
        return Ok(());
    }
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", output.trim_end())?;
    stdout.flush()?;
    Ok(())
}

/// Render and print in one step.
pub fn emit<T: Serialize + ?Sized>(format: OutputFormat, data: &T) -> Result<(), CliError> {
    print_output(&render(format, data)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn formats() {
        let data = json!({"name": "web01", "state": 0});
        assert_eq!(
            render(OutputFormat::JsonCompact, &data).unwrap(),
            r#"{"name":"web01","state":0}"#
        );
        assert!(render(OutputFormat::Json, &data).unwrap().contains("\n  \"name\""));
        assert!(render(OutputFormat::Yaml, &data).unwrap().contains("name: web01"));
    }
}
