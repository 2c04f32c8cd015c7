//! Output formatting for CLI commands.

use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format.
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
}

/// Print data in the specified format.
pub fn print_output<T: Serialize + Tabled>(data: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                println!("{}", "No items found.".dimmed());
            } else {
                let table = Table::new(data).to_string();
                println!("{}", table);
            }
        }
        OutputFormat::Json => {
            let json = format_json(data, "[]");
            println!("{}", json);
        }
    }
}

/// Print a single item as JSON regardless of format.
pub fn print_single<T: Serialize>(data: &T, _format: OutputFormat) {
    let json = format_json(data, "{}");
    println!("{}", json);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "Success:".green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", "Info:".blue().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", "Warning:".yellow().bold(), message);
}

fn format_json<T: Serialize + ?Sized>(data: &T, fallback: &str) -> String {
    let value = serde_json::to_value(data).unwrap_or_else(|_| serde_json::json!({}));
    let sorted = sort_json_value(value);
    serde_json::to_string_pretty(&sorted).unwrap_or_else(|_| fallback.to_string())
}

fn sort_json_value(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Array(values) => {
            serde_json::Value::Array(values.into_iter().map(sort_json_value).collect())
        }
        serde_json::Value::Object(entries) => {
            let mut pairs: Vec<_> = entries.into_iter().collect();
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            let mut mapped = serde_json::Map::new();
            for (key, value) in pairs {
                mapped.insert(key, sort_json_value(value));
            }
            serde_json::Value::Object(mapped)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_json_sorts_keys_at_every_level() {
        let value = serde_json::json!({
            "zebra": 1,
            "apple": { "nested_z": true, "nested_a": false },
            "list": [{ "b": 2, "a": 1 }]
        });
        let formatted = format_json(&value, "{}");
        let apple = formatted.find("\"apple\"").unwrap();
        let zebra = formatted.find("\"zebra\"").unwrap();
        assert!(apple < zebra);
        let nested_a = formatted.find("\"nested_a\"").unwrap();
        let nested_z = formatted.find("\"nested_z\"").unwrap();
        assert!(nested_a < nested_z);
    }
}
