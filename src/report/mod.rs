//! Renderers for an analyzed dependency graph.
//!
//! - [`tree`]: indented ASCII tree and the compact grouped listing.
//! - [`dot`]: Graphviz DOT source with legend and annotations.
//! - [`diagram`]: PNG / SVG images drawn natively with plotters.
//! - [`structured`]: the JSON / YAML dependency document.
//! - [`analysis`], [`health`], [`licenses`], [`security`]: the colored
//!   text reports behind the matching subcommands.
//!
//! Renderers return strings; [`emit`] decides where they go.

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use serde::Serialize;

pub mod analysis;
pub mod diagram;
pub mod dot;
pub mod health;
pub mod licenses;
pub mod security;
pub mod structured;
pub mod tree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

/// Serialize any report as a JSON or YAML document.
pub fn to_document<T: Serialize>(value: &T, format: DocumentFormat) -> Result<String> {
    match format {
        DocumentFormat::Json => {
            let mut json = serde_json::to_string_pretty(value).context("failed to encode JSON")?;
            json.push('\n');
            Ok(json)
        }
        DocumentFormat::Yaml => serde_yaml::to_string(value).context("failed to encode YAML"),
    }
}

/// Write `content` to `output`, or to stdout when no file is given.
/// Returns `true` when a file was written.
pub fn emit(content: &str, output: Option<&Path>) -> Result<bool> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(true)
        }
        None => {
            print!("{}", content);
            Ok(false)
        }
    }
}

/// A table in the house style with a bold header row.
pub(crate) fn table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    if !colored::control::SHOULD_COLORIZE.should_colorize() {
        table.force_no_tty();
    }
    table
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Serialize)]
    struct Doc {
        name: &'static str,
        count: usize,
    }

    #[test]
    fn test_documents() {
        let doc = Doc { name: "x", count: 2 };
        let json = to_document(&doc, DocumentFormat::Json).unwrap();
        assert!(json.ends_with("}\n"));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["count"], 2);

        let yaml = to_document(&doc, DocumentFormat::Yaml).unwrap();
        assert!(yaml.contains("name: x"));
    }

    #[test]
    fn test_emit_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        assert!(emit("hello\n", Some(&path)).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_emit_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        assert!(emit("x", Some(&path)).is_err());
    }
}
