//! This module provides encoding functionality for converting automaton definitions back into
//! the `.dfa` text format, JSON, YAML, or XML, and for writing them to disk.

use crate::automaton::AutomatonDefinition;
use crate::catalog::Catalog;
use crate::loader::Format;
use crate::types::{AutomatonError, Symbol};
use crate::xml;
use std::fs;
use std::path::{Path, PathBuf};

/// Encodes an automaton into the `.dfa` text format.
///
/// Sets and transitions are written in sorted order, so encoding is deterministic.
/// Symbols that would be ambiguous in the text format are single-quoted.
///
/// # Returns
///
/// * `Ok(String)` - the encoded definition.
/// * `Err(AutomatonError::FormatError)` if a state label or the name cannot be
///   represented in the text format.
pub fn encode_text(automaton: &AutomatonDefinition) -> Result<String, AutomatonError> {
    let mut lines = Vec::new();

    if let Some(name) = automaton.name() {
        if name.contains(['#', '\n', '\r']) || name.trim().is_empty() {
            return Err(AutomatonError::FormatError(format!(
                "Name {name:?} cannot be written in the text format"
            )));
        }
        lines.push(format!("name: {}", name.trim()));
    }

    for state in automaton.states() {
        check_label(state)?;
    }

    lines.push(format!("states: {}", join(automaton.states().iter().cloned())));
    lines.push(format!(
        "alphabet: {}",
        join(automaton.alphabet().iter().map(|&symbol| encode_symbol(symbol)))
    ));
    lines.push(format!("start: {}", automaton.initial_state()));
    lines.push(format!(
        "accept: {}",
        join(automaton.accepting_states().iter().cloned())
    ));
    lines.push("delta:".to_string());

    for (from, symbol, to) in automaton.transitions() {
        lines.push(format!("  {}, {} -> {}", from, encode_symbol(symbol), to));
    }

    Ok(lines.join("\n") + "\n")
}

/// Encodes an automaton into pretty-printed JSON with the `Q`/`Sigma`/`q0`/`F`/`delta` fields.
pub fn encode_json(automaton: &AutomatonDefinition) -> Result<String, AutomatonError> {
    serde_json::to_string_pretty(&automaton.to_data())
        .map_err(|e| AutomatonError::FormatError(e.to_string()))
}

/// Encodes an automaton as YAML, using the same field names as JSON.
pub fn encode_yaml(automaton: &AutomatonDefinition) -> Result<String, AutomatonError> {
    serde_yaml::to_string(&automaton.to_data())
        .map_err(|e| AutomatonError::FormatError(e.to_string()))
}

/// Encodes an automaton as an `<AFD>` XML document.
pub fn encode_xml(automaton: &AutomatonDefinition) -> Result<String, AutomatonError> {
    xml::to_string(&automaton.to_data())
}

/// Encodes an automaton in the given format.
pub fn encode(automaton: &AutomatonDefinition, format: Format) -> Result<String, AutomatonError> {
    match format {
        Format::Text => encode_text(automaton),
        Format::Json => encode_json(automaton),
        Format::Yaml => encode_yaml(automaton),
        Format::Xml => encode_xml(automaton),
    }
}

/// Writes an automaton to `path`, choosing the format from the file extension.
pub fn write(automaton: &AutomatonDefinition, path: &Path) -> Result<(), AutomatonError> {
    let format = Format::from_path(path).ok_or_else(|| Format::unsupported(path))?;

    fs::write(path, encode(automaton, format)?).map_err(|e| {
        AutomatonError::FileError(format!("Failed to write file {}: {}", path.display(), e))
    })
}

/// Writes every catalog automaton into `directory`, once per format.
///
/// File names are derived from the automaton names (`ends-in-01.dfa`, `ends-in-01.json`,
/// `ends-in-01.yaml`, `ends-in-01.xml`, ...).
/// The directory is created if needed.
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - the written files, in catalog order.
pub fn write_examples(directory: &Path) -> Result<Vec<PathBuf>, AutomatonError> {
    fs::create_dir_all(directory).map_err(|e| {
        AutomatonError::FileError(format!(
            "Failed to create directory {}: {}",
            directory.display(),
            e
        ))
    })?;

    let mut written = Vec::new();

    for automaton in Catalog::all() {
        let stem = file_stem(automaton.name().unwrap_or("automaton"));

        for format in Format::ALL {
            let path = directory.join(format!("{}.{}", stem, format.extension()));
            write(automaton, &path)?;
            tracing::debug!(path = %path.display(), "wrote example automaton");
            written.push(path);
        }
    }

    Ok(written)
}

/// Quotes symbols that would otherwise be read as separators, comments, or whitespace.
fn encode_symbol(symbol: Symbol) -> String {
    if symbol.is_whitespace() || matches!(symbol, ',' | '\'' | '#') {
        format!("'{}'", symbol)
    } else {
        symbol.to_string()
    }
}

/// Checks that a state label matches the text format's label syntax.
fn check_label(label: &str) -> Result<(), AutomatonError> {
    let valid = !label.is_empty()
        && label
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '.');

    if !valid {
        return Err(AutomatonError::FormatError(format!(
            "State {label:?} cannot be written in the text format"
        )));
    }

    Ok(())
}

/// Turns a display name into a lowercase, dash-separated file stem.
fn file_stem(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

fn join(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{ends_in_01, even_a};
    use crate::loader::AutomatonLoader;
    use crate::parser::parse;
    use crate::types::Mode;
    use tempfile::tempdir;

    #[test]
    fn test_encode_text() {
        let automaton = ends_in_01().build().unwrap();
        let text = encode_text(&automaton).unwrap();

        assert!(text.starts_with("name: Ends in 01\n"));
        assert!(text.contains("states: q0, q1, q2\n"));
        assert!(text.contains("alphabet: 0, 1\n"));
        assert!(text.contains("start: q0\n"));
        assert!(text.contains("accept: q2\n"));
        assert!(text.contains("  q1, 1 -> q2\n"));
    }

    #[test]
    fn test_encoded_text_parses_back() {
        for automaton in [ends_in_01().build().unwrap(), even_a().build().unwrap()] {
            let text = encode_text(&automaton).unwrap();
            assert_eq!(parse(&text).unwrap(), automaton);
        }
    }

    #[test]
    fn test_encode_quotes_special_symbols() {
        let automaton = AutomatonDefinition::builder()
            .states(["s"])
            .alphabet([' ', ',', '#', 'x'])
            .initial("s")
            .transition("s", ',', "s")
            .build()
            .unwrap();

        let text = encode_text(&automaton).unwrap();
        assert!(text.contains("alphabet: ' ', '#', ',', x\n"));
        assert!(text.contains("  s, ',' -> s\n"));
        assert_eq!(parse(&text).unwrap(), automaton);
    }

    #[test]
    fn test_encode_rejects_unrepresentable_label() {
        let automaton = AutomatonDefinition::builder()
            .states(["has space"])
            .alphabet(['x'])
            .initial("has space")
            .build()
            .unwrap();

        assert!(matches!(
            encode_text(&automaton),
            Err(AutomatonError::FormatError(_))
        ));
        // JSON has no such restriction.
        assert!(encode_json(&automaton).is_ok());
    }

    #[test]
    fn test_encode_json() {
        let automaton = ends_in_01().build().unwrap();
        let json = encode_json(&automaton).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["q0"], "q0");
        assert_eq!(value["F"], serde_json::json!(["q2"]));
        assert_eq!(value["delta"][0], serde_json::json!(["q0", "0", "q1"]));
    }

    #[test]
    fn test_encoded_yaml_loads_back() {
        let automaton = ends_in_01().build().unwrap();
        let yaml = encode_yaml(&automaton).unwrap();

        assert!(yaml.contains("name: Ends in 01"));
        let loaded = AutomatonLoader::load_from_string(&yaml, Format::Yaml, Mode::Strict).unwrap();
        assert_eq!(loaded, automaton);
    }

    #[test]
    fn test_write_and_load_back() {
        let dir = tempdir().unwrap();
        let automaton = even_a().build().unwrap();

        for name in ["even.dfa", "even.json", "even.yaml", "even.xml"] {
            let path = dir.path().join(name);
            write(&automaton, &path).unwrap();
            assert_eq!(AutomatonLoader::load(&path, Mode::Strict).unwrap(), automaton);
        }

        let result = write(&automaton, &dir.path().join("even.txt"));
        assert!(matches!(result, Err(AutomatonError::FileError(_))));
    }

    #[test]
    fn test_write_examples() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("samples");

        let written = write_examples(&target).unwrap();
        assert_eq!(written.len(), Catalog::count() * Format::ALL.len());
        for extension in ["dfa", "json", "yaml", "xml"] {
            assert!(target.join(format!("ends-in-01.{extension}")).exists());
        }

        let loaded = AutomatonLoader::load_all(&target, Mode::Strict);
        assert_eq!(loaded.len(), written.len());
        assert!(loaded.iter().all(Result::is_ok));
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("Ends in 01"), "ends-in-01");
        assert_eq!(file_stem("Binary multiple of 3!"), "binary-multiple-of-3");
    }
}
