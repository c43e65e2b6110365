//! This module provides the `AutomatonLoader` struct, responsible for loading automaton
//! definitions from files, strings, and directories, in the `.dfa` text format, JSON, YAML, or XML.

use crate::automaton::{AutomatonDefinition, DefinitionData};
use crate::parser;
use crate::xml;
use crate::types::{AutomatonError, Mode, MAX_DEFINITION_SIZE};
use std::fs;
use std::path::{Path, PathBuf};

/// The on-disk formats an automaton definition can be stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// The `.dfa` text format.
    Text,
    /// The JSON `DefinitionData` shape.
    Json,
    /// The same shape as JSON, written as YAML.
    Yaml,
    /// An `<AFD>` XML document.
    Xml,
}

impl Format {
    /// Infers the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "dfa" => Some(Format::Text),
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            "xml" => Some(Format::Xml),
            _ => None,
        }
    }

    /// Returns the file extension used for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Text => "dfa",
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Xml => "xml",
        }
    }

    /// Every supported format, in the order example files are written.
    pub const ALL: [Format; 4] = [Format::Text, Format::Json, Format::Yaml, Format::Xml];

    pub(crate) fn unsupported(path: &Path) -> AutomatonError {
        AutomatonError::FileError(format!(
            "Unsupported file extension for {} (expected .dfa, .json, .yaml, .yml, or .xml)",
            path.display()
        ))
    }
}

/// `AutomatonLoader` is a utility struct for loading automaton definitions.
pub struct AutomatonLoader;

impl AutomatonLoader {
    /// Loads and validates a single definition from the specified file path.
    ///
    /// The format is chosen from the file extension (`.dfa`, `.json`, `.yaml`/`.yml`, or `.xml`).
    ///
    /// # Returns
    ///
    /// * `Ok(AutomatonDefinition)` if the file is read, parsed, and validated.
    /// * `Err(AutomatonError::FileError)` if the file cannot be read, is too large, or has an
    ///   unknown extension.
    /// * `Err(AutomatonError::ParseError)` / `Err(AutomatonError::FormatError)` on syntax errors.
    /// * `Err(AutomatonError::ValidationError)` if the automaton is not well-formed.
    pub fn load(path: &Path, mode: Mode) -> Result<AutomatonDefinition, AutomatonError> {
        let format = Format::from_path(path).ok_or_else(|| Format::unsupported(path))?;

        let content = read_definition(path)?;
        let automaton = Self::load_from_string(&content, format, mode)?;
        tracing::debug!(path = %path.display(), "loaded automaton");

        Ok(automaton)
    }

    /// Loads and validates a definition from string content in the given format.
    pub fn load_from_string(
        content: &str,
        format: Format,
        mode: Mode,
    ) -> Result<AutomatonDefinition, AutomatonError> {
        let data: DefinitionData = match format {
            Format::Text => return parser::parse_with(content, mode),
            Format::Json => serde_json::from_str(content)
                .map_err(|e| AutomatonError::FormatError(e.to_string()))?,
            Format::Yaml => serde_yaml::from_str(content)
                .map_err(|e| AutomatonError::FormatError(e.to_string()))?,
            Format::Xml => xml::from_str(content)?,
        };

        Ok(AutomatonDefinition::from_data(data, mode)?)
    }

    /// Loads every definition file with a supported extension in a directory.
    ///
    /// Directories and files with other extensions are skipped. Results are sorted by path.
    ///
    /// # Returns
    ///
    /// * `Vec<Result<(PathBuf, AutomatonDefinition), AutomatonError>>` - one entry per
    ///   candidate file, or a single `Err` if the directory cannot be read.
    pub fn load_all(
        directory: &Path,
        mode: Mode,
    ) -> Vec<Result<(PathBuf, AutomatonDefinition), AutomatonError>> {
        if !directory.exists() {
            return vec![Err(AutomatonError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(AutomatonError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut paths = Vec::new();
        let mut results = Vec::new();

        for entry in entries {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if !path.is_dir() && Format::from_path(&path).is_some() {
                        paths.push(path);
                    }
                }
                Err(e) => results.push(Err(AutomatonError::FileError(format!(
                    "Failed to read directory entry: {}",
                    e
                )))),
            }
        }

        paths.sort();

        results.extend(paths.into_iter().map(|path| match Self::load(&path, mode) {
            Ok(automaton) => Ok((path, automaton)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to load automaton");
                Err(AutomatonError::FileError(format!(
                    "Failed to load automaton from {}: {}",
                    path.display(),
                    e
                )))
            }
        }));

        results
    }
}

/// Reads a definition file, refusing files larger than `MAX_DEFINITION_SIZE`.
fn read_definition(path: &Path) -> Result<String, AutomatonError> {
    let metadata = fs::metadata(path).map_err(|e| {
        AutomatonError::FileError(format!("Failed to read file {}: {}", path.display(), e))
    })?;

    if metadata.len() > MAX_DEFINITION_SIZE as u64 {
        return Err(AutomatonError::FileError(format!(
            "File {} exceeds the maximum definition size of {} bytes",
            path.display(),
            MAX_DEFINITION_SIZE
        )));
    }

    fs::read_to_string(path).map_err(|e| {
        AutomatonError::FileError(format!("Failed to read file {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValidationError;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const TEXT: &str = "name: Even a\nstates: even, odd\nalphabet: a, b\nstart: even\naccept: even\ndelta:\n  even, a -> odd\n  even, b -> even\n  odd, a -> even\n  odd, b -> odd\n";

    const JSON: &str = r#"{
  "name": "Even a",
  "Q": ["even", "odd"],
  "Sigma": ["a", "b"],
  "q0": "even",
  "F": ["even"],
  "delta": [
    ["even", "a", "odd"],
    ["even", "b", "even"],
    ["odd", "a", "even"],
    ["odd", "b", "odd"]
  ]
}"#;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_text_and_json_agree() {
        let dir = tempdir().unwrap();
        let text_path = write_file(dir.path(), "even.dfa", TEXT);
        let json_path = write_file(dir.path(), "even.json", JSON);

        let from_text = AutomatonLoader::load(&text_path, Mode::Lenient).unwrap();
        let from_json = AutomatonLoader::load(&json_path, Mode::Lenient).unwrap();

        assert_eq!(from_text, from_json);
        assert!(from_json.accepts("abab").unwrap());
    }

    const YAML: &str = "name: Even a
Q:
- even
- odd
Sigma:
- a
- b
q0: even
F:
- even
delta:
- - even
  - a
  - odd
- - even
  - b
  - even
- - odd
  - a
  - even
- - odd
  - b
  - odd
";

    const XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<AFD name="Even a">
    <Q><state>even</state><state>odd</state></Q>
    <Sigma><symbol>a</symbol><symbol>b</symbol></Sigma>
    <q0>even</q0>
    <F><state>even</state></F>
    <delta>
        <transition><from>even</from><symbol>a</symbol><to>odd</to></transition>
        <transition><from>even</from><symbol>b</symbol><to>even</to></transition>
        <transition><from>odd</from><symbol>a</symbol><to>even</to></transition>
        <transition><from>odd</from><symbol>b</symbol><to>odd</to></transition>
    </delta>
</AFD>
"#;

    #[test]
    fn test_load_yaml_and_xml_agree_with_text() {
        let dir = tempdir().unwrap();
        let expected = AutomatonLoader::load(&write_file(dir.path(), "even.dfa", TEXT), Mode::Strict)
            .unwrap();

        for (name, content) in [("even.yaml", YAML), ("even.yml", YAML), ("even.xml", XML)] {
            let path = write_file(dir.path(), name, content);
            assert_eq!(
                AutomatonLoader::load(&path, Mode::Strict).unwrap(),
                expected,
                "{}",
                name
            );
        }
    }

    #[test]
    fn test_load_invalid_yaml() {
        let result = AutomatonLoader::load_from_string("Q: [", Format::Yaml, Mode::Lenient);
        assert!(matches!(result, Err(AutomatonError::FormatError(_))));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a.dfa")), Some(Format::Text));
        assert_eq!(Format::from_path(Path::new("a.yml")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("a.xml")), Some(Format::Xml));
        assert_eq!(Format::from_path(Path::new("a.txt")), None);
        assert_eq!(Format::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_load_json_without_name() {
        let json = r#"{"Q": ["s"], "Sigma": ["x"], "q0": "s", "F": [], "delta": [["s", "x", "s"]]}"#;
        let automaton = AutomatonLoader::load_from_string(json, Format::Json, Mode::Strict).unwrap();

        assert_eq!(automaton.name(), None);
        assert!(!automaton.accepts("x").unwrap());
    }

    #[test]
    fn test_load_invalid_json() {
        let result = AutomatonLoader::load_from_string("{\"Q\": [", Format::Json, Mode::Lenient);
        assert!(matches!(result, Err(AutomatonError::FormatError(_))));

        // Multi-character symbols are rejected by the deserializer.
        let json = r#"{"Q": ["s"], "Sigma": ["xy"], "q0": "s"}"#;
        let result = AutomatonLoader::load_from_string(json, Format::Json, Mode::Lenient);
        assert!(matches!(result, Err(AutomatonError::FormatError(_))));
    }

    #[test]
    fn test_load_json_validation_error() {
        let json = r#"{"Q": ["s"], "Sigma": ["x"], "q0": "s", "F": ["t"]}"#;
        let result = AutomatonLoader::load_from_string(json, Format::Json, Mode::Lenient);
        assert_eq!(
            result,
            Err(AutomatonError::ValidationError(
                ValidationError::UnknownAcceptingState("t".to_string())
            ))
        );
    }

    #[test]
    fn test_load_unknown_extension() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "even.txt", TEXT);

        let result = AutomatonLoader::load(&path, Mode::Lenient);
        assert!(matches!(result, Err(AutomatonError::FileError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = AutomatonLoader::load(&dir.path().join("missing.dfa"), Mode::Lenient);
        assert!(matches!(result, Err(AutomatonError::FileError(_))));
    }

    #[test]
    fn test_load_oversized_file() {
        let dir = tempdir().unwrap();
        let padding = "#".repeat(MAX_DEFINITION_SIZE);
        let path = write_file(dir.path(), "big.dfa", &format!("{padding}\n{TEXT}"));

        let error = AutomatonLoader::load(&path, Mode::Lenient).unwrap_err();
        assert!(error.to_string().contains("maximum definition size"));
    }

    #[test]
    fn test_load_all_from_directory() {
        let dir = tempdir().unwrap();

        write_file(dir.path(), "a.dfa", TEXT);
        write_file(dir.path(), "b.json", JSON);
        write_file(dir.path(), "c.dfa", "This is not a valid automaton");
        write_file(dir.path(), "d.yaml", YAML);
        write_file(dir.path(), "e.xml", XML);
        write_file(dir.path(), "ignored.txt", "This file should be ignored");
        fs::create_dir(dir.path().join("nested.dfa")).unwrap();

        let results = AutomatonLoader::load_all(dir.path(), Mode::Lenient);

        // We should have 5 results: 4 successes and 1 error, in path order
        assert_eq!(results.len(), 5);
        assert!(results[0].is_ok());
        assert!(results[1].is_ok());
        assert!(results[2].is_err());
        assert!(results[3].is_ok());
        assert!(results[4].is_ok());
    }

    #[test]
    fn test_load_all_missing_directory() {
        let dir = tempdir().unwrap();
        let results = AutomatonLoader::load_all(&dir.path().join("nope"), Mode::Lenient);

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(AutomatonError::FileError(_))));
    }
}
