//! Built-in example automata, embedded in the binary.

use crate::automaton::AutomatonDefinition;
use crate::loader::{AutomatonLoader, Format};
use crate::types::{AutomatonError, Mode};

// Default embedded automata
const CATALOG_SOURCES: [(&str, Format); 3] = [
    (include_str!("../automata/ends-in-01.dfa"), Format::Text),
    (include_str!("../automata/even-a.dfa"), Format::Text),
    (include_str!("../automata/multiple-of-3.json"), Format::Json),
];

lazy_static::lazy_static! {
    // Each definition is kept next to the text it was loaded from.
    static ref CATALOG: Vec<(&'static str, AutomatonDefinition)> = CATALOG_SOURCES
        .iter()
        .filter_map(|&(source, format)| {
            AutomatonLoader::load_from_string(source, format, Mode::Strict)
                .map(|automaton| (source, automaton))
                .map_err(|e| tracing::warn!(error = %e, "failed to load built-in automaton"))
                .ok()
        })
        .collect();
}

/// Summary of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomatonInfo {
    pub index: usize,
    pub name: String,
    pub initial_state: String,
    pub state_count: usize,
    pub symbol_count: usize,
    pub accepting_count: usize,
    pub transition_count: usize,
}

pub struct Catalog;

impl Catalog {
    /// Get the number of available automata
    pub fn count() -> usize {
        CATALOG.len()
    }

    /// Iterate over every catalog automaton
    pub fn all() -> impl Iterator<Item = &'static AutomatonDefinition> {
        CATALOG.iter().map(|(_, automaton)| automaton)
    }

    /// Get an automaton by its index
    pub fn get(index: usize) -> Result<&'static AutomatonDefinition, AutomatonError> {
        CATALOG.get(index).map(|(_, automaton)| automaton).ok_or_else(|| {
            AutomatonError::NotFound(format!("Automaton index {} out of range", index))
        })
    }

    /// Get an automaton by its name (case-insensitive)
    pub fn get_by_name(name: &str) -> Result<&'static AutomatonDefinition, AutomatonError> {
        Self::all()
            .find(|automaton| {
                automaton
                    .name()
                    .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| AutomatonError::NotFound(format!("Automaton '{}' not found", name)))
    }

    /// List all automaton names
    pub fn names() -> Vec<String> {
        Self::all()
            .map(|automaton| automaton.name().unwrap_or_default().to_string())
            .collect()
    }

    /// Search for automata by name
    pub fn search(query: &str) -> Vec<usize> {
        let query = query.to_lowercase();

        Self::all()
            .enumerate()
            .filter(|(_, automaton)| {
                automaton
                    .name()
                    .is_some_and(|name| name.to_lowercase().contains(&query))
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Get the original source text of an automaton by its index
    pub fn source(index: usize) -> Result<&'static str, AutomatonError> {
        CATALOG
            .get(index)
            .map(|&(source, _)| source)
            .ok_or_else(|| {
                AutomatonError::NotFound(format!("Automaton source index {} out of range", index))
            })
    }

    /// Get information about an automaton by its index
    pub fn info(index: usize) -> Result<AutomatonInfo, AutomatonError> {
        let automaton = Self::get(index)?;

        Ok(AutomatonInfo {
            index,
            name: automaton.name().unwrap_or_default().to_string(),
            initial_state: automaton.initial_state().to_string(),
            state_count: automaton.states().len(),
            symbol_count: automaton.alphabet().len(),
            accepting_count: automaton.accepting_states().len(),
            transition_count: automaton.transition_count(),
        })
    }
}
