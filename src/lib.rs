//! This crate provides the core logic for a deterministic finite automaton (DFA) simulator.
//! It includes modules for defining and validating automata, applying the transition function,
//! running automata over input strings, loading and writing definitions (`.dfa`, JSON, YAML,
//! and XML), and a catalog of
//! built-in example automata.

pub mod automaton;
pub mod catalog;
pub mod encoder;
pub mod engine;
pub mod loader;
pub mod parser;
pub mod simulator;
pub mod types;
pub mod validator;
pub mod xml;

#[cfg(test)]
pub(crate) mod fixtures;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the automaton model and its builder.
pub use automaton::{AutomatonBuilder, AutomatonDefinition, DefinitionData};
/// Re-exports the built-in automata.
pub use catalog::{AutomatonInfo, Catalog};
/// Re-exports the encoding functions from the encoder module.
pub use encoder::{encode_json, encode_text, encode_xml, encode_yaml};
/// Re-exports the transition function.
pub use engine::transition;
/// Re-exports the `AutomatonLoader` struct and the supported file formats.
pub use loader::{AutomatonLoader, Format};
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports the simulator operations.
pub use simulator::{accepted, derivation, final_state, steps, Steps};
/// Re-exports the data types and errors shared across modules.
pub use types::{
    AutomatonError, DerivationStep, Mode, SimError, State, Symbol, TransitionError,
    TransitionTriple, ValidationError, MAX_DEFINITION_SIZE,
};
/// Re-exports the validation functions.
pub use validator::{validate, validate_with};
