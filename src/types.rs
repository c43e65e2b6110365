//! This module defines the core data structures and types shared by the automaton model,
//! the validator, the transition engine, and the simulator, including the error taxonomy.

use std::fmt;
use thiserror::Error;

use crate::Rule;

/// A state label. Two states are equal iff their labels match exactly.
pub type State = String;
/// A single input symbol.
pub type Symbol = char;
/// A transition in its plain-data form: `(from, symbol, to)`.
pub type TransitionTriple = (State, Symbol, State);

/// The maximum allowed size for an automaton definition file in bytes.
pub const MAX_DEFINITION_SIZE: usize = 65536; // 64KB

/// Controls how strictly a definition is checked when it is built.
///
/// - `Lenient` (default): duplicate triples overwrite earlier ones and only
///   membership of q0, F, and the domain/range of δ is checked.
/// - `Strict`: conflicting duplicate triples are rejected and δ must be total over Q × Σ.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Partial transition functions are allowed.
    #[default]
    Lenient,
    /// The transition function must be total and deterministic.
    Strict,
}

/// One transition taken while consuming an input string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivationStep {
    /// The state before the symbol was consumed.
    pub from: State,
    /// The consumed symbol.
    pub symbol: Symbol,
    /// The state after the symbol was consumed.
    pub to: State,
}

impl DerivationStep {
    pub fn new(from: impl Into<State>, symbol: Symbol, to: impl Into<State>) -> Self {
        Self {
            from: from.into(),
            symbol,
            to: to.into(),
        }
    }
}

impl fmt::Display for DerivationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.from, self.symbol, self.to)
    }
}

/// Structural problems in an automaton definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The set of states is empty.
    #[error("The automaton has no states")]
    EmptyStates,
    /// The alphabet is empty.
    #[error("The automaton has an empty alphabet")]
    EmptyAlphabet,
    /// The initial state is not a member of Q.
    #[error("Initial state '{0}' is not a declared state")]
    UnknownInitialState(State),
    /// An accepting state is not a member of Q.
    #[error("Accepting state '{0}' is not a declared state")]
    UnknownAcceptingState(State),
    /// A transition is keyed on a state outside Q or a symbol outside Σ.
    #[error("Transition from '{state}' on '{symbol}' is outside Q x Sigma")]
    InvalidTransitionDomain { state: State, symbol: Symbol },
    /// A transition leads to a state outside Q.
    #[error("Transition from '{state}' on '{symbol}' leads to undeclared state '{target}'")]
    InvalidTransitionTarget {
        state: State,
        symbol: Symbol,
        target: State,
    },
    /// Strict mode: a (state, symbol) pair has no transition.
    #[error("No transition defined from '{state}' on '{symbol}'")]
    IncompleteTransition { state: State, symbol: Symbol },
    /// Strict mode: a (state, symbol) pair is mapped to two different successors.
    #[error("Transition from '{state}' on '{symbol}' is defined twice ('{first}' and '{second}')")]
    ConflictingTransition {
        state: State,
        symbol: Symbol,
        first: State,
        second: State,
    },
}

/// Failures of a single application of δ.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The current state is not a member of Q.
    #[error("Unknown state '{0}'")]
    UnknownState(State),
    /// The input symbol is not a member of Σ.
    #[error("Symbol '{0}' is not in the alphabet")]
    UnknownSymbol(Symbol),
    /// δ is undefined for the pair.
    #[error("No transition defined for state {state} on symbol '{symbol}'")]
    MissingTransition { state: State, symbol: Symbol },
    /// δ leads to a state outside Q.
    #[error("Transition from '{state}' on '{symbol}' leads to undeclared state '{target}'")]
    InvalidTarget {
        state: State,
        symbol: Symbol,
        target: State,
    },
}

/// Failures of the simulator operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// The automaton got stuck or was driven outside its definition.
    #[error(transparent)]
    Transition(#[from] TransitionError),
    /// An accepting-state override referenced an undeclared state.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Represents the errors surfaced by loaders, encoders, and front-ends.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutomatonError {
    /// Indicates a syntax error in a `.dfa` definition.
    #[error("Definition parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates a malformed JSON definition, or a failure to serialize one.
    #[error("Definition format error: {0}")]
    FormatError(String),
    /// Indicates that a definition parsed but is not well-formed.
    #[error("Definition validation error: {0}")]
    ValidationError(#[from] ValidationError),
    /// Indicates that a simulation failed.
    #[error("Simulation error: {0}")]
    SimulationError(#[from] SimError),
    /// Indicates an error related to reading or writing definition files.
    #[error("File error: {0}")]
    FileError(String),
    /// Indicates a lookup of a built-in automaton that does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<TransitionError> for AutomatonError {
    fn from(error: TransitionError) -> Self {
        AutomatonError::SimulationError(error.into())
    }
}
