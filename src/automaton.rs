//! This module defines `AutomatonDefinition`, the immutable 5-tuple (Q, Σ, q0, F, δ),
//! together with its plain-data wire shape and a fluent builder.

use crate::simulator;
use crate::types::{
    DerivationStep, Mode, SimError, State, Symbol, TransitionTriple, ValidationError,
};
use crate::validator::{check_totality, validate};
use serde::{Deserialize, Serialize};
use std::collections::{hash_map::Entry, BTreeSet, HashMap};
use std::fmt;

/// The canonical plain-data shape of an automaton, as produced by loaders.
///
/// Field names follow the formal notation so that JSON files read
/// `{"Q": [...], "Sigma": [...], "q0": "...", "F": [...], "delta": [[from, symbol, to], ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionData {
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The state labels.
    #[serde(rename = "Q")]
    pub states: Vec<State>,
    /// The input alphabet.
    #[serde(rename = "Sigma")]
    pub alphabet: Vec<Symbol>,
    /// The initial state.
    #[serde(rename = "q0")]
    pub initial_state: State,
    /// The accepting states.
    #[serde(rename = "F", default)]
    pub accepting_states: Vec<State>,
    /// The transition function as `(from, symbol, to)` triples.
    #[serde(rename = "delta", default)]
    pub transitions: Vec<TransitionTriple>,
}

/// A deterministic finite automaton.
///
/// The definition is immutable once built; every simulator operation borrows it,
/// so a single definition can be shared across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomatonDefinition {
    name: Option<String>,
    states: BTreeSet<State>,
    alphabet: BTreeSet<Symbol>,
    initial_state: State,
    accepting_states: BTreeSet<State>,
    delta: HashMap<State, HashMap<Symbol, State>>,
}

impl AutomatonDefinition {
    /// Returns a builder for a new automaton.
    pub fn builder() -> AutomatonBuilder {
        AutomatonBuilder::new()
    }

    /// Builds and validates a definition from plain data in the given mode.
    ///
    /// Membership checks run first; in `Mode::Strict` a conflicting duplicate triple
    /// is reported next, then any gap in δ.
    pub fn from_data(data: DefinitionData, mode: Mode) -> Result<Self, ValidationError> {
        let (automaton, conflict) = Self::normalize(data, mode);
        validate(&automaton)?;

        if let Some(conflict) = conflict {
            return Err(conflict);
        }

        if mode == Mode::Strict {
            check_totality(&automaton)?;
        }

        Ok(automaton)
    }

    /// Normalizes plain data into a definition without checking membership.
    ///
    /// Only the determinism check of `Mode::Strict` runs here, since conflicting
    /// triples are lost once they are folded into the mapping.
    pub fn from_data_unchecked(data: DefinitionData, mode: Mode) -> Result<Self, ValidationError> {
        match Self::normalize(data, mode) {
            (_, Some(conflict)) => Err(conflict),
            (automaton, None) => Ok(automaton),
        }
    }

    /// Folds the triples into δ. Later triples win; in `Mode::Strict` the first
    /// conflicting pair is returned alongside the definition.
    fn normalize(data: DefinitionData, mode: Mode) -> (Self, Option<ValidationError>) {
        let mut delta: HashMap<State, HashMap<Symbol, State>> = HashMap::new();
        let mut conflict = None;

        for (from, symbol, to) in data.transitions {
            match delta.entry(from.clone()).or_default().entry(symbol) {
                Entry::Vacant(e) => {
                    e.insert(to);
                }
                Entry::Occupied(mut e) if e.get() != &to => {
                    if mode == Mode::Strict {
                        conflict.get_or_insert_with(|| ValidationError::ConflictingTransition {
                            state: from.clone(),
                            symbol,
                            first: e.get().clone(),
                            second: to.clone(),
                        });
                    } else {
                        tracing::warn!(
                            state = %from,
                            %symbol,
                            previous = %e.get(),
                            next = %to,
                            "overwriting duplicate transition"
                        );
                    }
                    e.insert(to);
                }
                Entry::Occupied(_) => {}
            }
        }

        let automaton = Self {
            name: data.name,
            states: data.states.into_iter().collect(),
            alphabet: data.alphabet.into_iter().collect(),
            initial_state: data.initial_state,
            accepting_states: data.accepting_states.into_iter().collect(),
            delta,
        };

        (automaton, conflict)
    }

    /// Converts the definition back into plain data, with transitions in sorted order.
    pub fn to_data(&self) -> DefinitionData {
        DefinitionData {
            name: self.name.clone(),
            states: self.states.iter().cloned().collect(),
            alphabet: self.alphabet.iter().copied().collect(),
            initial_state: self.initial_state.clone(),
            accepting_states: self.accepting_states.iter().cloned().collect(),
            transitions: self
                .transitions()
                .map(|(from, symbol, to)| (from.clone(), symbol, to.clone()))
                .collect(),
        }
    }

    /// Returns the display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns Q.
    pub fn states(&self) -> &BTreeSet<State> {
        &self.states
    }

    /// Returns Σ.
    pub fn alphabet(&self) -> &BTreeSet<Symbol> {
        &self.alphabet
    }

    /// Returns q0.
    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    /// Returns F.
    pub fn accepting_states(&self) -> &BTreeSet<State> {
        &self.accepting_states
    }

    pub fn has_state(&self, state: &str) -> bool {
        self.states.contains(state)
    }

    pub fn has_symbol(&self, symbol: Symbol) -> bool {
        self.alphabet.contains(&symbol)
    }

    pub fn is_accepting(&self, state: &str) -> bool {
        self.accepting_states.contains(state)
    }

    /// Looks up δ(state, symbol) without any membership checks.
    ///
    /// Use [`crate::engine::transition`] to apply δ during simulation.
    pub fn lookup(&self, state: &str, symbol: Symbol) -> Option<&State> {
        self.delta.get(state)?.get(&symbol)
    }

    /// Returns the number of entries in δ.
    pub fn transition_count(&self) -> usize {
        self.delta.values().map(HashMap::len).sum()
    }

    /// Iterates over δ as `(from, symbol, to)`, sorted by `(from, symbol)`.
    pub fn transitions(&self) -> impl Iterator<Item = (&State, Symbol, &State)> {
        let mut entries: Vec<_> = self
            .delta
            .iter()
            .flat_map(|(from, row)| row.iter().map(move |(&symbol, to)| (from, symbol, to)))
            .collect();
        entries.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        entries.into_iter()
    }

    /// Computes the state reached from q0 after consuming `input`.
    pub fn final_state(&self, input: &str) -> Result<State, SimError> {
        simulator::final_state(self, &self.initial_state, input)
    }

    /// Computes the derivation of `input` from q0.
    pub fn derivation(&self, input: &str) -> Result<Vec<DerivationStep>, SimError> {
        simulator::derivation(self, &self.initial_state, input)
    }

    /// Checks whether `input` is accepted from q0 with the automaton's own F.
    pub fn accepts(&self, input: &str) -> Result<bool, SimError> {
        simulator::accepted(self, &self.initial_state, input, None)
    }
}

impl TryFrom<DefinitionData> for AutomatonDefinition {
    type Error = ValidationError;

    fn try_from(data: DefinitionData) -> Result<Self, Self::Error> {
        Self::from_data(data, Mode::Lenient)
    }
}

impl fmt::Display for AutomatonDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn set<T: fmt::Display>(items: impl Iterator<Item = T>) -> String {
            let items: Vec<String> = items.map(|item| item.to_string()).collect();
            format!("{{{}}}", items.join(", "))
        }

        match &self.name {
            Some(name) => writeln!(f, "DFA: {}", name)?,
            None => writeln!(f, "DFA:")?,
        }
        writeln!(f, "  States (Q): {}", set(self.states.iter()))?;
        writeln!(f, "  Alphabet (Sigma): {}", set(self.alphabet.iter()))?;
        writeln!(f, "  Initial state (q0): {}", self.initial_state)?;
        writeln!(f, "  Accepting states (F): {}", set(self.accepting_states.iter()))?;
        write!(f, "  Transitions (delta):")?;
        for (from, symbol, to) in self.transitions() {
            write!(f, "\n    delta({}, {}) = {}", from, symbol, to)?;
        }

        Ok(())
    }
}

/// Fluent builder for [`AutomatonDefinition`].
#[derive(Debug, Default, Clone)]
pub struct AutomatonBuilder {
    data: DefinitionData,
    mode: Mode,
}

impl AutomatonBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.data.name = Some(name.into());
        self
    }

    /// Add states to Q.
    pub fn states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<State>,
    {
        self.data.states.extend(states.into_iter().map(Into::into));
        self
    }

    /// Add symbols to Σ.
    pub fn alphabet(mut self, symbols: impl IntoIterator<Item = Symbol>) -> Self {
        self.data.alphabet.extend(symbols);
        self
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: impl Into<State>) -> Self {
        self.data.initial_state = state.into();
        self
    }

    /// Add states to F.
    pub fn accepting<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<State>,
    {
        self.data
            .accepting_states
            .extend(states.into_iter().map(Into::into));
        self
    }

    /// Add a single transition δ(from, symbol) = to.
    pub fn transition(mut self, from: impl Into<State>, symbol: Symbol, to: impl Into<State>) -> Self {
        self.data.transitions.push((from.into(), symbol, to.into()));
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, triples: impl IntoIterator<Item = TransitionTriple>) -> Self {
        self.data.transitions.extend(triples);
        self
    }

    /// Select how strictly the definition is checked.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Build and validate the automaton.
    pub fn build(self) -> Result<AutomatonDefinition, ValidationError> {
        AutomatonDefinition::from_data(self.data, self.mode)
    }

    /// Build the automaton without membership checks.
    ///
    /// Simulation still fails explicitly on unknown states or symbols.
    pub fn build_unchecked(self) -> Result<AutomatonDefinition, ValidationError> {
        AutomatonDefinition::from_data_unchecked(self.data, self.mode)
    }
}
