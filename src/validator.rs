//! This module checks automaton definitions for structural errors before they are executed:
//! membership of the initial and accepting states, the domain and range of the transition
//! function, and, in strict mode, totality of the transition function.

use crate::automaton::AutomatonDefinition;
use crate::types::{Mode, State, Symbol, ValidationError};

/// Validates the structure of an automaton definition.
///
/// The checks run in a fixed order and the first violation is returned:
/// non-empty Q, non-empty Σ, q0 ∈ Q, F ⊆ Q, δ keys in Q × Σ, δ targets in Q.
///
/// # Arguments
///
/// * `automaton` - A reference to the `AutomatonDefinition` to be validated.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(ValidationError)` describing the first violated rule.
pub fn validate(automaton: &AutomatonDefinition) -> Result<(), ValidationError> {
    [
        check_structure,
        check_initial_state,
        check_accepting_states,
        check_transition_domain,
        check_transition_targets,
    ]
    .iter()
    .try_for_each(|check| check(automaton))
}

/// Validates a definition in the given mode.
///
/// `Mode::Strict` additionally requires δ to be defined for every pair in Q × Σ.
pub fn validate_with(automaton: &AutomatonDefinition, mode: Mode) -> Result<(), ValidationError> {
    validate(automaton)?;

    match mode {
        Mode::Lenient => Ok(()),
        Mode::Strict => check_totality(automaton),
    }
}

/// Checks that Q and Σ are non-empty.
fn check_structure(automaton: &AutomatonDefinition) -> Result<(), ValidationError> {
    if automaton.states().is_empty() {
        return Err(ValidationError::EmptyStates);
    }

    if automaton.alphabet().is_empty() {
        return Err(ValidationError::EmptyAlphabet);
    }

    Ok(())
}

fn check_initial_state(automaton: &AutomatonDefinition) -> Result<(), ValidationError> {
    if !automaton.has_state(automaton.initial_state()) {
        return Err(ValidationError::UnknownInitialState(
            automaton.initial_state().to_string(),
        ));
    }

    Ok(())
}

/// Checks F ⊆ Q, reporting the smallest offending label.
fn check_accepting_states(automaton: &AutomatonDefinition) -> Result<(), ValidationError> {
    automaton
        .accepting_states()
        .iter()
        .find(|state| !automaton.has_state(state))
        .map(|state| ValidationError::UnknownAcceptingState(state.clone()))
        .map_or(Ok(()), Err)
}

/// Checks that every key of δ lies in Q × Σ.
fn check_transition_domain(automaton: &AutomatonDefinition) -> Result<(), ValidationError> {
    automaton
        .transitions()
        .find(|(from, symbol, _)| !automaton.has_state(from) || !automaton.has_symbol(*symbol))
        .map(|(from, symbol, _)| ValidationError::InvalidTransitionDomain {
            state: from.clone(),
            symbol,
        })
        .map_or(Ok(()), Err)
}

/// Checks that every target of δ lies in Q.
fn check_transition_targets(automaton: &AutomatonDefinition) -> Result<(), ValidationError> {
    automaton
        .transitions()
        .find(|(_, _, to)| !automaton.has_state(to))
        .map(|(from, symbol, to)| ValidationError::InvalidTransitionTarget {
            state: from.clone(),
            symbol,
            target: to.clone(),
        })
        .map_or(Ok(()), Err)
}

/// Checks that δ is defined for every pair in Q × Σ.
pub(crate) fn check_totality(automaton: &AutomatonDefinition) -> Result<(), ValidationError> {
    missing_transitions(automaton)
        .into_iter()
        .next()
        .map(|(state, symbol)| ValidationError::IncompleteTransition { state, symbol })
        .map_or(Ok(()), Err)
}

/// Lists the pairs of Q × Σ for which δ is undefined, in sorted order.
pub fn missing_transitions(automaton: &AutomatonDefinition) -> Vec<(State, Symbol)> {
    automaton
        .states()
        .iter()
        .flat_map(|state| {
            automaton
                .alphabet()
                .iter()
                .filter(move |&&symbol| automaton.lookup(state, symbol).is_none())
                .map(move |&symbol| (state.clone(), symbol))
        })
        .collect()
}
