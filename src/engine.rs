//! The transition function δ. Every simulation step goes through [`transition`].

use crate::automaton::AutomatonDefinition;
use crate::types::{State, Symbol, TransitionError};

/// Applies δ to `(state, symbol)`.
///
/// The state, the symbol, and the successor are checked against Q and Σ here, so
/// callers do not need to validate the definition first. An undefined pair is reported
/// as `TransitionError::MissingTransition`; no default successor is ever substituted.
///
/// # Returns
///
/// * `Ok(&State)` - the unique successor state.
/// * `Err(TransitionError::UnknownState)` if `state` is not in Q.
/// * `Err(TransitionError::UnknownSymbol)` if `symbol` is not in Σ.
/// * `Err(TransitionError::MissingTransition)` if δ has no entry for the pair.
/// * `Err(TransitionError::InvalidTarget)` if δ leads outside Q.
pub fn transition<'a>(
    automaton: &'a AutomatonDefinition,
    state: &str,
    symbol: Symbol,
) -> Result<&'a State, TransitionError> {
    if !automaton.has_state(state) {
        return Err(TransitionError::UnknownState(state.to_string()));
    }

    if !automaton.has_symbol(symbol) {
        return Err(TransitionError::UnknownSymbol(symbol));
    }

    let next = automaton
        .lookup(state, symbol)
        .ok_or_else(|| TransitionError::MissingTransition {
            state: state.to_string(),
            symbol,
        })?;

    if !automaton.has_state(next) {
        return Err(TransitionError::InvalidTarget {
            state: state.to_string(),
            symbol,
            target: next.clone(),
        });
    }

    Ok(next)
}
