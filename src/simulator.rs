//! This module runs an automaton over whole input strings. It provides the final-state,
//! derivation, and acceptance operations, all built on a lazy [`Steps`] iterator that
//! applies [`transition`] once per input symbol.

use crate::automaton::AutomatonDefinition;
use crate::engine::transition;
use crate::types::{DerivationStep, SimError, State, TransitionError, ValidationError};
use std::iter::FusedIterator;
use std::str::Chars;

/// Iterator over the transitions taken while consuming an input string.
///
/// Yields one `Ok(DerivationStep)` per consumed symbol. After the first error
/// nothing more is yielded.
pub struct Steps<'a, 'w> {
    automaton: &'a AutomatonDefinition,
    state: &'a str,
    input: Chars<'w>,
    failed: bool,
}

impl<'a, 'w> Steps<'a, 'w> {
    /// Returns the state reached so far.
    pub fn state(&self) -> &'a str {
        self.state
    }
}

impl Iterator for Steps<'_, '_> {
    type Item = Result<DerivationStep, TransitionError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let symbol = self.input.next()?;

        match transition(self.automaton, self.state, symbol) {
            Ok(next) => {
                tracing::debug!(from = %self.state, %symbol, to = %next, "transition");
                let step = DerivationStep::new(self.state, symbol, next.as_str());
                self.state = next.as_str();
                Some(Ok(step))
            }
            Err(e) => {
                tracing::debug!(state = %self.state, %symbol, error = %e, "simulation stuck");
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for Steps<'_, '_> {}

/// Starts a step-by-step run of `input` from `state`.
///
/// The starting state is checked against Q up front, so an unknown state fails
/// even when `input` is empty.
pub fn steps<'a, 'w>(
    automaton: &'a AutomatonDefinition,
    state: &str,
    input: &'w str,
) -> Result<Steps<'a, 'w>, TransitionError> {
    let state = automaton
        .states()
        .get(state)
        .ok_or_else(|| TransitionError::UnknownState(state.to_string()))?;

    Ok(Steps {
        automaton,
        state,
        input: input.chars(),
        failed: false,
    })
}

/// Computes the state reached from `state` after consuming all of `input`.
///
/// # Returns
///
/// * `Ok(State)` - `state` itself for empty input, otherwise the last reached state.
/// * `Err(SimError::Transition)` - the first transition failure; simulation stops there.
pub fn final_state(
    automaton: &AutomatonDefinition,
    state: &str,
    input: &str,
) -> Result<State, SimError> {
    let mut run = steps(automaton, state, input)?;

    for step in run.by_ref() {
        step?;
    }

    Ok(run.state().to_string())
}

/// Computes the derivation of `input` from `state`: one step per consumed symbol.
///
/// The operation is all-or-nothing; if any transition fails, the partial trace is
/// discarded and the error is returned.
pub fn derivation(
    automaton: &AutomatonDefinition,
    state: &str,
    input: &str,
) -> Result<Vec<DerivationStep>, SimError> {
    steps(automaton, state, input)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(SimError::from)
}

/// Decides whether `input` is accepted when starting from `state`.
///
/// `accepting` replaces the automaton's own F for this call when supplied; its states
/// must all be declared. Getting stuck is an error, not a rejection.
///
/// # Returns
///
/// * `Ok(true)` if the final state is accepting.
/// * `Ok(false)` if the final state is not accepting.
/// * `Err(SimError::Validation)` if `accepting` names an undeclared state.
/// * `Err(SimError::Transition)` if the automaton is undefined somewhere along the way.
pub fn accepted(
    automaton: &AutomatonDefinition,
    state: &str,
    input: &str,
    accepting: Option<&[State]>,
) -> Result<bool, SimError> {
    if let Some(unknown) = accepting
        .unwrap_or_default()
        .iter()
        .find(|s| !automaton.has_state(s))
    {
        return Err(ValidationError::UnknownAcceptingState(unknown.clone()).into());
    }

    let last = final_state(automaton, state, input)?;

    Ok(match accepting {
        Some(states) => states.contains(&last),
        None => automaton.is_accepting(&last),
    })
}
