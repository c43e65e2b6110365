//! This module provides the parser for `.dfa` automaton definitions, utilizing the `pest` crate.
//! It defines the grammar for `.dfa` files and functions to parse the input into a
//! `DefinitionData` and, after validation, an `AutomatonDefinition`.

use crate::automaton::{AutomatonDefinition, DefinitionData};
use crate::types::{AutomatonError, Mode, State, Symbol, TransitionTriple};
use pest::{
    error::{Error, ErrorVariant},
    iterators::Pair,
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::HashSet;

/// Derives a `PestParser` for the automaton grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct AutomatonParser;

/// Parses and validates a `.dfa` definition in lenient mode.
///
/// # Returns
///
/// * `Ok(AutomatonDefinition)` if the input is successfully parsed and validated.
/// * `Err(AutomatonError::ParseError)` if there are any syntax errors or missing sections.
/// * `Err(AutomatonError::ValidationError)` if the automaton is not well-formed.
pub fn parse(input: &str) -> Result<AutomatonDefinition, AutomatonError> {
    parse_with(input, Mode::Lenient)
}

/// Parses and validates a `.dfa` definition in the given mode.
pub fn parse_with(input: &str, mode: Mode) -> Result<AutomatonDefinition, AutomatonError> {
    let data = parse_data(input)?;
    Ok(AutomatonDefinition::from_data(data, mode)?)
}

/// Parses a `.dfa` definition into plain data without validating it.
pub fn parse_data(input: &str) -> Result<DefinitionData, AutomatonError> {
    let root = AutomatonParser::parse(Rule::automaton, input.trim())
        .map_err(|e| AutomatonError::ParseError(e.into()))?
        .next()
        .ok_or_else(|| AutomatonError::FormatError("Empty definition".to_string()))?;

    parse_automaton(root)
}

/// Parses the top-level sections of a definition from a `Pair<Rule::automaton>`.
fn parse_automaton(pair: Pair<Rule>) -> Result<DefinitionData, AutomatonError> {
    let root_span = pair.as_span();
    let mut name: Option<String> = None;
    let mut states: Option<Vec<State>> = None;
    let mut alphabet: Option<Vec<Symbol>> = None;
    let mut initial_state: Option<State> = None;
    let mut accepting_states: Option<Vec<State>> = None;
    let mut transitions: Option<Vec<TransitionTriple>> = None;
    let mut seen = HashSet::new();

    for p in pair.into_inner() {
        let span = p.as_span();
        let rule = p.as_rule();

        check_unique_rule(rule, span, &mut seen)?;

        match rule {
            Rule::name => name = Some(parse_inner_string(p).trim_end().to_string()),
            Rule::states => states = Some(parse_labels(p)),
            Rule::alphabet => alphabet = Some(parse_symbols(p)),
            Rule::start => initial_state = Some(parse_inner_string(p)),
            Rule::accept => accepting_states = Some(parse_labels(p)),
            Rule::delta => transitions = Some(parse_transitions(p)),
            _ => {} // EOI
        }
    }

    Ok(DefinitionData {
        name,
        states: check_required_rule(states, "states", root_span)?,
        alphabet: check_required_rule(alphabet, "alphabet", root_span)?,
        initial_state: check_required_rule(initial_state, "start", root_span)?,
        accepting_states: accepting_states.unwrap_or_default(),
        transitions: transitions.unwrap_or_default(),
    })
}

/// Collects the labels of a `states` or `accept` section.
fn parse_labels(pair: Pair<Rule>) -> Vec<State> {
    // Rule: (states | accept) > labels > [label]
    pair.into_inner()
        .flat_map(|labels| labels.into_inner())
        .map(|label| label.as_str().to_string())
        .collect()
}

/// Collects the symbols of an `alphabet` section.
fn parse_symbols(pair: Pair<Rule>) -> Vec<Symbol> {
    // Rule: alphabet > symbols > [symbol]
    pair.into_inner()
        .flat_map(|symbols| symbols.into_inner())
        .filter_map(|symbol| parse_symbol(symbol.as_str()))
        .collect()
}

/// Parses the `delta` section into `(from, symbol, to)` triples, in file order.
fn parse_transitions(pair: Pair<Rule>) -> Vec<TransitionTriple> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::transition)
        .filter_map(|transition| {
            let mut parts = transition.into_inner();
            let from = parts.next()?.as_str().to_string();
            let symbol = parse_symbol(parts.next()?.as_str())?;
            let to = parts.next()?.as_str().to_string();
            Some((from, symbol, to))
        })
        .collect()
}

/// Parses a single character symbol, handling quoted (`'x'`) and bare symbols.
fn parse_symbol(input: &str) -> Option<Symbol> {
    let inner = input
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .filter(|s| !s.is_empty())
        .unwrap_or(input);

    inner.chars().next()
}

/// Extracts the inner string content from a `Pair`.
fn parse_inner_string(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default()
}

/// Creates an `AutomatonError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> AutomatonError {
    AutomatonError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// Checks if a given section has already been declared.
fn check_unique_rule(
    rule: Rule,
    span: Span,
    seen: &mut HashSet<Rule>,
) -> Result<(), AutomatonError> {
    if rule == Rule::EOI {
        return Ok(());
    }

    if !seen.insert(rule) {
        return Err(parse_error(
            &format!("Duplicate \"{rule:?}:\" declaration"),
            span,
        ));
    }

    Ok(())
}

/// Checks if a required section is present, returning an `Err` if it's missing.
fn check_required_rule<T>(value: Option<T>, name: &str, span: Span) -> Result<T, AutomatonError> {
    value.ok_or_else(|| parse_error(&format!("Missing '{name}' section"), span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValidationError;

    const ENDS_IN_01: &str = r#"
# Binary strings ending in 01
name: Ends in 01
states: q0, q1, q2
alphabet: 0, 1
start: q0
accept: q2
delta:
  q0, 0 -> q1
  q0, 1 -> q0
  q1, 0 -> q1
  q1, 1 -> q2   # reaching q2 means we just read "01"
  q2, 0 -> q1
  q2, 1 -> q0
"#;

    #[test]
    fn test_parse_simple_automaton() {
        let automaton = parse(ENDS_IN_01).unwrap();

        assert_eq!(automaton.name(), Some("Ends in 01"));
        assert_eq!(automaton.states().len(), 3);
        assert_eq!(automaton.initial_state(), "q0");
        assert!(automaton.is_accepting("q2"));
        assert_eq!(automaton.transition_count(), 6);
        assert_eq!(automaton.lookup("q1", '1'), Some(&"q2".to_string()));
    }

    #[test]
    fn test_parse_matches_builder() {
        let parsed = parse(ENDS_IN_01).unwrap();
        let built = crate::fixtures::ends_in_01().build().unwrap();
        assert_eq!(parsed, built);
    }

    #[test]
    fn test_parse_sections_in_any_order() {
        let input = r#"
delta:
  even, a -> odd
  odd, a -> even
accept: even
start: even
alphabet: a
states: even, odd
"#;
        let automaton = parse(input).unwrap();
        assert!(automaton.accepts("aa").unwrap());
        assert_eq!(automaton.name(), None);
    }

    #[test]
    fn test_parse_quoted_symbols() {
        let input = r#"
states: s
alphabet: ' ', ',', '''
start: s
delta:
  s, ' ' -> s
  s, ',' -> s
  s, ''' -> s
"#;
        let data = parse_data(input).unwrap();
        assert_eq!(data.alphabet, vec![' ', ',', '\'']);
        assert_eq!(data.transitions[1], ("s".to_string(), ',', "s".to_string()));
    }

    #[test]
    fn test_parse_empty_accept_section() {
        let input = "states: q\nalphabet: x\nstart: q\naccept:\ndelta:\n  q, x -> q";
        let automaton = parse(input).unwrap();
        assert!(automaton.accepting_states().is_empty());
        assert!(!automaton.accepts("xx").unwrap());
    }

    #[test]
    fn test_parse_keeps_transition_order() {
        let data = parse_data(ENDS_IN_01).unwrap();
        assert_eq!(data.transitions.len(), 6);
        assert_eq!(data.transitions[0], ("q0".to_string(), '0', "q1".to_string()));
        assert_eq!(data.transitions[5], ("q2".to_string(), '1', "q0".to_string()));
    }

    #[test]
    fn test_parse_duplicate_section() {
        let input = "states: a\nstates: b\nalphabet: x\nstart: a";
        let result = parse(input);
        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(matches!(error, AutomatonError::ParseError(_)));
        assert!(error
            .to_string()
            .contains("Duplicate \"states:\" declaration"));
    }

    #[test]
    fn test_parse_missing_start() {
        let input = "states: a\nalphabet: x";
        let error = parse(input).unwrap_err();
        assert!(matches!(error, AutomatonError::ParseError(_)));
        assert!(error.to_string().contains("Missing 'start' section"));
    }

    #[test]
    fn test_parse_missing_states() {
        let input = "alphabet: x\nstart: a";
        let error = parse(input).unwrap_err();
        assert!(error.to_string().contains("Missing 'states' section"));
    }

    #[test]
    fn test_parse_syntax_error() {
        let input = "states: a\nalphabet: x\nstart: a\ndelta:\n  a x a";
        assert!(matches!(parse(input), Err(AutomatonError::ParseError(_))));
    }

    #[test]
    fn test_parse_multi_character_symbol_is_rejected() {
        let input = "states: a\nalphabet: xy\nstart: a";
        assert!(matches!(parse(input), Err(AutomatonError::ParseError(_))));
    }

    #[test]
    fn test_parse_validates_definition() {
        let input = "states: a\nalphabet: x\nstart: b";
        assert_eq!(
            parse(input),
            Err(AutomatonError::ValidationError(
                ValidationError::UnknownInitialState("b".to_string())
            ))
        );
    }

    #[test]
    fn test_parse_strict_mode() {
        let input = "states: a, b\nalphabet: x\nstart: a\ndelta:\n  a, x -> b";

        assert!(parse(input).is_ok());
        assert_eq!(
            parse_with(input, Mode::Strict),
            Err(AutomatonError::ValidationError(
                ValidationError::IncompleteTransition {
                    state: "b".to_string(),
                    symbol: 'x',
                }
            ))
        );
    }
}
