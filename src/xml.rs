//! XML encoding of automaton definitions.
//!
//! The document mirrors the JSON shape with one element per item:
//!
//! ```xml
//! <AFD name="Ends in 01">
//!     <Q><state>q0</state><state>q1</state></Q>
//!     <Sigma><symbol>0</symbol><symbol>1</symbol></Sigma>
//!     <q0>q0</q0>
//!     <F><state>q1</state></F>
//!     <delta>
//!         <transition><from>q0</from><symbol>0</symbol><to>q1</to></transition>
//!     </delta>
//! </AFD>
//! ```

use crate::automaton::DefinitionData;
use crate::types::{AutomatonError, Symbol};
use quick_xml::se::Serializer;
use serde::{Deserialize, Serialize};

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "AFD")]
struct Document {
    #[serde(rename = "@name", default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "Q")]
    states: StateList,
    #[serde(rename = "Sigma")]
    alphabet: SymbolList,
    q0: String,
    #[serde(rename = "F", default)]
    accepting_states: StateList,
    #[serde(default)]
    delta: TransitionList,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateList {
    #[serde(default)]
    state: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SymbolList {
    #[serde(default)]
    symbol: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TransitionList {
    #[serde(default)]
    transition: Vec<Transition>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Transition {
    from: String,
    symbol: String,
    to: String,
}

/// Reads a definition from an `<AFD>` document.
///
/// Every `<symbol>` must hold exactly one character.
pub fn from_str(content: &str) -> Result<DefinitionData, AutomatonError> {
    let document: Document =
        quick_xml::de::from_str(content).map_err(|e| AutomatonError::FormatError(e.to_string()))?;

    let alphabet = document
        .alphabet
        .symbol
        .iter()
        .map(|symbol| parse_symbol(symbol))
        .collect::<Result<Vec<_>, _>>()?;

    let transitions = document
        .delta
        .transition
        .into_iter()
        .map(|t| Ok((t.from, parse_symbol(&t.symbol)?, t.to)))
        .collect::<Result<Vec<_>, AutomatonError>>()?;

    Ok(DefinitionData {
        name: document.name,
        states: document.states.state,
        alphabet,
        initial_state: document.q0,
        accepting_states: document.accepting_states.state,
        transitions,
    })
}

/// Writes a definition as an indented `<AFD>` document with an XML declaration.
pub fn to_string(data: &DefinitionData) -> Result<String, AutomatonError> {
    let document = Document {
        name: data.name.clone(),
        states: StateList {
            state: data.states.clone(),
        },
        alphabet: SymbolList {
            symbol: data.alphabet.iter().map(char::to_string).collect(),
        },
        q0: data.initial_state.clone(),
        accepting_states: StateList {
            state: data.accepting_states.clone(),
        },
        delta: TransitionList {
            transition: data
                .transitions
                .iter()
                .map(|(from, symbol, to)| Transition {
                    from: from.clone(),
                    symbol: symbol.to_string(),
                    to: to.clone(),
                })
                .collect(),
        },
    };

    let mut body = String::new();
    let mut serializer = Serializer::new(&mut body);
    serializer.indent(' ', 4);
    document
        .serialize(serializer)
        .map_err(|e| AutomatonError::FormatError(e.to_string()))?;

    Ok(format!("{DECLARATION}\n{body}\n"))
}

fn parse_symbol(text: &str) -> Result<Symbol, AutomatonError> {
    let mut chars = text.chars();

    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(AutomatonError::FormatError(format!(
            "Symbol {text:?} must be exactly one character"
        ))),
    }
}
