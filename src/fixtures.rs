//! Automata shared by the unit tests.

use crate::automaton::{AutomatonBuilder, AutomatonDefinition};

/// Binary strings ending in "01".
pub(crate) fn ends_in_01() -> AutomatonBuilder {
    AutomatonDefinition::builder()
        .name("Ends in 01")
        .states(["q0", "q1", "q2"])
        .alphabet(['0', '1'])
        .initial("q0")
        .accepting(["q2"])
        .transition("q0", '0', "q1")
        .transition("q0", '1', "q0")
        .transition("q1", '0', "q1")
        .transition("q1", '1', "q2")
        .transition("q2", '0', "q1")
        .transition("q2", '1', "q0")
}

/// Strings over {a, b} with an even number of 'a'.
pub(crate) fn even_a() -> AutomatonBuilder {
    AutomatonDefinition::builder()
        .name("Even number of a")
        .states(["even", "odd"])
        .alphabet(['a', 'b'])
        .initial("even")
        .accepting(["even"])
        .transition("even", 'a', "odd")
        .transition("even", 'b', "even")
        .transition("odd", 'a', "even")
        .transition("odd", 'b', "odd")
}
