//! This module provides encoding functionality for rendering a compiled Turing Machine
//! program back into canonical source text.

use crate::program::{Program, State};
use crate::types::{Action, Destination, Key, HALT_STATE, WILDCARD_SYMBOL};

/// Encodes a compiled program as canonical source text.
///
/// Format: one record per line, `state key replacement direction next`.
/// - States appear in table order, so the initial state comes first.
/// - Literal keys are sorted, the wildcard entry of a state comes last.
/// - Directions use `l`, `r` and `*`; the halt sentinel is written as `halt`.
///
/// Compiling the result with the same initial state name and the default comment marker
/// yields an equivalent table.
///
/// # Arguments
///
/// * `program` - The Program to encode.
///
/// # Returns
///
/// * `String` - The encoded program, empty if the program is not compiled.
pub fn encode(program: &Program) -> String {
    let width = program
        .states()
        .map(|(_, state)| state.name().len())
        .max()
        .unwrap_or(0);

    program
        .states()
        .flat_map(|(_, state)| encode_state(program, state, width))
        .collect()
}

/// Encodes every entry of one state.
fn encode_state(program: &Program, state: &State, width: usize) -> Vec<String> {
    let literal = state
        .actions()
        .map(|(symbol, action)| (Key::Symbol(symbol), action));
    let wildcard = state.default_action().map(|action| (Key::Wildcard, action));

    literal
        .chain(wildcard)
        .map(|(key, action)| encode_action(program, state.name(), key, action, width))
        .collect()
}

fn encode_action(
    program: &Program,
    state: &str,
    key: Key,
    action: &Action,
    width: usize,
) -> String {
    let next = match action.next {
        Destination::Halt => HALT_STATE,
        Destination::State(handle) => program.state_name(handle).unwrap_or_default(),
    };

    format!(
        "{state:<width$} {key} {} {} {next}\n",
        action.write.unwrap_or(WILDCARD_SYMBOL),
        action.direction.symbol(),
    )
}
