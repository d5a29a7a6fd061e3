//! This module provides functions for analyzing compiled Turing Machine programs to detect
//! likely mistakes before execution. Findings are warnings: a program that triggers them is
//! still valid and can be executed.

use std::collections::HashSet;

use thiserror::Error;

use crate::program::Program;
use crate::types::Destination;

/// Represents the findings of the analysis of a Turing Machine program.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum AnalysisWarning {
    /// Indicates states that are defined but cannot be reached from the initial state.
    #[error("Unreachable states detected: {0:?}")]
    UnreachableStates(Vec<String>),
    /// Indicates that no transition reachable from the initial state leads to `halt`,
    /// so the machine can only stop with an error or by running out of steps.
    #[error("No reachable transition leads to the halt state")]
    HaltUnreachable,
}

/// Analyzes a compiled `Program`.
///
/// # Arguments
///
/// * `program` - A reference to the `Program` to be analyzed.
///
/// # Returns
///
/// * The list of warnings, empty if nothing was found or the program is not compiled.
pub fn analyze(program: &Program) -> Vec<AnalysisWarning> {
    if !program.is_valid() {
        return Vec::new();
    }

    let visited = reachable_states(program);

    [check_unreachable_states, check_halt_reachable]
        .iter()
        .filter_map(|f| f(program, &visited).err())
        .collect()
}

/// Collects the indices of all states reachable from the initial state with a depth-first
/// traversal of the transition table.
fn reachable_states(program: &Program) -> HashSet<usize> {
    let mut visited = HashSet::new();
    let mut queue: Vec<_> = program.initial_state().into_iter().collect();

    while let Some(handle) = queue.pop() {
        if !visited.insert(handle.index()) {
            continue;
        }

        if let Some(state) = program.state(handle) {
            let actions = state.actions().map(|(_, action)| action);
            for action in actions.chain(state.default_action()) {
                if let Destination::State(next) = action.next {
                    if !visited.contains(&next.index()) {
                        queue.push(next);
                    }
                }
            }
        }
    }

    visited
}

/// Checks for states that cannot be reached from the initial state.
fn check_unreachable_states(
    program: &Program,
    visited: &HashSet<usize>,
) -> Result<(), AnalysisWarning> {
    let unreachable: Vec<String> = program
        .states()
        .filter(|(handle, _)| !visited.contains(&handle.index()))
        .map(|(_, state)| state.name().to_string())
        .collect();

    if !unreachable.is_empty() {
        return Err(AnalysisWarning::UnreachableStates(unreachable));
    }

    Ok(())
}

/// Checks that at least one reachable transition leads to the halt sentinel.
fn check_halt_reachable(
    program: &Program,
    visited: &HashSet<usize>,
) -> Result<(), AnalysisWarning> {
    let halts = program
        .states()
        .filter(|(handle, _)| visited.contains(&handle.index()))
        .any(|(_, state)| {
            state.actions().any(|(_, action)| action.is_final())
                || state.default_action().is_some_and(|action| action.is_final())
        });

    if !halts {
        return Err(AnalysisWarning::HaltUnreachable);
    }

    Ok(())
}
