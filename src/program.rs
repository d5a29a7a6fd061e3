//! This module defines the compiled transition table of a Turing Machine program.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::CompilerOptions;
use crate::parser;
use crate::types::{Action, CompileError, StateHandle};

/// Generation `0` is reserved for programs that have not been compiled.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// A named node of the transition table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub(crate) name: String,
    pub(crate) actions: BTreeMap<char, Action>,
    pub(crate) default: Option<Action>,
}

impl State {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: BTreeMap::new(),
            default: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Finds the action for `symbol`, preferring an exact entry over the wildcard one.
    pub fn action(&self, symbol: char) -> Option<&Action> {
        self.actions.get(&symbol).or(self.default.as_ref())
    }

    /// Iterates over the symbol-specific entries in symbol order.
    pub fn actions(&self) -> impl Iterator<Item = (char, &Action)> {
        self.actions.iter().map(|(&symbol, action)| (symbol, action))
    }

    /// Returns the wildcard entry, if any.
    pub fn default_action(&self) -> Option<&Action> {
        self.default.as_ref()
    }

    pub fn transition_count(&self) -> usize {
        self.actions.len() + usize::from(self.default.is_some())
    }
}

/// A compiled Turing Machine program.
///
/// State `0` is always the initial state. A program is invalid until a compilation succeeds,
/// and a failed compilation leaves it invalid and empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    states: Vec<State>,
    generation: u64,
}

impl Program {
    /// Creates an empty, invalid program.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_states(states: Vec<State>, generation: u64) -> Self {
        Self { states, generation }
    }

    /// Compiles `source` into this program, using `initial_state` as the name of state `0`.
    ///
    /// On failure the program is left cleared.
    pub fn compile(&mut self, source: &str, initial_state: &str) -> Result<(), CompileError> {
        self.compile_with(source, &CompilerOptions::with_initial_state(initial_state))
    }

    /// Compiles `source` into this program with explicit options.
    pub fn compile_with(
        &mut self,
        source: &str,
        options: &CompilerOptions,
    ) -> Result<(), CompileError> {
        self.clear();
        *self = parser::compile(source, options)?;
        Ok(())
    }

    /// Checks if the program has been successfully compiled.
    pub fn is_valid(&self) -> bool {
        self.generation != 0
    }

    pub fn clear(&mut self) {
        self.states.clear();
        self.generation = 0;
    }

    /// The identity tag of this compilation, `0` when invalid.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the handle of the initial state, or `None` if the program is invalid.
    pub fn initial_state(&self) -> Option<StateHandle> {
        self.is_valid()
            .then(|| StateHandle::new(0, self.generation))
    }

    /// Resolves a handle minted by this program. Handles of other programs are rejected.
    pub fn state(&self, handle: StateHandle) -> Option<&State> {
        if !self.is_valid() || handle.generation != self.generation {
            return None;
        }
        self.states.get(handle.index)
    }

    pub fn state_name(&self, handle: StateHandle) -> Option<&str> {
        self.state(handle).map(State::name)
    }

    /// Finds the action for `symbol` in the state referenced by `handle`.
    pub fn find_action(&self, handle: StateHandle, symbol: char) -> Option<&Action> {
        self.state(handle)?.action(symbol)
    }

    /// Looks up a state handle by name.
    pub fn find_state(&self, name: &str) -> Option<StateHandle> {
        self.states
            .iter()
            .position(|state| state.name == name)
            .map(|index| StateHandle::new(index, self.generation))
    }

    /// Iterates over all states in table order.
    pub fn states(&self) -> impl Iterator<Item = (StateHandle, &State)> {
        let generation = self.generation;
        self.states
            .iter()
            .enumerate()
            .map(move |(index, state)| (StateHandle::new(index, generation), state))
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.states.iter().map(State::transition_count).sum()
    }
}
