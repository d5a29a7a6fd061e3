//! This module defines the core data structures and types used throughout the Turing Machine
//! compiler and interpreter, including transition actions, state handles, run summaries and
//! error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The default blank symbol used to fill the tape outside of its meaningful span.
pub const DEFAULT_BLANK_SYMBOL: char = '_';
/// The symbol used in program definitions as the wildcard key ("any other symbol")
/// and as the wildcard replacement ("leave the cell unchanged").
pub const WILDCARD_SYMBOL: char = '*';
/// The default character that starts a comment running to the end of the line.
pub const DEFAULT_COMMENT: char = ';';
/// The default name of the initial state.
pub const DEFAULT_INITIAL_STATE: &str = "0";
/// The reserved destination name that terminates execution. Matched case-insensitively.
pub const HALT_STATE: &str = "halt";
/// The maximum allowed size for a Turing Machine program in bytes.
pub const MAX_PROGRAM_SIZE: usize = 65536; // 64KB
/// The default number of steps to execute before giving control back to the caller.
pub const MAX_EXECUTION_STEPS: usize = 10000;

/// Returns `true` if `name` is the reserved halt name, ignoring case.
pub fn is_halt_state(name: &str) -> bool {
    name.len() == HALT_STATE.len() && name.eq_ignore_ascii_case(HALT_STATE)
}

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// Returns the head offset for this direction: `-1`, `+1` or `0`.
    pub fn offset(self) -> isize {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
            Direction::Stay => 0,
        }
    }

    /// Maps a direction character of the source language to a `Direction`.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '*' | 's' | 'S' | '0' => Some(Direction::Stay),
            'r' | 'R' | '+' => Some(Direction::Right),
            'l' | 'L' | '-' => Some(Direction::Left),
            _ => None,
        }
    }

    /// The canonical source character for this direction.
    pub fn symbol(self) -> char {
        match self {
            Direction::Left => 'l',
            Direction::Right => 'r',
            Direction::Stay => '*',
        }
    }
}

/// The key side of a transition entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    /// Matches exactly this symbol.
    Symbol(char),
    /// Matches any symbol the state does not list explicitly.
    Wildcard,
}

impl Key {
    pub fn from_symbol(symbol: char) -> Self {
        if symbol == WILDCARD_SYMBOL {
            Key::Wildcard
        } else {
            Key::Symbol(symbol)
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Symbol(symbol) => write!(f, "{symbol}"),
            Key::Wildcard => write!(f, "{WILDCARD_SYMBOL}"),
        }
    }
}

/// An opaque reference to a state of one compiled [`Program`](crate::Program).
///
/// The handle carries the generation of the program that minted it. A program rejects
/// handles whose generation differs from its own, so a handle can never index into a
/// foreign or recompiled table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateHandle {
    pub(crate) index: usize,
    pub(crate) generation: u64,
}

impl StateHandle {
    pub(crate) fn new(index: usize, generation: u64) -> Self {
        Self { index, generation }
    }

    /// Position of the state in the table. The initial state is always `0`.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Where the machine goes after an action has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Continue in the referenced state.
    State(StateHandle),
    /// Stop execution successfully.
    Halt,
}

/// The effect taken when a (state, symbol) pair matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    /// The symbol to write under the head, or `None` to leave the cell as is.
    pub write: Option<char>,
    /// The head movement applied after writing.
    pub direction: Direction,
    /// The next state, or the halt sentinel.
    pub next: Destination,
}

impl Action {
    /// Checks if this action terminates execution.
    pub fn is_final(&self) -> bool {
        self.next == Destination::Halt
    }
}

/// Represents the outcome of a Turing Machine execution step or run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The machine is still running and can be resumed.
    Continue,
    /// The machine reached the halt sentinel.
    Halt,
}

/// A snapshot of a machine after a run, suitable for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Whether the machine reached the halt sentinel.
    pub halted: bool,
    /// Number of transitions applied so far.
    pub steps: usize,
    /// Name of the current state, `None` once halted.
    pub state: Option<String>,
    /// The trimmed tape content.
    pub tape: String,
    /// Position of the head relative to the start of `tape`.
    pub head: usize,
    /// The error message of the run, if it failed.
    pub error: Option<String>,
}

/// The category of a compilation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileErrorKind {
    #[error("symbol '{0}' is not allowed in state name")]
    InvalidStateNameCharacter(char),
    #[error("symbol {0:?} is not allowed as state key")]
    InvalidKeyCharacter(char),
    #[error("symbol {0:?} is not allowed as replace value")]
    InvalidReplacementCharacter(char),
    #[error("invalid direction '{0}' (expected one of * s S 0 r R + l L -)")]
    InvalidDirection(char),
    #[error("state \"{state}\" has multiple entries for symbol '{key}'")]
    DuplicateEntry { state: String, key: Key },
    #[error("invalid state name \"{0}\", this name is reserved for the final state")]
    ReservedStateName(String),
    #[error("unexpected end of input, state definition is incomplete")]
    IncompleteDefinition,
    #[error("state \"{state}\" is undefined, but referenced (first reference by state \"{parent}\")")]
    UndefinedState { state: String, parent: String },
    #[error("initial state is undefined (should have name \"{0}\")")]
    UndefinedInitialState(String),
    #[error("no source code provided")]
    EmptySource,
    #[error("symbol {0:?} cannot be used as comment marker")]
    InvalidCommentMarker(char),
}

/// A compilation failure with the 1-based position of the offending character.
///
/// `line` and `column` are both `0` when the failure has no source location, which is the
/// case for empty sources and for an initial state that is never mentioned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Compilation error: {kind} (line {line}, column {column})")]
pub struct CompileError {
    pub kind: CompileErrorKind,
    pub line: usize,
    pub column: usize,
}

impl CompileError {
    pub fn new(kind: CompileErrorKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }

    /// The human readable description, without the position.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Errors raised while executing a compiled program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("Program has been halted")]
    AlreadyHalted,
    #[error("Program has not been compiled")]
    InvalidProgram,
    #[error("State \"{state}\" doesn't have an entry for symbol '{symbol}'")]
    NoTransition { state: String, symbol: char },
    #[error("Step limit of {0} exceeded without halting")]
    StepLimitExceeded(usize),
}

/// Represents various errors that can occur during Turing Machine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TuringMachineError {
    /// Indicates that the program source could not be compiled.
    #[error(transparent)]
    Compile(#[from] CompileError),
    /// Indicates a failure while executing a compiled program.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    /// Indicates an error related to file system operations, such as reading program files.
    #[error("File error: {0}")]
    FileError(String),
    /// Indicates that a name or index does not refer to a bundled program.
    #[error("Program not found: {0}")]
    NotFound(String),
}
