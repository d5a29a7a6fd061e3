//! Options controlling compilation and execution.

use serde::{Deserialize, Serialize};

use crate::types::{
    DEFAULT_BLANK_SYMBOL, DEFAULT_COMMENT, DEFAULT_INITIAL_STATE, MAX_EXECUTION_STEPS,
};

/// Options for [`compile`](crate::parser::compile).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    /// Name of the state execution starts in. It always becomes state `0`.
    pub initial_state: String,
    /// Character that starts a comment running to the end of the line. It must not be able to
    /// start a token, see [`compile`](crate::parser::compile).
    pub comment: char,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            initial_state: DEFAULT_INITIAL_STATE.to_string(),
            comment: DEFAULT_COMMENT,
        }
    }
}

impl CompilerOptions {
    pub fn with_initial_state(initial_state: impl Into<String>) -> Self {
        Self {
            initial_state: initial_state.into(),
            ..Self::default()
        }
    }
}

/// Options for a run of the interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    /// Symbol filling the tape outside of its seeded content.
    pub blank: char,
    /// Maximum number of transitions applied by one `execute` call.
    pub step_limit: usize,
    /// Whether running out of steps is reported as an error.
    pub fail_on_limit: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            blank: DEFAULT_BLANK_SYMBOL,
            step_limit: MAX_EXECUTION_STEPS,
            fail_on_limit: true,
        }
    }
}
