//! This module defines the `TuringMachine` struct, which executes a compiled `Program` against
//! a `Tape`. It handles the current state, halting, and the step budget of a run.

use tracing::{debug, trace};

use crate::config::RunOptions;
use crate::program::Program;
use crate::tape::Tape;
use crate::types::{Destination, RuntimeError, StateHandle, Step, Summary};

/// Executes a compiled program on a tape it owns.
///
/// The program is only borrowed, so several machines can run the same program on
/// different tapes. Once the halt sentinel is reached the machine stays halted until
/// [`restart`](Self::restart) is called.
pub struct TuringMachine<'p> {
    program: &'p Program,
    tape: Tape,
    state: Option<StateHandle>,
    halted: bool,
    step_count: usize,
}

impl<'p> TuringMachine<'p> {
    /// Creates a new `TuringMachine` positioned in the program's initial state.
    ///
    /// # Arguments
    ///
    /// * `program` - The compiled program to execute.
    /// * `tape` - The tape to execute it on.
    pub fn new(program: &'p Program, tape: Tape) -> Self {
        Self {
            program,
            tape,
            state: program.initial_state(),
            halted: false,
            step_count: 0,
        }
    }

    /// Executes a single transition.
    ///
    /// # Returns
    ///
    /// * `Ok(Step::Continue)` if the machine moved to another state.
    /// * `Ok(Step::Halt)` if the transition led to the halt sentinel.
    /// * `Err(RuntimeError)` if the machine is halted, the program is invalid, or no entry
    ///   matches the symbol under the head. The tape is left untouched in that case.
    pub fn step(&mut self) -> Result<Step, RuntimeError> {
        if self.halted {
            return Err(RuntimeError::AlreadyHalted);
        }

        let program = self.program;
        let state = self
            .state
            .and_then(|handle| program.state(handle))
            .ok_or(RuntimeError::InvalidProgram)?;

        let symbol = self.tape.symbol();
        let action = *state
            .action(symbol)
            .ok_or_else(|| RuntimeError::NoTransition {
                state: state.name().to_string(),
                symbol,
            })?;

        if let Some(write) = action.write {
            self.tape.write(write);
        }
        let changed = self.tape.is_current_symbol_changed();
        self.tape.move_head(action.direction);
        self.step_count += 1;

        trace!(
            step = self.step_count,
            state = state.name(),
            %symbol,
            changed,
            direction = ?action.direction,
            "applied transition"
        );

        match action.next {
            Destination::Halt => {
                self.halted = true;
                self.state = None;
                Ok(Step::Halt)
            }
            Destination::State(next) => {
                self.state = Some(next);
                Ok(Step::Continue)
            }
        }
    }

    /// Runs up to `step_limit` transitions.
    ///
    /// Returns `Ok(Step::Halt)` as soon as the halt sentinel is reached. If the budget runs
    /// out first, the machine stays resumable and the result is `Ok(Step::Continue)`, or
    /// `Err(RuntimeError::StepLimitExceeded)` when `fail_on_limit` is set.
    pub fn execute(
        &mut self,
        step_limit: usize,
        fail_on_limit: bool,
    ) -> Result<Step, RuntimeError> {
        if self.halted {
            return Err(RuntimeError::AlreadyHalted);
        }
        if !self.program.is_valid() {
            return Err(RuntimeError::InvalidProgram);
        }

        for _ in 0..step_limit {
            if self.step()? == Step::Halt {
                debug!(steps = self.step_count, "machine halted");
                return Ok(Step::Halt);
            }
        }

        debug!(steps = self.step_count, step_limit, "step limit reached");
        if fail_on_limit {
            Err(RuntimeError::StepLimitExceeded(step_limit))
        } else {
            Ok(Step::Continue)
        }
    }

    /// Runs with the step budget and limit policy of `options`.
    pub fn run(&mut self, options: &RunOptions) -> Result<Step, RuntimeError> {
        self.execute(options.step_limit, options.fail_on_limit)
    }

    /// Returns to the initial state and clears the halted flag. The tape is kept as is.
    pub fn restart(&mut self) {
        self.state = self.program.initial_state();
        self.halted = false;
        self.step_count = 0;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Returns the current state, or `None` once halted.
    pub fn state(&self) -> Option<StateHandle> {
        self.state
    }

    /// Returns the name of the current state, or `None` once halted.
    pub fn state_name(&self) -> Option<&'p str> {
        let program = self.program;
        self.state.and_then(|handle| program.state_name(handle))
    }

    /// Returns the total number of transitions applied since creation or the last restart.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn tape_mut(&mut self) -> &mut Tape {
        &mut self.tape
    }

    pub fn into_tape(self) -> Tape {
        self.tape
    }

    /// Captures the machine's current situation, together with the error of the last run.
    pub fn summary(&self, error: Option<&RuntimeError>) -> Summary {
        Summary {
            halted: self.halted,
            steps: self.step_count,
            state: self.state_name().map(str::to_string),
            tape: self.tape.content(),
            head: self.tape.content_head(),
            error: error.map(ToString::to_string),
        }
    }
}
