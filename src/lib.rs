//! This crate provides the core of a Turing Machine compiler and executor.
//! It includes modules for compiling the compact five-field program notation into a
//! transition table, a self-resizing tape, the machine that runs a table against a tape,
//! static analysis and listing of compiled programs, and a collection of sample programs.

pub mod analyzer;
pub mod config;
pub mod encoder;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod program;
pub mod programs;
pub mod tape;
pub mod types;

/// Re-exports the `analyze` function and `AnalysisWarning` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisWarning};
/// Re-exports the compiler and runtime options.
pub use config::{CompilerOptions, RunOptions};
/// Re-exports the listing function from the encoder module.
pub use encoder::encode;
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports the `compile` function from the parser module.
pub use parser::compile;
/// Re-exports the compiled program types.
pub use program::{Program, State};
/// Re-exports `ProgramInfo`, `ProgramManager`, `SampleProgram` and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, SampleProgram, PROGRAMS};
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports various types related to compilation and execution from the types module.
pub use types::{
    Action, CompileError, CompileErrorKind, Destination, Direction, Key, RuntimeError, StateHandle,
    Step, Summary, TuringMachineError, MAX_EXECUTION_STEPS, MAX_PROGRAM_SIZE,
};
