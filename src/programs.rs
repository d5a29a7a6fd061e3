//! This module embeds a small set of sample programs and provides the `ProgramManager`, a
//! read-only registry to look them up by index or name.

use tracing::error;

use crate::config::CompilerOptions;
use crate::parser::compile;
use crate::program::Program;
use crate::types::{TuringMachineError, DEFAULT_COMMENT};

// Default embedded programs, with the tape each one is meant to start from.
const PROGRAM_TEXTS: [(&str, &str); 4] = [
    (include_str!("../programs/hello-world.tm"), ""),
    (include_str!("../programs/binary-increment.tm"), "1011"),
    (include_str!("../programs/unary-addition.tm"), "111+11"),
    (include_str!("../programs/busy-beaver-3.tm"), ""),
];

/// A compiled sample program.
#[derive(Debug, Clone)]
pub struct SampleProgram {
    /// Taken from the first comment line of the source.
    pub name: String,
    pub source: &'static str,
    pub initial_tape: &'static str,
    pub program: Program,
}

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<SampleProgram> = load_samples();
}

fn load_samples() -> Vec<SampleProgram> {
    let options = CompilerOptions::default();

    PROGRAM_TEXTS
        .iter()
        .filter_map(|&(source, initial_tape)| {
            let name = program_name(source);
            match compile(source, &options) {
                Ok(program) => Some(SampleProgram {
                    name,
                    source,
                    initial_tape,
                    program,
                }),
                Err(e) => {
                    error!(program = %name, error = %e, "Failed to compile sample program");
                    None
                }
            }
        })
        .collect()
}

/// Extracts the program name from the leading comment line, e.g. `; Hello World`.
fn program_name(source: &str) -> String {
    source
        .lines()
        .next()
        .and_then(|line| line.trim().strip_prefix(DEFAULT_COMMENT))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Untitled".to_string())
}

/// Turns a display name into the identifier accepted on the command line, e.g. `hello-world`.
fn slug(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// Get a program by its index
    pub fn get_program_by_index(
        index: usize,
    ) -> Result<&'static SampleProgram, TuringMachineError> {
        PROGRAMS
            .get(index)
            .ok_or_else(|| TuringMachineError::NotFound(format!("index {}", index)))
    }

    /// Get a program by its name. Both the display name and its dashed lowercase form match,
    /// case insensitively.
    pub fn get_program_by_name(name: &str) -> Result<&'static SampleProgram, TuringMachineError> {
        PROGRAMS
            .iter()
            .find(|sample| {
                sample.name.eq_ignore_ascii_case(name) || slug(&sample.name) == slug(name)
            })
            .ok_or_else(|| TuringMachineError::NotFound(format!("'{}'", name)))
    }

    /// List all program names
    pub fn list_program_names() -> Vec<String> {
        PROGRAMS.iter().map(|sample| sample.name.clone()).collect()
    }

    /// List the identifiers accepted by [`get_program_by_name`](Self::get_program_by_name).
    pub fn list_program_ids() -> Vec<String> {
        PROGRAMS.iter().map(|sample| slug(&sample.name)).collect()
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, TuringMachineError> {
        let sample = Self::get_program_by_index(index)?;

        Ok(ProgramInfo {
            index,
            id: slug(&sample.name),
            name: sample.name.clone(),
            initial_tape: sample.initial_tape.to_string(),
            state_count: sample.program.state_count(),
            transition_count: sample.program.transition_count(),
        })
    }

    /// Search for programs by name
    pub fn search_programs(query: &str) -> Vec<usize> {
        let query = query.to_lowercase();

        PROGRAMS
            .iter()
            .enumerate()
            .filter(|(_, sample)| sample.name.to_lowercase().contains(&query))
            .map(|(index, _)| index)
            .collect()
    }

    /// Get the source text of a program by its index
    pub fn get_program_text_by_index(index: usize) -> Result<&'static str, TuringMachineError> {
        Self::get_program_by_index(index).map(|sample| sample.source)
    }
}

#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub initial_tape: String,
    pub state_count: usize,
    pub transition_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunOptions;
    use crate::machine::TuringMachine;
    use crate::tape::Tape;
    use crate::types::{Step, DEFAULT_BLANK_SYMBOL};

    fn run(name: &str, input: &str) -> (String, usize) {
        let sample = ProgramManager::get_program_by_name(name).unwrap();
        let tape = Tape::with_content(DEFAULT_BLANK_SYMBOL, input, 0);
        let mut machine = TuringMachine::new(&sample.program, tape);

        assert_eq!(machine.run(&RunOptions::default()), Ok(Step::Halt));
        (machine.tape().content(), machine.step_count())
    }

    #[test]
    fn test_all_programs_compile() {
        assert_eq!(ProgramManager::get_program_count(), PROGRAM_TEXTS.len());
        for sample in PROGRAMS.iter() {
            assert!(
                sample.program.is_valid(),
                "Program '{}' is invalid",
                sample.name
            );
        }
    }

    #[test]
    fn test_program_names() {
        let names = ProgramManager::list_program_names();
        assert_eq!(
            names,
            vec![
                "Hello World",
                "Binary Increment",
                "Unary Addition",
                "Busy Beaver 3",
            ]
        );
        assert_eq!(
            ProgramManager::list_program_ids(),
            vec![
                "hello-world",
                "binary-increment",
                "unary-addition",
                "busy-beaver-3",
            ]
        );
    }

    #[test]
    fn test_get_program_by_index() {
        let sample = ProgramManager::get_program_by_index(0).unwrap();
        assert_eq!(sample.name, "Hello World");

        let result = ProgramManager::get_program_by_index(999);
        assert!(matches!(result, Err(TuringMachineError::NotFound(_))));
    }

    #[test]
    fn test_get_program_by_name() {
        assert!(ProgramManager::get_program_by_name("hello-world").is_ok());
        assert!(ProgramManager::get_program_by_name("Hello World").is_ok());
        assert!(ProgramManager::get_program_by_name("BUSY-BEAVER-3").is_ok());

        let result = ProgramManager::get_program_by_name("Nonexistent");
        assert!(matches!(result, Err(TuringMachineError::NotFound(_))));
    }

    #[test]
    fn test_get_program_info() {
        let info = ProgramManager::get_program_info(1).unwrap();
        assert_eq!(info.index, 1);
        assert_eq!(info.id, "binary-increment");
        assert_eq!(info.initial_tape, "1011");
        assert_eq!(info.state_count, 2);
        assert_eq!(info.transition_count, 6);

        assert!(ProgramManager::get_program_info(999).is_err());
    }

    #[test]
    fn test_search_programs() {
        assert_eq!(ProgramManager::search_programs("binary"), vec![1]);
        assert_eq!(ProgramManager::search_programs("A"), vec![1, 2, 3]);
        assert!(ProgramManager::search_programs("nonexistent").is_empty());
    }

    #[test]
    fn test_get_program_text() {
        let text = ProgramManager::get_program_text_by_index(0).unwrap();
        assert!(text.starts_with("; Hello World"));
        assert!(ProgramManager::get_program_text_by_index(999).is_err());
    }

    #[test]
    fn test_hello_world() {
        assert_eq!(run("hello-world", ""), ("Hello_World!".to_string(), 12));
    }

    #[test]
    fn test_binary_increment() {
        assert_eq!(run("binary-increment", "1011").0, "1100");
        assert_eq!(run("binary-increment", "111").0, "1000");
    }

    #[test]
    fn test_unary_addition() {
        assert_eq!(run("unary-addition", "111+11"), ("11111".to_string(), 8));
    }

    #[test]
    fn test_busy_beaver() {
        assert_eq!(run("busy-beaver-3", ""), ("111111".to_string(), 14));
    }
}
