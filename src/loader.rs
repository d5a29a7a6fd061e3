//! This module provides the `ProgramLoader` struct, responsible for loading Turing Machine
//! programs from files and directories and compiling them.

use crate::config::CompilerOptions;
use crate::parser::compile;
use crate::program::Program;
use crate::types::{TuringMachineError, MAX_PROGRAM_SIZE};
use std::fs;
use std::path::{Path, PathBuf};

/// The extension of program files picked up by [`ProgramLoader::load_programs`].
pub const PROGRAM_EXTENSION: &str = "tm";

/// `ProgramLoader` is a utility struct for loading Turing Machine programs.
/// It provides methods to read program sources from files, to compile them, and to
/// discover and compile all `.tm` files within a specified directory.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Reads the source text of a program file.
    ///
    /// # Arguments
    ///
    /// * `path` - A reference to the `Path` of the file to read.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` with the file content.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read or exceeds
    ///   `MAX_PROGRAM_SIZE` bytes.
    pub fn load_source(path: &Path) -> Result<String, TuringMachineError> {
        let metadata = fs::metadata(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        if metadata.len() > MAX_PROGRAM_SIZE as u64 {
            return Err(TuringMachineError::FileError(format!(
                "File {} is larger than {} bytes",
                path.display(),
                MAX_PROGRAM_SIZE
            )));
        }

        fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })
    }

    /// Loads and compiles a single program file.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the file is successfully read and compiled.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * `Err(TuringMachineError::Compile)` if the content is not a valid program.
    pub fn load_program(
        path: &Path,
        options: &CompilerOptions,
    ) -> Result<Program, TuringMachineError> {
        let source = Self::load_source(path)?;
        Ok(compile(&source, options)?)
    }

    /// Compiles a program from the provided string content.
    pub fn load_program_from_string(
        content: &str,
        options: &CompilerOptions,
    ) -> Result<Program, TuringMachineError> {
        Ok(compile(content, options)?)
    }

    /// Loads all program files (`.tm` extension) from a given directory.
    ///
    /// Directories and files with other extensions are skipped. Every other entry yields
    /// either its path and compiled program or the error that prevented it.
    pub fn load_programs(
        directory: &Path,
        options: &CompilerOptions,
    ) -> Vec<Result<(PathBuf, Program), TuringMachineError>> {
        if !directory.exists() {
            return vec![Err(TuringMachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut results: Vec<_> = entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(TuringMachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                // Skip directories and non-.tm files
                if path.is_dir() || path.extension().is_none_or(|ext| ext != PROGRAM_EXTENSION) {
                    return None;
                }

                Some(Self::load_program(&path, options).map(|program| (path, program)))
            })
            .collect();

        // Directory order is platform dependent.
        results.sort_by_key(|result| match result {
            Ok((path, _)) => Some(path.clone()),
            Err(_) => None,
        });
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CompileErrorKind;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(path: &Path, content: &str) {
        let mut file = File::create(path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_load_valid_program() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.tm");
        write_file(&file_path, "; test\n0 a b r stop\nstop * * * halt\n");

        let result = ProgramLoader::load_program(&file_path, &CompilerOptions::default());
        assert!(result.is_ok());

        let program = result.unwrap();
        assert_eq!(program.state_count(), 2);
        assert!(program.find_state("stop").is_some());
    }

    #[test]
    fn test_load_invalid_program() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("invalid.tm");
        write_file(&file_path, "This is not a valid program");

        let result = ProgramLoader::load_program(&file_path, &CompilerOptions::default());
        match result {
            Err(TuringMachineError::Compile(error)) => {
                assert_eq!(error.kind, CompileErrorKind::InvalidKeyCharacter('s'));
            }
            other => panic!("Expected a compile error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = ProgramLoader::load_source(&dir.path().join("missing.tm"));
        assert!(matches!(result, Err(TuringMachineError::FileError(_))));
    }

    #[test]
    fn test_load_oversized_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("big.tm");
        write_file(&file_path, &" ".repeat(MAX_PROGRAM_SIZE + 1));

        let result = ProgramLoader::load_source(&file_path);
        match result {
            Err(TuringMachineError::FileError(message)) => assert!(message.contains("larger")),
            other => panic!("Expected a file error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_program_from_string_with_options() {
        let options = CompilerOptions::with_initial_state("start");
        let program =
            ProgramLoader::load_program_from_string("start * * r halt\n", &options).unwrap();
        let initial = program.initial_state().unwrap();
        assert_eq!(program.state_name(initial), Some("start"));
    }

    #[test]
    fn test_load_programs_from_directory() {
        let dir = tempdir().unwrap();

        write_file(&dir.path().join("valid.tm"), "0 a b r halt\n");
        write_file(&dir.path().join("invalid.tm"), "0 a b r 1\n");
        write_file(&dir.path().join("ignored.txt"), "Not a program");

        let results = ProgramLoader::load_programs(dir.path(), &CompilerOptions::default());

        // We should have 2 results: 1 success and 1 error
        assert_eq!(results.len(), 2);

        let success_count = results.iter().filter(|result| result.is_ok()).count();
        let error_count = results.iter().filter(|result| result.is_err()).count();

        assert_eq!(success_count, 1);
        assert_eq!(error_count, 1);
    }

    #[test]
    fn test_load_programs_from_missing_directory() {
        let directory = Path::new("/nonexistent/programs");
        let results = ProgramLoader::load_programs(directory, &CompilerOptions::default());
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(TuringMachineError::FileError(_))));
    }
}
