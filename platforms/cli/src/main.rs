use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tmc::types::{DEFAULT_BLANK_SYMBOL, DEFAULT_INITIAL_STATE};
use tmc::{
    analyze, compile, encode, CompilerOptions, Program, ProgramLoader, ProgramManager, RunOptions,
    RuntimeError, Step, Tape, TuringMachine, TuringMachineError, MAX_EXECUTION_STEPS,
};
use tracing::{debug, warn};
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_SAMPLE: &str = "hello-world";

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// The program file to compile and execute. Runs a bundled sample when omitted
    program: Option<PathBuf>,

    /// Name of the initial state
    #[clap(short = 's', long, default_value = DEFAULT_INITIAL_STATE)]
    initial_state: String,

    /// Symbol filling every cell that was never written
    #[clap(short, long, default_value_t = DEFAULT_BLANK_SYMBOL)]
    blank: char,

    /// The initial tape content
    #[clap(short, long)]
    tape: Option<String>,

    /// Initial head position within the tape content
    #[clap(long, default_value_t = 0)]
    head: usize,

    /// Maximum number of steps to execute
    #[clap(short = 'n', long, default_value_t = MAX_EXECUTION_STEPS)]
    steps: usize,

    /// Print the tape instead of failing when the step limit is reached
    #[clap(long)]
    allow_unfinished: bool,

    /// Print a JSON summary of the run
    #[clap(long)]
    json: bool,

    /// Trace each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Run a bundled sample program by name
    #[clap(long, conflicts_with = "program")]
    sample: Option<String>,

    /// List the bundled sample programs
    #[clap(long)]
    list: bool,

    /// Print the compiled program in canonical form and exit
    #[clap(long)]
    listing: bool,
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("warn,tmc=trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if cli.list {
        list_samples();
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn list_samples() {
    for index in 0..ProgramManager::get_program_count() {
        if let Ok(info) = ProgramManager::get_program_info(index) {
            println!(
                "{:<18} {} ({} states, {} transitions)",
                info.id, info.name, info.state_count, info.transition_count
            );
        }
    }
}

/// Compiles the requested program and returns it along with the tape it should start from.
fn load(cli: &Cli) -> Result<(Program, String), TuringMachineError> {
    let options = CompilerOptions::with_initial_state(cli.initial_state.as_str());

    match &cli.program {
        Some(path) => {
            debug!(path = %path.display(), "Loading program");
            let program = ProgramLoader::load_program(path, &options)?;
            Ok((program, cli.tape.clone().unwrap_or_default()))
        }
        None => {
            let name = cli.sample.as_deref().unwrap_or(DEFAULT_SAMPLE);
            let sample = ProgramManager::get_program_by_name(name)?;
            debug!(sample = %sample.name, "Loading sample program");
            let program = compile(sample.source, &options)?;
            let tape = cli
                .tape
                .clone()
                .unwrap_or_else(|| sample.initial_tape.to_string());
            Ok((program, tape))
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, TuringMachineError> {
    let (program, content) = load(cli)?;

    for warning in analyze(&program) {
        warn!("{}", warning);
    }

    if cli.listing {
        print!("{}", encode(&program));
        return Ok(ExitCode::SUCCESS);
    }

    let options = RunOptions {
        blank: cli.blank,
        step_limit: cli.steps,
        fail_on_limit: !cli.allow_unfinished,
    };

    let tape = Tape::with_content(options.blank, &content, cli.head);
    let mut machine = TuringMachine::new(&program, tape);
    let result = machine.run(&options);

    let outcome = report(&machine, &result, cli.json);
    if let Some(message) = &outcome.stderr {
        eprintln!("{}", message);
    }
    if let Some(output) = &outcome.stdout {
        println!("{}", output);
    }

    Ok(if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// What a finished run prints, and whether it counts as a success.
struct Report {
    stdout: Option<String>,
    stderr: Option<String>,
    success: bool,
}

/// Builds the output of a run. The tape is printed even when the run failed.
fn report(machine: &TuringMachine<'_>, result: &Result<Step, RuntimeError>, json: bool) -> Report {
    let error = result.as_ref().err();

    if json {
        return match serde_json::to_string_pretty(&machine.summary(error)) {
            Ok(summary) => Report {
                stdout: Some(summary),
                stderr: None,
                success: error.is_none(),
            },
            Err(e) => Report {
                stdout: None,
                stderr: Some(format!("Failed to serialize summary: {}", e)),
                success: false,
            },
        };
    }

    if let Ok(Step::Continue) = result {
        warn!(
            steps = machine.step_count(),
            "Step limit reached before halting"
        );
    }

    Report {
        stdout: Some(machine.tape().to_string()),
        stderr: error.map(ToString::to_string),
        success: error.is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_source(source: &str, content: &str, options: &RunOptions, json: bool) -> Report {
        let program = compile(source, &CompilerOptions::default()).unwrap();
        let tape = Tape::with_content(options.blank, content, 0);
        let mut machine = TuringMachine::new(&program, tape);
        let result = machine.run(options);
        report(&machine, &result, json)
    }

    #[test]
    fn test_halted_run_prints_tape() {
        let options = RunOptions::default();
        let outcome = run_source("0 * H r 1\n1 * i r halt\n", "", &options, false);
        assert!(outcome.success);
        assert_eq!(outcome.stdout.as_deref(), Some("Hi"));
        assert_eq!(outcome.stderr, None);
    }

    #[test]
    fn test_step_limit_still_prints_tape() {
        let options = RunOptions {
            step_limit: 3,
            ..RunOptions::default()
        };
        let outcome = run_source("0 * 1 r 0\n", "", &options, false);

        assert!(!outcome.success);
        assert_eq!(outcome.stdout.as_deref(), Some("111"));
        assert_eq!(
            outcome.stderr.as_deref(),
            Some("Step limit of 3 exceeded without halting")
        );
    }

    #[test]
    fn test_missing_transition_still_prints_tape() {
        let outcome = run_source("0 a b r halt\n", "x", &RunOptions::default(), false);

        assert!(!outcome.success);
        assert_eq!(outcome.stdout.as_deref(), Some("x"));
        assert!(outcome.stderr.unwrap().contains("symbol 'x'"));
    }

    #[test]
    fn test_unfinished_run_is_a_success() {
        let options = RunOptions {
            step_limit: 2,
            fail_on_limit: false,
            ..RunOptions::default()
        };
        let outcome = run_source("0 * 1 r 0\n", "", &options, false);

        assert!(outcome.success);
        assert_eq!(outcome.stdout.as_deref(), Some("11"));
    }

    #[test]
    fn test_json_summary_carries_error() {
        let options = RunOptions {
            step_limit: 1,
            ..RunOptions::default()
        };
        let outcome = run_source("0 * 1 r 0\n", "", &options, true);

        assert!(!outcome.success);
        assert_eq!(outcome.stderr, None);
        let summary: tmc::Summary = serde_json::from_str(&outcome.stdout.unwrap()).unwrap();
        assert!(!summary.halted);
        assert_eq!(summary.steps, 1);
        assert_eq!(summary.tape, "1");
        assert_eq!(
            summary.error.as_deref(),
            Some("Step limit of 1 exceeded without halting")
        );
    }
}
