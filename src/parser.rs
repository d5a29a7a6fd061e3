//! This module provides the compiler for Turing Machine programs.
//!
//! The source is consumed one character at a time by a small finite-state tokenizer. Each
//! record has the form `STATE KEY REPLACEMENT DIRECTION NEXT_STATE`; tokens are separated by
//! whitespace and comments run from the comment marker to the end of the line. States may be
//! referenced before they are defined, and every reference is checked once the whole source
//! has been read.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::config::CompilerOptions;
use crate::program::{next_generation, Program, State};
use crate::types::{
    is_halt_state, Action, CompileError, CompileErrorKind, Destination, Direction, Key, StateHandle,
    WILDCARD_SYMBOL,
};

/// Compiles `source` into a fully resolved `Program`.
///
/// # Arguments
///
/// * `source` - The program text.
/// * `options` - The initial state name and comment marker to use.
///
/// # Returns
///
/// * `Ok(Program)` if every record is well formed and every referenced state is defined.
/// * `Err(CompileError)` describing the first problem, with its 1-based line and column.
pub fn compile(source: &str, options: &CompilerOptions) -> Result<Program, CompileError> {
    let marker = options.comment;
    if !is_comment_symbol(marker) {
        return Err(CompileError::new(CompileErrorKind::InvalidCommentMarker(marker), 0, 0));
    }
    if source.trim().is_empty() {
        return Err(CompileError::new(CompileErrorKind::EmptySource, 0, 0));
    }

    let result = Compiler::new(options).run(source);
    match &result {
        Ok(program) => debug!(
            states = program.state_count(),
            transitions = program.transition_count(),
            "compiled program"
        ),
        Err(error) => debug!(%error, "compilation failed"),
    }
    result
}

/// The five tokens of a record, in the order they are expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    StateName,
    Key,
    Replacement,
    Direction,
    NextState,
}

impl Token {
    fn next(self) -> Self {
        match self {
            Token::StateName => Token::Key,
            Token::Key => Token::Replacement,
            Token::Replacement => Token::Direction,
            Token::Direction => Token::NextState,
            Token::NextState => Token::StateName,
        }
    }
}

/// State of the tokenizer between two characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    /// Skipping whitespace until the given token starts.
    Seek(Token),
    /// Skipping a comment, then looking for the given token.
    Comment(Token),
    /// Reading the characters of a name token.
    Name(Token),
    /// A single-character token has been read and must be followed by a separator.
    Terminate(Token),
}

/// What the tokenizer produced for one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Effect {
    None,
    BeginName(char),
    ExtendName(char),
    EndName(Token),
    Key(Key),
    Replacement(Option<char>),
    Direction(Direction),
}

fn is_name_symbol(symbol: char) -> bool {
    symbol == '_' || symbol == '-' || symbol.is_ascii_alphanumeric()
}

fn is_token_symbol(symbol: char) -> bool {
    !symbol.is_whitespace() && !symbol.is_control()
}

/// A comment marker must not be able to start a token of its own.
fn is_comment_symbol(symbol: char) -> bool {
    is_token_symbol(symbol)
        && !is_name_symbol(symbol)
        && symbol != WILDCARD_SYMBOL
        && Direction::from_symbol(symbol).is_none()
}

/// Advances the tokenizer by one character.
fn transition(
    state: ParserState,
    symbol: char,
    comment: char,
) -> Result<(ParserState, Effect), CompileErrorKind> {
    match state {
        ParserState::Comment(token) if symbol == '\n' => {
            Ok((ParserState::Seek(token), Effect::None))
        }
        ParserState::Comment(_) => Ok((state, Effect::None)),
        ParserState::Seek(_) if symbol.is_whitespace() => Ok((state, Effect::None)),
        ParserState::Seek(token) if symbol == comment => {
            Ok((ParserState::Comment(token), Effect::None))
        }
        ParserState::Seek(token) => begin_token(token, symbol),
        ParserState::Name(token) => {
            if symbol.is_whitespace() {
                Ok((ParserState::Seek(token.next()), Effect::EndName(token)))
            } else if symbol == comment {
                Ok((ParserState::Comment(token.next()), Effect::EndName(token)))
            } else if is_name_symbol(symbol) {
                Ok((state, Effect::ExtendName(symbol)))
            } else {
                Err(CompileErrorKind::InvalidStateNameCharacter(symbol))
            }
        }
        ParserState::Terminate(token) => {
            if symbol.is_whitespace() {
                Ok((ParserState::Seek(token.next()), Effect::None))
            } else if symbol == comment {
                Ok((ParserState::Comment(token.next()), Effect::None))
            } else {
                Err(invalid_symbol(token, symbol))
            }
        }
    }
}

/// Handles the first character of a token.
fn begin_token(token: Token, symbol: char) -> Result<(ParserState, Effect), CompileErrorKind> {
    match token {
        Token::StateName | Token::NextState if is_name_symbol(symbol) => {
            Ok((ParserState::Name(token), Effect::BeginName(symbol)))
        }
        Token::Key if is_token_symbol(symbol) => Ok((
            ParserState::Terminate(token),
            Effect::Key(Key::from_symbol(symbol)),
        )),
        Token::Replacement if is_token_symbol(symbol) => Ok((
            ParserState::Terminate(token),
            Effect::Replacement((symbol != WILDCARD_SYMBOL).then_some(symbol)),
        )),
        Token::Direction => Direction::from_symbol(symbol)
            .map(|direction| (ParserState::Terminate(token), Effect::Direction(direction)))
            .ok_or(CompileErrorKind::InvalidDirection(symbol)),
        _ => Err(invalid_symbol(token, symbol)),
    }
}

fn invalid_symbol(token: Token, symbol: char) -> CompileErrorKind {
    match token {
        Token::StateName | Token::NextState => CompileErrorKind::InvalidStateNameCharacter(symbol),
        Token::Key => CompileErrorKind::InvalidKeyCharacter(symbol),
        Token::Replacement => CompileErrorKind::InvalidReplacementCharacter(symbol),
        Token::Direction => CompileErrorKind::InvalidDirection(symbol),
    }
}

/// Handles the end of input. Only a pending next-state name may still complete a record.
fn finish(state: ParserState) -> Result<Effect, CompileErrorKind> {
    match state {
        ParserState::Seek(Token::StateName) | ParserState::Comment(Token::StateName) => {
            Ok(Effect::None)
        }
        ParserState::Name(Token::NextState) => Ok(Effect::EndName(Token::NextState)),
        _ => Err(CompileErrorKind::IncompleteDefinition),
    }
}

/// Where a state was first mentioned.
struct Origin {
    parent: Option<usize>,
    line: usize,
    column: usize,
}

/// Semantic state of one compilation.
struct Compiler<'a> {
    options: &'a CompilerOptions,
    generation: u64,
    states: Vec<State>,
    origins: Vec<Origin>,
    indices: HashMap<String, usize>,
    defined: HashSet<String>,

    name: String,
    name_start: (usize, usize),
    current: usize,
    key: Key,
    write: Option<char>,
    direction: Direction,

    line: usize,
    column: usize,
}

impl<'a> Compiler<'a> {
    fn new(options: &'a CompilerOptions) -> Self {
        let mut compiler = Self {
            options,
            generation: next_generation(),
            states: Vec::new(),
            origins: Vec::new(),
            indices: HashMap::new(),
            defined: HashSet::new(),
            name: String::new(),
            name_start: (0, 0),
            current: 0,
            key: Key::Wildcard,
            write: None,
            direction: Direction::Stay,
            line: 1,
            column: 1,
        };

        // The initial state is always state 0, even before it is mentioned.
        compiler.reference(&options.initial_state, None, (0, 0));
        compiler
    }

    fn run(mut self, source: &str) -> Result<Program, CompileError> {
        let mut state = ParserState::Seek(Token::StateName);

        for symbol in source.chars() {
            let (next, effect) = transition(state, symbol, self.options.comment)
                .map_err(|kind| self.error(kind))?;
            self.apply(effect)?;
            state = next;

            if symbol == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }

        let effect = finish(state).map_err(|kind| self.error(kind))?;
        self.apply(effect)?;

        self.check_references()?;
        Ok(Program::from_states(self.states, self.generation))
    }

    fn apply(&mut self, effect: Effect) -> Result<(), CompileError> {
        match effect {
            Effect::None => {}
            Effect::BeginName(symbol) => {
                self.name.clear();
                self.name.push(symbol);
                self.name_start = (self.line, self.column);
            }
            Effect::ExtendName(symbol) => self.name.push(symbol),
            Effect::EndName(Token::NextState) => self.end_record(),
            Effect::EndName(_) => self.begin_record()?,
            Effect::Key(key) => {
                let state = &self.states[self.current];
                let taken = match key {
                    Key::Symbol(symbol) => state.actions.contains_key(&symbol),
                    Key::Wildcard => state.default.is_some(),
                };
                if taken {
                    return Err(self.error(CompileErrorKind::DuplicateEntry {
                        state: state.name.clone(),
                        key,
                    }));
                }
                self.key = key;
            }
            Effect::Replacement(write) => self.write = write,
            Effect::Direction(direction) => self.direction = direction,
        }
        Ok(())
    }

    /// The state name of a record has been read.
    fn begin_record(&mut self) -> Result<(), CompileError> {
        if is_halt_state(&self.name) {
            let (line, column) = self.name_start;
            return Err(CompileError::new(
                CompileErrorKind::ReservedStateName(self.name.clone()),
                line,
                column,
            ));
        }

        let name = std::mem::take(&mut self.name);
        self.current = self.reference(&name, None, self.name_start);
        Ok(())
    }

    /// The next-state name of a record has been read; the record is complete.
    fn end_record(&mut self) {
        let name = std::mem::take(&mut self.name);
        let next = if is_halt_state(&name) {
            Destination::Halt
        } else {
            let index = self.reference(&name, Some(self.current), self.name_start);
            Destination::State(StateHandle::new(index, self.generation))
        };

        let action = Action {
            write: self.write,
            direction: self.direction,
            next,
        };

        let state = &mut self.states[self.current];
        match self.key {
            Key::Symbol(symbol) => {
                state.actions.insert(symbol, action);
            }
            Key::Wildcard => state.default = Some(action),
        }
        self.defined.insert(state.name.clone());
    }

    /// Returns the index of the state called `name`, allocating it on first reference.
    fn reference(
        &mut self,
        name: &str,
        parent: Option<usize>,
        (line, column): (usize, usize),
    ) -> usize {
        if let Some(&index) = self.indices.get(name) {
            return index;
        }

        let index = self.states.len();
        self.states.push(State::new(name));
        self.origins.push(Origin {
            parent,
            line,
            column,
        });
        self.indices.insert(name.to_string(), index);
        index
    }

    /// Fails on the first state, in allocation order, that was referenced but never defined.
    fn check_references(&self) -> Result<(), CompileError> {
        for (index, (state, origin)) in self.states.iter().zip(&self.origins).enumerate() {
            if self.defined.contains(&state.name) {
                continue;
            }

            if index == 0 {
                return Err(CompileError::new(
                    CompileErrorKind::UndefinedInitialState(state.name.clone()),
                    0,
                    0,
                ));
            }

            let parent = origin
                .parent
                .map(|parent| self.states[parent].name.clone())
                .unwrap_or_default();

            return Err(CompileError::new(
                CompileErrorKind::UndefinedState {
                    state: state.name.clone(),
                    parent,
                },
                origin.line,
                origin.column,
            ));
        }

        Ok(())
    }

    fn error(&self, kind: CompileErrorKind) -> CompileError {
        CompileError::new(kind, self.line, self.column)
    }
}
