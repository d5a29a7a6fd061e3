//! This module defines the `Tape`, a one-dimensional symbol store that is conceptually infinite
//! in both directions. It is backed by a single contiguous buffer which grows by a fixed factor
//! whenever the head gets close to one of its ends.

use std::fmt;

use crate::types::{Direction, DEFAULT_BLANK_SYMBOL};

/// Minimum number of cells reserved on each side of the seeded content.
pub const INITIAL_SIZE: usize = 64;
/// Multiplier applied to the buffer size on every growth.
pub const RESIZE_FACTOR: usize = 3;

/// A self-resizing tape with a read/write head.
///
/// Cells in `[begin, end)` form the meaningful span. Every cell outside of it holds the blank
/// symbol, so extending the span never has to write anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<char>,
    blank: char,
    begin: usize,
    end: usize,
    head: usize,
    last_move: Direction,
    head_initial: char,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new(DEFAULT_BLANK_SYMBOL)
    }
}

impl Tape {
    /// Creates an empty tape filled with `blank`.
    pub fn new(blank: char) -> Self {
        Self::with_content(blank, "", 0)
    }

    /// Creates a tape holding `content`, with the head on the cell at `start`.
    pub fn with_content(blank: char, content: &str, start: usize) -> Self {
        let mut tape = Self {
            cells: Vec::new(),
            blank,
            begin: 0,
            end: 0,
            head: 0,
            last_move: Direction::Stay,
            head_initial: blank,
        };
        tape.reset(blank, content, start);
        tape
    }

    /// Reinitializes the tape with `content` and places the head on the cell at `start`,
    /// clamped into `[0, content.len()]`.
    ///
    /// The existing buffer is reused when the content fits and the blank symbol is unchanged.
    pub fn reset(&mut self, blank: char, content: &str, start: usize) {
        let content: Vec<char> = content.chars().collect();
        let block = INITIAL_SIZE.max(content.len());
        let size = block * RESIZE_FACTOR;

        if blank == self.blank && self.cells.len() >= size {
            self.cells.fill(blank);
        } else {
            self.cells = vec![blank; size];
        }

        self.blank = blank;
        self.begin = block;
        self.cells[block..block + content.len()].copy_from_slice(&content);
        self.head = block + start.min(content.len());
        self.end = (block + content.len()).max(self.head + 1);
        self.last_move = Direction::Stay;
        self.head_initial = self.cells[self.head];
    }

    /// Moves the head one cell in `direction`, growing the buffer ahead of time if needed.
    pub fn move_head(&mut self, direction: Direction) {
        let offset = direction.offset();
        while !self.has_headroom(offset) {
            self.grow();
        }

        self.head = self.head.wrapping_add_signed(offset);
        self.include_head();

        self.last_move = direction;
        self.head_initial = self.cells[self.head];
    }

    /// Returns the symbol under the head.
    pub fn symbol(&self) -> char {
        self.cells[self.head]
    }

    /// Overwrites the symbol under the head.
    pub fn write(&mut self, symbol: char) {
        self.cells[self.head] = symbol;
        // A trim can leave the head past the span.
        self.include_head();
    }

    /// Checks if the cell under the head holds a different value than when the head arrived.
    pub fn is_current_symbol_changed(&self) -> bool {
        self.cells[self.head] != self.head_initial
    }

    /// Returns the direction of the last head movement.
    pub fn last_move(&self) -> Direction {
        self.last_move
    }

    /// Returns the blank symbol of this tape.
    pub fn blank(&self) -> char {
        self.blank
    }

    /// Returns the head position relative to the start of the meaningful span.
    pub fn head(&self) -> usize {
        self.head - self.begin
    }

    /// Returns the meaningful span, untrimmed.
    pub fn span(&self) -> &[char] {
        &self.cells[self.begin..self.end]
    }

    /// Number of cells in the meaningful span.
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Number of cells in the backing buffer.
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Drops blank cells from both ends of the meaningful span.
    ///
    /// The span start never moves past the head cell. The span end retreats to the last
    /// non-blank cell, so a blank head to the right of the content is left outside the span.
    /// The backing buffer is left untouched.
    pub fn trim_redundant_spaces(&mut self) {
        let (begin, end) = self.trimmed_bounds();
        self.begin = begin;
        self.end = end;
    }

    /// Returns the tape content as observed from outside: the trimmed meaningful span.
    pub fn content(&self) -> String {
        let (begin, end) = self.trimmed_bounds();
        self.cells[begin..end].iter().collect()
    }

    /// Returns the head position relative to the start of [`content`](Self::content).
    pub fn content_head(&self) -> usize {
        self.head - self.trimmed_bounds().0
    }

    fn trimmed_bounds(&self) -> (usize, usize) {
        let mut begin = self.begin;
        while begin < self.head && self.cells[begin] == self.blank {
            begin += 1;
        }

        let mut end = self.end;
        while end > begin && self.cells[end - 1] == self.blank {
            end -= 1;
        }

        (begin, end)
    }

    fn include_head(&mut self) {
        if self.head < self.begin {
            self.begin = self.head;
        }
        if self.head >= self.end {
            self.end = self.head + 1;
        }
    }

    /// Checks that the head can move by `offset` and still have one cell of room on each side.
    fn has_headroom(&self, offset: isize) -> bool {
        self.head
            .checked_add_signed(offset)
            .is_some_and(|target| target >= 1 && target + 1 < self.cells.len())
    }

    /// Grows the buffer by `RESIZE_FACTOR`, keeping the old content in the middle third.
    fn grow(&mut self) {
        let shift = self.cells.len().max(1);
        let mut cells = vec![self.blank; shift * RESIZE_FACTOR];
        cells[shift..shift + self.cells.len()].copy_from_slice(&self.cells);

        self.cells = cells;
        self.begin += shift;
        self.end += shift;
        self.head += shift;
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.content())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_places_content_and_clamps_head() {
        let mut tape = Tape::with_content('_', "abc", 1);
        assert_eq!(tape.content(), "abc");
        assert_eq!(tape.symbol(), 'b');
        assert_eq!(tape.head(), 1);

        tape.reset('_', "xy", 99);
        assert_eq!(tape.head(), 2);
        assert_eq!(tape.symbol(), '_');
        assert_eq!(tape.span(), &['x', 'y', '_']);
        assert_eq!(tape.content(), "xy");
    }

    #[test]
    fn test_all_blank_tape_trims_to_nothing() {
        let mut tape = Tape::new('_');
        tape.trim_redundant_spaces();
        assert!(tape.is_empty());
        assert!(tape.content().is_empty());
        assert_eq!(tape.head(), 0);

        tape.move_head(Direction::Left);
        tape.move_head(Direction::Left);
        tape.trim_redundant_spaces();
        assert!(tape.is_empty());
        assert_eq!(tape.head(), 0);
    }

    #[test]
    fn test_trim_start_never_passes_the_head() {
        let mut tape = Tape::with_content('_', "__ab__", 0);
        tape.trim_redundant_spaces();
        assert_eq!(tape.content(), "__ab");
        assert_eq!(tape.head(), 0);

        let mut tape = Tape::with_content('_', "__ab__", 3);
        tape.trim_redundant_spaces();
        assert_eq!(tape.content(), "ab");
        assert_eq!(tape.head(), 1);

        let mut tape = Tape::with_content('_', "ab___", 2);
        tape.trim_redundant_spaces();
        assert_eq!(tape.content(), "ab");
        assert_eq!(tape.head(), 2);
    }

    #[test]
    fn test_trim_end_drops_blanks_up_to_the_head() {
        let mut tape = Tape::with_content('_', "ab___", 4);
        tape.trim_redundant_spaces();
        assert_eq!(tape.content(), "ab");
        assert_eq!(tape.span(), &['a', 'b']);
        assert_eq!(tape.head(), 4);
        assert_eq!(tape.content_head(), 4);
        assert_eq!(tape.symbol(), '_');

        tape.move_head(Direction::Left);
        assert_eq!(tape.span(), &['a', 'b', '_', '_']);
        assert_eq!(tape.content(), "ab");
    }

    #[test]
    fn test_write_after_trim_stays_in_span() {
        let mut tape = Tape::with_content('_', "ab__", 3);
        tape.trim_redundant_spaces();
        assert_eq!(tape.span(), &['a', 'b']);

        tape.write('c');
        tape.move_head(Direction::Left);
        assert_eq!(tape.content(), "ab_c");
    }

    #[test]
    fn test_moving_extends_span_with_blanks() {
        let mut tape = Tape::with_content('.', "a", 0);
        tape.move_head(Direction::Right);
        tape.move_head(Direction::Right);
        tape.write('b');
        assert_eq!(tape.span(), &['a', '.', 'b']);

        tape.move_head(Direction::Left);
        tape.move_head(Direction::Left);
        tape.move_head(Direction::Left);
        tape.write('z');
        assert_eq!(tape.content(), "za.b");
        assert_eq!(tape.head(), 0);
    }

    #[test]
    fn test_growth_preserves_cells_relative_to_head() {
        let mut tape = Tape::new('_');
        let initial_capacity = tape.capacity();

        let count = INITIAL_SIZE * RESIZE_FACTOR * 2;
        for i in 0..count {
            tape.write(char::from(b'a' + (i % 26) as u8));
            tape.move_head(Direction::Left);
        }

        assert!(tape.capacity() > initial_capacity);
        assert_eq!(tape.head(), 0);
        assert_eq!(tape.symbol(), '_');

        let expected: String = (0..count)
            .rev()
            .map(|i| char::from(b'a' + (i % 26) as u8))
            .collect();
        assert_eq!(tape.content(), format!("_{expected}"));

        for i in 0..count {
            tape.move_head(Direction::Right);
            let expected = char::from(b'a' + ((count - 1 - i) % 26) as u8);
            assert_eq!(tape.symbol(), expected);
        }
    }

    #[test]
    fn test_growth_to_the_right() {
        let mut tape = Tape::with_content('_', "x", 0);
        for _ in 0..(INITIAL_SIZE * RESIZE_FACTOR * 3) {
            tape.move_head(Direction::Right);
        }
        tape.write('y');
        let content = tape.content();
        assert!(content.starts_with('x'));
        assert!(content.ends_with('y'));
        assert_eq!(content.len(), INITIAL_SIZE * RESIZE_FACTOR * 3 + 1);
    }

    #[test]
    fn test_current_symbol_change_detection() {
        let mut tape = Tape::with_content('_', "ab", 0);
        assert!(!tape.is_current_symbol_changed());

        tape.write('a');
        assert!(!tape.is_current_symbol_changed());

        tape.write('x');
        assert!(tape.is_current_symbol_changed());

        tape.move_head(Direction::Right);
        assert_eq!(tape.last_move(), Direction::Right);
        assert!(!tape.is_current_symbol_changed());
    }

    #[test]
    fn test_reset_reuses_buffer_unless_blank_changes() {
        let mut tape = Tape::with_content('_', "abc", 0);
        for _ in 0..(INITIAL_SIZE * 2) {
            tape.move_head(Direction::Left);
        }
        let grown = tape.capacity();

        tape.reset('_', "de", 0);
        assert_eq!(tape.capacity(), grown);
        assert_eq!(tape.content(), "de");
        assert_eq!(tape.last_move(), Direction::Stay);

        tape.reset('#', "de", 0);
        assert_eq!(tape.blank(), '#');
        tape.move_head(Direction::Left);
        assert_eq!(tape.symbol(), '#');
        assert_eq!(tape.span(), &['#', 'd', 'e']);
    }

    #[test]
    fn test_long_seed_gets_room_on_both_sides() {
        let seed = "1".repeat(INITIAL_SIZE * 4);
        let mut tape = Tape::with_content('_', &seed, 0);
        assert_eq!(tape.capacity(), seed.len() * RESIZE_FACTOR);

        tape.move_head(Direction::Left);
        assert_eq!(tape.content(), format!("_{seed}"));
    }
}
