// vim: set ai et ts=4 sw=4 sts=4:
pub mod solver;

use std::fmt;
use ansi_term::{Colour, Style};

use super::grid::{Grid, CellState};
use super::row::Clue;
use super::util::{ralign, ralign_colored, lalign_colored, Direction, Direction::*};

#[derive(PartialEq, Debug)]
pub enum ValidationError {
    NoLines(Direction),
    ZeroRun { direction: Direction, index: usize },
    SpanTooLong { direction: Direction, index: usize, span: usize, length: usize },
}
impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ValidationError: {}", match self {
            ValidationError::NoLines(direction) =>
                format!("puzzle has no {} clues", direction),
            ValidationError::ZeroRun { direction, index } =>
                format!("{} clue {} mixes a zero-length run with other runs", direction, index),
            ValidationError::SpanTooLong { direction, index, span, length } =>
                format!("{} clue {} needs {} cells but the line only has {}",
                    direction, index, span, length),
        })
    }
}

/// The puzzle model: row/column clue sets plus the grid of cell states the
/// solver works in. When the puzzle was authored by drawing rather than by
/// typing clues, the drawn grid is kept around as the answer key.
#[derive(Debug)]
pub struct Puzzle {
    row_clues: Vec<Clue>,
    col_clues: Vec<Clue>,
    grid: Grid,
    answer_key: Option<Vec<Vec<bool>>>,
}

impl Puzzle {
    /// Build a puzzle-to-solve from explicit clue sets; all cells start
    /// Unknown. Every clue is checked against its line length up front so
    /// the solver never has to discover a hopeless clue by exhausting the
    /// search.
    pub fn from_clues(row_clues: Vec<Clue>, col_clues: Vec<Clue>)
        -> Result<Self, ValidationError>
    {
        if row_clues.is_empty() {
            return Err(ValidationError::NoLines(Horizontal));
        }
        if col_clues.is_empty() {
            return Err(ValidationError::NoLines(Vertical));
        }
        let width = col_clues.len();
        let height = row_clues.len();
        for (y, clue) in row_clues.iter().enumerate() {
            Self::validate_clue(clue, width, Horizontal, y)?;
        }
        for (x, clue) in col_clues.iter().enumerate() {
            Self::validate_clue(clue, height, Vertical, x)?;
        }
        Ok(Puzzle {
            row_clues,
            col_clues,
            grid: Grid::new(width, height),
            answer_key: None,
        })
    }

    fn validate_clue(clue: &Clue, line_len: usize, direction: Direction, index: usize)
        -> Result<(), ValidationError>
    {
        if !clue.is_empty_line() && clue.runs().iter().any(|&len| len == 0) {
            return Err(ValidationError::ZeroRun { direction, index });
        }
        if clue.min_span() > line_len {
            return Err(ValidationError::SpanTooLong {
                direction,
                index,
                span: clue.min_span(),
                length: line_len,
            });
        }
        Ok(())
    }

    /// Build a puzzle from a fully drawn answer grid: both clue sets are
    /// derived from the drawing, the cells are set to match it, and the
    /// drawing is retained as the answer key.
    pub fn from_answer_grid(answer: Vec<Vec<bool>>) -> Self {
        assert!(!answer.is_empty() && !answer[0].is_empty(), "answer grid must be non-empty");
        assert!(answer.iter().all(|line| line.len() == answer[0].len()), "answer grid must be rectangular");

        let height = answer.len();
        let width = answer[0].len();
        let row_clues = answer.iter()
                              .map(|line| Clue::derive(line))
                              .collect::<Vec<_>>();
        let col_clues = (0..width).map(|x| {
                                      let line = answer.iter().map(|row| row[x]).collect::<Vec<_>>();
                                      Clue::derive(&line)
                                  })
                                  .collect::<Vec<_>>();
        let mut grid = Grid::new(width, height);
        for y in 0..height {
            for x in 0..width {
                grid.set(y, x, CellState::from(answer[y][x]));
            }
        }
        Puzzle {
            row_clues,
            col_clues,
            grid,
            answer_key: Some(answer),
        }
    }

    pub fn width(&self) -> usize { self.grid.width() }
    pub fn height(&self) -> usize { self.grid.height() }

    pub fn cell(&self, row: usize, col: usize) -> CellState {
        self.grid.get(row, col)
    }
    /// Single-cell write surface, shared by interactive authoring and the
    /// solver's own mutation path.
    pub fn set_cell(&mut self, row: usize, col: usize, state: CellState) {
        self.grid.set(row, col, state);
    }
    pub fn clear_cells(&mut self) {
        self.grid.clear();
    }

    pub fn row_clues(&self) -> &[Clue] { &self.row_clues }
    pub fn col_clues(&self) -> &[Clue] { &self.col_clues }

    pub fn line_count(&self, direction: Direction) -> usize {
        match direction {
            Horizontal => self.height(),
            Vertical   => self.width(),
        }
    }
    pub fn line_clue(&self, direction: Direction, index: usize) -> &Clue {
        match direction {
            Horizontal => &self.row_clues[index],
            Vertical   => &self.col_clues[index],
        }
    }
    pub fn line_states(&self, direction: Direction, index: usize) -> Vec<CellState> {
        match direction {
            Horizontal => self.grid.row_line(index).collect(),
            Vertical   => self.grid.col_line(index).collect(),
        }
    }

    pub fn line_feasible(&self, direction: Direction, index: usize) -> bool {
        self.line_clue(direction, index)
            .is_feasible(&self.line_states(direction, index))
    }
    /// Feasibility of both lines through a cell; this is the solver's
    /// pruning oracle after a tentative assignment.
    pub fn cell_feasible(&self, row: usize, col: usize) -> bool {
        self.line_feasible(Horizontal, row) && self.line_feasible(Vertical, col)
    }
    /// A line is satisfied once it is fully decided and matches its clue.
    pub fn line_satisfied(&self, direction: Direction, index: usize) -> bool {
        let states = self.line_states(direction, index);
        states.iter().all(|&s| s != CellState::Unknown)
            && self.line_clue(direction, index).is_feasible(&states)
    }

    /// Re-derive both clue sets from the current cell states, treating
    /// everything that isn't Filled as empty. Only meaningful on a fully
    /// decided board.
    pub fn derive_clues(&self) -> (Vec<Clue>, Vec<Clue>) {
        let rows = (0..self.height()).map(|y| {
                                         let line = self.grid.row_line(y)
                                                             .map(|s| s == CellState::Filled)
                                                             .collect::<Vec<_>>();
                                         Clue::derive(&line)
                                     })
                                     .collect();
        let cols = (0..self.width()).map(|x| {
                                        let line = self.grid.col_line(x)
                                                            .map(|s| s == CellState::Filled)
                                                            .collect::<Vec<_>>();
                                        Clue::derive(&line)
                                    })
                                    .collect();
        (rows, cols)
    }

    /// Compare the current cells against the answer key, if the puzzle has
    /// one: a cell agrees when it is Filled exactly where the key is true.
    pub fn check_against_key(&self) -> Option<bool> {
        let key = self.answer_key.as_ref()?;
        let matches = key.iter().enumerate().all(|(y, line)| {
            line.iter().enumerate().all(|(x, &filled)| {
                (self.grid.get(y, x) == CellState::Filled) == filled
            })
        });
        Some(matches)
    }

    pub fn has_answer_key(&self) -> bool {
        self.answer_key.is_some()
    }

    pub(crate) fn snapshot_cells(&self) -> Vec<Vec<CellState>> {
        self.grid.snapshot()
    }
}

impl Puzzle {
    // helper functions for Puzzle::render
    fn fmt_line(prefix: &str,
                left_delim: &str,
                right_delim: &str,
                columnwise_separator: &str,
                subdivision: Option<usize>,
                content_parts: &[String])
        -> String
    {
        let mut result = format!("{} {}", prefix, left_delim);
        for (idx, s) in content_parts.iter().enumerate() {
            result.push_str(s);
            if let Some(subdiv) = subdivision {
                if ((idx+1) % subdiv == 0) && (idx < content_parts.len()-1) {
                    result.push_str(columnwise_separator);
                }
            }
        }
        result.push_str(&format!("{}\n", right_delim));
        result
    }

    fn fmt_header(&self, line_idx: usize,
                         prefix_len: usize,
                         subdivision: Option<usize>,
                         emit_color: bool)
        -> String
    {
        let mut content_parts = Vec::<String>::new();
        for (x, col) in self.col_clues.iter().enumerate() {
            let part: String;
            if line_idx < col.runs().len() {
                let entry = col.runs()[col.runs().len()-1-line_idx];
                let style = match self.line_satisfied(Vertical, x) {
                    true  => Style::new().fg(Colour::Fixed(241)),
                    false => Style::default(),
                };
                let colored = style.paint(entry.to_string());
                part = format!(" {}", lalign_colored(&colored, 2, emit_color));
            } else {
                part = format!(" {:-2}", " ");
            }
            content_parts.push(part);
        }

        Self::fmt_line(
            &ralign("", prefix_len),
            " ",
            " ",
            " ",
            subdivision,
            &content_parts
        )
    }

    /// Text rendering with box-drawing borders, stacked column clues on top
    /// and right-aligned row clues on the left. If a subdivision is given,
    /// a visual separator is inserted across the grid every Nth row/col.
    pub fn render(&self, subdivision: Option<usize>, emit_color: bool)
        -> String
    {
        let row_prefixes = (0..self.height())
            .map(|y| self.row_clues[y].to_colored_string(self.line_satisfied(Horizontal, y)))
            .collect::<Vec<_>>();

        // note: ANSIString::len() returns length WITHOUT ansi color escape sequences
        let prefix_len = row_prefixes.iter()
                                     .map(|prefix| prefix.len())
                                     .max().unwrap();
        let max_col_runs = self.col_clues.iter()
                                         .map(|col| col.runs().len())
                                         .max().unwrap();

        let mut result = String::new();
        for i in (0..max_col_runs).rev() {
            result.push_str(&self.fmt_header(i, prefix_len, subdivision, emit_color));
        }

        // top board line
        result.push_str(&Self::fmt_line(
            &ralign("", prefix_len),
            "\u{2554}",
            "\u{2557}",
            "\u{2564}",
            subdivision,
            &(0..self.width()).map(|_| String::from("\u{2550}\u{2550}\u{2550}"))
                              .collect::<Vec<_>>()
        ));

        for y in 0..self.height() {
            // board content line
            result.push_str(&Self::fmt_line(
                &ralign_colored(&row_prefixes[y], prefix_len, emit_color),
                "\u{2551}",
                "\u{2551}",
                "\u{2502}",
                subdivision,
                &self.grid.row_line(y)
                          .map(|s| format!(" {:1} ", s.fmt_visual()))
                          .collect::<Vec<_>>()
            ));

            // horizontal subdivisor line
            if let Some(subdiv) = subdivision {
                if ((y+1) % subdiv == 0) && (y != self.height()-1) {
                    result.push_str(&Self::fmt_line(
                        &ralign("", prefix_len),
                        "\u{255F}",
                        "\u{2562}",
                        "\u{253C}",
                        subdivision,
                        &(0..self.width()).map(|_| String::from("\u{2500}\u{2500}\u{2500}"))
                                          .collect::<Vec<_>>()
                    ));
                }
            }
        }
        // bottom board line
        result.push_str(&Self::fmt_line(
            &ralign("", prefix_len),
            "\u{255A}",
            "\u{255D}",
            "\u{2567}",
            subdivision,
            &(0..self.width()).map(|_| String::from("\u{2550}\u{2550}\u{2550}"))
                              .collect::<Vec<_>>()
        ));

        result
    }
}
impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render(Some(5), false))
    }
}
