// vim: set ai et ts=4 sw=4 sts=4:
use std::fmt;
use std::io::{self, BufRead, Write};

use super::puzzle::Puzzle;
use super::row::Clue;

#[derive(Debug)]
pub enum FormatError {
    Io(io::Error),
    MissingLine { expected: &'static str, line: usize },
    BadHeader { expected: &'static str, line: usize },
    BadInteger { token: String, line: usize },
}
impl From<io::Error> for FormatError {
    fn from(other: io::Error) -> Self {
        FormatError::Io(other)
    }
}
impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FormatError: {}", match self {
            FormatError::Io(e) =>
                format!("could not read puzzle file: {}", e),
            FormatError::MissingLine { expected, line } =>
                format!("file ends at line {}, expected {}", line, expected),
            FormatError::BadHeader { expected, line } =>
                format!("line {}: expected header \"{}\"", line, expected),
            FormatError::BadInteger { token, line } =>
                format!("line {}: \"{}\" is not a non-negative integer", line, token),
        })
    }
}

/// Reader for the line-oriented puzzle definition format:
///
/// ```text
/// Rows:
/// <height>
/// Cols:
/// <width>
/// Row clues:
/// <height lines of space-separated run lengths>
/// Col clues:
/// <width lines of space-separated run lengths>
/// ```
///
/// A blank clue line denotes an empty line (the `[0]` clue). Structural
/// problems are rejected here, before any board is constructed; clue
/// consistency against the grid dimensions is the board's own concern.
pub struct Parser<R: BufRead> {
    lines: io::Lines<R>,
    line: usize,
}

impl<R: BufRead> Parser<R> {
    pub fn new(reader: R) -> Self {
        Parser {
            lines: reader.lines(),
            line: 0,
        }
    }

    pub fn parse(mut self) -> Result<(Vec<Clue>, Vec<Clue>), FormatError> {
        self.expect_header("Rows:")?;
        let height = self.parse_count("the row count")?;
        self.expect_header("Cols:")?;
        let width = self.parse_count("the column count")?;

        self.expect_header("Row clues:")?;
        let row_clues = (0..height).map(|_| self.parse_clue())
                                   .collect::<Result<Vec<_>, _>>()?;
        self.expect_header("Col clues:")?;
        let col_clues = (0..width).map(|_| self.parse_clue())
                                  .collect::<Result<Vec<_>, _>>()?;

        Ok((row_clues, col_clues))
    }

    fn next_line(&mut self, expected: &'static str) -> Result<String, FormatError> {
        self.line += 1;
        match self.lines.next() {
            Some(Ok(line)) => Ok(line),
            Some(Err(e))   => Err(FormatError::Io(e)),
            None           => Err(FormatError::MissingLine { expected, line: self.line }),
        }
    }

    fn expect_header(&mut self, header: &'static str) -> Result<(), FormatError> {
        let line = self.next_line(header)?;
        match line.trim() == header {
            true  => Ok(()),
            false => Err(FormatError::BadHeader { expected: header, line: self.line }),
        }
    }

    fn parse_count(&mut self, what: &'static str) -> Result<usize, FormatError> {
        let line = self.next_line(what)?;
        line.trim().parse().map_err(|_| FormatError::BadInteger {
            token: line.trim().to_string(),
            line: self.line,
        })
    }

    fn parse_clue(&mut self) -> Result<Clue, FormatError> {
        let line = self.next_line("a clue line")?;
        let runs = line.split_whitespace()
                       .map(|token| token.parse().map_err(|_| FormatError::BadInteger {
                           token: token.to_string(),
                           line: self.line,
                       }))
                       .collect::<Result<Vec<usize>, _>>()?;
        Ok(Clue::new(runs))
    }
}

/// Parse a puzzle definition into its row and column clue sets.
pub fn parse<R: BufRead>(reader: R) -> Result<(Vec<Clue>, Vec<Clue>), FormatError> {
    Parser::new(reader).parse()
}

/// Save/export counterpart of [parse]; the output parses back to the same
/// clue sets.
pub fn write<W: Write>(puzzle: &Puzzle, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "Rows:")?;
    writeln!(writer, "{}", puzzle.height())?;
    writeln!(writer, "Cols:")?;
    writeln!(writer, "{}", puzzle.width())?;
    writeln!(writer, "Row clues:")?;
    for clue in puzzle.row_clues() {
        writeln!(writer, "{}", clue)?;
    }
    writeln!(writer, "Col clues:")?;
    for clue in puzzle.col_clues() {
        writeln!(writer, "{}", clue)?;
    }
    Ok(())
}
