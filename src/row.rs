// vim: set ai et ts=4 sw=4 sts=4:
use std::fmt;
use ansi_term::{Colour, Style, ANSIString};

use super::grid::CellState;

/// The ordered run lengths of one row or column, read left-to-right resp.
/// top-to-bottom. A line with no filled cells is represented as the single
/// entry `[0]`.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Clue {
    runs: Vec<usize>,
}

impl Clue {
    pub fn new(runs: Vec<usize>) -> Self {
        // normalize the empty representation
        if runs.is_empty() {
            return Clue { runs: vec![0] };
        }
        Clue { runs }
    }

    pub fn runs(&self) -> &[usize] {
        &self.runs
    }
    pub fn is_empty_line(&self) -> bool {
        self.runs == [0]
    }
    /// Total number of filled cells this clue demands.
    pub fn total(&self) -> usize {
        self.runs.iter().sum()
    }
    /// Minimum number of cells needed to place all runs with one spacer
    /// between each pair.
    pub fn min_span(&self) -> usize {
        match self.is_empty_line() {
            true  => 0,
            false => self.total() + self.runs.len() - 1,
        }
    }
    fn run_len(&self, index: usize) -> usize {
        self.runs.get(index).copied().unwrap_or(0)
    }

    /// Derive the clue for one fully assigned line of an answer grid:
    /// accumulate contiguous filled runs in reading order.
    pub fn derive(line: &[bool]) -> Self {
        let mut runs = Vec::<usize>::new();
        let mut count: usize = 0;
        for &filled in line {
            if filled {
                count += 1;
            } else if count > 0 {
                runs.push(count);
                count = 0;
            }
        }
        if count > 0 {
            runs.push(count);
        }
        Clue::new(runs)
    }

    /// Decide whether a (possibly partial) line can still be completed to
    /// match this clue exactly. Single left-to-right scan; on the first
    /// Unknown cell the remainder of the line is treated optimistically, so
    /// a `true` answer means "not yet disproved", not "provably
    /// completable". Only safe as a pruning oracle inside search.
    pub fn is_feasible(&self, states: &[CellState]) -> bool {
        let total = self.total();
        let mut clue_index: usize = 0;
        let mut run_count: usize = 0;
        let mut total_filled: usize = 0;

        for (i, &state) in states.iter().enumerate() {
            match state {
                CellState::Unknown => {
                    // can the cells from here on still hold the missing
                    // filled count? if so, stop scanning and accept
                    let cells_left = states.len() - i;
                    return total <= cells_left + total_filled;
                }
                CellState::Blocked => {
                    if run_count > 0 {
                        // a run just ended; it must match its clue entry exactly
                        if run_count != self.run_len(clue_index) {
                            return false;
                        }
                        clue_index += 1;
                        run_count = 0;
                    }
                }
                CellState::Filled => {
                    run_count += 1;
                    total_filled += 1;
                    if total_filled > total {
                        return false;
                    }
                    if run_count > self.run_len(clue_index) {
                        return false;
                    }
                }
            }
        }

        // line is fully decided; every run was checked as it ended, so the
        // line matches iff the filled total does
        total_filled == total
    }

    pub fn to_colored_string(&self, satisfied: bool) -> ANSIString {
        let style = match satisfied {
            true  => Style::new().fg(Colour::Fixed(241)),
            false => Style::default(),
        };
        style.paint(self.to_string())
    }
}

impl fmt::Display for Clue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts = self.runs.iter()
                             .map(|len| len.to_string())
                             .collect::<Vec<_>>();
        write!(f, "{}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::grid::CellState::{Unknown, Blocked, Filled};

    #[test]
    fn empty_runs_normalize_to_zero() {
        assert_eq!(Clue::new(vec![]), Clue::new(vec![0]));
        assert!(Clue::new(vec![]).is_empty_line());
        assert_eq!(Clue::new(vec![0]).total(), 0);
        assert_eq!(Clue::new(vec![0]).min_span(), 0);
    }

    #[test]
    fn min_span_counts_spacers() {
        assert_eq!(Clue::new(vec![5]).min_span(), 5);
        assert_eq!(Clue::new(vec![2, 1]).min_span(), 4);
        assert_eq!(Clue::new(vec![1, 1, 1]).min_span(), 5);
    }

    #[test]
    fn derive_accumulates_runs() {
        assert_eq!(Clue::derive(&[true, true, false, true]), Clue::new(vec![2, 1]));
        assert_eq!(Clue::derive(&[false, false, false]), Clue::new(vec![0]));
        assert_eq!(Clue::derive(&[true, true, true]), Clue::new(vec![3]));
        // run reaching the end of the line is still emitted
        assert_eq!(Clue::derive(&[false, true]), Clue::new(vec![1]));
    }

    #[test]
    fn blank_line_is_feasible_when_span_fits() {
        // a line of Unknowns is feasible whenever sum + spacers fit
        let clue = Clue::new(vec![2, 1]);
        assert!(clue.is_feasible(&[Unknown; 5]));
        assert!(clue.is_feasible(&[Unknown; 4]));
        assert!(!clue.is_feasible(&[Unknown; 2]));
    }

    #[test]
    fn zero_clue_rejects_any_filled_cell() {
        let clue = Clue::new(vec![0]);
        assert!(clue.is_feasible(&[Blocked, Blocked, Blocked]));
        assert!(!clue.is_feasible(&[Blocked, Filled, Unknown]));
        assert!(clue.is_feasible(&[Blocked, Unknown, Unknown]));
    }

    #[test]
    fn exact_match_on_decided_line() {
        let clue = Clue::new(vec![2, 1]);
        assert!(clue.is_feasible(&[Filled, Filled, Blocked, Filled, Blocked]));
        assert!(clue.is_feasible(&[Blocked, Filled, Filled, Blocked, Filled]));
        // first run of 3 exceeds the clue entry of 2
        assert!(!clue.is_feasible(&[Filled, Filled, Filled, Blocked, Blocked]));
        // too few filled cells in a fully decided line
        assert!(!clue.is_feasible(&[Filled, Filled, Blocked, Blocked, Blocked]));
    }

    #[test]
    fn run_ending_short_is_infeasible() {
        let clue = Clue::new(vec![2]);
        assert!(!clue.is_feasible(&[Filled, Blocked, Unknown]));
    }

    #[test]
    fn unknown_is_optimistic() {
        // not actually completable ([1,1] needs a spacer), but the scan
        // stops at the first Unknown with enough cells left
        let clue = Clue::new(vec![1, 1]);
        assert!(clue.is_feasible(&[Filled, Unknown, Unknown]));
    }

    #[test]
    fn too_many_filled_cells_overall() {
        let clue = Clue::new(vec![1]);
        assert!(!clue.is_feasible(&[Filled, Blocked, Filled]));
    }

    #[test]
    fn display_joins_with_spaces() {
        assert_eq!(Clue::new(vec![2, 1]).to_string(), "2 1");
        assert_eq!(Clue::new(vec![]).to_string(), "0");
    }
}
