// vim: set ai et ts=4 sw=4 sts=4:
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use log::debug;

use super::Puzzle;
use super::super::grid::CellState;

/// Notification hook for solver progress: called with the affected cell and
/// its new state after every tentative assignment and every backtracking
/// reset. This is the sole integration point for rendering layers; anything
/// that wants to watch the search (animation, logging, tests) implements
/// this and gets injected at solver construction.
pub trait StepObserver {
    fn on_step(&mut self, row: usize, col: usize, state: CellState);
}

/// Observer that ignores every step.
pub struct NullObserver;
impl StepObserver for NullObserver {
    fn on_step(&mut self, _row: usize, _col: usize, _state: CellState) {}
}

#[derive(PartialEq, Debug)]
pub enum SolveError {
    Unsolvable,
    Interrupted,
}
impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SolveError: {}", match self {
            SolveError::Unsolvable  => "no feasible assignment exists for the given clues",
            SolveError::Interrupted => "solving was cancelled before completion",
        })
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct SolveReport {
    /// Tentative assignments plus backtracking resets performed during the
    /// search.
    pub steps: u64,
    /// Set when a second satisfying assignment was discovered; the board
    /// still holds the first solution found.
    pub ambiguous: bool,
}

/// One decision frame per visited cell. Branches are tried in a fixed
/// order: Blocked first, then Filled, then the frame is exhausted.
struct Frame {
    cell: usize,
    next: Option<CellState>,
}
impl Frame {
    fn new(cell: usize) -> Self {
        Frame { cell, next: Some(CellState::Blocked) }
    }
    fn take_branch(&mut self) -> Option<CellState> {
        let state = self.next;
        self.next = match state {
            Some(CellState::Blocked) => Some(CellState::Filled),
            _                        => None,
        };
        state
    }
}

/// Depth-first search over the cells in row-major order, with the per-line
/// feasibility check as pruning oracle. The search runs on an explicit
/// stack of decision frames rather than the call stack, which keeps large
/// grids away from recursion limits and gives a natural point to poll for
/// cancellation between frames.
pub struct Solver<'a> {
    puzzle: &'a mut Puzzle,
    observer: &'a mut dyn StepObserver,
    detect_ambiguity: bool,
    cancel: Option<Arc<AtomicBool>>,
    steps: u64,
}

impl<'a> Solver<'a> {
    pub fn new(puzzle: &'a mut Puzzle, observer: &'a mut dyn StepObserver) -> Self {
        Solver {
            puzzle,
            observer,
            detect_ambiguity: true,
            cancel: None,
            steps: 0,
        }
    }

    /// When disabled, the solver returns at the first complete assignment
    /// without probing for a second one.
    pub fn set_detect_ambiguity(&mut self, enabled: bool) {
        self.detect_ambiguity = enabled;
    }
    /// Install a flag that an external party can raise to abort the search;
    /// it is polled once per frame visit.
    pub fn set_cancel_flag(&mut self, flag: Arc<AtomicBool>) {
        self.cancel = Some(flag);
    }

    fn assign(&mut self, row: usize, col: usize, state: CellState) {
        self.puzzle.set_cell(row, col, state);
        self.steps += 1;
        self.observer.on_step(row, col, state);
    }

    fn cancelled(&self) -> bool {
        self.cancel.as_ref().map_or(false, |flag| flag.load(Ordering::Relaxed))
    }

    /// Copy a saved assignment back onto the board, notifying the observer
    /// of every cell that differs.
    fn restore(&mut self, cells: &[Vec<CellState>]) {
        for (y, line) in cells.iter().enumerate() {
            for (x, &state) in line.iter().enumerate() {
                if self.puzzle.cell(y, x) != state {
                    self.puzzle.set_cell(y, x, state);
                    self.observer.on_step(y, x, state);
                }
            }
        }
    }

    /// Solve the board in place. On success the board holds the first
    /// solution found; on failure every cell is reset to Unknown so no
    /// misleading partial assignment is left behind.
    pub fn solve(&mut self) -> Result<SolveReport, SolveError> {
        let width = self.puzzle.width();
        let total = width * self.puzzle.height();

        let mut stack = Vec::<Frame>::with_capacity(total);
        stack.push(Frame::new(0));
        let mut first_solution: Option<Vec<Vec<CellState>>> = None;

        while let Some(frame) = stack.last_mut() {
            if self.cancelled() {
                self.puzzle.clear_cells();
                return Err(SolveError::Interrupted);
            }
            let cell = frame.cell;
            let (row, col) = (cell / width, cell % width);
            match frame.take_branch() {
                Some(state) => {
                    self.assign(row, col, state);
                    if !self.puzzle.cell_feasible(row, col) {
                        continue; // next branch of the same frame
                    }
                    if cell + 1 < total {
                        stack.push(Frame::new(cell + 1));
                        continue;
                    }
                    // every cell is assigned and feasible: a complete solution
                    if first_solution.is_none() {
                        debug!("solution found after {} steps", self.steps);
                        if !self.detect_ambiguity {
                            return Ok(SolveReport { steps: self.steps, ambiguous: false });
                        }
                        first_solution = Some(self.puzzle.snapshot_cells());
                        // keep searching the remaining branches for a second one
                    } else {
                        debug!("second solution found after {} steps", self.steps);
                        let cells = first_solution.take().unwrap();
                        self.restore(&cells);
                        return Ok(SolveReport { steps: self.steps, ambiguous: true });
                    }
                }
                None => {
                    // both branches failed here; undo and back up one level
                    self.assign(row, col, CellState::Unknown);
                    stack.pop();
                }
            }
        }

        match first_solution {
            Some(cells) => {
                debug!("search space exhausted, solution is unique");
                self.restore(&cells);
                Ok(SolveReport { steps: self.steps, ambiguous: false })
            }
            None => {
                debug!("search space exhausted without a solution");
                self.puzzle.clear_cells();
                Err(SolveError::Unsolvable)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::ValidationError;
    use super::super::super::row::Clue;
    use super::super::super::grid::CellState::{Unknown, Blocked, Filled};

    fn clues(lists: &[&[usize]]) -> Vec<Clue> {
        lists.iter().map(|list| Clue::new(list.to_vec())).collect()
    }

    /// Observer that records every notification in order.
    struct Recorder {
        steps: Vec<(usize, usize, CellState)>,
    }
    impl Recorder {
        fn new() -> Self { Recorder { steps: Vec::new() } }
    }
    impl StepObserver for Recorder {
        fn on_step(&mut self, row: usize, col: usize, state: CellState) {
            self.steps.push((row, col, state));
        }
    }

    #[test]
    fn solves_the_plus_sign() {
        let lines: &[&[usize]] = &[&[1], &[1], &[5], &[1], &[1]];
        let mut puzzle = Puzzle::from_clues(clues(lines), clues(lines)).unwrap();
        let mut observer = NullObserver;
        let report = Solver::new(&mut puzzle, &mut observer).solve().unwrap();
        assert!(!report.ambiguous);
        assert!(report.steps > 0);
        for y in 0..5 {
            for x in 0..5 {
                let expected = if y == 2 || x == 2 { Filled } else { Blocked };
                assert_eq!(puzzle.cell(y, x), expected, "cell ({}, {})", y, x);
            }
        }
    }

    #[test]
    fn inconsistent_clues_reset_the_board() {
        // row wants a filled cell, column forbids one
        let mut puzzle = Puzzle::from_clues(clues(&[&[1]]), clues(&[&[0]])).unwrap();
        let mut observer = NullObserver;
        let result = Solver::new(&mut puzzle, &mut observer).solve();
        assert_eq!(result.unwrap_err(), SolveError::Unsolvable);
        assert_eq!(puzzle.cell(0, 0), Unknown);
    }

    #[test]
    fn overlong_clue_is_rejected_before_solving() {
        // sum exceeding the line length never reaches the solver
        let result = Puzzle::from_clues(clues(&[&[3], &[1]]), clues(&[&[1], &[1]]));
        assert!(matches!(result.unwrap_err(), ValidationError::SpanTooLong { .. }));
    }

    #[test]
    fn ambiguous_puzzle_is_flagged_and_keeps_first_solution() {
        // two diagonal solutions
        let mut puzzle = Puzzle::from_clues(clues(&[&[1], &[1]]), clues(&[&[1], &[1]])).unwrap();
        let mut observer = NullObserver;
        let report = Solver::new(&mut puzzle, &mut observer).solve().unwrap();
        assert!(report.ambiguous);
        // branch order (Blocked before Filled) makes the anti-diagonal the
        // first solution found
        assert_eq!(puzzle.cell(0, 0), Blocked);
        assert_eq!(puzzle.cell(0, 1), Filled);
        assert_eq!(puzzle.cell(1, 0), Filled);
        assert_eq!(puzzle.cell(1, 1), Blocked);
    }

    #[test]
    fn first_only_mode_skips_the_ambiguity_probe() {
        let mut puzzle = Puzzle::from_clues(clues(&[&[1], &[1]]), clues(&[&[1], &[1]])).unwrap();
        let mut observer = Recorder::new();
        let mut solver = Solver::new(&mut puzzle, &mut observer);
        solver.set_detect_ambiguity(false);
        let report = solver.solve().unwrap();
        assert!(!report.ambiguous);
        assert_eq!(puzzle.cell(0, 1), Filled);
        assert_eq!(puzzle.cell(1, 0), Filled);
    }

    #[test]
    fn observer_sees_assignments_resets_and_restoration() {
        let mut puzzle = Puzzle::from_clues(clues(&[&[1]]), clues(&[&[1]])).unwrap();
        let mut observer = Recorder::new();
        let report = Solver::new(&mut puzzle, &mut observer).solve().unwrap();
        // Blocked fails, Filled completes; the ambiguity probe then resets
        // the cell and the first solution is restored at the end
        assert_eq!(observer.steps, vec![
            (0, 0, Blocked),
            (0, 0, Filled),
            (0, 0, Unknown),
            (0, 0, Filled),
        ]);
        assert_eq!(report.steps, 3); // restoration is notified but not counted
        assert_eq!(puzzle.cell(0, 0), Filled);
    }

    #[test]
    fn cancellation_aborts_and_clears() {
        let mut puzzle = Puzzle::from_clues(clues(&[&[1], &[1]]), clues(&[&[1], &[1]])).unwrap();
        let mut observer = NullObserver;
        let mut solver = Solver::new(&mut puzzle, &mut observer);
        let flag = Arc::new(AtomicBool::new(true));
        solver.set_cancel_flag(Arc::clone(&flag));
        assert_eq!(solver.solve().unwrap_err(), SolveError::Interrupted);
        assert_eq!(puzzle.cell(0, 0), Unknown);
    }

    #[test]
    fn solving_derived_clues_reproduces_them() {
        // author a grid, derive its clues, solve from the clues alone, and
        // the solved board must derive back to the same clues
        let authored = Puzzle::from_answer_grid(vec![
            vec![false, true,  false],
            vec![true,  true,  true],
            vec![false, true,  false],
        ]);
        let mut puzzle = Puzzle::from_clues(authored.row_clues().to_vec(),
                                            authored.col_clues().to_vec()).unwrap();
        let mut observer = NullObserver;
        Solver::new(&mut puzzle, &mut observer).solve().unwrap();
        let (rows, cols) = puzzle.derive_clues();
        assert_eq!(&rows[..], authored.row_clues());
        assert_eq!(&cols[..], authored.col_clues());
    }

    #[test]
    fn empty_puzzle_solves_to_all_blocked() {
        let mut puzzle = Puzzle::from_clues(clues(&[&[0], &[0]]), clues(&[&[0], &[0]])).unwrap();
        let mut observer = NullObserver;
        let report = Solver::new(&mut puzzle, &mut observer).solve().unwrap();
        assert!(!report.ambiguous);
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(puzzle.cell(y, x), Blocked);
            }
        }
    }
}
