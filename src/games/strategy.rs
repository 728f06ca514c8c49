//! Pattern rules that score a grid.
//!
//! Each strategy is a pure function of the grid returning an integer
//! multiplier. New rules implement [`WinStrategy`] and are registered on the
//! engine; nothing else has to change.

use super::grid::{Grid, Symbol};

/// Minimum run length that pays
pub const MIN_RUN_LENGTH: usize = 3;

/// A pluggable win rule
pub trait WinStrategy: Send + Sync {
    /// Human-readable rule name
    fn name(&self) -> &str;

    /// Win multiplier for `grid` (to be multiplied by the bet)
    fn calculate(&self, grid: &Grid) -> u32;
}

/// Payout for a run of `length` copies of `symbol`
fn run_payout(length: usize, symbol: Symbol) -> u32 {
    if length >= MIN_RUN_LENGTH {
        length as u32 * u32::from(symbol)
    } else {
        0
    }
}

/// Horizontal runs anchored at column 0 of every row
#[derive(Debug, Default, Clone, Copy)]
pub struct LineWinStrategy;

impl WinStrategy for LineWinStrategy {
    fn name(&self) -> &str {
        "Line Win Calculation"
    }

    fn calculate(&self, grid: &Grid) -> u32 {
        grid.iter_rows()
            .map(|row| {
                let first = row[0];
                let run = row.iter().take_while(|&&s| s == first).count();
                run_payout(run, first)
            })
            .sum()
    }
}

/// Bouncing diagonal paths starting from every row but the last.
///
/// The path moves down one row per column, turns upward on the last row and
/// downward again on row 0. It stops at the first symbol that differs from
/// its column-0 symbol.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZigzagWinStrategy;

impl ZigzagWinStrategy {
    fn path_run(grid: &Grid, start_row: usize) -> (usize, Symbol) {
        let last_row = grid.rows() - 1;
        let first = grid.get(start_row, 0);
        let mut row = start_row;
        let mut moving_down = true;
        let mut run = 1;

        for col in 1..grid.cols() {
            if moving_down {
                if row == last_row {
                    moving_down = false;
                    row -= 1;
                } else {
                    row += 1;
                }
            } else if row == 0 {
                moving_down = true;
                row += 1;
            } else {
                row -= 1;
            }

            if grid.get(row, col) != first {
                break;
            }
            run += 1;
        }

        (run, first)
    }
}

impl WinStrategy for ZigzagWinStrategy {
    fn name(&self) -> &str {
        "Zigzag Win"
    }

    fn calculate(&self, grid: &Grid) -> u32 {
        // A single-row grid has no starting row: the path needs room to bounce.
        (0..grid.rows().saturating_sub(1))
            .map(|start_row| {
                let (run, symbol) = Self::path_run(grid, start_row);
                run_payout(run, symbol)
            })
            .sum()
    }
}

/// The strategies a fresh engine registers, in evaluation order
pub fn default_strategies() -> Vec<Box<dyn WinStrategy>> {
    vec![Box::new(LineWinStrategy), Box::new(ZigzagWinStrategy)]
}
