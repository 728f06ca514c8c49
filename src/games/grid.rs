//! Symbol grids and the sources that draw them.
//!
//! Wire format: `[[v00,v01,...],[v10,...],...]`, row-major, no whitespace.

use crate::errors::GameError;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{fmt, str::FromStr};

/// Reel icon, an integer in `0..SYMBOL_COUNT`
pub type Symbol = u8;

/// Number of distinct symbol kinds (0 through 8)
pub const SYMBOL_COUNT: u8 = 9;

/// Immutable rows × cols matrix of symbols
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Symbol>,
}

impl Grid {
    /// Build a grid from row-major cells
    pub fn new(rows: usize, cols: usize, cells: Vec<Symbol>) -> Result<Self, GameError> {
        let expected = cell_count(rows, cols)?;
        if cells.len() != expected {
            return Err(GameError::invalid_argument(
                "cells",
                format!("expected {} cells for {}x{}, got {}", expected, rows, cols, cells.len()),
            ));
        }
        if let Some(bad) = cells.iter().find(|&&s| s >= SYMBOL_COUNT) {
            return Err(GameError::invalid_argument(
                "cells",
                format!("symbol {} outside 0..{}", bad, SYMBOL_COUNT),
            ));
        }
        Ok(Self { rows, cols, cells })
    }

    /// Build a grid from nested rows; every row must have the same length
    pub fn from_rows(rows: Vec<Vec<Symbol>>) -> Result<Self, GameError> {
        let row_count = rows.len();
        let col_count = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != col_count) {
            return Err(GameError::invalid_argument("rows", "rows must all have the same length"));
        }
        Self::new(row_count, col_count, rows.into_iter().flatten().collect())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Symbol at `(row, col)`. Panics when out of bounds, like slice indexing.
    pub fn get(&self, row: usize, col: usize) -> Symbol {
        assert!(row < self.rows && col < self.cols, "cell ({}, {}) out of bounds", row, col);
        self.cells[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[Symbol] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[Symbol]> {
        self.cells.chunks(self.cols)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, row) in self.iter_rows().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str("[")?;
            for (j, symbol) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{}", symbol)?;
            }
            f.write_str("]")?;
        }
        f.write_str("]")
    }
}

impl FromStr for Grid {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .strip_prefix("[[")
            .and_then(|rest| rest.strip_suffix("]]"))
            .ok_or_else(|| GameError::Parse(format!("expected '[[...]]', got '{}'", s)))?;

        let rows = inner
            .split("],[")
            .map(|row| {
                row.split(',')
                    .map(|value| {
                        value
                            .parse::<Symbol>()
                            .map_err(|e| GameError::Parse(format!("bad symbol '{}': {}", value, e)))
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Grid::from_rows(rows).map_err(|e| GameError::Parse(e.to_string()))
    }
}

fn check_dimensions(rows: usize, cols: usize) -> Result<(), GameError> {
    if rows == 0 {
        return Err(GameError::invalid_argument("rows", "Rows must be greater than zero."));
    }
    if cols == 0 {
        return Err(GameError::invalid_argument("cols", "Columns must be greater than zero."));
    }
    Ok(())
}

/// `rows * cols` for valid dimensions
fn cell_count(rows: usize, cols: usize) -> Result<usize, GameError> {
    check_dimensions(rows, cols)?;
    rows.checked_mul(cols)
        .ok_or_else(|| GameError::Overflow(format!("{}x{} grid has too many cells", rows, cols)))
}

/// Produces a fresh grid per call
pub trait GridSource: Send {
    fn generate(&mut self, rows: usize, cols: usize) -> Result<Grid, GameError>;
}

/// Uniform random draw over the symbol domain
pub struct RandomGridSource<R = StdRng> {
    rng: R,
}

impl RandomGridSource<StdRng> {
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomGridSource<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl Default for RandomGridSource<StdRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: Rng + Send> GridSource for RandomGridSource<R> {
    fn generate(&mut self, rows: usize, cols: usize) -> Result<Grid, GameError> {
        let cells = (0..cell_count(rows, cols)?)
            .map(|_| self.rng.gen_range(0..SYMBOL_COUNT))
            .collect();
        Grid::new(rows, cols, cells)
    }
}

/// Always yields the same grid; the requested dimensions must match it
#[derive(Debug, Clone)]
pub struct FixedGridSource {
    grid: Grid,
}

impl FixedGridSource {
    pub fn new(grid: Grid) -> Self {
        Self { grid }
    }
}

impl GridSource for FixedGridSource {
    fn generate(&mut self, rows: usize, cols: usize) -> Result<Grid, GameError> {
        check_dimensions(rows, cols)?;
        if rows != self.grid.rows() || cols != self.grid.cols() {
            return Err(GameError::invalid_argument(
                "rows/cols",
                format!(
                    "fixed grid is {}x{}, requested {}x{}",
                    self.grid.rows(),
                    self.grid.cols(),
                    rows,
                    cols
                ),
            ));
        }
        Ok(self.grid.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_grid_dimensions_and_domain() {
        let mut source = RandomGridSource::seeded(7);
        let grid = source.generate(3, 5).expect("grid");
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 5);
        assert!(grid.iter_rows().flatten().all(|&s| s < SYMBOL_COUNT));
    }

    #[test]
    fn test_random_grid_rejects_zero_dimensions() {
        let mut source = RandomGridSource::seeded(1);
        assert!(matches!(
            source.generate(0, 5),
            Err(GameError::InvalidArgument { name: "rows", .. })
        ));
        assert!(matches!(
            source.generate(3, 0),
            Err(GameError::InvalidArgument { name: "cols", .. })
        ));
    }

    #[test]
    fn test_oversized_dimensions_are_rejected() {
        assert!(matches!(
            Grid::new(usize::MAX, 2, Vec::new()),
            Err(GameError::Overflow(_))
        ));
        let mut source = RandomGridSource::seeded(1);
        assert!(matches!(source.generate(usize::MAX, 3), Err(GameError::Overflow(_))));
    }

    #[test]
    fn test_random_grid_covers_every_symbol() {
        let mut source = RandomGridSource::seeded(42);
        let grid = source.generate(30, 30).unwrap();
        for symbol in 0..SYMBOL_COUNT {
            assert!(grid.iter_rows().flatten().any(|&s| s == symbol), "symbol {} never drawn", symbol);
        }
    }

    #[test]
    fn test_display_wire_format() {
        let grid = Grid::from_rows(vec![vec![5, 5, 5, 1, 1], vec![2, 2, 2, 2, 2], vec![0, 1, 2, 3, 4]]).unwrap();
        assert_eq!(grid.to_string(), "[[5,5,5,1,1],[2,2,2,2,2],[0,1,2,3,4]]");

        let single = Grid::from_rows(vec![vec![8]]).unwrap();
        assert_eq!(single.to_string(), "[[8]]");
    }

    #[test]
    fn test_parse_round_trip() {
        let mut source = RandomGridSource::seeded(99);
        let grid = source.generate(4, 6).unwrap();
        let parsed: Grid = grid.to_string().parse().unwrap();
        assert_eq!(parsed, grid);
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert!("".parse::<Grid>().is_err());
        assert!("[[1,2],[3]]".parse::<Grid>().is_err());
        assert!("[[1, 2]]".parse::<Grid>().is_err());
        assert!("[[9]]".parse::<Grid>().is_err());
        assert!("[[]]".parse::<Grid>().is_err());
    }

    #[test]
    fn test_fixed_source_checks_dimensions() {
        let grid = Grid::from_rows(vec![vec![1, 2, 3]]).unwrap();
        let mut source = FixedGridSource::new(grid.clone());
        assert_eq!(source.generate(1, 3).unwrap(), grid);
        assert!(source.generate(3, 5).is_err());
    }
}
