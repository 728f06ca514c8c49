//! Spin engine: one grid, one strategy list, one wager.
//!
//! An engine keeps the grid it generated until the next `generate_grid`
//! call, so it must never be shared between concurrent wagers. The
//! orchestrator asks a [`SpinEngineFactory`] for a brand-new engine per spin.

use super::grid::{Grid, GridSource, RandomGridSource};
use super::strategy::{default_strategies, WinStrategy};
use crate::errors::GameError;
use crate::money::{is_positive, Decimal};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Per-strategy share of a spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyWin {
    pub name: String,
    pub multiplier: u32,
    pub amount: Decimal,
}

/// Evaluates one wager
pub struct SpinEngine {
    source: Box<dyn GridSource>,
    strategies: Vec<Box<dyn WinStrategy>>,
    current: Option<Grid>,
}

impl SpinEngine {
    /// Random grids, default strategies (Line, then Zigzag)
    pub fn new() -> Self {
        Self::with_source(Box::new(RandomGridSource::from_entropy()))
    }

    /// Custom grid source, default strategies
    pub fn with_source(source: Box<dyn GridSource>) -> Self {
        Self {
            source,
            strategies: default_strategies(),
            current: None,
        }
    }

    /// Custom grid source, no strategies registered
    pub fn empty(source: Box<dyn GridSource>) -> Self {
        Self {
            source,
            strategies: Vec::new(),
            current: None,
        }
    }

    pub fn register_strategy(&mut self, strategy: Box<dyn WinStrategy>) {
        self.strategies.push(strategy);
    }

    pub fn clear_strategies(&mut self) {
        self.strategies.clear();
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Draw a new grid and make it the current one
    pub fn generate_grid(&mut self, rows: usize, cols: usize) -> Result<&Grid, GameError> {
        let grid = self.source.generate(rows, cols)?;
        let grid: &Grid = self.current.insert(grid);
        Ok(grid)
    }

    pub fn current_grid(&self) -> Option<&Grid> {
        self.current.as_ref()
    }

    /// Sum of all strategy multipliers on the current grid
    pub fn total_multiplier(&self) -> Result<u32, GameError> {
        let grid = self.require_grid()?;
        self.strategies
            .iter()
            .try_fold(0u32, |total, s| total.checked_add(s.calculate(grid)))
            .ok_or_else(|| GameError::Overflow("strategy multipliers exceed u32".to_string()))
    }

    /// Win amount for `bet` on the current grid
    pub fn spin(&self, bet: Decimal) -> Result<Decimal, GameError> {
        self.require_grid()?;
        check_bet(bet)?;
        win_amount(self.total_multiplier()?, bet)
    }

    /// Win amount per registered strategy, in registration order
    pub fn spin_detailed(&self, bet: Decimal) -> Result<Vec<StrategyWin>, GameError> {
        let grid = self.require_grid()?;
        check_bet(bet)?;
        self.strategies
            .iter()
            .map(|s| -> Result<StrategyWin, GameError> {
                let multiplier = s.calculate(grid);
                Ok(StrategyWin {
                    name: s.name().to_string(),
                    multiplier,
                    amount: win_amount(multiplier, bet)?,
                })
            })
            .collect()
    }

    /// Wire form of the current grid, or an empty string before the first draw
    pub fn serialize(&self) -> String {
        self.current.as_ref().map(Grid::to_string).unwrap_or_default()
    }

    fn require_grid(&self) -> Result<&Grid, GameError> {
        self.current.as_ref().ok_or_else(|| {
            GameError::InvalidState("No symbols have been generated. Call generate_grid first.".to_string())
        })
    }
}

impl Default for SpinEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn check_bet(bet: Decimal) -> Result<(), GameError> {
    if !is_positive(bet) {
        return Err(GameError::invalid_argument("bet", "Bet amount must be greater than zero."));
    }
    Ok(())
}

fn win_amount(multiplier: u32, bet: Decimal) -> Result<Decimal, GameError> {
    Decimal::from(multiplier)
        .checked_mul(bet)
        .ok_or_else(|| GameError::Overflow(format!("{} x {} is outside the decimal range", multiplier, bet)))
}

/// Hands out a fresh engine for every wager
pub trait SpinEngineFactory: Send + Sync {
    fn create(&self) -> SpinEngine;
}

/// Random grids with the default strategies
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSpinEngineFactory;

impl SpinEngineFactory for DefaultSpinEngineFactory {
    fn create(&self) -> SpinEngine {
        SpinEngine::new()
    }
}

/// Factory backed by a closure, for custom sources or strategy sets
pub struct FnSpinEngineFactory {
    build: Arc<dyn Fn() -> SpinEngine + Send + Sync>,
}

impl FnSpinEngineFactory {
    pub fn new(build: impl Fn() -> SpinEngine + Send + Sync + 'static) -> Self {
        Self {
            build: Arc::new(build),
        }
    }
}

impl SpinEngineFactory for FnSpinEngineFactory {
    fn create(&self) -> SpinEngine {
        (self.build)()
    }
}
