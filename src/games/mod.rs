pub mod engine;
pub mod grid;
pub mod strategy;
pub mod types;

pub use engine::{DefaultSpinEngineFactory, FnSpinEngineFactory, SpinEngine, SpinEngineFactory, StrategyWin};
pub use grid::{FixedGridSource, Grid, GridSource, RandomGridSource, Symbol, SYMBOL_COUNT};
pub use strategy::{LineWinStrategy, WinStrategy, ZigzagWinStrategy};
pub use types::*;
