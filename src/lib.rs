//! SpinX - slot wager engine
//!
//! A player stakes a bet, a symbol grid is drawn, pluggable win strategies
//! score it, and the balance store is debited and credited accordingly.
//!
//! - [`games`]: grid generation, win strategies, the per-wager spin engine
//! - [`service`]: the wager transaction orchestrator
//! - [`store`]: balance persistence (RocksDB, in-memory)
//! - [`api`]: HTTP surface

pub mod api;
pub mod config;
pub mod errors;
pub mod games;
pub mod money;
pub mod service;
pub mod settings;
pub mod store;

pub use config::{ConfigLoader, SpinxConfig};
pub use errors::{ServiceError, ServiceResult, ServiceStatus, SpinxError, SpinxResult};
pub use games::{Grid, SpinEngine, SpinEngineFactory, WinStrategy};
pub use money::Decimal;
pub use service::PlayerService;
pub use settings::{GameSettings, GameSettingsProvider, RuntimeGameSettings};
pub use store::{BalanceStore, DebitOutcome, InMemoryBalanceStore, RocksBalanceStore};

/// Install the global tracing subscriber; `RUST_LOG` overrides `default_directive`
pub fn init_tracing(default_directive: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive.into());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
