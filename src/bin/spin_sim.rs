//! Console simulator: plays a run of spins against an in-memory player
//! and reports return-to-player figures.

use clap::Parser;
use spinx::{
    games::{DefaultSpinEngineFactory, FnSpinEngineFactory, RandomGridSource, SpinEngine, SpinEngineFactory},
    init_tracing, Decimal, GameSettings, InMemoryBalanceStore, PlayerService, RuntimeGameSettings,
    ServiceStatus,
};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

#[derive(Parser, Debug)]
#[command(name = "spin-sim")]
#[command(about = "Simulate slot spins and report RTP", long_about = None)]
struct Args {
    /// Number of spins to play
    #[arg(long, default_value = "1000")]
    spins: u64,

    /// Starting balance
    #[arg(long, default_value = "1000")]
    balance: Decimal,

    /// Bet per spin
    #[arg(long, default_value = "1")]
    bet: Decimal,

    #[arg(long, default_value = "3")]
    rows: usize,

    #[arg(long, default_value = "5")]
    cols: usize,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Print every grid
    #[arg(long)]
    show_grids: bool,
}

#[derive(Debug, Default)]
struct Summary {
    played: u64,
    winning: u64,
    wagered: Decimal,
    won: Decimal,
}

impl Summary {
    fn rtp_percent(&self) -> Decimal {
        if self.wagered.is_zero() {
            return Decimal::ZERO;
        }
        (self.won / self.wagered * Decimal::ONE_HUNDRED).round_dp(2)
    }

    fn hit_rate_percent(&self) -> Decimal {
        if self.played == 0 {
            return Decimal::ZERO;
        }
        (Decimal::from(self.winning) / Decimal::from(self.played) * Decimal::ONE_HUNDRED).round_dp(2)
    }
}

fn engine_factory(seed: Option<u64>) -> Arc<dyn SpinEngineFactory> {
    match seed {
        Some(base) => {
            let next = AtomicU64::new(base);
            Arc::new(FnSpinEngineFactory::new(move || {
                let seed = next.fetch_add(1, Ordering::Relaxed);
                SpinEngine::with_source(Box::new(RandomGridSource::seeded(seed)))
            }))
        }
        None => Arc::new(DefaultSpinEngineFactory),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing("spinx=warn");

    let settings = GameSettings::new(args.rows, args.cols);
    settings.validate()?;

    let store = Arc::new(InMemoryBalanceStore::new());
    let service = PlayerService::new(
        store.clone(),
        engine_factory(args.seed),
        Arc::new(RuntimeGameSettings::new(settings)),
    );

    let player = service.create_player(args.balance).await?;
    let player_id = player.player_id.unwrap_or_default();

    println!("SpinX simulator");
    println!("   Reels: {}x{}", settings.reel_rows, settings.reel_columns);
    println!("   Starting balance: {}", player.new_balance);
    println!("   Bet: {}", args.bet);

    let mut summary = Summary::default();
    let mut balance = player.new_balance;

    for round in 1..=args.spins {
        match service.spin(&player_id, args.bet).await {
            Ok(result) => {
                summary.played += 1;
                summary.wagered += args.bet;
                summary.won += result.win;
                if result.win > Decimal::ZERO {
                    summary.winning += 1;
                }
                balance = result.current_balance;

                if args.show_grids {
                    println!("#{:<6} {}  win={} balance={}", round, result.reel_symbols, result.win, balance);
                }
            }
            Err(e) if e.status() == ServiceStatus::ValidationError => {
                println!("Stopping after {} spins: {}", summary.played, e);
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    println!();
    println!("Summary");
    println!("   Spins played:  {}", summary.played);
    println!("   Total wagered: {}", summary.wagered);
    println!("   Total won:     {}", summary.won);
    println!("   RTP:           {}%", summary.rtp_percent());
    println!("   Hit rate:      {}%", summary.hit_rate_percent());
    println!("   Final balance: {}", balance);

    Ok(())
}
