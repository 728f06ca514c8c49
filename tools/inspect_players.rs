//! Dump the player records of a (stopped) server's database.

use clap::Parser;
use spinx::{BalanceStore, RocksBalanceStore};

#[derive(Parser, Debug)]
#[command(name = "inspect_players")]
#[command(about = "List players stored in a SpinX database", long_about = None)]
struct Args {
    /// Database directory
    #[arg(long, default_value = "./DB/spinx_data")]
    db_path: String,

    /// Print records as JSON lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let store = RocksBalanceStore::open(&args.db_path)?;
    let players = store.get_all().await?;

    if args.json {
        for player in &players {
            println!("{}", serde_json::to_string(player)?);
        }
        return Ok(());
    }

    println!("{} player(s) in {}", players.len(), args.db_path);
    for player in &players {
        println!(
            "  {}  balance={}  created={}  updated={}",
            player.id,
            player.balance,
            player.created_at.to_rfc3339(),
            player.updated_at.to_rfc3339()
        );
    }
    Ok(())
}
