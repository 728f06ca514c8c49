//! Balances written through the service survive closing and reopening the database.

use rust_decimal_macros::dec;
use spinx::{
    config::StorageConfig, games::DefaultSpinEngineFactory, BalanceStore, PlayerService,
    RocksBalanceStore, RuntimeGameSettings,
};
use std::sync::Arc;
use tempfile::TempDir;

fn service_over(store: Arc<RocksBalanceStore>) -> PlayerService {
    PlayerService::new(
        store,
        Arc::new(DefaultSpinEngineFactory),
        Arc::new(RuntimeGameSettings::default()),
    )
}

#[tokio::test]
async fn test_balances_persist_across_restarts() {
    let dir = TempDir::new().unwrap();
    let config = StorageConfig {
        data_directory: dir.path().to_string_lossy().to_string(),
        ..StorageConfig::default()
    };

    let (player_id, balance) = {
        let store = Arc::new(RocksBalanceStore::open_with_config(&config).unwrap());
        let service = service_over(store);

        let created = service.create_player(dec!(75.50)).await.unwrap();
        let id = created.player_id.unwrap();
        service.credit_balance(&id, dec!(24.50)).await.unwrap();
        let spin = service.spin(&id, dec!(5)).await.unwrap();
        assert_eq!(spin.current_balance, dec!(95.00) + spin.win);

        (id, spin.current_balance)
    };

    let reopened = Arc::new(RocksBalanceStore::open_with_config(&config).unwrap());
    assert_eq!(reopened.get_balance(&player_id).await.unwrap(), Some(balance));

    let service = service_over(reopened);
    let players = service.get_all().await.unwrap();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].id, player_id);
}

#[tokio::test]
async fn test_clear_on_start_wipes_players() {
    let dir = TempDir::new().unwrap();
    let mut config = StorageConfig {
        data_directory: dir.path().join("players").to_string_lossy().to_string(),
        ..StorageConfig::default()
    };

    {
        let store = RocksBalanceStore::open_with_config(&config).unwrap();
        store.create_player(dec!(10)).await.unwrap();
    }

    config.clear_on_start = true;
    let store = RocksBalanceStore::open_with_config(&config).unwrap();
    assert!(store.get_all().await.unwrap().is_empty());
}
