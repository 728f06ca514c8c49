//! End-to-end wager flows over the in-memory store.

use futures::future::join_all;
use rust_decimal_macros::dec;
use spinx::{
    games::{DefaultSpinEngineFactory, FnSpinEngineFactory, RandomGridSource, SpinEngine},
    BalanceStore, Decimal, GameSettings, GameSettingsProvider, Grid, InMemoryBalanceStore,
    PlayerService, RuntimeGameSettings, ServiceError, ServiceStatus,
};
use std::sync::Arc;

fn random_service(store: Arc<InMemoryBalanceStore>) -> PlayerService {
    PlayerService::new(
        store,
        Arc::new(DefaultSpinEngineFactory),
        Arc::new(RuntimeGameSettings::default()),
    )
}

#[tokio::test]
async fn test_create_credit_spin_sequence() {
    let store = Arc::new(InMemoryBalanceStore::new());
    let service = random_service(store.clone());

    let created = service.create_player(dec!(100)).await.unwrap();
    let id = created.player_id.unwrap();
    assert_eq!(created.new_balance, dec!(100.00));

    let credited = service.credit_balance(&id, dec!(50)).await.unwrap();
    assert_eq!(credited.new_balance, dec!(150.00));

    let spin = service.spin(&id, dec!(10)).await.unwrap();
    assert_eq!(spin.current_balance, dec!(140.00) + spin.win);
    assert_eq!(store.get_balance(&id).await.unwrap(), Some(spin.current_balance));

    let grid: Grid = spin.reel_symbols.parse().unwrap();
    assert_eq!((grid.rows(), grid.cols()), (3, 5));
}

#[tokio::test]
async fn test_insufficient_balance_leaves_balance_untouched() {
    let store = Arc::new(InMemoryBalanceStore::new());
    store.insert("p1", dec!(50));
    let service = random_service(store.clone());

    let err = service.spin("p1", dec!(100)).await.unwrap_err();
    assert_eq!(err.status(), ServiceStatus::ValidationError);
    assert_eq!(err.message(), "Insufficient balance to place this bet.");
    assert_eq!(store.get_balance("p1").await.unwrap(), Some(dec!(50.00)));
}

#[tokio::test]
async fn test_not_found_differs_between_spin_and_credit() {
    let service = random_service(Arc::new(InMemoryBalanceStore::new()));

    assert_eq!(
        service.spin("nobody", dec!(1)).await.unwrap_err(),
        ServiceError::NotFound("Player not found.".to_string())
    );
    assert_eq!(
        service.credit_balance("nobody", dec!(1)).await.unwrap_err(),
        ServiceError::Validation("Player not found.".to_string())
    );
}

#[tokio::test]
async fn test_concurrent_spins_never_overdraw() {
    let store = Arc::new(InMemoryBalanceStore::new());
    store.insert("p1", dec!(10));
    // No strategies: every round loses, so exactly ten bets can be covered
    let service = PlayerService::new(
        store.clone(),
        Arc::new(FnSpinEngineFactory::new(|| {
            SpinEngine::empty(Box::new(RandomGridSource::from_entropy()))
        })),
        Arc::new(RuntimeGameSettings::default()),
    );

    let spins = (0..40).map(|_| {
        let service = service.clone();
        async move { service.spin("p1", dec!(1)).await }
    });
    let results = join_all(spins).await;

    let accepted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(accepted, 10);
    for rejected in results.iter().filter_map(|r| r.as_ref().err()) {
        assert_eq!(rejected.message(), "Insufficient balance to place this bet.");
    }
    assert_eq!(store.get_balance("p1").await.unwrap(), Some(Decimal::ZERO));
}

#[tokio::test]
async fn test_concurrent_spins_keep_ledger_consistent() {
    let store = Arc::new(InMemoryBalanceStore::new());
    store.insert("p1", dec!(20));
    let service = random_service(store.clone());

    let handles: Vec<_> = (0..30)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.spin("p1", dec!(1)).await })
        })
        .collect();

    let mut expected = dec!(20);
    for handle in handles {
        match handle.await.unwrap() {
            Ok(result) => {
                expected = expected - dec!(1) + result.win;
                assert!(result.current_balance >= Decimal::ZERO);
            }
            Err(e) => assert_eq!(e.status(), ServiceStatus::ValidationError),
        }
    }

    assert_eq!(store.get_balance("p1").await.unwrap(), Some(expected));
}

#[tokio::test]
async fn test_settings_update_changes_grid_shape() {
    let store = Arc::new(InMemoryBalanceStore::new());
    store.insert("p1", dec!(10));
    let settings = Arc::new(RuntimeGameSettings::default());
    let service = PlayerService::new(store, Arc::new(DefaultSpinEngineFactory), settings.clone());

    settings.update(GameSettings::new(1, 7)).unwrap();
    let spin = service.spin("p1", dec!(1)).await.unwrap();
    let grid: Grid = spin.reel_symbols.parse().unwrap();
    assert_eq!((grid.rows(), grid.cols()), (1, 7));
}
