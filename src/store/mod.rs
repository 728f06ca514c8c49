//! Player balance persistence.
//!
//! The orchestrator never does its own read-modify-write on a balance.
//! Every mutation goes through one of the atomic primitives below, and each
//! call is atomic per player record.

pub mod memory;
pub mod rocks;

pub use memory::InMemoryBalanceStore;
pub use rocks::RocksBalanceStore;

use crate::{
    errors::{SpinxError, SpinxResult, StorageError},
    games::types::Player,
    money::Decimal,
};
use async_trait::async_trait;

/// `balance + amount`, or a storage error when the sum leaves the decimal range
pub(crate) fn add_to_balance(player_id: &str, balance: Decimal, amount: Decimal) -> SpinxResult<Decimal> {
    balance.checked_add(amount).ok_or_else(|| {
        SpinxError::from(StorageError::BalanceOverflow(format!(
            "player {}: {} + {}",
            player_id, balance, amount
        )))
    })
}

/// `balance - amount`, or a storage error when the difference leaves the decimal range
pub(crate) fn subtract_from_balance(player_id: &str, balance: Decimal, amount: Decimal) -> SpinxResult<Decimal> {
    balance.checked_sub(amount).ok_or_else(|| {
        SpinxError::from(StorageError::BalanceOverflow(format!(
            "player {}: {} - {}",
            player_id, balance, amount
        )))
    })
}

/// Result of a conditional debit
#[derive(Debug, Clone, PartialEq)]
pub enum DebitOutcome {
    /// Balance covered the amount; record after the debit
    Applied(Player),
    /// Balance did not cover the amount; nothing was written
    Insufficient(Decimal),
    /// No such player
    Missing,
}

#[async_trait]
pub trait BalanceStore: Send + Sync {
    /// Current balance, `None` when the player does not exist
    async fn get_balance(&self, player_id: &str) -> SpinxResult<Option<Decimal>>;

    async fn get_by_id(&self, player_id: &str) -> SpinxResult<Option<Player>>;

    /// Overwrite the balance (canonicalised); `None` when the player does not exist
    async fn set_balance(&self, player_id: &str, balance: Decimal) -> SpinxResult<Option<Player>>;

    /// Decrement by `amount` iff the balance covers it
    async fn debit(&self, player_id: &str, amount: Decimal) -> SpinxResult<DebitOutcome>;

    /// Increment by `amount`; `None` when the player does not exist
    async fn credit(&self, player_id: &str, amount: Decimal) -> SpinxResult<Option<Player>>;

    /// Create a player with a fresh unique id
    async fn create_player(&self, initial_balance: Decimal) -> SpinxResult<Player>;

    async fn get_all(&self) -> SpinxResult<Vec<Player>>;
}

#[cfg(test)]
pub(crate) mod contract {
    //! Behaviour every store implementation must show.

    use super::*;
    use crate::money::round_balance;
    use rust_decimal_macros::dec;

    pub async fn create_and_read(store: &dyn BalanceStore) {
        let player = store.create_player(dec!(100.005)).await.unwrap();
        assert!(!player.id.is_empty());
        assert_eq!(player.balance, dec!(100.00));
        assert_eq!(store.get_balance(&player.id).await.unwrap(), Some(dec!(100.00)));
        assert_eq!(store.get_by_id(&player.id).await.unwrap().unwrap().id, player.id);
        assert_eq!(store.get_balance("missing").await.unwrap(), None);
        assert!(store.get_by_id("missing").await.unwrap().is_none());

        let other = store.create_player(Decimal::ZERO).await.unwrap();
        assert_ne!(other.id, player.id);
        assert_eq!(store.get_all().await.unwrap().len(), 2);
    }

    pub async fn set_balance(store: &dyn BalanceStore) {
        let player = store.create_player(dec!(5)).await.unwrap();
        let updated = store.set_balance(&player.id, dec!(12.345)).await.unwrap().unwrap();
        assert_eq!(updated.balance, round_balance(dec!(12.345)));
        assert!(store.set_balance("missing", dec!(1)).await.unwrap().is_none());
    }

    pub async fn debit_and_credit(store: &dyn BalanceStore) {
        let player = store.create_player(dec!(50)).await.unwrap();

        match store.debit(&player.id, dec!(20.25)).await.unwrap() {
            DebitOutcome::Applied(p) => assert_eq!(p.balance, dec!(29.75)),
            other => panic!("expected applied debit, got {:?}", other),
        }
        assert_eq!(
            store.debit(&player.id, dec!(30)).await.unwrap(),
            DebitOutcome::Insufficient(dec!(29.75))
        );
        assert_eq!(store.get_balance(&player.id).await.unwrap(), Some(dec!(29.75)));
        assert_eq!(store.debit("missing", dec!(1)).await.unwrap(), DebitOutcome::Missing);

        let credited = store.credit(&player.id, dec!(0.25)).await.unwrap().unwrap();
        assert_eq!(credited.balance, dec!(30.00));
        assert!(store.credit("missing", dec!(1)).await.unwrap().is_none());

        match store.debit(&player.id, dec!(30)).await.unwrap() {
            DebitOutcome::Applied(p) => assert_eq!(p.balance, Decimal::ZERO),
            other => panic!("expected debit to zero, got {:?}", other),
        }
    }

    pub async fn credit_beyond_range(store: &dyn BalanceStore) {
        let player = store.create_player(Decimal::MAX).await.unwrap();

        let err = store.credit(&player.id, dec!(1)).await.unwrap_err();
        assert!(matches!(err, SpinxError::Storage(StorageError::BalanceOverflow(_))));
        assert_eq!(store.get_balance(&player.id).await.unwrap(), Some(Decimal::MAX));

        // The store stays usable after the rejected credit
        match store.debit(&player.id, dec!(1)).await.unwrap() {
            DebitOutcome::Applied(p) => assert_eq!(p.balance, Decimal::MAX - dec!(1)),
            other => panic!("expected applied debit, got {:?}", other),
        }
        let credited = store.credit(&player.id, dec!(1)).await.unwrap().unwrap();
        assert_eq!(credited.balance, Decimal::MAX);
    }
}
