use super::{add_to_balance, subtract_from_balance, BalanceStore, DebitOutcome};
use crate::{
    errors::SpinxResult,
    games::types::Player,
    money::{round_balance, Decimal},
};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Thread-safe in-process store; each mutation runs under the entry's shard lock
#[derive(Clone, Default)]
pub struct InMemoryBalanceStore {
    players: Arc<DashMap<String, Player>>,
}

impl InMemoryBalanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record with a caller-chosen id (seeding tests and simulations)
    pub fn insert(&self, player_id: impl Into<String>, balance: Decimal) -> Player {
        let player = Player::new(player_id.into(), round_balance(balance));
        self.players.insert(player.id.clone(), player.clone());
        player
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[async_trait]
impl BalanceStore for InMemoryBalanceStore {
    async fn get_balance(&self, player_id: &str) -> SpinxResult<Option<Decimal>> {
        Ok(self.players.get(player_id).map(|p| p.balance))
    }

    async fn get_by_id(&self, player_id: &str) -> SpinxResult<Option<Player>> {
        Ok(self.players.get(player_id).map(|p| p.clone()))
    }

    async fn set_balance(&self, player_id: &str, balance: Decimal) -> SpinxResult<Option<Player>> {
        Ok(self.players.get_mut(player_id).map(|mut p| {
            p.balance = round_balance(balance);
            p.updated_at = Utc::now();
            p.clone()
        }))
    }

    async fn debit(&self, player_id: &str, amount: Decimal) -> SpinxResult<DebitOutcome> {
        let Some(mut player) = self.players.get_mut(player_id) else {
            return Ok(DebitOutcome::Missing);
        };
        if player.balance < amount {
            return Ok(DebitOutcome::Insufficient(player.balance));
        }
        player.balance = round_balance(subtract_from_balance(player_id, player.balance, amount)?);
        player.updated_at = Utc::now();
        Ok(DebitOutcome::Applied(player.clone()))
    }

    async fn credit(&self, player_id: &str, amount: Decimal) -> SpinxResult<Option<Player>> {
        let Some(mut player) = self.players.get_mut(player_id) else {
            return Ok(None);
        };
        player.balance = round_balance(add_to_balance(player_id, player.balance, amount)?);
        player.updated_at = Utc::now();
        Ok(Some(player.clone()))
    }

    async fn create_player(&self, initial_balance: Decimal) -> SpinxResult<Player> {
        let player = self.insert(Uuid::new_v4().to_string(), initial_balance);
        tracing::debug!(player_id = %player.id, balance = %player.balance, "Created player");
        Ok(player)
    }

    async fn get_all(&self) -> SpinxResult<Vec<Player>> {
        let mut players: Vec<Player> = self.players.iter().map(|e| e.value().clone()).collect();
        players.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(players)
    }
}
