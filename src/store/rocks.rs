//! Persistent player records stored in RocksDB.
//!
//! Layout: `player:{id}` -> JSON-encoded [`PlayerRecord`]. Balances are
//! written as decimal strings so every digit and the 2-digit scale survive
//! a round trip. RocksDB calls run on the blocking thread pool.

use super::{add_to_balance, subtract_from_balance, BalanceStore, DebitOutcome};
use crate::{
    config::{CompressionType, StorageConfig},
    errors::{SpinxError, SpinxResult, StorageError},
    games::types::Player,
    money::{round_balance, Decimal},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rocksdb::{Direction, IteratorMode, Options, DB};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};
use uuid::Uuid;

const PLAYER_PREFIX: &str = "player:";

fn player_key(player_id: &str) -> Vec<u8> {
    format!("{}{}", PLAYER_PREFIX, player_id).into_bytes()
}

/// On-disk form of a [`Player`]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerRecord {
    id: String,
    #[serde(with = "rust_decimal::serde::str")]
    balance: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<&Player> for PlayerRecord {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            balance: player.balance,
            created_at: player.created_at,
            updated_at: player.updated_at,
        }
    }
}

impl From<PlayerRecord> for Player {
    fn from(record: PlayerRecord) -> Self {
        Self {
            id: record.id,
            balance: round_balance(record.balance),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct RocksBalanceStore {
    db: Arc<DB>,
    /// Serialises read-modify-write cycles so each mutation is atomic
    write_lock: Arc<Mutex<()>>,
}

impl RocksBalanceStore {
    /// Open (or create) a store with default tuning
    pub fn open<P: AsRef<Path>>(path: P) -> SpinxResult<Self> {
        let config = StorageConfig {
            data_directory: path.as_ref().to_string_lossy().to_string(),
            ..StorageConfig::default()
        };
        Self::open_with_config(&config)
    }

    pub fn open_with_config(config: &StorageConfig) -> SpinxResult<Self> {
        if config.clear_on_start {
            tracing::warn!(path = %config.data_directory, "Clearing player database on start");
            let _ = fs::remove_dir_all(&config.data_directory);
        }

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_write_buffer_size(config.write_buffer_size_mb * 1024 * 1024);
        opts.set_compression_type(match config.compression_type {
            CompressionType::None => rocksdb::DBCompressionType::None,
            CompressionType::Snappy => rocksdb::DBCompressionType::Snappy,
            CompressionType::Lz4 => rocksdb::DBCompressionType::Lz4,
            CompressionType::Zstd => rocksdb::DBCompressionType::Zstd,
        });

        let db = DB::open(&opts, &config.data_directory)
            .map_err(|e| StorageError::DatabaseOpenFailed(format!("{}: {}", config.data_directory, e)))?;
        tracing::info!(path = %config.data_directory, "Opened player database");

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Run `op` against a clone of this store on the blocking thread pool
    async fn blocking<T, F>(&self, op: F) -> SpinxResult<T>
    where
        T: Send + 'static,
        F: FnOnce(RocksBalanceStore) -> SpinxResult<T> + Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || op(store))
            .await
            .map_err(|e| StorageError::Unavailable(format!("storage task failed: {}", e)))?
    }

    fn lock(&self) -> SpinxResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StorageError::Unavailable("player write lock poisoned".to_string()).into())
    }

    fn load(&self, player_id: &str) -> SpinxResult<Option<Player>> {
        let Some(bytes) = self
            .db
            .get(player_key(player_id))
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?
        else {
            return Ok(None);
        };

        let record: PlayerRecord = serde_json::from_slice(&bytes).map_err(|e| {
            StorageError::CorruptedData(format!("Failed to decode player {}: {}", player_id, e))
        })?;
        Ok(Some(record.into()))
    }

    fn save(&self, player: &Player) -> SpinxResult<()> {
        let bytes = serde_json::to_vec(&PlayerRecord::from(player)).map_err(|e| {
            StorageError::WriteFailed(format!("Failed to encode player {}: {}", player.id, e))
        })?;
        self.db
            .put(player_key(&player.id), bytes)
            .map_err(|e| SpinxError::Storage(StorageError::WriteFailed(e.to_string())))
    }

    /// Apply `change` to the stored balance under the write lock
    fn update_balance(
        &self,
        player_id: &str,
        change: impl FnOnce(Decimal) -> SpinxResult<Decimal>,
    ) -> SpinxResult<Option<Player>> {
        let _guard = self.lock()?;
        let Some(mut player) = self.load(player_id)? else {
            return Ok(None);
        };
        player.balance = round_balance(change(player.balance)?);
        player.updated_at = Utc::now();
        self.save(&player)?;
        Ok(Some(player))
    }

    fn debit_now(&self, player_id: &str, amount: Decimal) -> SpinxResult<DebitOutcome> {
        let _guard = self.lock()?;
        let Some(mut player) = self.load(player_id)? else {
            return Ok(DebitOutcome::Missing);
        };
        if player.balance < amount {
            return Ok(DebitOutcome::Insufficient(player.balance));
        }
        player.balance = round_balance(subtract_from_balance(player_id, player.balance, amount)?);
        player.updated_at = Utc::now();
        self.save(&player)?;
        Ok(DebitOutcome::Applied(player))
    }

    fn scan_players(&self) -> SpinxResult<Vec<Player>> {
        let mut players = Vec::new();
        let iter = self
            .db
            .iterator(IteratorMode::From(PLAYER_PREFIX.as_bytes(), Direction::Forward));

        for item in iter {
            let (key, value) = item.map_err(|e| StorageError::ReadFailed(e.to_string()))?;
            if !key.starts_with(PLAYER_PREFIX.as_bytes()) {
                break;
            }
            match serde_json::from_slice::<PlayerRecord>(&value) {
                Ok(record) => players.push(Player::from(record)),
                Err(e) => {
                    tracing::warn!(key = %String::from_utf8_lossy(&key), error = %e, "Skipping undecodable player record");
                }
            }
        }

        players.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(players)
    }
}

#[async_trait]
impl BalanceStore for RocksBalanceStore {
    async fn get_balance(&self, player_id: &str) -> SpinxResult<Option<Decimal>> {
        let player_id = player_id.to_string();
        self.blocking(move |store| Ok(store.load(&player_id)?.map(|p| p.balance)))
            .await
    }

    async fn get_by_id(&self, player_id: &str) -> SpinxResult<Option<Player>> {
        let player_id = player_id.to_string();
        self.blocking(move |store| store.load(&player_id)).await
    }

    async fn set_balance(&self, player_id: &str, balance: Decimal) -> SpinxResult<Option<Player>> {
        let player_id = player_id.to_string();
        self.blocking(move |store| store.update_balance(&player_id, |_| Ok(balance)))
            .await
    }

    async fn debit(&self, player_id: &str, amount: Decimal) -> SpinxResult<DebitOutcome> {
        let player_id = player_id.to_string();
        self.blocking(move |store| store.debit_now(&player_id, amount))
            .await
    }

    async fn credit(&self, player_id: &str, amount: Decimal) -> SpinxResult<Option<Player>> {
        let player_id = player_id.to_string();
        self.blocking(move |store| {
            store.update_balance(&player_id, |balance| add_to_balance(&player_id, balance, amount))
        })
        .await
    }

    async fn create_player(&self, initial_balance: Decimal) -> SpinxResult<Player> {
        let player = Player::new(Uuid::new_v4().to_string(), round_balance(initial_balance));
        let player = self
            .blocking(move |store| {
                let _guard = store.lock()?;
                store.save(&player)?;
                Ok(player)
            })
            .await?;
        tracing::debug!(player_id = %player.id, balance = %player.balance, "Created player");
        Ok(player)
    }

    async fn get_all(&self) -> SpinxResult<Vec<Player>> {
        self.blocking(|store| store.scan_players()).await
    }
}
