//! Wager transaction orchestration.
//!
//! A spin runs `Validate -> Lookup -> CheckFunds -> Debit -> Evaluate ->
//! CreditIfWin -> Respond` and stops at the first failure. Once the debit has
//! committed, any later failure voids the round: the bet is credited back
//! before the error is reported.
//!
//! Business failures come back as [`ServiceError`] values. Store and engine
//! failures are logged here and surfaced as `ServiceError::Server`.

use crate::{
    errors::{GameError, ServiceError, ServiceResult, SpinxError, StorageError},
    games::{
        engine::SpinEngineFactory,
        types::{BalanceUpdateResponse, Player, SpinResponse},
    },
    money::{is_positive, Decimal},
    settings::{GameSettings, GameSettingsProvider},
    store::{BalanceStore, DebitOutcome},
};
use std::sync::Arc;

const PLAYER_ID_REQUIRED: &str = "Player ID is required.";
const PLAYER_NOT_FOUND: &str = "Player not found.";
const BET_NOT_POSITIVE: &str = "Bet amount must be greater than zero.";
const AMOUNT_NOT_POSITIVE: &str = "Amount must be greater than zero.";
const INSUFFICIENT_BALANCE: &str = "Insufficient balance to place this bet.";
const NEGATIVE_INITIAL_BALANCE: &str = "Initial balance cannot be negative.";
const BALANCE_LIMIT_EXCEEDED: &str = "Amount would exceed the maximum supported balance.";

const SPIN_FAILED: &str = "An error occurred while processing the spin.";
const CREDIT_FAILED: &str = "An error occurred while updating the balance.";
const CREATE_FAILED: &str = "An error occurred while creating the player.";
const LIST_FAILED: &str = "An error occurred while retrieving players.";

/// Grid text and win amount of one evaluated wager
struct Evaluation {
    reel_symbols: String,
    win: Decimal,
}

/// Player-facing operations over a balance store
#[derive(Clone)]
pub struct PlayerService {
    store: Arc<dyn BalanceStore>,
    engines: Arc<dyn SpinEngineFactory>,
    settings: Arc<dyn GameSettingsProvider>,
}

impl PlayerService {
    pub fn new(
        store: Arc<dyn BalanceStore>,
        engines: Arc<dyn SpinEngineFactory>,
        settings: Arc<dyn GameSettingsProvider>,
    ) -> Self {
        Self {
            store,
            engines,
            settings,
        }
    }

    pub fn settings(&self) -> &Arc<dyn GameSettingsProvider> {
        &self.settings
    }

    /// Stake `bet` for `player_id` and play one round
    pub async fn spin(&self, player_id: &str, bet: Decimal) -> ServiceResult<SpinResponse> {
        let player_id = player_id.trim();
        if player_id.is_empty() {
            return Err(ServiceError::validation(PLAYER_ID_REQUIRED));
        }
        if !is_positive(bet) {
            return Err(ServiceError::validation(BET_NOT_POSITIVE));
        }

        let settings = self.settings.current();

        let balance = match self.store.get_balance(player_id).await {
            Ok(Some(balance)) => balance,
            Ok(None) => return Err(ServiceError::not_found(PLAYER_NOT_FOUND)),
            Err(e) => {
                tracing::error!(player_id, bet = %bet, error = %e, "Balance lookup failed");
                return Err(ServiceError::server(SPIN_FAILED));
            }
        };

        if balance < bet {
            tracing::debug!(player_id, bet = %bet, balance = %balance, "Bet exceeds balance");
            return Err(ServiceError::validation(INSUFFICIENT_BALANCE));
        }

        let debited = match self.store.debit(player_id, bet).await {
            Ok(DebitOutcome::Applied(player)) => player,
            Ok(DebitOutcome::Insufficient(balance)) => {
                tracing::debug!(player_id, bet = %bet, balance = %balance, "Balance drained before debit");
                return Err(ServiceError::validation(INSUFFICIENT_BALANCE));
            }
            Ok(DebitOutcome::Missing) => return Err(ServiceError::not_found(PLAYER_NOT_FOUND)),
            Err(e) => {
                tracing::error!(player_id, bet = %bet, error = %e, "Debit failed");
                return Err(ServiceError::server(SPIN_FAILED));
            }
        };

        let evaluation = match self.evaluate(settings, bet) {
            Ok(evaluation) => evaluation,
            Err(e) => {
                tracing::error!(player_id, bet = %bet, error = %e, "Spin evaluation failed, voiding round");
                self.refund(player_id, bet).await;
                return Err(ServiceError::server(SPIN_FAILED));
            }
        };

        let current_balance = if is_positive(evaluation.win) {
            match self.store.credit(player_id, evaluation.win).await {
                Ok(Some(player)) => player.balance,
                Ok(None) => {
                    tracing::error!(player_id, bet = %bet, win = %evaluation.win, "Player disappeared before win credit");
                    return Err(ServiceError::server(SPIN_FAILED));
                }
                Err(e) => {
                    tracing::error!(player_id, bet = %bet, win = %evaluation.win, error = %e, "Win credit failed, voiding round");
                    self.refund(player_id, bet).await;
                    return Err(ServiceError::server(SPIN_FAILED));
                }
            }
        } else {
            debited.balance
        };

        tracing::info!(
            player_id,
            bet = %bet,
            win = %evaluation.win,
            balance = %current_balance,
            "Spin completed"
        );

        Ok(SpinResponse {
            reel_symbols: evaluation.reel_symbols,
            win: evaluation.win,
            current_balance,
        })
    }

    /// Fresh engine, one grid, one evaluation
    fn evaluate(&self, settings: GameSettings, bet: Decimal) -> Result<Evaluation, GameError> {
        let mut engine = self.engines.create();
        engine.generate_grid(settings.reel_rows, settings.reel_columns)?;
        let win = engine.spin(bet)?;
        Ok(Evaluation {
            reel_symbols: engine.serialize(),
            win,
        })
    }

    async fn refund(&self, player_id: &str, bet: Decimal) {
        match self.store.credit(player_id, bet).await {
            Ok(Some(player)) => {
                tracing::warn!(player_id, bet = %bet, balance = %player.balance, "Bet refunded after failed round");
            }
            Ok(None) => {
                tracing::error!(player_id, bet = %bet, "Refund failed: player missing, manual reconciliation required");
            }
            Err(e) => {
                tracing::error!(player_id, bet = %bet, error = %e, "Refund failed, manual reconciliation required");
            }
        }
    }

    /// Add `amount` to an existing player's balance
    pub async fn credit_balance(
        &self,
        player_id: &str,
        amount: Decimal,
    ) -> ServiceResult<BalanceUpdateResponse> {
        let player_id = player_id.trim();
        if player_id.is_empty() {
            return Err(ServiceError::validation(PLAYER_ID_REQUIRED));
        }
        if !is_positive(amount) {
            return Err(ServiceError::validation(AMOUNT_NOT_POSITIVE));
        }

        // A missing player is a validation failure here, unlike in `spin`.
        match self.store.get_balance(player_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(ServiceError::validation(PLAYER_NOT_FOUND)),
            Err(e) => {
                tracing::error!(player_id, amount = %amount, error = %e, "Balance lookup failed");
                return Err(ServiceError::server(CREDIT_FAILED));
            }
        }

        match self.store.credit(player_id, amount).await {
            Ok(Some(player)) => {
                tracing::info!(player_id, amount = %amount, balance = %player.balance, "Balance credited");
                Ok(BalanceUpdateResponse {
                    player_id: None,
                    new_balance: player.balance,
                })
            }
            Ok(None) => Err(ServiceError::validation(PLAYER_NOT_FOUND)),
            Err(SpinxError::Storage(StorageError::BalanceOverflow(detail))) => {
                tracing::warn!(player_id, amount = %amount, detail = %detail, "Credit rejected, balance out of range");
                Err(ServiceError::validation(BALANCE_LIMIT_EXCEEDED))
            }
            Err(e) => {
                tracing::error!(player_id, amount = %amount, error = %e, "Credit failed");
                Err(ServiceError::server(CREDIT_FAILED))
            }
        }
    }

    pub async fn create_player(&self, amount: Decimal) -> ServiceResult<BalanceUpdateResponse> {
        if amount < Decimal::ZERO {
            return Err(ServiceError::validation(NEGATIVE_INITIAL_BALANCE));
        }

        match self.store.create_player(amount).await {
            Ok(player) => {
                tracing::info!(player_id = %player.id, balance = %player.balance, "Player created");
                Ok(BalanceUpdateResponse {
                    player_id: Some(player.id),
                    new_balance: player.balance,
                })
            }
            Err(e) => {
                tracing::error!(amount = %amount, error = %e, "Player creation failed");
                Err(ServiceError::server(CREATE_FAILED))
            }
        }
    }

    pub async fn get_all(&self) -> ServiceResult<Vec<Player>> {
        self.store.get_all().await.map_err(|e| {
            tracing::error!(error = %e, "Listing players failed");
            ServiceError::server(LIST_FAILED)
        })
    }
}
