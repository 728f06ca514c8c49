//! Player record and the request/response contracts of the wager operations.

use crate::money::Decimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted player with a non-negative, 2-digit balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Player {
    pub fn new(id: String, balance: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id,
            balance,
            created_at: now,
            updated_at: now,
        }
    }
}

/// POST /player/spin
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinRequest {
    pub player_id: String,
    pub bet_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinResponse {
    /// Grid in wire format, e.g. `[[1,2,3],[4,5,6]]`
    pub reel_symbols: String,
    pub win: Decimal,
    pub current_balance: Decimal,
}

/// POST /player/credit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceUpdateRequest {
    pub player_id: String,
    pub amount: Decimal,
}

/// POST /player/create
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerRequest {
    #[serde(default)]
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceUpdateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    pub new_balance: Decimal,
}
