//! Reel dimensions used for new spins, adjustable while the server runs.
//!
//! Each spin reads the settings once when it starts. An update only affects
//! grids drawn after it, never a spin already in flight.

use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Largest accepted reel row count
pub const MAX_REEL_ROWS: usize = 100;
/// Largest accepted reel column count
pub const MAX_REEL_COLUMNS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    pub reel_rows: usize,
    pub reel_columns: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            reel_rows: 3,
            reel_columns: 5,
        }
    }
}

impl GameSettings {
    pub fn new(reel_rows: usize, reel_columns: usize) -> Self {
        Self {
            reel_rows,
            reel_columns,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        check_dimension("reelRows", "Reel rows", self.reel_rows, MAX_REEL_ROWS)?;
        check_dimension("reelColumns", "Reel columns", self.reel_columns, MAX_REEL_COLUMNS)
    }
}

fn check_dimension(field: &str, label: &str, value: usize, max: usize) -> Result<(), ConfigurationError> {
    let reason = if value == 0 {
        format!("{} must be greater than zero", label)
    } else if value > max {
        format!("{} must not exceed {}", label, max)
    } else {
        return Ok(());
    };
    Err(ConfigurationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason,
    })
}

/// Source of the settings a spin should use
pub trait GameSettingsProvider: Send + Sync {
    fn current(&self) -> GameSettings;

    /// Replace the settings; rejected values leave the current ones untouched
    fn update(&self, settings: GameSettings) -> Result<GameSettings, ConfigurationError>;
}

#[derive(Debug, Default)]
pub struct RuntimeGameSettings {
    inner: RwLock<GameSettings>,
}

impl RuntimeGameSettings {
    pub fn new(settings: GameSettings) -> Self {
        Self {
            inner: RwLock::new(settings),
        }
    }
}

impl GameSettingsProvider for RuntimeGameSettings {
    fn current(&self) -> GameSettings {
        // GameSettings is Copy, so a poisoned lock still holds a whole value
        match self.inner.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn update(&self, settings: GameSettings) -> Result<GameSettings, ConfigurationError> {
        settings.validate()?;

        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.reel_rows = settings.reel_rows;
        guard.reel_columns = settings.reel_columns;

        tracing::info!(
            reel_rows = settings.reel_rows,
            reel_columns = settings.reel_columns,
            "Game settings updated"
        );
        Ok(*guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_three_by_five() {
        let settings = RuntimeGameSettings::default();
        assert_eq!(settings.current(), GameSettings::new(3, 5));
    }

    #[test]
    fn test_update_replaces_dimensions() {
        let settings = RuntimeGameSettings::default();
        let updated = settings.update(GameSettings::new(4, 6)).unwrap();
        assert_eq!(updated, GameSettings::new(4, 6));
        assert_eq!(settings.current(), GameSettings::new(4, 6));
    }

    #[test]
    fn test_invalid_update_keeps_previous_settings() {
        let settings = RuntimeGameSettings::new(GameSettings::new(2, 2));
        assert!(settings.update(GameSettings::new(0, 5)).is_err());
        assert!(settings.update(GameSettings::new(3, 0)).is_err());
        assert_eq!(settings.current(), GameSettings::new(2, 2));
    }

    #[test]
    fn test_oversized_update_is_rejected() {
        let settings = RuntimeGameSettings::default();
        let err = settings.update(GameSettings::new(100_000, 100_000)).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidValue { ref field, .. } if field == "reelRows"));
        assert!(settings.update(GameSettings::new(3, MAX_REEL_COLUMNS + 1)).is_err());
        assert_eq!(settings.current(), GameSettings::default());

        let largest = GameSettings::new(MAX_REEL_ROWS, MAX_REEL_COLUMNS);
        assert_eq!(settings.update(largest).unwrap(), largest);
    }

    #[test]
    fn test_camel_case_json() {
        let json = serde_json::to_value(GameSettings::default()).unwrap();
        assert_eq!(json["reelRows"], 3);
        assert_eq!(json["reelColumns"], 5);
    }
}
