//! Error types for the SpinX wager engine
//!
//! Two layers live here:
//! - [`SpinxError`] and its sub-errors describe what went wrong inside the
//!   library (storage, configuration, engine contract breaches).
//! - [`ServiceError`] is the typed business outcome the orchestrator hands to
//!   the transport layer. Anticipated failures are returned, never thrown.

use std::fmt;

/// Root error type for all SpinX internals
#[derive(Debug, thiserror::Error)]
pub enum SpinxError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Game error: {0}")]
    Game(#[from] GameError),
}

/// Configuration and validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
    #[error("Missing required field: {0}")]
    MissingRequired(String),
    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),
    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),
}

/// Balance store errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("Database open failed: {0}")]
    DatabaseOpenFailed(String),
    #[error("Read failed: {0}")]
    ReadFailed(String),
    #[error("Write failed: {0}")]
    WriteFailed(String),
    #[error("Corrupted data: {0}")]
    CorruptedData(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Balance out of range: {0}")]
    BalanceOverflow(String),
}

/// Spin engine contract breaches.
///
/// These signal a caller bug (bad dimensions, bad bet, evaluating before a
/// grid exists), not user input. The orchestrator aborts the wager on them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Failed to parse grid: {0}")]
    Parse(String),
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),
}

impl GameError {
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        GameError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

impl From<rocksdb::Error> for SpinxError {
    fn from(e: rocksdb::Error) -> Self {
        SpinxError::Storage(StorageError::WriteFailed(e.to_string()))
    }
}

impl From<serde_json::Error> for SpinxError {
    fn from(e: serde_json::Error) -> Self {
        SpinxError::Storage(StorageError::CorruptedData(e.to_string()))
    }
}

impl From<std::io::Error> for SpinxError {
    fn from(e: std::io::Error) -> Self {
        SpinxError::Configuration(ConfigurationError::LoadFailed(e.to_string()))
    }
}

pub type SpinxResult<T> = Result<T, SpinxError>;

/// Status of a service operation, as seen by the transport layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceStatus {
    Success,
    NotFound,
    ValidationError,
    Conflict,
    Unauthorized,
    Forbidden,
    ServerError,
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ServiceStatus::Success => "Success",
            ServiceStatus::NotFound => "NotFound",
            ServiceStatus::ValidationError => "ValidationError",
            ServiceStatus::Conflict => "Conflict",
            ServiceStatus::Unauthorized => "Unauthorized",
            ServiceStatus::Forbidden => "Forbidden",
            ServiceStatus::ServerError => "ServerError",
        };
        f.write_str(label)
    }
}

/// Failed outcome of an orchestrated operation, carrying the user-facing message
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Server(String),
}

impl ServiceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    pub fn server(message: impl Into<String>) -> Self {
        ServiceError::Server(message.into())
    }

    pub fn status(&self) -> ServiceStatus {
        match self {
            ServiceError::NotFound(_) => ServiceStatus::NotFound,
            ServiceError::Validation(_) => ServiceStatus::ValidationError,
            ServiceError::Conflict(_) => ServiceStatus::Conflict,
            ServiceError::Unauthorized(_) => ServiceStatus::Unauthorized,
            ServiceError::Forbidden(_) => ServiceStatus::Forbidden,
            ServiceError::Server(_) => ServiceStatus::ServerError,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ServiceError::NotFound(msg)
            | ServiceError::Validation(msg)
            | ServiceError::Conflict(msg)
            | ServiceError::Unauthorized(msg)
            | ServiceError::Forbidden(msg)
            | ServiceError::Server(msg) => msg,
        }
    }
}

/// Typed result of an orchestrated operation
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_display() {
        let err: SpinxError = ConfigurationError::ValidationFailed("rows".to_string()).into();
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("rows"));
    }

    #[test]
    fn test_game_error_details() {
        let err = GameError::invalid_argument("bet", "must be greater than zero");
        assert_eq!(
            err.to_string(),
            "Invalid argument 'bet': must be greater than zero"
        );
    }

    #[test]
    fn test_error_conversion_and_source() {
        let err: SpinxError = StorageError::ReadFailed("disk".to_string()).into();
        match &err {
            SpinxError::Storage(StorageError::ReadFailed(msg)) => assert_eq!(msg, "disk"),
            other => panic!("Expected storage error, got {:?}", other),
        }
        assert!(err.source().is_some());
    }

    #[test]
    fn test_service_error_status_mapping() {
        assert_eq!(ServiceError::not_found("x").status(), ServiceStatus::NotFound);
        assert_eq!(
            ServiceError::validation("x").status(),
            ServiceStatus::ValidationError
        );
        assert_eq!(ServiceError::server("x").status(), ServiceStatus::ServerError);
        assert_eq!(
            ServiceError::validation("Player not found.").message(),
            "Player not found."
        );
    }
}
