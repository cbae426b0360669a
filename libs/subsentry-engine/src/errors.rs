use thiserror::Error;

/// Errors raised by the engine's validation and date rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Lead days must not be negative (got {0})")]
    NegativeLeadDays(i64),

    #[error("Date out of range")]
    DateOutOfRange,

    #[error("Amount must not be negative")]
    NegativeAmount,

    #[error("Amount must be at most {0}")]
    AmountTooLarge(rust_decimal::Decimal),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid setting {field}: {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    #[error("Unknown {kind}: {value}")]
    UnknownValue { kind: &'static str, value: String },
}

pub type EngineResult<T> = Result<T, EngineError>;
