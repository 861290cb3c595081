use fanout_core::DriverError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Driver(#[from] DriverError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid header '{value}', expected 'Key: Value'.")]
    InvalidHeaderFormat { value: String },
    #[error("Header name must not be empty in '{value}'.")]
    EmptyHeaderName { value: String },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}', expected e.g. 500ms, 10s or 1m.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration number in '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid duration unit '{unit}' in '{value}'.")]
    InvalidDurationUnit { value: String, unit: String },
    #[error("Expected a positive integer, got '{value}'.")]
    NotPositive { value: String },
}
