//! Error types for request execution, deferred tasks and the driver.
//!
//! # Design
//! `FetchError` is never returned through `Result` by the executor: it travels
//! inside `Outcome::Failure`, so every failure a request can hit, including a
//! POST without a body, is a value the caller prints or inspects. `TaskError`
//! and `DriverError` are ordinary `Err` values for the task plumbing around
//! the executor.

use thiserror::Error;

/// Why a single request produced no response.
#[derive(Debug, Error)]
pub enum FetchError {
    /// A POST was issued without a body.
    #[error("body cannot be empty for a POST request")]
    MissingBody,

    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The hostname could not be resolved.
    #[error("unknown host '{host}'")]
    UnknownHost { host: String },

    #[error("transport error: {0}")]
    Transport(#[source] ureq::Error),

    /// The response arrived but its body could not be read as text.
    #[error("failed to read response body: {0}")]
    Body(#[source] ureq::Error),

    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The blocking worker running the request panicked or was shut down.
    #[error("request worker failed: {0}")]
    Worker(String),
}

impl FetchError {
    pub fn is_unknown_host(&self) -> bool {
        matches!(self, FetchError::UnknownHost { .. })
    }
}

/// Failure of a spawned [`Deferred`](crate::task::Deferred) task.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("task panicked: {0}")]
    Panicked(String),

    #[error("task was cancelled")]
    Cancelled,
}

impl From<tokio::task::JoinError> for TaskError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            return TaskError::Cancelled;
        }
        match err.try_into_panic() {
            Ok(payload) => TaskError::Panicked(panic_message(payload.as_ref())),
            Err(_) => TaskError::Cancelled,
        }
    }
}

/// Errors returned by [`Driver`](crate::driver::Driver).
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("task #{index} failed: {source}")]
    Task {
        index: usize,
        #[source]
        source: TaskError,
    },

    #[error("invalid driver configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown scenario '{0}' (expected eager-sequential, lazy-pair, broken-host-pair or batch)")]
    UnknownScenario(String),
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        return (*msg).to_string();
    }
    if let Some(msg) = payload.downcast_ref::<String>() {
        return msg.clone();
    }
    "unknown panic payload".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_body_message() {
        assert_eq!(
            FetchError::MissingBody.to_string(),
            "body cannot be empty for a POST request"
        );
    }

    #[test]
    fn unknown_host_is_detected() {
        let err = FetchError::UnknownHost {
            host: "jsonplceholder.typicode.com".to_string(),
        };
        assert!(err.is_unknown_host());
        assert_eq!(err.to_string(), "unknown host 'jsonplceholder.typicode.com'");
        assert!(!FetchError::MissingBody.is_unknown_host());
    }

    #[test]
    fn invalid_url_keeps_source() {
        let source = url::Url::parse("not a url").unwrap_err();
        let err = FetchError::InvalidUrl {
            url: "not a url".to_string(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("invalid URL 'not a url'"));
    }

    #[test]
    fn panic_message_reads_str_and_string_payloads() {
        let a: Box<dyn std::any::Any + Send> = Box::new("boom");
        let b: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        let c: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(a.as_ref()), "boom");
        assert_eq!(panic_message(b.as_ref()), "bang");
        assert_eq!(panic_message(c.as_ref()), "unknown panic payload");
    }

    #[test]
    fn driver_task_error_names_index() {
        let err = DriverError::Task {
            index: 3,
            source: TaskError::Cancelled,
        };
        assert_eq!(err.to_string(), "task #3 failed: task was cancelled");
    }
}
