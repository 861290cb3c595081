//! The result of executing one request.

use std::fmt;

use crate::error::FetchError;

/// What came back from a single request.
///
/// Any HTTP status is a `Success` as long as a response arrived; only
/// transport-level problems (and a POST without a body) are a `Failure`.
#[derive(Debug)]
pub enum Outcome {
    Success { status: u16, body: Option<String> },
    Failure(FetchError),
}

impl Outcome {
    /// Wrap a received response. An empty body is recorded as absent.
    pub fn success(status: u16, body: String) -> Self {
        let body = if body.is_empty() { None } else { Some(body) };
        Outcome::Success { status, body }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Outcome::Success { status, .. } => Some(*status),
            Outcome::Failure(_) => None,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            Outcome::Success { body, .. } => body.as_deref(),
            Outcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure(err) => Some(err),
        }
    }
}

impl From<FetchError> for Outcome {
    fn from(err: FetchError) -> Self {
        Outcome::Failure(err)
    }
}

/// Successes print the raw body (`null` when absent), failures print
/// `Failure(<error>)`.
impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success { body: Some(body), .. } => write!(f, "{body}"),
            Outcome::Success { body: None, .. } => write!(f, "null"),
            Outcome::Failure(err) => write!(f, "Failure({err})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_becomes_absent() {
        let outcome = Outcome::success(204, String::new());
        assert!(outcome.is_success());
        assert_eq!(outcome.body(), None);
        assert_eq!(outcome.to_string(), "null");
    }

    #[test]
    fn success_displays_raw_body() {
        let outcome = Outcome::success(200, r#"{"id":1}"#.to_string());
        assert_eq!(outcome.status(), Some(200));
        assert_eq!(outcome.to_string(), r#"{"id":1}"#);
    }

    #[test]
    fn error_status_is_still_success() {
        let outcome = Outcome::success(404, "{}".to_string());
        assert!(outcome.is_success());
        assert!(outcome.error().is_none());
    }

    #[test]
    fn failure_displays_error() {
        let outcome = Outcome::from(FetchError::MissingBody);
        assert!(outcome.is_failure());
        assert_eq!(outcome.status(), None);
        assert_eq!(
            outcome.to_string(),
            "Failure(body cannot be empty for a POST request)"
        );
    }
}
