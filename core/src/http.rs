//! HTTP request types handed to the executor.
//!
//! # Design
//! Requests are plain data: the executor owns the only code that touches the
//! network. All fields use owned types (`String`, `Vec`) so a request can be
//! moved into a blocking worker without lifetime concerns.

use std::fmt;

use serde::Serialize;

use crate::error::FetchError;

/// Content type attached to every POST body.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// A header as `(name, value)`. Order is preserved when sending.
pub type Header = (String, String);

/// An HTTP request described as plain data.
///
/// `body` is required for POST and ignored for GET. A POST without a body is
/// representable on purpose: the executor reports it as
/// [`FetchError::MissingBody`] instead of sending it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<Header>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: &str) -> Self {
        Self {
            method,
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: &str) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: &str, body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            ..Self::new(HttpMethod::Post, url)
        }
    }

    /// Build a POST whose body is `payload` serialized as JSON.
    pub fn post_json<T: Serialize>(url: &str, payload: &T) -> Result<Self, FetchError> {
        let body = serde_json::to_string(payload).map_err(|e| FetchError::Serialization(e.to_string()))?;
        Ok(Self::post(url, body))
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_headers<I>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = Header>,
    {
        self.headers.extend(headers);
        self
    }

    pub fn with_body(mut self, body: Option<String>) -> Self {
        self.body = body;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_has_no_body_or_headers() {
        let req = HttpRequest::get("http://localhost:3000/todos/1");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/todos/1");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn post_carries_body() {
        let req = HttpRequest::post("http://localhost:3000/todos", r#"{"title":"x"}"#);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.body.as_deref(), Some(r#"{"title":"x"}"#));
    }

    #[test]
    fn post_json_serializes_payload() {
        #[derive(Serialize)]
        struct NewTodo<'a> {
            title: &'a str,
            completed: bool,
        }

        let req = HttpRequest::post_json(
            "http://localhost:3000/todos",
            &NewTodo {
                title: "Buy milk",
                completed: false,
            },
        )
        .unwrap();
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["title"], "Buy milk");
        assert_eq!(body["completed"], false);
    }

    #[test]
    fn headers_keep_insertion_order_and_duplicates() {
        let req = HttpRequest::get("http://localhost")
            .with_header("accept", "application/json")
            .with_header("x-trace", "a")
            .with_header("x-trace", "b");
        assert_eq!(
            req.headers,
            vec![
                ("accept".to_string(), "application/json".to_string()),
                ("x-trace".to_string(), "a".to_string()),
                ("x-trace".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn method_displays_uppercase() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.to_string(), "POST");
    }
}
