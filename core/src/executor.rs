//! Request executor: one blocking HTTP call exposed as an `async fn`.
//!
//! # Design
//! The HTTP call itself is a synchronous `ureq` round-trip. `Executor::execute`
//! moves it onto tokio's blocking pool with `spawn_blocking`, so awaiting it
//! suspends the caller without tying up an async worker thread.
//!
//! Every failure is folded into `Outcome::Failure`; nothing escapes as a panic
//! or an `Err`. 4xx/5xx statuses are responses, not failures, so
//! `http_status_as_error` is turned off on every agent.
//!
//! Agents resolve names through `LookupResolver`, which reports any failed
//! lookup as `ureq::Error::HostNotFound`. That variant is the only one
//! classified as `FetchError::UnknownHost`.

use std::fmt;
use std::time::Duration;

use tokio::task::JoinError;
use tracing::{debug, warn};
use ureq::config::Config;
use ureq::http::Uri;
use ureq::unversioned::resolver::{DefaultResolver, ResolvedSocketAddrs, Resolver};
use ureq::unversioned::transport::{DefaultConnector, NextTimeout};
use url::Url;

use crate::error::{FetchError, TaskError};
use crate::http::{Header, HttpMethod, HttpRequest, JSON_CONTENT_TYPE};
use crate::outcome::Outcome;

/// Whether each call builds its own HTTP agent or all calls share one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClientMode {
    /// A fresh agent per call; no connection reuse.
    #[default]
    PerCall,
    /// One agent (and its connection pool) reused by every call.
    Shared,
}

#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
    pub client_mode: ClientMode,
    /// Upper bound on a whole call. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// Executes [`HttpRequest`]s and reports each as an [`Outcome`].
///
/// Cheap to clone: clones share the same agent in [`ClientMode::Shared`].
#[derive(Clone)]
pub struct Executor {
    config: ExecutorConfig,
    shared: Option<ureq::Agent>,
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("config", &self.config)
            .field("shared_agent", &self.shared.is_some())
            .finish()
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new(ExecutorConfig::default())
    }
}

impl Executor {
    pub fn new(config: ExecutorConfig) -> Self {
        let shared = match config.client_mode {
            ClientMode::Shared => Some(build_agent(config.timeout)),
            ClientMode::PerCall => None,
        };
        Self { config, shared }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run `request` on the blocking pool and await its outcome.
    pub async fn execute(&self, request: HttpRequest) -> Outcome {
        let executor = self.clone();
        worker_outcome(tokio::task::spawn_blocking(move || executor.execute_blocking(&request)).await)
    }

    /// Run `request` on the current thread.
    pub fn execute_blocking(&self, request: &HttpRequest) -> Outcome {
        match self.send(request) {
            Ok(outcome) => {
                debug!(
                    method = %request.method,
                    url = %request.url,
                    status = outcome.status(),
                    "request completed"
                );
                outcome
            }
            Err(err) => {
                warn!(method = %request.method, url = %request.url, error = %err, "request failed");
                Outcome::Failure(err)
            }
        }
    }

    fn agent(&self) -> ureq::Agent {
        match &self.shared {
            Some(agent) => agent.clone(),
            None => build_agent(self.config.timeout),
        }
    }

    fn send(&self, request: &HttpRequest) -> Result<Outcome, FetchError> {
        let body = match request.method {
            HttpMethod::Post => Some(request.body.as_deref().ok_or(FetchError::MissingBody)?),
            HttpMethod::Get => None,
        };

        let url = Url::parse(&request.url).map_err(|source| FetchError::InvalidUrl {
            url: request.url.clone(),
            source,
        })?;

        let agent = self.agent();
        let result = match body {
            None => {
                let mut builder = agent.get(url.as_str());
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            Some(body) => {
                let mut builder = agent.post(url.as_str());
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.content_type(JSON_CONTENT_TYPE).send(body.as_bytes())
            }
        };

        let mut response = result.map_err(|err| classify(&url, err))?;
        let status = response.status().as_u16();
        let text = response.body_mut().read_to_string().map_err(FetchError::Body)?;
        Ok(Outcome::success(status, text))
    }
}

/// Execute one request with a fresh agent.
///
/// `headers` and `body` are optional; a POST with `body == None` yields
/// `Outcome::Failure(FetchError::MissingBody)` without touching the network.
pub async fn execute(
    method: HttpMethod,
    url: &str,
    headers: Option<Vec<Header>>,
    body: Option<String>,
) -> Outcome {
    let request = HttpRequest::new(method, url)
        .with_headers(headers.unwrap_or_default())
        .with_body(body);
    Executor::default().execute(request).await
}

fn worker_outcome(joined: Result<Outcome, JoinError>) -> Outcome {
    match joined {
        Ok(outcome) => outcome,
        Err(err) => {
            let err = FetchError::Worker(TaskError::from(err).to_string());
            warn!(error = %err, "request worker did not complete");
            Outcome::Failure(err)
        }
    }
}

fn build_agent(timeout: Option<Duration>) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(timeout)
        .build();
    ureq::Agent::with_parts(config, DefaultConnector::default(), LookupResolver::default())
}

/// `DefaultResolver` with lookup failures reported as `HostNotFound`.
///
/// The system resolver surfaces NXDOMAIN and friends as `Error::Io`, which
/// would otherwise be indistinguishable from a refused or reset connection.
#[derive(Debug, Default)]
struct LookupResolver {
    inner: DefaultResolver,
}

impl Resolver for LookupResolver {
    fn resolve(
        &self,
        uri: &Uri,
        config: &Config,
        timeout: NextTimeout,
    ) -> Result<ResolvedSocketAddrs, ureq::Error> {
        self.inner.resolve(uri, config, timeout).map_err(|err| match err {
            ureq::Error::Io(io) => {
                debug!(%uri, error = %io, "name lookup failed");
                ureq::Error::HostNotFound
            }
            other => other,
        })
    }
}

fn classify(url: &Url, err: ureq::Error) -> FetchError {
    match err {
        ureq::Error::HostNotFound => FetchError::UnknownHost {
            host: url.host_str().unwrap_or_default().to_string(),
        },
        other => FetchError::Transport(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_without_body_fails_before_io() {
        let request = HttpRequest::new(HttpMethod::Post, "http://127.0.0.1:9/todos");
        let outcome = Executor::default().execute_blocking(&request);
        assert!(matches!(outcome, Outcome::Failure(FetchError::MissingBody)));
    }

    #[test]
    fn malformed_url_is_reported() {
        let outcome = Executor::default().execute_blocking(&HttpRequest::get("not a url"));
        match outcome {
            Outcome::Failure(FetchError::InvalidUrl { url, .. }) => assert_eq!(url, "not a url"),
            other => panic!("expected InvalidUrl, got {other:?}"),
        }
    }

    #[test]
    fn unresolvable_host_is_unknown_host() {
        let request = HttpRequest::get("http://fanout-test.invalid/todos/1");
        let outcome = Executor::default().execute_blocking(&request);
        match outcome {
            Outcome::Failure(FetchError::UnknownHost { host }) => {
                assert_eq!(host, "fanout-test.invalid")
            }
            other => panic!("expected UnknownHost, got {other:?}"),
        }
    }

    #[test]
    fn unsupported_scheme_on_ip_literal_is_not_unknown_host() {
        let outcome = Executor::default().execute_blocking(&HttpRequest::get("foo://127.0.0.1/x"));
        match outcome {
            Outcome::Failure(FetchError::Transport(_)) => {}
            other => panic!("expected Transport, got {other:?}"),
        }
    }

    #[test]
    fn refused_connection_on_ip_literal_is_transport() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let outcome = Executor::default().execute_blocking(&HttpRequest::get(&format!("http://{addr}/")));
        assert!(matches!(outcome, Outcome::Failure(FetchError::Transport(_))));
    }

    #[test]
    fn only_host_not_found_is_unknown_host() {
        let url = Url::parse("https://jsonplceholder.typicode.com/todos/1").unwrap();
        match classify(&url, ureq::Error::HostNotFound) {
            FetchError::UnknownHost { host } => assert_eq!(host, "jsonplceholder.typicode.com"),
            other => panic!("expected UnknownHost, got {other:?}"),
        }
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        assert!(matches!(
            classify(&url, ureq::Error::Io(io)),
            FetchError::Transport(_)
        ));
    }

    #[tokio::test]
    async fn panicked_worker_becomes_worker_failure() {
        let joined = tokio::task::spawn_blocking(|| -> Outcome { panic!("worker died") }).await;
        match worker_outcome(joined) {
            Outcome::Failure(FetchError::Worker(msg)) => assert!(msg.contains("worker died"), "{msg}"),
            other => panic!("expected Worker failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn joined_outcome_passes_through() {
        let joined = tokio::task::spawn_blocking(|| Outcome::success(200, "ok".to_string())).await;
        assert_eq!(worker_outcome(joined).body(), Some("ok"));
    }

    #[test]
    fn shared_mode_builds_one_agent() {
        let executor = Executor::new(ExecutorConfig {
            client_mode: ClientMode::Shared,
            timeout: None,
        });
        assert!(executor.shared.is_some());
        assert!(Executor::default().shared.is_none());
    }

    #[tokio::test]
    async fn async_post_without_body_is_a_failure_value() {
        let outcome = execute(HttpMethod::Post, "http://127.0.0.1:9/todos", None, None).await;
        assert!(matches!(outcome, Outcome::Failure(FetchError::MissingBody)));
    }
}
