//! Timed HTTP fan-out over tokio's blocking pool.
//!
//! # Overview
//! Issues HTTP GET/POST requests through a blocking client wrapped in an
//! `async` call, and measures wall-clock time under four start/await
//! patterns: eager sequential, a lazily created pair started before being
//! awaited, the same pair against an unresolvable host, and a large batch.
//!
//! # Design
//! - `HttpRequest` is plain data; only `Executor` touches the network.
//! - Every request failure is an `Outcome::Failure` value, never a panic or
//!   an `Err`.
//! - `Deferred` separates creating a task from starting it from awaiting it.
//! - `Driver` owns the scenarios and reports outcomes in creation order.

pub mod driver;
pub mod error;
pub mod executor;
pub mod http;
pub mod outcome;
pub mod task;

pub use driver::{Driver, DriverConfig, Scenario, ScenarioReport};
pub use error::{DriverError, FetchError, TaskError};
pub use executor::{execute, ClientMode, Executor, ExecutorConfig};
pub use http::{Header, HttpMethod, HttpRequest};
pub use outcome::Outcome;
pub use task::Deferred;
