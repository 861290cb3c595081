//! Concurrency driver: runs the executor under the four timed start/await
//! patterns.
//!
//! # Design
//! Every scenario produces its outcomes in creation order. Lazy scenarios
//! create all their [`Deferred`] tasks first, start every one of them, and
//! only then await them one by one, so the requests overlap while the
//! reported order stays the order in which they were created.
//!
//! There is no cancellation and no retry. Concurrency in the batch scenario
//! is bounded only by `max_in_flight` (when set) and the size of tokio's
//! blocking pool.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tracing::info;

use crate::error::DriverError;
use crate::executor::Executor;
use crate::http::{Header, HttpMethod, HttpRequest};
use crate::outcome::Outcome;
use crate::task::Deferred;

pub const DEFAULT_URL: &str = "https://jsonplaceholder.typicode.com/todos/1";
pub const DEFAULT_BROKEN_URL: &str = "https://jsonplceholder.typicode.com/todos/1";
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// One of the timed start/await patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// Await request A to completion, then request B.
    EagerSequential,
    /// Create two lazy tasks, start both, await both in order.
    LazyPair,
    /// `LazyPair` against the broken URL.
    BrokenHostPair,
    /// Create `batch_size` lazy tasks, start all, await all in order.
    Batch,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::EagerSequential,
        Scenario::LazyPair,
        Scenario::BrokenHostPair,
        Scenario::Batch,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::EagerSequential => "eager-sequential",
            Scenario::LazyPair => "lazy-pair",
            Scenario::BrokenHostPair => "broken-host-pair",
            Scenario::Batch => "batch",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eager-sequential" | "eager" | "sequential" => Ok(Scenario::EagerSequential),
            "lazy-pair" | "lazy" => Ok(Scenario::LazyPair),
            "broken-host-pair" | "broken" => Ok(Scenario::BrokenHostPair),
            "batch" => Ok(Scenario::Batch),
            other => Err(DriverError::UnknownScenario(other.to_string())),
        }
    }
}

/// What the driver requests and how hard it fans out.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub url: String,
    pub broken_url: String,
    pub batch_size: usize,
    pub method: HttpMethod,
    pub headers: Vec<Header>,
    pub body: Option<String>,
    /// Cap on concurrently running requests in lazy scenarios. `None` starts
    /// everything at once.
    pub max_in_flight: Option<usize>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            broken_url: DEFAULT_BROKEN_URL.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            method: HttpMethod::Get,
            headers: Vec::new(),
            body: None,
            max_in_flight: None,
        }
    }
}

impl DriverConfig {
    pub fn request_for(&self, url: &str) -> HttpRequest {
        HttpRequest::new(self.method, url)
            .with_headers(self.headers.iter().cloned())
            .with_body(self.body.clone())
    }
}

/// Outcomes and wall-clock time of one scenario run.
#[derive(Debug)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    pub outcomes: Vec<Outcome>,
    pub elapsed: Duration,
}

impl ScenarioReport {
    pub fn successes(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failures(&self) -> usize {
        self.outcomes.len() - self.successes()
    }

    pub fn elapsed_millis(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

#[derive(Debug, Clone)]
pub struct Driver {
    executor: Executor,
    config: DriverConfig,
    limiter: Option<Arc<Semaphore>>,
}

impl Driver {
    pub fn new(executor: Executor, config: DriverConfig) -> Result<Self, DriverError> {
        let limiter = match config.max_in_flight {
            Some(0) => {
                return Err(DriverError::InvalidConfig(
                    "max_in_flight must be greater than zero".to_string(),
                ))
            }
            Some(limit) => Some(Arc::new(Semaphore::new(limit))),
            None => None,
        };
        Ok(Self {
            executor,
            config,
            limiter,
        })
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Run one scenario and time it.
    pub async fn run(&self, scenario: Scenario) -> Result<ScenarioReport, DriverError> {
        self.run_with(scenario, |_: usize, _: &Outcome| {}).await
    }

    /// Run one scenario, calling `on_outcome` with each outcome's creation
    /// index as soon as it has been awaited. The reported elapsed time
    /// includes the callbacks.
    pub async fn run_with<F>(&self, scenario: Scenario, mut on_outcome: F) -> Result<ScenarioReport, DriverError>
    where
        F: FnMut(usize, &Outcome),
    {
        let started = Instant::now();
        let outcomes = match scenario {
            Scenario::EagerSequential => self.eager_sequential(&mut on_outcome).await,
            Scenario::LazyPair => {
                self.start_then_await(&self.config.url, 2, &mut on_outcome)
                    .await?
            }
            Scenario::BrokenHostPair => {
                self.start_then_await(&self.config.broken_url, 2, &mut on_outcome)
                    .await?
            }
            Scenario::Batch => {
                self.start_then_await(&self.config.url, self.config.batch_size, &mut on_outcome)
                    .await?
            }
        };
        let report = ScenarioReport {
            scenario,
            outcomes,
            elapsed: started.elapsed(),
        };
        info!(
            scenario = %scenario,
            requests = report.outcomes.len(),
            successes = report.successes(),
            failures = report.failures(),
            elapsed_ms = report.elapsed_millis() as u64,
            "scenario finished"
        );
        Ok(report)
    }

    /// Run `scenarios` one after another.
    pub async fn run_all(&self, scenarios: &[Scenario]) -> Result<Vec<ScenarioReport>, DriverError> {
        let mut reports = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            reports.push(self.run(*scenario).await?);
        }
        Ok(reports)
    }

    /// Create one lazy task per request, start them all, then await them in
    /// the order given.
    pub async fn fan_out(&self, requests: Vec<HttpRequest>) -> Result<Vec<Outcome>, DriverError> {
        self.fan_out_with(requests, &mut |_: usize, _: &Outcome| {}).await
    }

    async fn fan_out_with<F>(&self, requests: Vec<HttpRequest>, on_outcome: &mut F) -> Result<Vec<Outcome>, DriverError>
    where
        F: FnMut(usize, &Outcome),
    {
        let mut tasks: Vec<Deferred<Outcome>> =
            requests.into_iter().map(|request| self.deferred(request)).collect();

        for task in &mut tasks {
            task.start();
        }

        let mut outcomes = Vec::with_capacity(tasks.len());
        for (index, task) in tasks.into_iter().enumerate() {
            let outcome = task
                .join()
                .await
                .map_err(|source| DriverError::Task { index, source })?;
            on_outcome(index, &outcome);
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    async fn eager_sequential<F>(&self, on_outcome: &mut F) -> Vec<Outcome>
    where
        F: FnMut(usize, &Outcome),
    {
        let first = self.executor.execute(self.config.request_for(&self.config.url)).await;
        let second = self.executor.execute(self.config.request_for(&self.config.url)).await;
        on_outcome(0, &first);
        on_outcome(1, &second);
        vec![first, second]
    }

    async fn start_then_await<F>(&self, url: &str, count: usize, on_outcome: &mut F) -> Result<Vec<Outcome>, DriverError>
    where
        F: FnMut(usize, &Outcome),
    {
        let requests = (0..count).map(|_| self.config.request_for(url)).collect();
        self.fan_out_with(requests, on_outcome).await
    }

    fn deferred(&self, request: HttpRequest) -> Deferred<Outcome> {
        let executor = self.executor.clone();
        let limiter = self.limiter.clone();
        Deferred::lazy(async move {
            // Held until the request finishes.
            let _permit = match limiter {
                Some(semaphore) => semaphore.acquire_owned().await.ok(),
                None => None,
            };
            executor.execute(request).await
        })
    }
}
