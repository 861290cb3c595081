use std::time::Duration;

use clap::{Parser, ValueEnum};
use fanout_core::driver::{DEFAULT_BATCH_SIZE, DEFAULT_BROKEN_URL, DEFAULT_URL};
use fanout_core::{ClientMode, DriverConfig, ExecutorConfig, HttpMethod, Scenario};

use crate::parsers::{parse_duration_arg, parse_header, parse_positive_usize, parse_scenario};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    Get,
    Post,
}

impl From<MethodArg> for HttpMethod {
    fn from(value: MethodArg) -> Self {
        match value {
            MethodArg::Get => HttpMethod::Get,
            MethodArg::Post => HttpMethod::Post,
        }
    }
}

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Time HTTP requests under sequential, lazily started and fan-out concurrency patterns."
)]
pub struct FanoutArgs {
    /// Target URL for every scenario except broken-host-pair
    #[arg(long, default_value = DEFAULT_URL, env = "FANOUT_URL")]
    pub url: String,

    /// Target URL for the broken-host-pair scenario
    #[arg(long = "broken-url", default_value = DEFAULT_BROKEN_URL)]
    pub broken_url: String,

    /// Number of requests in the batch scenario
    #[arg(long = "batch-size", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Scenario to run: eager-sequential, lazy-pair, broken-host-pair, batch (repeatable; default all)
    #[arg(long = "scenario", short = 's', value_parser = parse_scenario)]
    pub scenarios: Vec<Scenario>,

    /// HTTP method
    #[arg(long, short = 'X', value_enum, default_value_t = MethodArg::Get)]
    pub method: MethodArg,

    /// Request body, sent as JSON (POST only)
    #[arg(long, short = 'd')]
    pub body: Option<String>,

    /// HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Reuse one HTTP client across all requests instead of one per request
    #[arg(long = "shared-client")]
    pub shared_client: bool,

    /// Per-request timeout (supports ms/s/m); waits forever when unset
    #[arg(long, value_parser = parse_duration_arg)]
    pub timeout: Option<Duration>,

    /// Maximum requests on the wire at once in lazy scenarios
    #[arg(long = "max-in-flight", value_parser = parse_positive_usize)]
    pub max_in_flight: Option<usize>,

    /// Size of the blocking thread pool that runs requests
    #[arg(long = "blocking-threads", value_parser = parse_positive_usize)]
    pub blocking_threads: Option<usize>,

    /// Print only counts and timings, not every response
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl FanoutArgs {
    /// Scenarios in the order given, or all four when none were named.
    pub fn scenarios(&self) -> Vec<Scenario> {
        if self.scenarios.is_empty() {
            Scenario::ALL.to_vec()
        } else {
            self.scenarios.clone()
        }
    }

    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            client_mode: if self.shared_client {
                ClientMode::Shared
            } else {
                ClientMode::PerCall
            },
            timeout: self.timeout,
        }
    }

    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            url: self.url.clone(),
            broken_url: self.broken_url.clone(),
            batch_size: self.batch_size,
            method: self.method.into(),
            headers: self.headers.clone(),
            body: self.body.clone(),
            max_in_flight: self.max_in_flight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> FanoutArgs {
        let mut argv = vec!["fanout"];
        argv.extend_from_slice(args);
        FanoutArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_reproduce_fixed_run() {
        let args = parse(&[]);
        assert_eq!(args.scenarios(), Scenario::ALL.to_vec());
        let config = args.driver_config();
        assert_eq!(config.url, DEFAULT_URL);
        assert_eq!(config.broken_url, DEFAULT_BROKEN_URL);
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.method, HttpMethod::Get);
        assert!(config.body.is_none());
        assert!(config.max_in_flight.is_none());
        let executor = args.executor_config();
        assert_eq!(executor.client_mode, ClientMode::PerCall);
        assert!(executor.timeout.is_none());
    }

    #[test]
    fn scenarios_keep_given_order() {
        let args = parse(&["-s", "batch", "--scenario", "eager"]);
        assert_eq!(args.scenarios(), vec![Scenario::Batch, Scenario::EagerSequential]);
    }

    #[test]
    fn post_options_flow_into_driver_config() {
        let args = parse(&[
            "-X",
            "post",
            "-d",
            r#"{"title":"foo"}"#,
            "-H",
            "X-Run: 7",
            "--max-in-flight",
            "16",
        ]);
        let config = args.driver_config();
        assert_eq!(config.method, HttpMethod::Post);
        assert_eq!(config.body.as_deref(), Some(r#"{"title":"foo"}"#));
        assert_eq!(config.headers, vec![("X-Run".to_string(), "7".to_string())]);
        assert_eq!(config.max_in_flight, Some(16));
    }

    #[test]
    fn client_options_flow_into_executor_config() {
        let args = parse(&["--shared-client", "--timeout", "1500ms"]);
        let config = args.executor_config();
        assert_eq!(config.client_mode, ClientMode::Shared);
        assert_eq!(config.timeout, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(FanoutArgs::try_parse_from(["fanout", "-s", "parallel"]).is_err());
        assert!(FanoutArgs::try_parse_from(["fanout", "-H", "no-colon"]).is_err());
        assert!(FanoutArgs::try_parse_from(["fanout", "--max-in-flight", "0"]).is_err());
        assert!(FanoutArgs::try_parse_from(["fanout", "--blocking-threads", "0"]).is_err());
    }
}
