mod args;
mod error;
mod logger;
mod parsers;
mod report;

use std::io::Write;

use clap::Parser;
use fanout_core::{Driver, Executor};
use tracing::debug;

use args::FanoutArgs;
use error::AppResult;

fn main() -> AppResult<()> {
    let args = FanoutArgs::parse();
    logger::init_logging(args.verbose);

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(threads) = args.blocking_threads {
        builder.max_blocking_threads(threads);
    }
    let runtime = builder.build()?;

    runtime.block_on(run(args))
}

async fn run(args: FanoutArgs) -> AppResult<()> {
    let driver = Driver::new(Executor::new(args.executor_config()), args.driver_config())?;
    debug!(config = ?driver.config(), "driver ready");

    for (index, scenario) in args.scenarios().into_iter().enumerate() {
        if index > 0 {
            report::write_divider(&mut std::io::stdout().lock())?;
        }

        let mut write_error = None;
        let report = driver
            .run_with(scenario, |_, outcome| {
                if args.quiet || write_error.is_some() {
                    return;
                }
                if let Err(err) = report::write_outcome(&mut std::io::stdout().lock(), outcome) {
                    write_error = Some(err);
                }
            })
            .await?;
        if let Some(err) = write_error {
            return Err(err.into());
        }

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        report::write_summary(&mut out, &report, args.quiet)?;
        out.flush()?;
    }
    Ok(())
}
