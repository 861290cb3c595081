use std::io::{self, Write};

use fanout_core::{Outcome, ScenarioReport};

pub const DIVIDER: &str = "-----------";

pub fn write_outcome<W: Write>(out: &mut W, outcome: &Outcome) -> io::Result<()> {
    writeln!(out, "{outcome}")
}

/// Close a scenario: a count line when `quiet` (outcomes were not printed),
/// then the elapsed milliseconds.
pub fn write_summary<W: Write>(out: &mut W, report: &ScenarioReport, quiet: bool) -> io::Result<()> {
    if quiet {
        writeln!(
            out,
            "{}: {} succeeded, {} failed",
            report.scenario,
            report.successes(),
            report.failures()
        )?;
    }
    writeln!(out, "{}", report.elapsed_millis())
}

pub fn write_divider<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{DIVIDER}")
}
