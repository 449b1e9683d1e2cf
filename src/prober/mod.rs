use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

pub mod http;

/// Health endpoint polled every iteration.
pub const HEALTH_URL: &str = "http://localhost:9000/actuator/health";

/// Pause after each probe, independent of how long the probe took.
pub const PROBE_INTERVAL_MS: u64 = 1000;

/// Result of a single probe.
///
/// Any HTTP response counts as `Status`, whatever its code. `Failure` covers
/// everything else (connect errors, DNS, protocol or body read errors) and
/// carries the rendered error chain.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Status { code: u16, elapsed: Duration },
    Failure(String),
}

impl ProbeOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ProbeOutcome::Failure(_))
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Status { code, elapsed } => {
                write!(f, "{} {:.6}", code, elapsed.as_secs_f64())
            }
            ProbeOutcome::Failure(msg) => f.write_str(msg),
        }
    }
}

/// Writes the outcome as exactly one line.
pub fn report<W: Write>(out: &mut W, outcome: &ProbeOutcome) -> io::Result<()> {
    // error text from the wire may carry newlines; keep it to one line
    let line = outcome.to_string().replace(['\r', '\n'], " ");
    writeln!(out, "{}", line)?;
    out.flush()
}

/// One loop iteration: probe, then print the outcome line.
pub async fn tick<W: Write>(prober: &http::HttpProber, out: &mut W) -> anyhow::Result<()> {
    let outcome = prober.probe().await;
    report(out, &outcome)?;
    tracing::debug!(failed = outcome.is_failure(), "probe done: {}", outcome);
    Ok(())
}
