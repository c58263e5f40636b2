//! Human-readable rendering of probe reports.
//!
//! Consumed by the probe harness and by operator-facing status commands.
//! Every candidate goes through `TransportCandidate::masked()`, so raw
//! secrets never reach a rendered report.

use crate::core::connectivity::candidate::TransportKind;
use crate::core::connectivity::types::{ProbeOutcome, ProbeResult};

/// One line per candidate: name, masked endpoint, outcome, latency.
pub fn render_report(report: &[ProbeResult]) -> String {
    let mut out = String::new();
    for result in report {
        let line = match &result.outcome {
            ProbeOutcome::Success { latency } => format!(
                "  ok      {:<12} {:>6}ms  {}",
                result.candidate.name(),
                latency.as_millis(),
                result.candidate.masked()
            ),
            ProbeOutcome::Timeout => format!(
                "  timeout {:<12}       -  {}",
                result.candidate.name(),
                result.candidate.masked()
            ),
            ProbeOutcome::Failure { cause } => format!(
                "  fail    {:<12}       -  {} ({})",
                result.candidate.name(),
                result.candidate.masked(),
                truncate(cause, 80)
            ),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Recommendation block for the probe harness: names the best candidate and
/// prints the env lines that pin it. `None` when nothing succeeded.
pub fn render_recommendation(report: &[ProbeResult]) -> Option<String> {
    let best = report.iter().find(|r| r.outcome.is_success())?;
    let latency = best.outcome.latency().unwrap_or_default();

    let mut out = format!(
        "Best transport: {} ({}ms)\n",
        best.candidate.name(),
        latency.as_millis()
    );

    match best.candidate.kind() {
        TransportKind::Direct => {
            out.push_str("No proxy needed; unset ADBOT_SOCKS5_PROXY and ADBOT_HTTP_PROXY.\n");
        }
        TransportKind::Socks5 => {
            out.push_str(&format!(
                "Pin it with:\n  ADBOT_SOCKS5_PROXY={}\n",
                best.candidate.masked()
            ));
        }
        TransportKind::Http | TransportKind::Unauthenticated => {
            out.push_str(&format!(
                "Pin it with:\n  ADBOT_HTTP_PROXY={}\n",
                best.candidate.masked()
            ));
        }
    }

    Some(out)
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let cut = s
            .char_indices()
            .take_while(|(i, _)| *i < max)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &s[..cut])
    }
}
