//! Probe and resolution result types.

use std::time::Duration;

use crate::core::connectivity::candidate::TransportCandidate;

/// Outcome of one bounded-time probe attempt.
///
/// `Timeout` is deliberately distinct from `Failure`: it means "maybe
/// reachable, inconclusive", not "broken".
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Success { latency: Duration },
    Timeout,
    Failure { cause: String },
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success { .. })
    }

    pub fn latency(&self) -> Option<Duration> {
        match self {
            ProbeOutcome::Success { latency } => Some(*latency),
            _ => None,
        }
    }
}

/// Result of probing one candidate. Owns a clone of the candidate so the
/// diagnostic report can outlive the resolution pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub candidate: TransportCandidate,
    pub outcome: ProbeOutcome,
}

/// The winning transport of one resolution pass.
///
/// Exists only when at least one candidate probed `Success`; the direct
/// candidate is probed like any other, so even a direct win carries a
/// measured latency.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTransport {
    pub candidate: TransportCandidate,
    pub measured_latency: Duration,
    /// Local-timezone RFC3339 timestamp of the winning probe.
    pub probed_at: String,
}

/// Local-timezone ISO-8601 timestamp, e.g. `2025-01-25T10:30:45+03:00`.
/// All persisted/reported timestamps in the connectivity core use this.
pub fn get_local_timestamp() -> String {
    chrono::Local::now().to_rfc3339()
}

/// Resolution-level errors surfaced to callers.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    /// Every candidate timed out or failed. Carries the full per-candidate
    /// report so an operator can see what was attempted; callers must not
    /// silently fall back to an unconfigured transport.
    #[error("all {} transport candidates unreachable", report.len())]
    AllCandidatesUnreachable { report: Vec<ProbeResult> },

    /// A dependent call was made before any successful resolution.
    #[error("no transport resolved yet")]
    NotInitialized,

    /// The winning transport could not be applied to the outbound client.
    #[error("client configuration failed: {0}")]
    ClientConfiguration(String),
}
