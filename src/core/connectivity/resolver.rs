//! Connectivity resolver: turns a candidate set into one usable transport.
//!
//! Two documented probing modes:
//! - **Sequential first-success** (`resolve_first_success`): candidates are
//!   tried strictly in set order and the first success wins; later, possibly
//!   faster candidates are never probed. This favors availability over
//!   latency optimality and is the default for the long-lived client path.
//! - **Concurrent rank-all** (`resolve_rank_all`): all probes run at once,
//!   each under its own timeout; after every probe settles the successes are
//!   ranked by ascending latency and the best one wins. Used by the
//!   standalone probe harness, which wants the full report.
//!
//! In both modes a probe that exceeds the per-candidate bound is classified
//! `Timeout`, never `Failure`, and individual probe failures are recorded
//! locally rather than raised.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::timeout;

use crate::core::connectivity::candidate::{CandidateSet, TransportCandidate};
use crate::core::connectivity::types::{
    get_local_timestamp, ProbeOutcome, ProbeResult, ResolutionError, ResolvedTransport,
};
use crate::core::debug_logger::get_debug_logger;

/// Injected capability performing one liveness round-trip against the Bot
/// API through the given candidate. The only network-facing dependency of
/// the resolver, which keeps resolution testable with a fake.
#[async_trait::async_trait]
pub trait LivenessCheck: Send + Sync {
    /// Attempt one round-trip and report measured latency, or a cause string
    /// on failure. Implementations must release any connection they opened
    /// before returning, on every path.
    async fn check(&self, candidate: &TransportCandidate) -> Result<Duration, String>;
}

/// Outcome of one resolution pass: the winner plus the per-candidate report.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub transport: ResolvedTransport,
    pub report: Vec<ProbeResult>,
}

/// Probes a [`CandidateSet`] against a [`LivenessCheck`] under a
/// per-candidate timeout.
pub struct Resolver {
    liveness: Arc<dyn LivenessCheck>,
    per_candidate_timeout: Duration,
}

impl Resolver {
    pub fn new(liveness: Arc<dyn LivenessCheck>, per_candidate_timeout: Duration) -> Self {
        Self {
            liveness,
            per_candidate_timeout,
        }
    }

    pub fn per_candidate_timeout(&self) -> Duration {
        self.per_candidate_timeout
    }

    /// Sequential mode: first success wins, remaining candidates are skipped.
    ///
    /// The report contains one entry per candidate actually probed (in set
    /// order), so on success it may be shorter than the set; on total failure
    /// it covers the whole set.
    pub async fn resolve_first_success(
        &self,
        candidates: &CandidateSet,
    ) -> Result<Resolution, ResolutionError> {
        let logger = get_debug_logger();
        let mut report = Vec::with_capacity(candidates.len());

        for candidate in candidates.iter() {
            let result = self.probe(candidate).await;
            let latency = result.outcome.latency();
            report.push(result);

            if let Some(latency) = latency {
                logger
                    .debug(
                        "Resolver",
                        &format!(
                            "first-success winner: {} ({}ms)",
                            candidate.name(),
                            latency.as_millis()
                        ),
                    )
                    .await;
                return Ok(Resolution {
                    transport: ResolvedTransport {
                        candidate: candidate.clone(),
                        measured_latency: latency,
                        probed_at: get_local_timestamp(),
                    },
                    report,
                });
            }
        }

        logger
            .warn(
                "Resolver",
                &format!("all {} candidates unreachable", report.len()),
            )
            .await;
        Err(ResolutionError::AllCandidatesUnreachable { report })
    }

    /// Concurrent mode: race every candidate, wait for all to settle, rank.
    ///
    /// One slow probe never delays the others; each runs under its own
    /// timeout and a timing-out probe never cancels its siblings. The report
    /// always has one entry per candidate, ordered successes-by-latency,
    /// then timeouts, then failures (original candidate order within each
    /// bucket).
    pub async fn resolve_rank_all(
        &self,
        candidates: &CandidateSet,
    ) -> Result<Resolution, ResolutionError> {
        let logger = get_debug_logger();

        let probes = candidates.iter().map(|candidate| self.probe(candidate));
        let results = join_all(probes).await;
        let report = rank_report(results);

        match report.first() {
            Some(best) if best.outcome.is_success() => {
                let latency = best.outcome.latency().unwrap_or_default();
                logger
                    .debug(
                        "Resolver",
                        &format!(
                            "rank-all winner: {} ({}ms)",
                            best.candidate.name(),
                            latency.as_millis()
                        ),
                    )
                    .await;
                Ok(Resolution {
                    transport: ResolvedTransport {
                        candidate: best.candidate.clone(),
                        measured_latency: latency,
                        probed_at: get_local_timestamp(),
                    },
                    report,
                })
            }
            _ => {
                logger
                    .warn(
                        "Resolver",
                        &format!("all {} candidates unreachable", report.len()),
                    )
                    .await;
                Err(ResolutionError::AllCandidatesUnreachable { report })
            }
        }
    }

    /// One bounded probe attempt.
    ///
    /// Classification: the timeout future firing, or a round-trip whose
    /// measured latency reaches the bound, is `Timeout` (the success boundary
    /// is exclusive, and stays stable under scheduling jitter). A liveness
    /// error is `Failure`.
    async fn probe(&self, candidate: &TransportCandidate) -> ProbeResult {
        let outcome = match timeout(self.per_candidate_timeout, self.liveness.check(candidate))
            .await
        {
            Err(_) => ProbeOutcome::Timeout,
            Ok(Ok(latency)) if latency >= self.per_candidate_timeout => ProbeOutcome::Timeout,
            Ok(Ok(latency)) => ProbeOutcome::Success { latency },
            Ok(Err(cause)) => ProbeOutcome::Failure { cause },
        };

        ProbeResult {
            candidate: candidate.clone(),
            outcome,
        }
    }
}

/// Order probe results for the diagnostic report: successes by ascending
/// latency, then timeouts, then failures, keeping original candidate order
/// within the timeout and failure buckets.
pub fn rank_report(results: Vec<ProbeResult>) -> Vec<ProbeResult> {
    let mut successes = Vec::new();
    let mut timeouts = Vec::new();
    let mut failures = Vec::new();

    for result in results {
        match result.outcome {
            ProbeOutcome::Success { .. } => successes.push(result),
            ProbeOutcome::Timeout => timeouts.push(result),
            ProbeOutcome::Failure { .. } => failures.push(result),
        }
    }

    successes.sort_by_key(|r| r.outcome.latency().unwrap_or_default());

    successes.extend(timeouts);
    successes.extend(failures);
    successes
}
