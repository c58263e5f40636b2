//! Common test utilities: candidate builders and a scripted fake liveness
//! check routed by candidate name.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use adbot::core::connectivity::{Credential, LivenessCheck, TransportCandidate, TransportKind};

/// Scripted outcome for one candidate.
#[derive(Debug, Clone)]
pub enum FakeOutcome {
    /// Liveness round-trip completes with this measured latency.
    Latency(Duration),
    /// Liveness round-trip fails with this cause.
    Error(String),
    /// Probe never completes; the resolver's timeout has to fire.
    Hang,
}

/// Deterministic [`LivenessCheck`] fake: outcomes are routed by candidate
/// name, and every check is counted so tests can assert which candidates
/// were (not) probed.
#[derive(Default)]
pub struct FakeLiveness {
    outcomes: HashMap<String, FakeOutcome>,
    calls: Mutex<HashMap<String, usize>>,
}

impl FakeLiveness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcome(mut self, name: &str, outcome: FakeOutcome) -> Self {
        self.outcomes.insert(name.to_string(), outcome);
        self
    }

    pub fn calls_for(&self, name: &str) -> usize {
        self.calls
            .lock()
            .expect("calls lock")
            .get(name)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl LivenessCheck for FakeLiveness {
    async fn check(&self, candidate: &TransportCandidate) -> Result<Duration, String> {
        {
            let mut calls = self.calls.lock().expect("calls lock");
            *calls.entry(candidate.name().to_string()).or_insert(0) += 1;
        }

        match self.outcomes.get(candidate.name()) {
            Some(FakeOutcome::Latency(latency)) => Ok(*latency),
            Some(FakeOutcome::Error(cause)) => Err(cause.clone()),
            Some(FakeOutcome::Hang) | None => {
                // Far beyond any per-candidate timeout a test would use.
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err("unreachable".to_string())
            }
        }
    }
}

pub fn socks5_candidate(name: &str) -> TransportCandidate {
    TransportCandidate::proxy(
        name,
        TransportKind::Socks5,
        "91.199.87.197:2083",
        Some(Credential::new("seven", "hunter2-secret")),
    )
}

pub fn http_candidate(name: &str, address: &str) -> TransportCandidate {
    TransportCandidate::proxy(name, TransportKind::Http, address, None)
}

pub fn public_candidate(name: &str, address: &str) -> TransportCandidate {
    TransportCandidate::proxy(name, TransportKind::Unauthenticated, address, None)
}
