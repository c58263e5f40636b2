//! Tests for the resolved-client holder: initialization, fail-fast before
//! resolution, atomic replacement on reresolve, and configure-once behavior.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use adbot::core::connectivity::{
    CandidateSet, ClientConfigurator, ResolutionError, ResolvedClientHolder, ResolvedTransport,
    Resolver,
};

use crate::common::{http_candidate, socks5_candidate, FakeLiveness, FakeOutcome};

const PROBE_TIMEOUT: Duration = Duration::from_millis(100);

/// Records every applied transport; optionally fails.
#[derive(Default)]
struct RecordingConfigurator {
    applied: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingConfigurator {
    fn failing() -> Self {
        Self {
            applied: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    fn applied_names(&self) -> Vec<String> {
        self.applied.lock().expect("applied lock").clone()
    }
}

#[async_trait::async_trait]
impl ClientConfigurator for RecordingConfigurator {
    async fn apply(&self, transport: &ResolvedTransport) -> Result<(), String> {
        if self.fail {
            return Err("client rebuild failed".to_string());
        }
        self.applied
            .lock()
            .expect("applied lock")
            .push(transport.candidate.name().to_string());
        Ok(())
    }
}

fn two_candidate_set() -> CandidateSet {
    CandidateSet::from_candidates(vec![
        socks5_candidate("primary"),
        http_candidate("backup", "10.0.0.1:8080"),
    ])
}

fn holder_with(
    liveness: FakeLiveness,
    configurator: Arc<RecordingConfigurator>,
) -> ResolvedClientHolder {
    let resolver = Resolver::new(Arc::new(liveness), PROBE_TIMEOUT);
    ResolvedClientHolder::new(resolver, configurator)
}

#[tokio::test]
async fn test_current_transport_fails_before_initialize() {
    let holder = holder_with(FakeLiveness::new(), Arc::new(RecordingConfigurator::default()));

    match holder.current_transport() {
        Err(ResolutionError::NotInitialized) => {}
        other => panic!("expected NotInitialized, got {:?}", other),
    }
}

#[tokio::test]
async fn test_initialize_stores_transport_and_configures_once() {
    let liveness = FakeLiveness::new()
        .with_outcome("primary", FakeOutcome::Latency(Duration::from_millis(30)));
    let configurator = Arc::new(RecordingConfigurator::default());
    let holder = holder_with(liveness, configurator.clone());

    holder.initialize(&two_candidate_set()).await.unwrap();

    let transport = holder.current_transport().unwrap();
    assert_eq!(transport.candidate.name(), "primary");
    assert_eq!(transport.measured_latency, Duration::from_millis(30));

    // Configured exactly once, not once per dependent call.
    let _ = holder.current_transport().unwrap();
    let _ = holder.current_transport().unwrap();
    assert_eq!(configurator.applied_names(), vec!["primary".to_string()]);
}

#[tokio::test]
async fn test_failed_initialize_leaves_holder_uninitialized() {
    let liveness = FakeLiveness::new()
        .with_outcome("primary", FakeOutcome::Error("refused".to_string()))
        .with_outcome("backup", FakeOutcome::Hang);
    let configurator = Arc::new(RecordingConfigurator::default());
    let holder = holder_with(liveness, configurator.clone());

    let err = holder.initialize(&two_candidate_set()).await.unwrap_err();
    assert!(matches!(
        err,
        ResolutionError::AllCandidatesUnreachable { .. }
    ));
    assert!(matches!(
        holder.current_transport(),
        Err(ResolutionError::NotInitialized)
    ));
    assert!(configurator.applied_names().is_empty());

    // The failed pass still leaves a full diagnostic report behind.
    assert_eq!(holder.last_report().len(), 2);
}

#[tokio::test]
async fn test_failed_reresolve_keeps_previous_transport() {
    let liveness = FakeLiveness::new()
        .with_outcome("primary", FakeOutcome::Latency(Duration::from_millis(30)));
    let configurator = Arc::new(RecordingConfigurator::default());
    let holder = holder_with(liveness, configurator.clone());

    holder.initialize(&two_candidate_set()).await.unwrap();

    // Re-resolution against a set where everything is down.
    let dead_set = CandidateSet::from_candidates(vec![http_candidate("dead", "10.9.9.9:1")]);
    let err = holder.reresolve(&dead_set).await.unwrap_err();
    assert!(matches!(
        err,
        ResolutionError::AllCandidatesUnreachable { .. }
    ));

    // Previous transport still held, client not reconfigured.
    let transport = holder.current_transport().unwrap();
    assert_eq!(transport.candidate.name(), "primary");
    assert_eq!(configurator.applied_names(), vec!["primary".to_string()]);
}

#[tokio::test]
async fn test_successful_reresolve_replaces_transport_wholesale() {
    let liveness = FakeLiveness::new()
        .with_outcome("primary", FakeOutcome::Latency(Duration::from_millis(30)))
        .with_outcome("backup", FakeOutcome::Latency(Duration::from_millis(45)));
    let configurator = Arc::new(RecordingConfigurator::default());
    let holder = holder_with(liveness, configurator.clone());

    holder.initialize(&two_candidate_set()).await.unwrap();

    // Second pass against a set where only the backup exists.
    let backup_only =
        CandidateSet::from_candidates(vec![http_candidate("backup", "10.0.0.1:8080")]);
    holder.reresolve(&backup_only).await.unwrap();

    let transport = holder.current_transport().unwrap();
    assert_eq!(transport.candidate.name(), "backup");
    assert_eq!(
        configurator.applied_names(),
        vec!["primary".to_string(), "backup".to_string()]
    );
}

#[tokio::test]
async fn test_configuration_failure_does_not_publish_transport() {
    let liveness = FakeLiveness::new()
        .with_outcome("primary", FakeOutcome::Latency(Duration::from_millis(30)));
    let configurator = Arc::new(RecordingConfigurator::failing());
    let holder = holder_with(liveness, configurator);

    let err = holder.initialize(&two_candidate_set()).await.unwrap_err();
    assert!(matches!(err, ResolutionError::ClientConfiguration(_)));
    assert!(matches!(
        holder.current_transport(),
        Err(ResolutionError::NotInitialized)
    ));
}
