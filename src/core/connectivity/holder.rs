//! Resolved-client holder: owns the single long-lived transport.
//!
//! The stored [`ResolvedTransport`] is the only mutable shared state in the
//! connectivity core. It is written only by `initialize`/`reresolve` and
//! replaced wholesale under a lock, so readers never observe a half-updated
//! transport. Re-resolution is explicit (operator-triggered), never run
//! automatically, and a failed re-resolution leaves the previous transport
//! and the configured client untouched.

use std::sync::{Arc, RwLock};

use crate::core::connectivity::candidate::CandidateSet;
use crate::core::connectivity::resolver::Resolver;
use crate::core::connectivity::types::{ProbeResult, ResolutionError, ResolvedTransport};
use crate::core::debug_logger::get_debug_logger;

/// Applies a winning transport to the outbound Bot API client.
///
/// Invoked exactly once per successful `initialize`/`reresolve`, never
/// implicitly on every call.
#[async_trait::async_trait]
pub trait ClientConfigurator: Send + Sync {
    async fn apply(&self, transport: &ResolvedTransport) -> Result<(), String>;
}

/// Owns the resolved transport used by the command-dispatch layer.
pub struct ResolvedClientHolder {
    resolver: Resolver,
    configurator: Arc<dyn ClientConfigurator>,
    current: RwLock<Option<ResolvedTransport>>,
    last_report: RwLock<Vec<ProbeResult>>,
}

impl ResolvedClientHolder {
    pub fn new(resolver: Resolver, configurator: Arc<dyn ClientConfigurator>) -> Self {
        Self {
            resolver,
            configurator,
            current: RwLock::new(None),
            last_report: RwLock::new(Vec::new()),
        }
    }

    /// Run resolution once at startup and configure the outbound client.
    ///
    /// On failure the holder stays uninitialized and every dependent call
    /// fails fast with `NotInitialized`; there is no silent fallback to an
    /// unconfigured client.
    pub async fn initialize(&self, candidates: &CandidateSet) -> Result<(), ResolutionError> {
        self.resolve_and_store(candidates, "initialize").await
    }

    /// Explicit, caller-triggered re-resolution.
    ///
    /// Replaces the stored transport only on success; on failure the
    /// previously held transport stays in place (no partial downgrade).
    pub async fn reresolve(&self, candidates: &CandidateSet) -> Result<(), ResolutionError> {
        self.resolve_and_store(candidates, "reresolve").await
    }

    /// The currently held transport, or `NotInitialized` before the first
    /// successful `initialize`.
    pub fn current_transport(&self) -> Result<ResolvedTransport, ResolutionError> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
            .ok_or(ResolutionError::NotInitialized)
    }

    /// Per-candidate report from the most recent resolution attempt
    /// (including a failed one), for operator-facing diagnostics.
    pub fn last_report(&self) -> Vec<ProbeResult> {
        self.last_report
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    async fn resolve_and_store(
        &self,
        candidates: &CandidateSet,
        phase: &str,
    ) -> Result<(), ResolutionError> {
        let logger = get_debug_logger();

        let resolution = match self.resolver.resolve_first_success(candidates).await {
            Ok(resolution) => resolution,
            Err(err) => {
                if let ResolutionError::AllCandidatesUnreachable { report } = &err {
                    self.store_report(report.clone());
                }
                logger
                    .warn("ResolvedClientHolder", &format!("{} failed: {}", phase, err))
                    .await;
                return Err(err);
            }
        };

        // Configure the outbound client before publishing the transport, so
        // a reader never sees a transport the client does not match yet.
        self.configurator
            .apply(&resolution.transport)
            .await
            .map_err(ResolutionError::ClientConfiguration)?;

        logger
            .debug(
                "ResolvedClientHolder",
                &format!(
                    "{}: now using {} ({})",
                    phase,
                    resolution.transport.candidate.name(),
                    resolution.transport.candidate.masked()
                ),
            )
            .await;

        self.store_report(resolution.report.clone());
        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(resolution.transport);

        Ok(())
    }

    fn store_report(&self, report: Vec<ProbeResult>) {
        *self
            .last_report
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = report;
    }
}
