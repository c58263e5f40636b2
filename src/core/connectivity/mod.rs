//! Connectivity resolution for the Bot API.
//!
//! The Bot API may be unreachable or throttled from the network the bridge
//! runs in, so before the command loop starts we probe an ordered set of
//! transport candidates (authenticated SOCKS5, plain HTTP proxy, public
//! proxies, direct) and converge on one usable transport:
//! - The bot startup path uses sequential first-success resolution for fast
//!   deterministic startup.
//! - The standalone probe harness races all candidates and ranks them by
//!   latency for the diagnostic report.

pub mod candidate;
pub mod holder;
pub mod report;
pub mod resolver;
pub mod types;

// Re-export public API
pub use candidate::{CandidateSet, Credential, TransportCandidate, TransportKind};
pub use holder::{ClientConfigurator, ResolvedClientHolder};
pub use report::{render_recommendation, render_report};
pub use resolver::{LivenessCheck, Resolution, Resolver};
pub use types::{ProbeOutcome, ProbeResult, ResolutionError, ResolvedTransport};
