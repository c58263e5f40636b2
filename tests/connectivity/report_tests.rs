//! Tests for report rendering and credential masking.

use std::time::Duration;

use adbot::core::connectivity::{
    render_recommendation, render_report, ProbeOutcome, ProbeResult, TransportCandidate,
};

use crate::common::{http_candidate, socks5_candidate};

fn sample_report() -> Vec<ProbeResult> {
    vec![
        ProbeResult {
            candidate: socks5_candidate("socks5"),
            outcome: ProbeOutcome::Success {
                latency: Duration::from_millis(120),
            },
        },
        ProbeResult {
            candidate: http_candidate("http-proxy", "10.0.0.1:8080"),
            outcome: ProbeOutcome::Timeout,
        },
        ProbeResult {
            candidate: TransportCandidate::direct(),
            outcome: ProbeOutcome::Failure {
                cause: "connection refused".to_string(),
            },
        },
    ]
}

#[test]
fn test_report_names_every_candidate_and_outcome() {
    let rendered = render_report(&sample_report());

    assert!(rendered.contains("socks5"));
    assert!(rendered.contains("http-proxy"));
    assert!(rendered.contains("direct"));
    assert!(rendered.contains("ok"));
    assert!(rendered.contains("timeout"));
    assert!(rendered.contains("fail"));
    assert!(rendered.contains("120ms"));
    assert!(rendered.contains("connection refused"));
}

#[test]
fn test_report_never_contains_secret() {
    // socks5_candidate carries the password "hunter2-secret"
    let rendered = render_report(&sample_report());
    assert!(!rendered.contains("hunter2-secret"));
    assert!(!rendered.contains("secret"));
    // Username and host stay visible for the operator.
    assert!(rendered.contains("seven"));
    assert!(rendered.contains("91.199.87.197:2083"));
}

#[test]
fn test_recommendation_picks_first_success() {
    let recommendation = render_recommendation(&sample_report()).unwrap();

    assert!(recommendation.contains("socks5"));
    assert!(recommendation.contains("120ms"));
    assert!(recommendation.contains("ADBOT_SOCKS5_PROXY"));
    assert!(!recommendation.contains("hunter2-secret"));
}

#[test]
fn test_recommendation_absent_when_nothing_succeeded() {
    let report = vec![ProbeResult {
        candidate: http_candidate("http-proxy", "10.0.0.1:8080"),
        outcome: ProbeOutcome::Timeout,
    }];
    assert!(render_recommendation(&report).is_none());
}

#[test]
fn test_recommendation_for_direct_suggests_unsetting_proxies() {
    let report = vec![ProbeResult {
        candidate: TransportCandidate::direct(),
        outcome: ProbeOutcome::Success {
            latency: Duration::from_millis(80),
        },
    }];
    let recommendation = render_recommendation(&report).unwrap();
    assert!(recommendation.contains("No proxy needed"));
}

#[test]
fn test_long_failure_cause_is_truncated() {
    let report = vec![ProbeResult {
        candidate: http_candidate("http-proxy", "10.0.0.1:8080"),
        outcome: ProbeOutcome::Failure {
            cause: "x".repeat(500),
        },
    }];
    let rendered = render_report(&report);
    assert!(rendered.len() < 250);
    assert!(rendered.contains("..."));
}
