use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use adbot::cli::Cli;
use adbot::config::ConnectivityConfig;
use adbot::core::connectivity::{
    render_recommendation, render_report, CandidateSet, ResolutionError, ResolvedClientHolder,
    Resolver,
};
use adbot::core::telegram::{BotApiClient, TelegramLivenessCheck};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let mut config = match ConnectivityConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(ms) = cli.timeout_ms {
        config.probe_timeout = Duration::from_millis(ms);
    }

    let candidates = CandidateSet::build(&config);
    let liveness = Arc::new(TelegramLivenessCheck::new(
        config.bot_token.clone(),
        config.api_base_url.clone(),
        config.probe_timeout,
    ));
    let resolver = Resolver::new(liveness, config.probe_timeout);

    // clap rejects --probe together with --resolve; no mode flag at all
    // means resolve, exactly as the bot does before its command loop.
    match (cli.probe, cli.resolve) {
        (true, _) => run_probe_harness(&resolver, &candidates).await,
        (false, _) => run_resolve(&config, resolver, &candidates).await,
    }
}

/// Standalone diagnostic harness: race every candidate, rank by latency,
/// recommend a configuration.
async fn run_probe_harness(resolver: &Resolver, candidates: &CandidateSet) -> ExitCode {
    println!(
        "Probing {} transport candidates ({}ms timeout each)...\n",
        candidates.len(),
        resolver.per_candidate_timeout().as_millis()
    );

    match resolver.resolve_rank_all(candidates).await {
        Ok(resolution) => {
            print!("{}", render_report(&resolution.report));
            if let Some(recommendation) = render_recommendation(&resolution.report) {
                println!("\n{}", recommendation);
            }
            ExitCode::SUCCESS
        }
        Err(ResolutionError::AllCandidatesUnreachable { report }) => {
            print!("{}", render_report(&report));
            eprintln!("\nNo transport candidate is reachable. Check the network or update proxy configuration.");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("probe failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Startup path: sequential first-success resolution through the holder.
async fn run_resolve(
    config: &ConnectivityConfig,
    resolver: Resolver,
    candidates: &CandidateSet,
) -> ExitCode {
    let bot_client = Arc::new(BotApiClient::new(
        config.bot_token.clone(),
        config.api_base_url.clone(),
        config.probe_timeout,
    ));
    let holder = ResolvedClientHolder::new(resolver, bot_client);

    match holder.initialize(candidates).await {
        Ok(()) => {
            match holder.current_transport() {
                Ok(transport) => println!(
                    "Connected via {} ({}, {}ms)",
                    transport.candidate.name(),
                    transport.candidate.masked(),
                    transport.measured_latency.as_millis()
                ),
                Err(e) => {
                    // initialize() succeeded, so this should be unreachable
                    eprintln!("resolution error: {}", e);
                    return ExitCode::FAILURE;
                }
            }
            print!("{}", render_report(&holder.last_report()));
            ExitCode::SUCCESS
        }
        Err(ResolutionError::AllCandidatesUnreachable { report }) => {
            print!("{}", render_report(&report));
            eprintln!("\nNo transport candidate is reachable; not starting the command loop.");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("resolution error: {}", e);
            ExitCode::FAILURE
        }
    }
}
