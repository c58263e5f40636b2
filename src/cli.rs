use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "adbot")]
#[command(version = concat!("Ver:", env!("CARGO_PKG_VERSION")))]
#[command(about = "Telegram remote-control bridge with proxy-aware connectivity resolution")]
pub struct Cli {
    /// Probe every configured transport candidate concurrently and print a
    /// ranked latency report with a recommended configuration
    #[arg(short = 'p', long = "probe")]
    pub probe: bool,

    /// Resolve a transport sequentially (first success wins) and print the
    /// winning candidate, as the bot does at startup. This is the default
    /// when no mode flag is given
    #[arg(short = 'r', long = "resolve", conflicts_with = "probe")]
    pub resolve: bool,

    /// Override the per-candidate probe timeout in milliseconds
    #[arg(long = "timeout-ms")]
    pub timeout_ms: Option<u64>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
