//! Environment-based configuration for the connectivity core.
//!
//! Everything is read from `ADBOT_*` environment variables once at process
//! start. Absent proxy variables simply mean the corresponding transport
//! candidate is not built; malformed values are reported as [`ConfigError`]
//! instead of being silently skipped, so a typo in a proxy URL never
//! downgrades the bot to direct-only without the operator noticing.

use std::env;
use std::time::Duration;

use url::Url;

/// Default per-candidate probe timeout.
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 10_000;

/// Default Bot API base.
pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";

// Environment variable names
const ENV_BOT_TOKEN: &str = "ADBOT_BOT_TOKEN";
const ENV_API_BASE_URL: &str = "ADBOT_API_BASE_URL";
const ENV_SOCKS5_PROXY: &str = "ADBOT_SOCKS5_PROXY";
const ENV_HTTP_PROXY: &str = "ADBOT_HTTP_PROXY";
const ENV_PUBLIC_PROXIES: &str = "ADBOT_PUBLIC_PROXIES";
const ENV_PROBE_TIMEOUT_MS: &str = "ADBOT_PROBE_TIMEOUT_MS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ADBOT_BOT_TOKEN is not set; the liveness endpoint needs a bot token")]
    MissingBotToken,
    #[error("invalid proxy URL in {var}: {reason}")]
    InvalidProxyUrl { var: String, reason: String },
    #[error("invalid ADBOT_PROBE_TIMEOUT_MS value {raw:?}: expected milliseconds")]
    InvalidTimeout { raw: String },
}

/// One parsed proxy endpoint from configuration.
///
/// The URL scheme is validated at parse time and carried through to the
/// candidate set verbatim: `socks5h://` asks curl for remote DNS resolution
/// and must not be collapsed to `socks5://`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyEndpoint {
    /// URI scheme as configured (`socks5`, `socks5h`, or `http`).
    pub scheme: String,
    /// `host:port`
    pub address: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Connectivity configuration materialized from the environment.
#[derive(Debug, Clone)]
pub struct ConnectivityConfig {
    pub bot_token: String,
    pub api_base_url: String,
    pub socks5_proxy: Option<ProxyEndpoint>,
    pub http_proxy: Option<ProxyEndpoint>,
    pub public_proxies: Vec<ProxyEndpoint>,
    pub probe_timeout: Duration,
}

impl ConnectivityConfig {
    /// Load configuration from `ADBOT_*` environment variables.
    ///
    /// Missing optional values are fine; only a missing bot token or a
    /// malformed value is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token =
            get_non_empty_var(ENV_BOT_TOKEN).ok_or(ConfigError::MissingBotToken)?;

        let api_base_url = get_non_empty_var(ENV_API_BASE_URL)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let api_base_url = api_base_url.trim_end_matches('/').to_string();

        let socks5_proxy = get_non_empty_var(ENV_SOCKS5_PROXY)
            .map(|raw| parse_proxy_url(ENV_SOCKS5_PROXY, &raw, &["socks5", "socks5h"]))
            .transpose()?;

        let http_proxy = get_non_empty_var(ENV_HTTP_PROXY)
            .map(|raw| parse_proxy_url(ENV_HTTP_PROXY, &raw, &["http"]))
            .transpose()?;

        let mut public_proxies = Vec::new();
        if let Some(raw_list) = get_non_empty_var(ENV_PUBLIC_PROXIES) {
            for raw in raw_list.split(',') {
                let raw = raw.trim();
                if raw.is_empty() {
                    continue;
                }
                public_proxies.push(parse_proxy_url(
                    ENV_PUBLIC_PROXIES,
                    raw,
                    &["http", "socks5", "socks5h"],
                )?);
            }
        }

        let probe_timeout = match get_non_empty_var(ENV_PROBE_TIMEOUT_MS) {
            Some(raw) => {
                let ms: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidTimeout { raw: raw.clone() })?;
                if ms == 0 {
                    return Err(ConfigError::InvalidTimeout { raw });
                }
                Duration::from_millis(ms)
            }
            None => Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
        };

        Ok(Self {
            bot_token,
            api_base_url,
            socks5_proxy,
            http_proxy,
            public_proxies,
            probe_timeout,
        })
    }
}

/// Read an environment variable, treating empty/whitespace values as unset.
fn get_non_empty_var(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

/// Parse one proxy URL into a [`ProxyEndpoint`], validating scheme and host.
fn parse_proxy_url(
    var: &str,
    raw: &str,
    allowed_schemes: &[&str],
) -> Result<ProxyEndpoint, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidProxyUrl {
        var: var.to_string(),
        reason: e.to_string(),
    })?;

    if !allowed_schemes.contains(&url.scheme()) {
        return Err(ConfigError::InvalidProxyUrl {
            var: var.to_string(),
            reason: format!(
                "unsupported scheme {:?}, expected one of {:?}",
                url.scheme(),
                allowed_schemes
            ),
        });
    }

    let host = url
        .host_str()
        .ok_or_else(|| ConfigError::InvalidProxyUrl {
            var: var.to_string(),
            reason: "missing host".to_string(),
        })?;

    let port = url.port().ok_or_else(|| ConfigError::InvalidProxyUrl {
        var: var.to_string(),
        reason: "missing port".to_string(),
    })?;

    let username = if url.username().is_empty() {
        None
    } else {
        Some(url.username().to_string())
    };
    let password = url.password().map(str::to_string);

    Ok(ProxyEndpoint {
        scheme: url.scheme().to_string(),
        address: format!("{}:{}", host, port),
        username,
        password,
    })
}
