//! Bot API plumbing: the production liveness check and the long-lived
//! outbound client configured by the resolved-client holder.
//!
//! Proxy connection itself is a capability of isahc/curl; this module only
//! decides which proxy settings to hand it.

use std::sync::RwLock;
use std::time::{Duration, Instant};

use isahc::auth::{Authentication, Credentials};
use isahc::config::Configurable;
use isahc::http::Uri;
use isahc::{AsyncReadResponseExt, HttpClient, Request};

use crate::core::connectivity::candidate::TransportCandidate;
use crate::core::connectivity::holder::ClientConfigurator;
use crate::core::connectivity::resolver::LivenessCheck;
use crate::core::connectivity::types::ResolvedTransport;
use crate::core::debug_logger::get_debug_logger;

/// Build an isahc client configured for the given candidate's transport.
///
/// The request timeout doubles as the probe bound, so curl abandons the
/// connection attempt itself when the resolver's timeout fires and nothing
/// leaks across probe attempts.
pub fn build_client_for(
    candidate: &TransportCandidate,
    timeout: Duration,
) -> Result<HttpClient, String> {
    let mut builder = HttpClient::builder().timeout(timeout);

    if let Some(proxy_uri) = candidate.proxy_uri() {
        let uri = proxy_uri
            .parse::<Uri>()
            .map_err(|e| format!("invalid proxy URI for {}: {}", candidate.name(), e))?;
        builder = builder.proxy(Some(uri));

        if let Some(cred) = candidate.credential() {
            builder = builder
                .proxy_authentication(Authentication::basic())
                .proxy_credentials(Credentials::new(cred.username(), cred.secret()));
        }
    }

    builder
        .build()
        .map_err(|e| format!("failed to create HTTP client: {}", e))
}

/// Production liveness check: one authenticated `getMe` round-trip through
/// the candidate under test, on a throwaway client.
pub struct TelegramLivenessCheck {
    bot_token: String,
    api_base_url: String,
    timeout: Duration,
}

impl TelegramLivenessCheck {
    pub fn new(
        bot_token: impl Into<String>,
        api_base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            bot_token: bot_token.into(),
            api_base_url: api_base_url.into(),
            timeout,
        }
    }

    fn get_me_url(&self) -> String {
        format!("{}/bot{}/getMe", self.api_base_url, self.bot_token)
    }

    /// The bot token is part of every Bot API URL and isahc errors may echo
    /// the URL back; scrub it before the cause travels into a report.
    fn redact(&self, message: String) -> String {
        message.replace(&self.bot_token, "***")
    }
}

#[async_trait::async_trait]
impl LivenessCheck for TelegramLivenessCheck {
    async fn check(&self, candidate: &TransportCandidate) -> Result<Duration, String> {
        // Throwaway client per probe: dropping it releases the proxy
        // handshake and any pending connection on every exit path.
        let client = build_client_for(candidate, self.timeout)?;
        let start = Instant::now();

        let request = Request::get(self.get_me_url())
            .timeout(self.timeout)
            .header("Accept", "application/json")
            .body(())
            .map_err(|e| self.redact(format!("request creation failed: {}", e)))?;

        let mut response = client
            .send_async(request)
            .await
            .map_err(|e| self.redact(format!("request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| self.redact(format!("failed to read response body: {}", e)))?;
        let latency = start.elapsed();

        if status != 200 {
            return Err(format!("getMe returned HTTP {}", status));
        }

        let payload: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| format!("getMe returned invalid JSON: {}", e))?;
        if payload.get("ok").and_then(|v| v.as_bool()) != Some(true) {
            return Err("getMe response not ok".to_string());
        }

        Ok(latency)
    }
}

/// Long-lived outbound Bot API client.
///
/// The inner isahc client is rebuilt wholesale when the holder applies a
/// newly resolved transport; callers before that point fail fast with a
/// "not connected" error instead of silently going direct.
pub struct BotApiClient {
    bot_token: String,
    api_base_url: String,
    request_timeout: Duration,
    client: RwLock<Option<HttpClient>>,
}

impl BotApiClient {
    pub fn new(
        bot_token: impl Into<String>,
        api_base_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            bot_token: bot_token.into(),
            api_base_url: api_base_url.into(),
            request_timeout,
            client: RwLock::new(None),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base_url, self.bot_token, method)
    }

    fn redact(&self, message: String) -> String {
        message.replace(&self.bot_token, "***")
    }

    fn current_client(&self) -> Result<HttpClient, String> {
        self.client
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
            .ok_or_else(|| "not connected: no transport resolved yet".to_string())
    }

    /// `getMe` through the configured transport. Used by the command layer's
    /// status command; the resolver never goes through here.
    pub async fn get_me(&self) -> Result<serde_json::Value, String> {
        self.call_method("getMe").await
    }

    async fn call_method(&self, method: &str) -> Result<serde_json::Value, String> {
        let client = self.current_client()?;

        let request = Request::get(self.method_url(method))
            .timeout(self.request_timeout)
            .header("Accept", "application/json")
            .body(())
            .map_err(|e| self.redact(format!("request creation failed: {}", e)))?;

        let mut response = client
            .send_async(request)
            .await
            .map_err(|e| self.redact(format!("request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| self.redact(format!("failed to read response body: {}", e)))?;

        if status != 200 {
            return Err(format!("{} returned HTTP {}", method, status));
        }
        serde_json::from_str(&body).map_err(|e| format!("{} returned invalid JSON: {}", method, e))
    }
}

#[async_trait::async_trait]
impl ClientConfigurator for BotApiClient {
    async fn apply(&self, transport: &ResolvedTransport) -> Result<(), String> {
        let client = build_client_for(&transport.candidate, self.request_timeout)?;

        get_debug_logger()
            .debug(
                "BotApiClient",
                &format!("outbound client configured for {}", transport.candidate.masked()),
            )
            .await;

        *self
            .client
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(client);
        Ok(())
    }
}
