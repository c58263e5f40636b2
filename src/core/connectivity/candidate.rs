//! Transport candidates and the ordered candidate set.
//!
//! A candidate is one configured way to reach the Bot API. The set is built
//! once from configuration, performs no I/O, and is immutable afterwards;
//! the resolver only ever reads it.

use crate::config::{ConnectivityConfig, ProxyEndpoint};

/// Kind of transport a candidate describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// No proxy, talk to the Bot API directly.
    Direct,
    /// Authenticated (or at least explicitly configured) SOCKS5 proxy.
    Socks5,
    /// Plain HTTP proxy.
    Http,
    /// Untrusted public proxy from the configured list.
    Unauthenticated,
}

impl TransportKind {
    /// Default URI scheme for the kind, used when a candidate is built
    /// without an explicit scheme.
    pub fn default_scheme(&self) -> Option<&'static str> {
        match self {
            TransportKind::Direct => None,
            TransportKind::Socks5 => Some("socks5"),
            TransportKind::Http | TransportKind::Unauthenticated => Some("http"),
        }
    }
}

/// Proxy credential pair. The secret is deliberately unreachable through
/// `Debug`/`Display`; only the HTTP client layer reads it via [`Credential::secret`].
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    username: String,
    password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// The raw secret. Callers must never put this in a report or log line.
    pub fn secret(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// One configured way to reach the Bot API.
///
/// Invariant: `Direct` candidates carry neither address nor credential;
/// every other kind carries an address. The constructors below are the only
/// way to build one, so the invariant holds everywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportCandidate {
    name: String,
    kind: TransportKind,
    // URI scheme as configured. `socks5h://` delegates DNS resolution to the
    // proxy and must survive to the client layer distinct from `socks5://`.
    scheme: Option<String>,
    address: Option<String>,
    credential: Option<Credential>,
}

impl TransportCandidate {
    /// The implicit always-last fallback candidate.
    pub fn direct() -> Self {
        Self {
            name: "direct".to_string(),
            kind: TransportKind::Direct,
            scheme: None,
            address: None,
            credential: None,
        }
    }

    pub fn proxy(
        name: impl Into<String>,
        kind: TransportKind,
        address: impl Into<String>,
        credential: Option<Credential>,
    ) -> Self {
        debug_assert!(kind != TransportKind::Direct);
        Self {
            name: name.into(),
            kind,
            scheme: kind.default_scheme().map(str::to_string),
            address: Some(address.into()),
            credential,
        }
    }

    /// Proxy candidate with an explicit URI scheme, as parsed from
    /// configuration (`socks5h` in particular is not the kind's default).
    pub fn proxy_with_scheme(
        name: impl Into<String>,
        kind: TransportKind,
        scheme: impl Into<String>,
        address: impl Into<String>,
        credential: Option<Credential>,
    ) -> Self {
        debug_assert!(kind != TransportKind::Direct);
        Self {
            name: name.into(),
            kind,
            scheme: Some(scheme.into()),
            address: Some(address.into()),
            credential,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TransportKind {
        self.kind
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// Proxy URI for the HTTP client layer, without credentials.
    /// `None` for the direct candidate.
    pub fn proxy_uri(&self) -> Option<String> {
        match (self.scheme.as_deref(), self.address.as_deref()) {
            (Some(scheme), Some(address)) => Some(format!("{}://{}", scheme, address)),
            _ => None,
        }
    }

    /// Human-readable endpoint with the secret redacted.
    ///
    /// Every report and log line goes through this; the raw secret never
    /// leaves [`Credential::secret`].
    pub fn masked(&self) -> String {
        match (self.scheme.as_deref(), self.address.as_deref()) {
            (Some(scheme), Some(address)) => match &self.credential {
                Some(cred) => format!("{}://{}:***@{}", scheme, cred.username(), address),
                None => format!("{}://{}", scheme, address),
            },
            _ => "direct".to_string(),
        }
    }
}

/// Ordered, immutable set of transport candidates.
///
/// Ordering policy: explicitly configured candidates (SOCKS5, then HTTP)
/// come before the public list, which comes before the implicit `direct`
/// fallback. Sequential resolution relies on this order for its
/// first-success short-circuit.
#[derive(Debug, Clone)]
pub struct CandidateSet {
    candidates: Vec<TransportCandidate>,
}

impl CandidateSet {
    /// Materialize the candidate set from configuration. No I/O, never fails;
    /// absent proxy configuration just omits the corresponding kind. The
    /// direct candidate is always appended last as the guaranteed fallback.
    pub fn build(config: &ConnectivityConfig) -> Self {
        let mut candidates = Vec::new();

        if let Some(endpoint) = &config.socks5_proxy {
            candidates.push(from_endpoint("socks5", TransportKind::Socks5, endpoint));
        }

        if let Some(endpoint) = &config.http_proxy {
            candidates.push(from_endpoint("http-proxy", TransportKind::Http, endpoint));
        }

        for (i, endpoint) in config.public_proxies.iter().enumerate() {
            candidates.push(from_endpoint(
                &format!("public-{}", i + 1),
                TransportKind::Unauthenticated,
                endpoint,
            ));
        }

        candidates.push(TransportCandidate::direct());

        Self { candidates }
    }

    /// Test/tooling constructor for a handcrafted candidate list.
    pub fn from_candidates(candidates: Vec<TransportCandidate>) -> Self {
        Self { candidates }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransportCandidate> {
        self.candidates.iter()
    }

    pub fn as_slice(&self) -> &[TransportCandidate] {
        &self.candidates
    }
}

fn from_endpoint(name: &str, kind: TransportKind, endpoint: &ProxyEndpoint) -> TransportCandidate {
    let credential = match (&endpoint.username, &endpoint.password) {
        (Some(user), Some(pass)) => Some(Credential::new(user, pass)),
        _ => None,
    };
    TransportCandidate::proxy_with_scheme(
        name,
        kind,
        endpoint.scheme.clone(),
        endpoint.address.clone(),
        credential,
    )
}
