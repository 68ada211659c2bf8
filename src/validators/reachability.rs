//! Protocol-aware reachability of configured hosts.

use super::hostname::normalize_hostname;
use crate::core::{DEFAULT_TIMEOUT, Options, ReachabilitySettings, UnknownSchemePolicy};
use crate::error::{Validation, ValidationError, ValidationKind};
use crate::tls::{CertificateSetTlsConfig, TlsConfigProvider};
use rustls::pki_types::ServerName;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{Instant, timeout_at};
use tokio_rustls::TlsConnector;
use url::Url;

/// How the reachability check treats a URL, decided by its scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scheme {
    /// `http`: a TCP connection is enough
    Plain,
    /// `https`: TCP plus a verified TLS handshake
    Secure,
    /// Anything else, including input without a parseable scheme
    Other(String),
}

impl Scheme {
    /// Determine the scheme of `input`.
    pub fn of(input: &str) -> Self {
        match Url::parse(input) {
            Ok(url) => Self::from_url(&url),
            Err(_) => Self::Other(String::new()),
        }
    }

    fn from_url(url: &Url) -> Self {
        match url.scheme() {
            "http" => Self::Plain,
            "https" => Self::Secure,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Checks that a configured host accepts connections.
///
/// One attempt per call, bounded by the timeout (3 seconds by default) which covers
/// both the TCP connect and, for `https`, the TLS handshake. The connection is closed
/// as soon as it is established.
///
/// # Examples
///
/// ```rust,no_run
/// use preflight_config::prelude::*;
/// use std::time::Duration;
///
/// # async fn example(options: &Options) {
/// let checker = ReachabilityChecker::new().with_timeout(Duration::from_secs(1));
/// if let Err(err) = checker
///     .check(options, "https://auth.example.com", "AUTH_URL", "Auth")
///     .await
/// {
///     eprintln!("{}", err);
/// }
/// # }
/// ```
#[derive(Clone)]
pub struct ReachabilityChecker {
    timeout: Duration,
    unknown_scheme: UnknownSchemePolicy,
    tls: Arc<dyn TlsConfigProvider>,
}

impl ReachabilityChecker {
    /// Create a checker with the default timeout, permissive unknown-scheme policy and
    /// the certificate-set TLS provider.
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            unknown_scheme: UnknownSchemePolicy::Permit,
            tls: Arc::new(CertificateSetTlsConfig::new()),
        }
    }

    /// Create a checker from loaded settings.
    pub fn from_settings(settings: &ReachabilitySettings) -> Self {
        Self::new()
            .with_timeout(settings.timeout())
            .with_unknown_scheme_policy(settings.unknown_scheme)
    }

    /// Set the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Choose what happens for schemes other than `http` and `https`.
    ///
    /// The default, [`UnknownSchemePolicy::Permit`], reports success without any
    /// network activity, so a mistyped scheme goes unnoticed. Use
    /// [`UnknownSchemePolicy::Reject`] to surface it.
    pub fn with_unknown_scheme_policy(mut self, policy: UnknownSchemePolicy) -> Self {
        self.unknown_scheme = policy;
        self
    }

    /// Replace the source of the TLS client configuration.
    pub fn with_tls_provider<P: TlsConfigProvider + 'static>(mut self, provider: P) -> Self {
        self.tls = Arc::new(provider);
        self
    }

    /// Check that the host in `input` is reachable.
    ///
    /// `options` supplies the trust material for `https`. Failures are tagged with
    /// `field` and grouped under `field_group`.
    pub async fn check(
        &self,
        options: &Options,
        input: &str,
        field: &str,
        field_group: &str,
    ) -> Validation {
        let url = Url::parse(input).ok();
        let scheme = url
            .as_ref()
            .map_or_else(|| Scheme::Other(String::new()), Scheme::from_url);
        let fail = |kind, message: String| ValidationError::for_field(kind, field, field_group, message);

        if let Scheme::Other(name) = &scheme {
            return match self.unknown_scheme {
                UnknownSchemePolicy::Permit => {
                    tracing::debug!(input, scheme = %name, "Skipping reachability check");
                    Ok(())
                }
                UnknownSchemePolicy::Reject => Err(fail(
                    ValidationKind::UnsupportedScheme,
                    format!("{} must use the http or https scheme", field),
                )),
            };
        }

        let Some(address) = url.as_ref().and_then(dial_address) else {
            return Err(fail(
                ValidationKind::InvalidValue,
                format!("{} has no host to connect to", field),
            ));
        };

        tracing::debug!(input, address = %address, timeout = ?self.timeout, "Checking reachability");
        let deadline = Instant::now() + self.timeout;

        let result = match scheme {
            Scheme::Plain => self
                .dial(&address, deadline)
                .await
                .map(drop)
                .map_err(|message| fail(ValidationKind::DialTimeoutOrRefused, message)),
            _ => match self.tls.client_config(options) {
                Ok(config) => self
                    .handshake(config, &address, deadline)
                    .await
                    .map_err(|(kind, detail)| {
                        fail(kind, format!("Cannot reach {}. Error: {}", input, detail))
                    }),
                Err(e) => Err(fail(ValidationKind::TlsConfigurationInvalid, e.to_string())),
            },
        };

        if let Err(err) = &result {
            tracing::warn!(input, kind = %err.kind, error = %err.message, "Host is not reachable");
        }
        result
    }

    async fn dial(&self, address: &str, deadline: Instant) -> Result<TcpStream, String> {
        match timeout_at(deadline, TcpStream::connect(address)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(format!("dial tcp {}: {}", address, e)),
            Err(_) => Err(format!("dial tcp {}: i/o timeout", address)),
        }
    }

    async fn handshake(
        &self,
        config: rustls::ClientConfig,
        address: &str,
        deadline: Instant,
    ) -> Result<(), (ValidationKind, String)> {
        let host = normalize_hostname(address).to_string();
        let server_name = ServerName::try_from(host)
            .map_err(|e| (ValidationKind::TlsHandshakeFailed, e.to_string()))?;

        let stream = self
            .dial(address, deadline)
            .await
            .map_err(|message| (ValidationKind::DialTimeoutOrRefused, message))?;

        let connector = TlsConnector::from(Arc::new(config));
        match timeout_at(deadline, connector.connect(server_name, stream)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err((ValidationKind::TlsHandshakeFailed, e.to_string())),
            Err(_) => Err((
                ValidationKind::TlsHandshakeFailed,
                "TLS handshake timeout".to_string(),
            )),
        }
    }
}

impl Default for ReachabilityChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// Check reachability with default settings. See [`ReachabilityChecker::check`].
pub async fn validate_host_is_reachable(
    options: &Options,
    input: &str,
    field: &str,
    field_group: &str,
) -> Validation {
    ReachabilityChecker::new()
        .check(options, input, field, field_group)
        .await
}

/// `host:port` to dial, with the scheme's default port when the URL names none.
/// IPv6 hosts keep their brackets.
fn dial_address(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|host| !host.is_empty())?;
    let port = url.port_or_known_default()?;
    Some(format!("{}:{}", host, port))
}
