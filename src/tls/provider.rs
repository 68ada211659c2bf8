//! Building a TLS client configuration from the options' certificate set.

use super::pem;
use crate::core::Options;
use crate::error::{ConfigError, Result};
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::{ClientConfig, RootCertStore};
use std::sync::Arc;

/// Name of the certificate-set entry used as the client identity by default.
pub const DEFAULT_CLIENT_IDENTITY: &str = "client";

/// Source of the TLS client configuration used by the reachability check.
///
/// Implement this to plug in custom trust policies (pinned roots, platform stores).
pub trait TlsConfigProvider: Send + Sync {
    /// Build a client configuration for the given options.
    ///
    /// # Errors
    ///
    /// Returns an error if the certificate material in `options` is malformed.
    fn client_config(&self, options: &Options) -> Result<ClientConfig>;
}

/// Default provider: Mozilla roots plus every certificate found in the set.
///
/// - Each entry other than the client identity contributes its certificates as extra
///   trust anchors. Entries holding only a private key are skipped.
/// - The client identity entry (default `"client"`) must contain a certificate chain
///   followed by its private key, and is presented for mutual TLS.
/// - An entry with neither a certificate nor a private key is rejected.
#[derive(Debug, Clone)]
pub struct CertificateSetTlsConfig {
    client_identity: String,
    include_webpki_roots: bool,
}

impl CertificateSetTlsConfig {
    /// Create a provider with default settings.
    pub fn new() -> Self {
        Self {
            client_identity: DEFAULT_CLIENT_IDENTITY.to_string(),
            include_webpki_roots: true,
        }
    }

    /// Use a different entry name as the client identity.
    pub fn with_client_identity(mut self, name: impl Into<String>) -> Self {
        self.client_identity = name.into();
        self
    }

    /// Trust only the certificates in the set, not the Mozilla root program.
    pub fn without_webpki_roots(mut self) -> Self {
        self.include_webpki_roots = false;
        self
    }

    fn client_identity(
        &self,
        material: &[u8],
    ) -> Result<(Vec<CertificateDer<'static>>, PrivateKeyDer<'static>)> {
        let chain = pem::certificates(material).map_err(|e| ConfigError::Certificate {
            name: self.client_identity.clone(),
            reason: e.to_string(),
        })?;
        if chain.is_empty() {
            return Err(ConfigError::Certificate {
                name: self.client_identity.clone(),
                reason: "no certificate found in PEM data".to_string(),
            });
        }

        let key = pem::private_key(material)
            .map_err(|e| ConfigError::PrivateKey {
                name: self.client_identity.clone(),
                reason: e.to_string(),
            })?
            .ok_or_else(|| ConfigError::PrivateKey {
                name: self.client_identity.clone(),
                reason: "no private key found in PEM data".to_string(),
            })?;

        Ok((chain, key))
    }
}

impl Default for CertificateSetTlsConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TlsConfigProvider for CertificateSetTlsConfig {
    fn client_config(&self, options: &Options) -> Result<ClientConfig> {
        let mut roots = RootCertStore::empty();
        if self.include_webpki_roots {
            roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        }

        let mut identity = None;
        if let Some(certificates) = &options.certificates {
            for (name, material) in certificates.iter() {
                if name == self.client_identity {
                    identity = Some(self.client_identity(material.as_bytes())?);
                    continue;
                }

                let certs =
                    pem::certificates(material.as_bytes()).map_err(|e| ConfigError::Certificate {
                        name: name.to_string(),
                        reason: e.to_string(),
                    })?;
                if certs.is_empty() {
                    let has_key = matches!(pem::private_key(material.as_bytes()), Ok(Some(_)));
                    if has_key {
                        continue;
                    }
                    return Err(ConfigError::Certificate {
                        name: name.to_string(),
                        reason: "no certificate or private key found in PEM data".to_string(),
                    });
                }

                for cert in certs {
                    roots.add(cert).map_err(|e| ConfigError::Certificate {
                        name: name.to_string(),
                        reason: e.to_string(),
                    })?;
                }
            }
        }

        tracing::debug!(
            roots = roots.len(),
            client_auth = identity.is_some(),
            "Built TLS client configuration"
        );

        let builder = ClientConfig::builder_with_provider(crypto_provider())
            .with_safe_default_protocol_versions()?
            .with_root_certificates(roots);

        let config = match identity {
            Some((chain, key)) => builder.with_client_auth_cert(chain, key)?,
            None => builder.with_no_client_auth(),
        };
        Ok(config)
    }
}

/// The crypto provider every TLS operation in this crate uses.
pub(crate) fn crypto_provider() -> Arc<CryptoProvider> {
    Arc::new(rustls::crypto::ring::default_provider())
}
