//! TLS client configuration built from the certificate set.

pub(crate) mod pem;
mod provider;

pub(crate) use provider::crypto_provider;
pub use provider::{CertificateSetTlsConfig, DEFAULT_CLIENT_IDENTITY, TlsConfigProvider};
