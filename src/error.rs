//! Error types for preflight-config.

use serde::Serialize;
use std::fmt;

/// Result type alias for preflight-config operations that are not validators.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Outcome of a single validator call.
///
/// `Ok(())` means the check passed. `Err` always carries at least one tag and a
/// non-empty message.
pub type Validation = std::result::Result<(), ValidationError>;

/// Errors raised while loading settings, certificate material or TLS configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to load settings from a source.
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    /// Failed to deserialize settings.
    #[error("Failed to deserialize configuration: {0}")]
    DeserializationError(String),

    /// A named entry of the certificate set could not be parsed as a certificate.
    #[error("Invalid certificate '{name}': {reason}")]
    Certificate {
        /// Name of the entry in the certificate set
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// A named entry of the certificate set could not be parsed as a private key.
    #[error("Invalid private key '{name}': {reason}")]
    PrivateKey {
        /// Name of the entry in the certificate set
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// rustls refused to build the TLS configuration.
    #[error("TLS configuration error: {0}")]
    Tls(#[from] rustls::Error),

    /// IO error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Failure classes a validator can report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "class", content = "detail", rename_all = "snake_case")]
pub enum ValidationKind {
    /// A required value is absent or empty.
    #[default]
    MissingValue,
    /// The configuration carries no certificate set at all.
    MissingCertificateSet,
    /// A certificate required by a feature is absent from the set.
    CertificateNotFound(String),
    /// Several required certificates are absent from the set.
    CertificatesNotFound(Vec<String>),
    /// The private key does not match the certificate, or either failed to parse.
    KeyPairMismatch,
    /// The certificate is not valid for the requested hostname.
    HostnameVerificationFailed,
    /// The TCP connection timed out, was refused or could not be resolved.
    DialTimeoutOrRefused,
    /// The TLS handshake failed or stalled.
    TlsHandshakeFailed,
    /// The TLS client configuration could not be built from the certificate set.
    TlsConfigurationInvalid,
    /// The URL scheme is not one the reachability check understands.
    UnsupportedScheme,
    /// The value is present but malformed.
    InvalidValue,
    /// A referenced file does not exist.
    FileNotFound,
    /// The remote service rejected the supplied credentials.
    CredentialsRejected,
    /// The datastore did not answer a ping.
    DatastoreUnreachable,
}

/// Structured failure returned by every validator.
///
/// `tags` names the fields the error applies to and `field_group` the configuration
/// section, so a caller can group many independent failures into one report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Failure class
    pub kind: ValidationKind,
    /// Field identifiers the error applies to
    pub tags: Vec<String>,
    /// Configuration section the fields belong to
    pub field_group: String,
    /// Operator-facing explanation
    pub message: String,
}

impl ValidationError {
    /// Create a validation error.
    pub fn new(
        kind: ValidationKind,
        tags: impl IntoIterator<Item = impl Into<String>>,
        field_group: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            tags: tags.into_iter().map(Into::into).collect(),
            field_group: field_group.into(),
            message: message.into(),
        }
    }

    /// Create an error tagged with a single field.
    pub fn for_field(
        kind: ValidationKind,
        field: &str,
        field_group: &str,
        message: impl Into<String>,
    ) -> Self {
        Self::new(kind, [field], field_group, message)
    }

    /// Whether this is the zero value returned alongside a successful check.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.message.is_empty()
    }
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingValue => write!(f, "missing value"),
            Self::MissingCertificateSet => write!(f, "missing certificate set"),
            Self::CertificateNotFound(name) => write!(f, "certificate '{}' not found", name),
            Self::CertificatesNotFound(names) => {
                write!(f, "certificates not found: {}", names.join(", "))
            }
            Self::KeyPairMismatch => write!(f, "key pair mismatch"),
            Self::HostnameVerificationFailed => write!(f, "hostname verification failed"),
            Self::DialTimeoutOrRefused => write!(f, "dial timeout or refused"),
            Self::TlsHandshakeFailed => write!(f, "TLS handshake failed"),
            Self::TlsConfigurationInvalid => write!(f, "invalid TLS configuration"),
            Self::UnsupportedScheme => write!(f, "unsupported scheme"),
            Self::InvalidValue => write!(f, "invalid value"),
            Self::FileNotFound => write!(f, "file not found"),
            Self::CredentialsRejected => write!(f, "credentials rejected"),
            Self::DatastoreUnreachable => write!(f, "datastore unreachable"),
        }
    }
}
