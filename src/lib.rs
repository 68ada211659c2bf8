//! # preflight-config
//!
//! Pre-flight validation of service configuration before the service starts.
//!
//! ## Overview
//!
//! `preflight-config` checks that operator-supplied configuration is usable:
//! - Required certificates are present in the configured certificate set
//! - Certificate and private key belong together and cover the expected hostname
//! - Configured hosts accept TCP connections, and TLS handshakes for `https`
//! - Plain values are present and well-formed (URLs, hostnames, durations, files)
//!
//! Every check is a one-shot assertion returning `Result<(), ValidationError>`. The
//! error carries the field tags and field group so a caller can collect many
//! independent failures into one [`ValidationReport`](core::ValidationReport).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use preflight_config::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let options = Options::from_certificate_dir("/etc/myservice/certs")?;
//! let settings = SettingsLoader::new()
//!     .with_file("config/preflight.yaml")
//!     .with_env_overrides("PREFLIGHT", "__")
//!     .load()?;
//!
//! let mut report = ValidationReport::new();
//! if report.record(validate_certs_present(&options, &["server.crt", "server.key"], "Server")) {
//!     let certs = options.certificates.as_ref().expect("checked above");
//!     report.record(validate_cert_pair_with_hostname(
//!         certs.get("server.crt").expect("checked above").as_bytes(),
//!         certs.get("server.key").expect("checked above").as_bytes(),
//!         "myservice.example.com:443",
//!         "Server",
//!     ));
//! }
//!
//! let checker = ReachabilityChecker::from_settings(&settings.reachability);
//! report.record(
//!     checker
//!         .check(&options, "https://auth.example.com", "AUTH_URL", "Auth")
//!         .await,
//! );
//!
//! if !report.is_ok() {
//!     eprintln!("{}", report);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `oauth` (default): [`OAuthCheck`](validators::OAuthCheck), using `reqwest`
//! - `redis`: Redis `PING` check
//! - `json`: JSON rendering of validation reports

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod tls;
pub mod validators;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{
        CertificateMaterial, CertificateSet, Options, Settings, SettingsLoader,
        UnknownSchemePolicy, ValidationReport,
    };
    pub use crate::error::{ConfigError, Result, Validation, ValidationError, ValidationKind};
    pub use crate::tls::{CertificateSetTlsConfig, TlsConfigProvider};
    pub use crate::validators::*;
}
