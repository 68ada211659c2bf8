//! Core types: the options under test, engine settings and result aggregation.

mod options;
mod report;
mod settings;

pub use options::{CertificateMaterial, CertificateSet, Options};
pub use report::ValidationReport;
pub use settings::{
    DEFAULT_OAUTH_ENDPOINT, DEFAULT_TIMEOUT, OAuthSettings, ReachabilitySettings, Settings,
    SettingsLoader, UnknownSchemePolicy,
};
