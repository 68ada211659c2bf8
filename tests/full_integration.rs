//! Full integration tests running a realistic pre-flight pass.

mod common;

use common::{generate_ca, generate_leaf, spawn_tls_server};
use preflight_config::prelude::*;
use std::fs;
use tempfile::TempDir;

fn write_service_certs(dir: &TempDir, hosts: &[&str]) -> String {
    let ca = generate_ca();
    let server = generate_leaf(&ca, hosts);
    fs::write(dir.path().join("ca"), ca.cert.pem()).unwrap();
    fs::write(dir.path().join("server.crt"), server.cert_pem()).unwrap();
    fs::write(dir.path().join("server.key"), server.key_pem()).unwrap();
    ca.cert.pem()
}

fn server_pair_check(options: &Options, hostname: &str) -> Validation {
    validate_certs_present(options, &["server.crt", "server.key"], "Server")?;
    let certs = options.certificates.as_ref().unwrap();
    validate_cert_pair_with_hostname(
        certs.get("server.crt").unwrap().as_bytes(),
        certs.get("server.key").unwrap().as_bytes(),
        hostname,
        "Server",
    )
}

#[test]
fn test_certificate_directory_end_to_end() {
    let dir = TempDir::new().unwrap();
    write_service_certs(&dir, &["svc.internal"]);
    let options = Options::from_certificate_dir(dir.path()).unwrap();

    assert!(server_pair_check(&options, "svc.internal:8443").is_ok());
    assert!(server_pair_check(&options, "SVC.INTERNAL").is_ok());

    let err = server_pair_check(&options, "other.internal").unwrap_err();
    assert_eq!(err.kind, ValidationKind::HostnameVerificationFailed);
    assert_eq!(err.field_group, "Server");
}

#[test]
fn test_missing_certificate_directory() {
    let dir = TempDir::new().unwrap();
    let options = Options::from_certificate_dir(dir.path().join("absent")).unwrap();

    let err = validate_certs_present(&options, &[], "Server").unwrap_err();
    assert_eq!(err.kind, ValidationKind::MissingCertificateSet);
    assert_eq!(err.message, "Certificates are required for SSL but are not present");
}

#[test]
fn test_presence_names_first_missing() {
    let options = Options::new().with_certificates(CertificateSet::new().with("ca", "pem"));

    let err = validate_certs_present(&options, &["ca", "client", "server"], "Auth").unwrap_err();
    assert_eq!(err.kind, ValidationKind::CertificateNotFound("client".to_string()));
    assert_eq!(err.tags, vec![CERTIFICATES_TAG.to_string()]);
    assert_eq!(err.message, "Certificate client is required for Auth.");

    let err = validate_all_certs_present(&options, &["ca", "client", "server"], "Auth").unwrap_err();
    assert_eq!(
        err.kind,
        ValidationKind::CertificatesNotFound(vec!["client".to_string(), "server".to_string()])
    );
    assert_eq!(err.message, "Certificates client, server are required for Auth.");
}

#[test]
fn test_options_from_json() {
    let options: Options = serde_json::from_str(
        r#"{"certificates": {"ca": "-----BEGIN CERTIFICATE-----"}}"#,
    )
    .unwrap();
    assert!(validate_certs_present(&options, &["ca"], "TLS").is_ok());

    let empty: Options = serde_json::from_str("{}").unwrap();
    assert!(validate_certs_present(&empty, &["ca"], "TLS").is_err());
}

#[tokio::test]
async fn test_report_collects_independent_failures() {
    let dir = TempDir::new().unwrap();
    let ca_pem = write_service_certs(&dir, &["127.0.0.1"]);
    let options = Options::from_certificate_dir(dir.path()).unwrap();

    let ca = generate_ca();
    let auth_server = generate_leaf(&ca, &["127.0.0.1"]);
    let untrusted = spawn_tls_server(&auth_server, None).await;

    let mut report = ValidationReport::new();
    report.record(server_pair_check(&options, "127.0.0.1"));
    report.record(validate_required_string("", "DB_HOST", "Database"));
    report.record(validate_time_pattern("5 minutes", "CACHE_TTL", "Cache"));
    report.record(validate_is_url("https://auth.internal", "AUTH_URL", "Auth"));
    report.record(
        validate_host_is_reachable(
            &options,
            &format!("https://127.0.0.1:{}", untrusted.port()),
            "AUTH_URL",
            "Auth",
        )
        .await,
    );

    assert!(!report.is_ok());
    assert_eq!(report.errors().len(), 3);

    let groups = report.by_field_group();
    assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec!["Auth", "Cache", "Database"]);
    assert_eq!(groups["Auth"][0].kind, ValidationKind::TlsHandshakeFailed);
    assert_eq!(groups["Database"][0].kind, ValidationKind::MissingValue);

    let rendered = report.to_string();
    assert!(rendered.contains("DB_HOST"));
    assert!(!rendered.contains(&ca_pem));

    assert!(report.into_result().is_err());
}

#[test]
fn test_settings_drive_checker() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("preflight.yaml");
    fs::write(
        &path,
        r#"
reachability:
  timeout_ms: 750
  unknown_scheme: reject
"#,
    )
    .unwrap();

    let settings = SettingsLoader::new().with_file(&path).load().unwrap();
    assert_eq!(settings.reachability.timeout(), std::time::Duration::from_millis(750));
    assert_eq!(settings.reachability.unknown_scheme, UnknownSchemePolicy::Reject);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let err = runtime
        .block_on(
            ReachabilityChecker::from_settings(&settings.reachability).check(
                &Options::new(),
                "gopher://legacy.internal",
                "LEGACY_URL",
                "Legacy",
            ),
        )
        .unwrap_err();
    assert_eq!(err.kind, ValidationKind::UnsupportedScheme);
}

#[test]
fn test_env_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("preflight.toml");
    fs::write(&path, "[reachability]\ntimeout_ms = 100\n").unwrap();

    unsafe {
        std::env::set_var("PREFLIGHT_IT_REACHABILITY__TIMEOUT_MS", "1500");
        std::env::set_var("PREFLIGHT_IT_OAUTH__ENDPOINT", "https://git.example.com/");
    }

    let settings = SettingsLoader::new()
        .with_file(&path)
        .with_env_overrides("PREFLIGHT_IT", "__")
        .load();

    unsafe {
        std::env::remove_var("PREFLIGHT_IT_REACHABILITY__TIMEOUT_MS");
        std::env::remove_var("PREFLIGHT_IT_OAUTH__ENDPOINT");
    }

    let settings = settings.unwrap();
    assert_eq!(settings.reachability.timeout_ms, 1500);
    assert_eq!(settings.oauth.endpoint, "https://git.example.com/");
}
