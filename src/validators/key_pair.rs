//! Certificate/key pairing and hostname binding.

use super::certificates::CERTIFICATES_TAG;
use super::hostname::normalize_hostname;
use crate::error::{Validation, ValidationError, ValidationKind};
use crate::tls::{crypto_provider, pem};
use rustls::pki_types::{CertificateDer, ServerName};
use rustls::sign::CertifiedKey;
use webpki::EndEntityCert;

/// Check that `key` is the private key of certificate `cert` and that the certificate
/// is valid for `hostname`.
///
/// Both inputs are PEM. `cert` may hold a chain, the first certificate being the leaf.
/// A `:port` suffix on `hostname` is ignored. Name matching follows the WebPKI rules
/// (subject alternative names, wildcards in the left-most label, no common-name
/// fallback).
///
/// # Examples
///
/// ```rust,no_run
/// use preflight_config::validators::validate_cert_pair_with_hostname;
///
/// # fn example(cert: &[u8], key: &[u8]) {
/// match validate_cert_pair_with_hostname(cert, key, "svc.internal:8443", "Server") {
///     Ok(()) => println!("certificate is usable"),
///     Err(err) => eprintln!("{}", err),
/// }
/// # }
/// ```
pub fn validate_cert_pair_with_hostname(
    cert: &[u8],
    key: &[u8],
    hostname: &str,
    field_group: &str,
) -> Validation {
    let chain = load_key_pair(cert, key)
        .map_err(|message| failure(ValidationKind::KeyPairMismatch, field_group, message))?;

    let leaf = EndEntityCert::try_from(&chain[0]).map_err(|e| {
        failure(
            ValidationKind::KeyPairMismatch,
            field_group,
            format!("failed to parse certificate: {}", e),
        )
    })?;

    let host = normalize_hostname(hostname);
    let server_name = ServerName::try_from(host).map_err(|e| {
        failure(
            ValidationKind::HostnameVerificationFailed,
            field_group,
            format!("{}: {}", e, host),
        )
    })?;

    leaf.verify_is_valid_for_subject_name(&server_name)
        .map_err(|e| {
            failure(
                ValidationKind::HostnameVerificationFailed,
                field_group,
                e.to_string(),
            )
        })?;

    tracing::debug!(hostname = host, field_group, "Certificate pair verified");
    Ok(())
}

/// Parse the pair and confirm the key's public half matches the leaf certificate.
fn load_key_pair(cert: &[u8], key: &[u8]) -> Result<Vec<CertificateDer<'static>>, String> {
    let chain = pem::certificates(cert).map_err(|e| e.to_string())?;
    if chain.is_empty() {
        return Err("failed to find any PEM certificate in certificate input".to_string());
    }

    let key = pem::private_key(key)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "failed to find any PEM private key in key input".to_string())?;

    let signing_key = crypto_provider()
        .key_provider
        .load_private_key(key)
        .map_err(|e| e.to_string())?;

    let certified = CertifiedKey::new(chain, signing_key);
    certified
        .keys_match()
        .map_err(|e| format!("private key does not match certificate: {}", e))?;

    Ok(certified.cert)
}

fn failure(kind: ValidationKind, field_group: &str, message: impl Into<String>) -> ValidationError {
    ValidationError::new(kind, [CERTIFICATES_TAG], field_group, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair {
        cert: String,
        key: String,
    }

    fn generate(names: &[&str]) -> Pair {
        let key = rcgen::KeyPair::generate().unwrap();
        let cert = rcgen::CertificateParams::new(names.iter().map(|n| n.to_string()).collect::<Vec<_>>())
            .unwrap()
            .self_signed(&key)
            .unwrap();
        Pair {
            cert: cert.pem(),
            key: key.serialize_pem(),
        }
    }

    fn check(pair: &Pair, hostname: &str) -> Validation {
        validate_cert_pair_with_hostname(pair.cert.as_bytes(), pair.key.as_bytes(), hostname, "Server")
    }

    #[test]
    fn test_matching_host() {
        let pair = generate(&["svc.internal"]);
        assert!(check(&pair, "svc.internal").is_ok());
        assert!(check(&pair, "svc.internal:8443").is_ok());
        assert!(check(&pair, "SVC.internal").is_ok());
    }

    #[test]
    fn test_other_host() {
        let pair = generate(&["svc.internal"]);
        let err = check(&pair, "other.internal").unwrap_err();
        assert_eq!(err.kind, ValidationKind::HostnameVerificationFailed);
        assert_eq!(err.tags, vec![CERTIFICATES_TAG.to_string()]);
        assert_eq!(err.field_group, "Server");
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_wildcard() {
        let pair = generate(&["*.svc.internal"]);
        assert!(check(&pair, "api.svc.internal:443").is_ok());
        assert!(check(&pair, "svc.internal").is_err());
        assert!(check(&pair, "a.b.svc.internal").is_err());
    }

    #[test]
    fn test_ip_address() {
        let pair = generate(&["127.0.0.1"]);
        assert!(check(&pair, "127.0.0.1:6379").is_ok());
        assert!(check(&pair, "127.0.0.2").is_err());
    }

    #[test]
    fn test_ipv6_address_with_and_without_port() {
        let pair = generate(&["::1"]);
        assert!(check(&pair, "::1").is_ok());
        assert!(check(&pair, "[::1]").is_ok());
        assert!(check(&pair, "[::1]:443").is_ok());

        let err = check(&pair, "[::2]").unwrap_err();
        assert_eq!(err.kind, ValidationKind::HostnameVerificationFailed);
    }

    #[test]
    fn test_mismatched_key() {
        let pair = generate(&["svc.internal"]);
        let other = generate(&["svc.internal"]);
        let err = validate_cert_pair_with_hostname(
            pair.cert.as_bytes(),
            other.key.as_bytes(),
            "svc.internal",
            "Server",
        )
        .unwrap_err();
        assert_eq!(err.kind, ValidationKind::KeyPairMismatch);
        assert!(err.message.contains("does not match"));
    }

    #[test]
    fn test_garbage_input() {
        let pair = generate(&["svc.internal"]);

        let err = validate_cert_pair_with_hostname(b"garbage", pair.key.as_bytes(), "svc.internal", "Server")
            .unwrap_err();
        assert_eq!(err.kind, ValidationKind::KeyPairMismatch);
        assert!(err.message.contains("certificate input"));

        let err = validate_cert_pair_with_hostname(pair.cert.as_bytes(), b"garbage", "svc.internal", "Server")
            .unwrap_err();
        assert_eq!(err.kind, ValidationKind::KeyPairMismatch);
        assert!(err.message.contains("key input"));
    }

    #[test]
    fn test_message_does_not_leak_key() {
        let pair = generate(&["svc.internal"]);
        let other = generate(&["svc.internal"]);
        let err = validate_cert_pair_with_hostname(
            pair.cert.as_bytes(),
            other.key.as_bytes(),
            "svc.internal",
            "Server",
        )
        .unwrap_err();
        assert!(!err.message.contains("PRIVATE KEY"));
        assert!(!err.message.contains("CERTIFICATE"));
    }
}
