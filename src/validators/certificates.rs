//! Presence of the certificates a feature depends on.

use crate::core::{CertificateSet, Options};
use crate::error::{Validation, ValidationError, ValidationKind};

/// Tag attached to every certificate-related failure.
pub const CERTIFICATES_TAG: &str = "Certificates";

/// Check that every name in `required` is present in the certificate set.
///
/// Fails with `MissingCertificateSet` when the options carry no set at all, even if
/// `required` is empty. Otherwise stops at the first missing name and reports it.
/// Whether the entries hold valid certificates is not checked here.
///
/// # Examples
///
/// ```rust
/// use preflight_config::prelude::*;
///
/// let options = Options::new().with_certificates(CertificateSet::new().with("ca", "..."));
/// let err = validate_certs_present(&options, &["ca", "client"], "Redis").unwrap_err();
/// assert_eq!(err.kind, ValidationKind::CertificateNotFound("client".into()));
/// ```
pub fn validate_certs_present(options: &Options, required: &[&str], field_group: &str) -> Validation {
    let certificates = certificate_set(options, field_group)?;

    if let Some(missing) = required.iter().find(|name| !certificates.contains(name)) {
        return Err(ValidationError::new(
            ValidationKind::CertificateNotFound(missing.to_string()),
            [CERTIFICATES_TAG],
            field_group,
            format!("Certificate {} is required for {}.", missing, field_group),
        ));
    }

    Ok(())
}

/// Like [`validate_certs_present`], but reports every missing name at once.
pub fn validate_all_certs_present(
    options: &Options,
    required: &[&str],
    field_group: &str,
) -> Validation {
    let certificates = certificate_set(options, field_group)?;

    let missing: Vec<String> = required
        .iter()
        .filter(|name| !certificates.contains(name))
        .map(|name| name.to_string())
        .collect();

    match missing.len() {
        0 => Ok(()),
        1 => Err(ValidationError::new(
            ValidationKind::CertificatesNotFound(missing.clone()),
            [CERTIFICATES_TAG],
            field_group,
            format!("Certificate {} is required for {}.", missing[0], field_group),
        )),
        _ => Err(ValidationError::new(
            ValidationKind::CertificatesNotFound(missing.clone()),
            [CERTIFICATES_TAG],
            field_group,
            format!(
                "Certificates {} are required for {}.",
                missing.join(", "),
                field_group
            ),
        )),
    }
}

fn certificate_set<'a>(
    options: &'a Options,
    field_group: &str,
) -> Result<&'a CertificateSet, ValidationError> {
    options.certificates.as_ref().ok_or_else(|| {
        ValidationError::new(
            ValidationKind::MissingCertificateSet,
            [CERTIFICATES_TAG],
            field_group,
            "Certificates are required for SSL but are not present",
        )
    })
}
