//! PEM decoding of certificate-set entries.

use rustls::pki_types::{CertificateDer, PrivateKeyDer};

/// Every certificate in a PEM buffer, in order. Non-certificate sections are skipped.
pub(crate) fn certificates(pem: &[u8]) -> std::io::Result<Vec<CertificateDer<'static>>> {
    rustls_pemfile::certs(&mut &pem[..]).collect()
}

/// The first private key (PKCS#1, PKCS#8 or SEC1) in a PEM buffer, if any.
pub(crate) fn private_key(pem: &[u8]) -> std::io::Result<Option<PrivateKeyDer<'static>>> {
    rustls_pemfile::private_key(&mut &pem[..])
}
